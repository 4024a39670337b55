// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::error::AppError,
    db::LogoRepository,
    models::report::{ReportData, Stage},
};

const TITLE: &str = "פרויקט שווה פיתוח | תמונת מצב";

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_family: String,
    logos: LogoRepository,
}

fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

// Caracteres que ficam em sequência da esquerda para a direita (números, latim)
fn is_ltr(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '%' | ':' | '/' | '@' | '_' | '+')
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '<' => '>',
        '>' => '<',
        other => other,
    }
}

/// Ordem visual para o genpdf, que não faz bidi: inverte o texto hebraico
/// mantendo números e trechos latinos na ordem original.
pub fn rtl(text: &str) -> String {
    if !text.chars().any(is_hebrew) {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut ltr_run = String::new();
    for (i, &c) in chars.iter().enumerate() {
        // Espaço entre dois trechos latinos faz parte do trecho ("Strauss Group")
        let joins_run = c.is_whitespace()
            && ltr_run.trim_end().ends_with(|p: char| p.is_ascii_alphanumeric())
            && chars[i + 1..]
                .iter()
                .find(|n| !n.is_whitespace())
                .is_some_and(|&n| is_ltr(n));
        if is_ltr(c) || joins_run {
            ltr_run.push(c);
            continue;
        }
        if !ltr_run.is_empty() {
            tokens.push(std::mem::take(&mut ltr_run));
        }
        tokens.push(mirror(c).to_string());
    }
    if !ltr_run.is_empty() {
        tokens.push(ltr_run);
    }

    tokens.reverse();
    tokens.concat()
}

fn cell(text: impl AsRef<str>) -> elements::Paragraph {
    elements::Paragraph::new(rtl(text.as_ref())).aligned(Alignment::Right)
}

fn heading(text: &str) -> impl Element + use<> {
    cell(text)
        .styled(style::Style::new().bold().with_font_size(13))
        .padded(genpdf::Margins::trbl(4, 0, 2, 0))
}

fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Tabela da direita para a esquerda: a primeira coluna fica na borda direita.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Result<elements::TableLayout, AppError> {
    let mut weights = vec![1; headers.len()];
    if let Some(last) = weights.last_mut() {
        *last = 3;
    }

    let mut table = elements::TableLayout::new(weights);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    let mut header_row = table.row();
    for header in headers.iter().rev() {
        header_row.push_element(cell(header).styled(style_bold));
    }
    header_row.push()?;

    for row in rows {
        let mut table_row = table.row();
        for value in row.iter().rev() {
            table_row.push_element(cell(value));
        }
        table_row.push()?;
    }

    Ok(table)
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>, logos: LogoRepository) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
            logos,
        }
    }

    /// Renderiza fora do runtime: genpdf e a leitura dos logos são bloqueantes.
    pub async fn generate_report_pdf(&self, report: ReportData) -> Result<Vec<u8>, AppError> {
        let service = self.clone();
        let bytes = tokio::task::spawn_blocking(move || service.render(&report))
            .await
            .map_err(|e| AppError::InternalServerError(e.into()))??;

        tracing::info!("PDF gerado: {:.1} KB", bytes.len() as f64 / 1024.0);
        Ok(bytes)
    }

    pub fn render(&self, report: &ReportData) -> Result<Vec<u8>, AppError> {
        // 1. Fonte com suporte a hebraico (Regular, Bold, Italic, BoldItalic)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|_| AppError::FontNotFound(format!("{}/{}", self.fonts_dir.display(), self.font_family)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(TITLE);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(cell(TITLE).styled(style::Style::new().bold().with_font_size(18)));
        doc.push(cell(&report.date).styled(style::Style::new().with_font_size(10)));
        doc.push(elements::Break::new(1.5));

        // --- INDICADORES ---
        doc.push(heading("מדדים עיקריים"));
        doc.push(table(
            &["מדד", "ערך"],
            vec![
                vec!["סה״כ חברות".into(), report.total.to_string()],
                vec!["הצטרפו".into(), report.joined.to_string()],
                vec!["מיילים נשלחו".into(), report.emails_sent.to_string()],
                vec!["פגישות".into(), report.meetings.to_string()],
                vec!["הסכמים חתומים".into(), report.agreements_signed.to_string()],
                vec!["שיעור המרה".into(), pct(report.conversion_rate)],
                vec!["ממייל לפגישה".into(), pct(report.email_to_meeting_rate)],
                vec!["השלימו את כל השלבים".into(), report.all_steps.to_string()],
                vec!["ממוצע שלבים (הצטרפו)".into(), format!("{:.1}", report.avg_steps)],
            ],
        )?);

        // --- STATUS ---
        doc.push(heading("סטטוס"));
        let statuses = &report.status_counts;
        doc.push(table(
            &["סטטוס", "חברות"],
            vec![
                vec!["כן".into(), statuses.yes.to_string()],
                vec!["לא".into(), statuses.no.to_string()],
                vec!["טרם הוחלט".into(), statuses.undecided.to_string()],
            ],
        )?);

        // --- FUNIL ---
        doc.push(heading("משפך גיוס"));
        let funnel_rows = Stage::ALL
            .iter()
            .zip(&report.funnel.stage_counts)
            .zip(&report.funnel.stage_conversion)
            .map(|((stage, count), conversion)| {
                vec![
                    stage.label().to_string(),
                    count.to_string(),
                    conversion.map(|c| format!("{:.0}%", c * 100.0)).unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        doc.push(table(&["שלב", "חברות", "המרה"], funnel_rows)?);

        let bottleneck = &report.bottleneck;
        doc.push(cell(format!(
            "צוואר בקבוק: {} ← {} ({} נשרו, {}% המרה)",
            bottleneck.from_stage.label(),
            bottleneck.to_stage.label(),
            bottleneck.dropped_count,
            bottleneck.stage_conversion_pct,
        )));

        // --- PIRÂMIDE ---
        doc.push(heading("פירמידת מעורבות"));
        let tier_rows = report
            .engagement
            .iter()
            .map(|t| vec![t.label.clone(), t.count.to_string(), format!("{:.0}%", t.pct_of_max)])
            .collect();
        doc.push(table(&["רמה", "חברות", "יחסית למקסימום"], tier_rows)?);

        // --- SEGMENTOS ---
        doc.push(heading("ענפים"));
        let industry_rows = report
            .industry_join_rates
            .iter()
            .map(|r| vec![r.key.clone(), r.total.to_string(), r.joined.to_string(), format!("{}%", r.rate_pct)])
            .collect();
        doc.push(table(&["ענף", "חברות", "הצטרפו", "שיעור"], industry_rows)?);

        doc.push(heading("גודל חברה"));
        let size_rows = report.size_counts.iter().map(|(k, v)| vec![k.to_string(), v.to_string()]).collect();
        doc.push(table(&["גודל", "חברות"], size_rows)?);

        doc.push(heading("מקורות הפניה"));
        let referral_rows = report.referral_counts.iter().map(|(k, v)| vec![k.to_string(), v.to_string()]).collect();
        doc.push(table(&["מקור", "חברות"], referral_rows)?);

        // --- PROCESSO ---
        for phase in &report.process_stats {
            let rows: Vec<Vec<String>> = phase
                .steps
                .iter()
                .filter(|s| s.total > 0)
                .map(|s| {
                    vec![
                        s.label.clone(),
                        format!("{}/{}", s.yes_count, s.total),
                        s.completion_pct.map(|p| format!("{p}%")).unwrap_or_else(|| "-".into()),
                    ]
                })
                .collect();
            if rows.is_empty() {
                continue;
            }
            doc.push(heading(&format!("שלב {}", phase.label)));
            doc.push(table(&["משימה", "בוצע", "השלמה"], rows)?);
        }

        // --- COORTES ---
        if !report.cohorts.is_empty() {
            doc.push(heading("מחזורים"));
            let cohort_rows = report
                .cohorts
                .iter()
                .map(|c| {
                    let mut row = vec![c.cohort.clone(), c.companies.len().to_string()];
                    row.extend(c.phase_completion.iter().map(|p| format!("{}%", p.completion_pct)));
                    row
                })
                .collect();
            doc.push(table(&["מחזור", "חברות", "למידה", "פיתוח", "שיווק"], cohort_rows)?);
        }

        if !report.community.is_empty() {
            doc.push(heading("אירועי קהילה"));
            let rows = report.community.iter().map(|(k, v)| vec![k.to_string(), v.to_string()]).collect();
            doc.push(table(&["אירוע", "השתתפו"], rows)?);
        }

        // --- INDECISOS ---
        if !report.undecided_items.is_empty() {
            doc.push(heading("טרם החליטו (התקיימה פגישה)"));
            for item in &report.undecided_items {
                if let Some(logo) = self.load_logo(&item.id) {
                    doc.push(logo);
                }
                doc.push(cell(&item.name));
            }
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)?;

        Ok(buffer)
    }

    // Logo ausente ou ilegível não impede o relatório
    fn load_logo(&self, company_id: &str) -> Option<elements::Image> {
        let path = self.logos.logo_path(company_id);
        if !path.exists() {
            return None;
        }

        let image = match image::open(&path) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Logo ilegível {}: {}", path.display(), e);
                return None;
            }
        };

        // genpdf não aceita canal alfa
        let rgb = image::DynamicImage::ImageRgb8(image.to_rgb8());
        elements::Image::from_dynamic_image(rgb)
            .map(|img| {
                img.with_alignment(Alignment::Right)
                    .with_scale(genpdf::Scale::new(0.25, 0.25))
            })
            .map_err(|e| tracing::warn!("Logo inválido {}: {}", path.display(), e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_hebrew_only() {
        assert_eq!(rtl("שלום"), "םולש");
        assert_eq!(rtl("Shaveh 2026"), "Shaveh 2026");
    }

    #[test]
    fn keeps_numbers_left_to_right() {
        assert_eq!(rtl("25 חברות"), "תורבח 25");
        assert_eq!(rtl("שיעור 12.5%"), "12.5% רועיש");
    }

    #[test]
    fn keeps_multi_word_latin_runs_in_order() {
        assert_eq!(rtl("חברת Strauss Group"), "Strauss Group תרבח");
        assert_eq!(rtl("Intel Israel ו-Strauss Group"), "Strauss Group-ו Intel Israel");
        assert_eq!(rtl("מקור LinkedIn Ads 2024"), "LinkedIn Ads 2024 רוקמ");
        // Pontuação colada ao hebraico não puxa o trecho latino
        assert_eq!(rtl("ענף: Tech"), "Tech :ףנע");
    }

    #[test]
    fn mirrors_brackets() {
        assert_eq!(rtl("מחזור (2021)"), "(2021) רוזחמ");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let service = DocumentService::new(dir.path(), "Nope", LogoRepository::new(dir.path()));
        let report = crate::services::ReportService::build(&[], chrono::NaiveDate::default());

        let err = service.render(&report).unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
