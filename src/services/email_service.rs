// src/services/email_service.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use html_escape::encode_text;
use serde::{Deserialize, Serialize};

use crate::{
    common::error::AppError,
    models::report::{ReportData, Stage},
};

const PINK: &str = "#e8969f";
const BLUE: &str = "#4263aa";
const GREEN: &str = "#70bdb3";
const YELLOW: &str = "#e9ab56";
const BORDER: &str = "#f0dde0";
const STRIPE: &str = "#f3ecee";
const MUTED: &str = "#9c7a82";
const TEXT: &str = "#2d1f22";

// --- PAYLOAD DA API DO RESEND ---

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub filename: String,
    /// PDF em base64
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl OutgoingEmail {
    pub fn attach_pdf(&mut self, filename: String, pdf: &[u8]) {
        self.attachments = Some(vec![Attachment {
            filename,
            content: STANDARD.encode(pdf),
        }]);
    }

    pub fn has_attachment(&self) -> bool {
        self.attachments.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct EmailService {
    http: reqwest::Client,
    api_key: Option<String>,
    from: String,
    url: String,
}

fn section_title(title: &str, color: &str) -> String {
    format!(
        r#"<h2 style="font-size:14px;font-weight:700;color:{color};margin:18px 0 8px;border-right:4px solid {color};padding-right:10px;">{title}</h2>"#
    )
}

fn kpi_box(label: &str, value: &str, color: &str) -> String {
    format!(
        r#"<td style="width:20%;padding:6px 4px;text-align:center;vertical-align:top;"><div style="background:#fff;border:1px solid {BORDER};border-radius:10px;padding:12px 6px;"><div style="font-size:22px;font-weight:900;color:{color};line-height:1;">{value}</div><div style="font-size:10px;color:{MUTED};margin-top:4px;">{label}</div></div></td>"#
    )
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cell_style = format!("padding:8px 10px;font-size:11px;border-bottom:1px solid {BORDER};");

    let mut html = format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0" style="border-collapse:collapse;border:1px solid {BORDER};margin-bottom:8px;"><tr style="background:{BLUE};">"#
    );
    for header in headers {
        html.push_str(&format!(r#"<th style="{cell_style}color:#fff;">{header}</th>"#));
    }
    html.push_str("</tr>");

    for (i, row) in rows.iter().enumerate() {
        let bg = if i % 2 == 1 { STRIPE } else { "#fff" };
        html.push_str(&format!(r#"<tr style="background:{bg};">"#));
        for value in row {
            html.push_str(&format!(r#"<td style="{cell_style}color:{TEXT};">{}</td>"#, encode_text(value)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

/// HTML do e-mail: mensagem livre do remetente + resumo do relatório.
/// `body_html` vem do editor de texto rico e entra sem escape.
pub fn build_email_html(body_html: &str, report: &ReportData) -> String {
    let status_rows: Vec<Vec<String>> = [
        ("כן", report.status_counts.yes),
        ("לא", report.status_counts.no),
        ("טרם הוחלט", report.status_counts.undecided),
    ]
    .iter()
    .map(|(label, count)| {
        let pct = if report.total == 0 {
            0.0
        } else {
            *count as f64 / report.total as f64 * 100.0
        };
        vec![label.to_string(), count.to_string(), format!("{pct:.1}%")]
    })
    .collect();

    let pipeline_rows: Vec<Vec<String>> = Stage::ALL
        .iter()
        .zip(&report.funnel.stage_counts)
        .map(|(stage, count)| vec![stage.label().to_string(), count.to_string()])
        .collect();

    let industry_rows: Vec<Vec<String>> = report
        .industry_counts
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.to_string()])
        .collect();

    let size_rows: Vec<Vec<String>> = report
        .size_counts
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.to_string()])
        .collect();

    let undecided = if report.undecided_list.is_empty() {
        format!(r#"<li style="font-size:11px;color:{MUTED};">אין חברות</li>"#)
    } else {
        report
            .undecided_list
            .iter()
            .map(|name| format!(r#"<li style="padding:2px 0;font-size:11px;color:{TEXT};">{}</li>"#, encode_text(name)))
            .collect()
    };

    let message = if body_html.trim().is_empty() {
        String::new()
    } else {
        format!(
            r#"<div style="background:#fff;border:1px solid {BORDER};border-radius:10px;padding:14px 18px;margin-bottom:20px;font-size:12px;color:{TEXT};line-height:1.7;">{body_html}</div>"#
        )
    };

    let kpis = [
        kpi_box("חברות בליווי", &report.total.to_string(), BLUE),
        kpi_box("הצטרפו", &report.joined.to_string(), GREEN),
        kpi_box("פגישות", &report.meetings.to_string(), YELLOW),
        kpi_box("הסכמים", &report.agreements_signed.to_string(), BLUE),
        kpi_box("המרה", &format!("{:.1}%", report.conversion_rate), PINK),
    ]
    .concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="he" dir="rtl">
<head><meta charset="UTF-8"><title>דו"ח שווה פיתוח</title></head>
<body style="margin:0;padding:0;font-family:Arial,sans-serif;direction:rtl;">
<table width="600" cellpadding="0" cellspacing="0" align="center" style="max-width:600px;background:#fff;">
<tr><td style="background:{PINK};padding:24px 28px;">
<div style="font-size:18px;font-weight:900;color:#fff;">פרויקט שווה פיתוח</div>
<div style="font-size:12px;color:#fff;">דו"ח מצב | {date}</div>
</td></tr>
<tr><td style="padding:24px 28px;">
{message}
<p style="font-size:12px;color:{MUTED};margin-bottom:16px;">הדו"ח המלא מצורף כ-PDF. להלן תקציר:</p>
{kpi_title}
<table width="100%" cellpadding="0" cellspacing="0"><tr>{kpis}</tr></table>
{status_title}
{status_table}
{funnel_title}
{funnel_table}
{industry_title}
{industry_table}
{size_title}
{size_table}
{undecided_title}
<ul style="margin:0 0 20px;padding-right:20px;">{undecided}</ul>
<div style="border-top:1px solid {BORDER};font-size:10px;color:{MUTED};text-align:center;">נוצר אוטומטית על ידי לוח המחוונים של שווה פיתוח</div>
</td></tr>
</table>
</body></html>"#,
        date = encode_text(&report.date),
        kpi_title = section_title("מדדים עיקריים", PINK),
        status_title = section_title("התפלגות החלטות", BLUE),
        status_table = table(&["סטטוס", "חברות", "אחוז"], &status_rows),
        funnel_title = section_title("משפך גיוס", GREEN),
        funnel_table = table(&["שלב", "חברות"], &pipeline_rows),
        industry_title = section_title("לפי ענף", YELLOW),
        industry_table = table(&["ענף", "חברות"], &industry_rows),
        size_title = section_title("לפי גודל", BLUE),
        size_table = table(&["גודל", "חברות"], &size_rows),
        undecided_title = section_title("טרם הוחלט + פגישה", PINK),
    )
}

impl EmailService {
    pub fn new(http: reqwest::Client, api_key: Option<String>, from: String, url: String) -> Self {
        Self { http, api_key, from, url }
    }

    // Chave de exemplo do .env ("re_xxx...") conta como não configurada
    fn api_key(&self) -> Result<&str, AppError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && !key.starts_with("re_xxx") => Ok(key),
            _ => Err(AppError::EmailNotConfigured),
        }
    }

    pub fn ensure_configured(&self) -> Result<(), AppError> {
        self.api_key().map(|_| ())
    }

    pub fn compose(
        &self,
        to: Vec<String>,
        reply_to: Option<String>,
        subject: String,
        html: String,
    ) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from.clone(),
            to,
            subject,
            html,
            reply_to: reply_to.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            attachments: None,
        }
    }

    /// Envia pelo Resend e devolve o id do e-mail.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<String, AppError> {
        let api_key = self.api_key()?;

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body: ResendResponse = response.json().await.unwrap_or(ResendResponse {
            id: None,
            message: None,
        });

        if !status.is_success() {
            tracing::warn!("Resend recusou o envio ({}): {:?}", status, body.message);
            return Err(AppError::EmailRejected(body.message.unwrap_or_default()));
        }

        let id = body.id.unwrap_or_default();
        tracing::info!("E-mail enviado para {:?} (id {})", email.to, id);
        Ok(id)
    }
}
