// src/models/report.rs

use serde::{ser::SerializeMap, Serialize, Serializer};
use utoipa::ToSchema;

use crate::models::company::{Company, Phase};

// --- FUNIL ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    EmailSent,
    MeetingHeld,
    AgreementSent,
    AgreementSigned,
    Paid,
}

impl Stage {
    // Ordem de precedência do processo de recrutamento
    pub const ALL: [Stage; 5] = [
        Stage::EmailSent,
        Stage::MeetingHeld,
        Stage::AgreementSent,
        Stage::AgreementSigned,
        Stage::Paid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::EmailSent => "מייל נשלח",
            Stage::MeetingHeld => "פגישה",
            Stage::AgreementSent => "הסכם נשלח",
            Stage::AgreementSigned => "הסכם חתום",
            Stage::Paid => "שולם",
        }
    }

    pub fn reached(self, company: &Company) -> bool {
        match self {
            Stage::EmailSent => company.email_sent,
            Stage::MeetingHeld => company.meeting_held,
            Stage::AgreementSent => company.agreement_sent,
            Stage::AgreementSigned => company.agreement_signed,
            Stage::Paid => company.paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStats {
    /// Uma contagem por estágio, na ordem de `Stage::ALL`.
    pub stage_counts: Vec<usize>,
    /// `None` no primeiro estágio e quando o estágio anterior está vazio.
    pub stage_conversion: Vec<Option<f64>>,
    /// pagos / e-mails enviados, em %, com 1 casa decimal.
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub from_count: usize,
    pub to_count: usize,
    pub dropped_count: usize,
    pub stage_conversion_pct: u32,
}

// --- AGRUPAMENTOS ---

/// Contagem por chave que preserva a ordem. Serializa como objeto JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap(Vec<(String, usize)>);

impl CountMap {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, v)| v).sum()
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinRate {
    pub key: String,
    pub total: usize,
    pub joined: usize,
    pub rate_pct: u32,
}

// As chaves seguem o contrato dos templates (statusCounts['כן'] etc.)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    #[serde(rename = "כן")]
    pub yes: usize,
    #[serde(rename = "לא")]
    pub no: usize,
    #[serde(rename = "טרם הוחלט")]
    pub undecided: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.yes + self.no + self.undecided
    }
}

// --- PIRÂMIDE DE ENGAJAMENTO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementTier {
    Paid,
    OnTrack,
    PostMeeting,
    EmailOnly,
    NotContacted,
}

impl EngagementTier {
    pub const ALL: [EngagementTier; 5] = [
        EngagementTier::Paid,
        EngagementTier::OnTrack,
        EngagementTier::PostMeeting,
        EngagementTier::EmailOnly,
        EngagementTier::NotContacted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EngagementTier::Paid => "לקוחות משלמים",
            EngagementTier::OnTrack => "בדרך להצטרפות",
            EngagementTier::PostMeeting => "אחרי פגישה",
            EngagementTier::EmailOnly => "מייל בלבד",
            EngagementTier::NotContacted => "טרם פנינו",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierCount {
    pub tier: EngagementTier,
    pub label: String,
    pub count: usize,
    /// Percentual em relação ao maior nível (mínimo de 1 no denominador).
    pub pct_of_max: f64,
}

// --- PROCESSO ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepStats {
    pub step: String,
    pub label: String,
    pub yes_count: usize,
    /// Empresas com valor não nulo na etapa.
    pub total: usize,
    /// `None` = sem dados (total == 0), diferente de 0%.
    pub completion_pct: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStats {
    pub phase: Phase,
    pub label: String,
    pub steps: Vec<StepStats>,
}

// --- COORTES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CohortBucket {
    Y2021,
    Y2022,
    Y2023,
    Y2024Plus,
    Unassigned,
}

impl CohortBucket {
    pub fn from_cohort(cohort: Option<i64>) -> Self {
        match cohort {
            None | Some(0) => CohortBucket::Unassigned,
            Some(c) if c <= 1 => CohortBucket::Y2021,
            Some(2) => CohortBucket::Y2022,
            Some(3) => CohortBucket::Y2023,
            Some(_) => CohortBucket::Y2024Plus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CohortBucket::Y2021 => "2021",
            CohortBucket::Y2022 => "2022",
            CohortBucket::Y2023 => "2023",
            CohortBucket::Y2024Plus => "2024+",
            CohortBucket::Unassigned => "לא משויך",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCompletion {
    pub phase: Phase,
    pub yes_count: usize,
    pub total: usize,
    pub completion_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
}

impl From<&Company> for CompanyRef {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            name: company.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CohortSummary {
    pub cohort: String,
    pub companies: Vec<CompanyRef>,
    pub phase_completion: Vec<PhaseCompletion>,
}

// --- RELATÓRIO COMPLETO ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTotals {
    pub email_sent: usize,
    pub meetings: usize,
    pub agreement_sent: usize,
    pub agreements_signed: usize,
    pub paid: usize,
}

/// Objeto plano consumido pelo dashboard, pelo PDF e pelo e-mail.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total: usize,
    pub joined: usize,
    pub meetings: usize,
    pub agreements_signed: usize,
    pub emails_sent: usize,
    pub conversion_rate: f64,
    pub email_to_meeting_rate: f64,
    pub all_steps: usize,
    pub avg_steps: f64,
    pub undecided: usize,
    pub undecided_with_meeting: usize,
    pub status_counts: StatusCounts,
    #[schema(value_type = Object)]
    pub industry_counts: CountMap,
    #[schema(value_type = Object)]
    pub size_counts: CountMap,
    #[schema(value_type = Object)]
    pub referral_counts: CountMap,
    pub pipeline: PipelineTotals,
    pub undecided_list: Vec<String>,
    pub undecided_items: Vec<CompanyRef>,
    pub date: String,

    pub funnel: FunnelStats,
    pub bottleneck: Bottleneck,
    pub engagement: Vec<TierCount>,
    pub industry_join_rates: Vec<JoinRate>,
    pub process_stats: Vec<PhaseStats>,
    pub cohorts: Vec<CohortSummary>,
    #[schema(value_type = Object)]
    pub community: CountMap,
}
