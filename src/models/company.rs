// src/models/company.rs

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// --- ENUMS ---

// Status de decisão da empresa. Valores fora do enum são mantidos como vieram
// (para não perder dados ao regravar o arquivo) e ficam fora das contagens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Yes,
    No,
    Undecided,
    Unrecognized(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Yes => "כן",
            Status::No => "לא",
            Status::Undecided => "טרם הוחלט",
            Status::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Status::Unrecognized(_))
    }

    // Status ausente no arquivo
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unrecognized(String::new())
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "כן" => Status::Yes,
            "לא" => Status::No,
            "טרם הוחלט" => Status::Undecided,
            _ => Status::Unrecognized(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompanySize {
    Small,
    Medium,
    Large,
    Global,
    Unrecognized(String),
}

impl CompanySize {
    // Ordem de exibição dos gráficos e tabelas (maior primeiro)
    pub const DISPLAY_ORDER: [CompanySize; 4] = [
        CompanySize::Global,
        CompanySize::Large,
        CompanySize::Medium,
        CompanySize::Small,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CompanySize::Small => "קטנה",
            CompanySize::Medium => "בינונית",
            CompanySize::Large => "גדולה",
            CompanySize::Global => "גלובלית",
            CompanySize::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for CompanySize {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "קטנה" => CompanySize::Small,
            "בינונית" => CompanySize::Medium,
            "גדולה" => CompanySize::Large,
            "גלובלית" => CompanySize::Global,
            _ => CompanySize::Unrecognized(raw),
        }
    }
}

impl From<CompanySize> for String {
    fn from(size: CompanySize) -> Self {
        size.as_str().to_string()
    }
}

// Valor de uma etapa do checklist. `null` no JSON vira `None` no mapa da fase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StepStatus {
    #[serde(rename = "כן")]
    Yes,
    #[serde(rename = "בתהליך")]
    InProgress,
    #[serde(rename = "לא")]
    No,
    #[serde(rename = "לא רלוונטי")]
    NotRelevant,
}

// --- PROCESSO PÓS-ADESÃO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Learning,
    Development,
    Marketing,
}

const LEARNING_STEPS: [&str; 11] = [
    "industryReview",
    "surveyDesign",
    "participantRecruitment",
    "barrierMapping",
    "surveyDistribution",
    "responseCollection",
    "expertRecruitment",
    "recommendationsReport",
    "userTesting",
    "socialPartnerRecruitment",
    "developmentRecommendations",
];

const DEVELOPMENT_STEPS: [&str; 6] = [
    "presentRecommendations",
    "productDecision",
    "ganttCreation",
    "processCompletion",
    "solutionValidation",
    "productImplementation",
];

const MARKETING_STEPS: [&str; 6] = [
    "influencerSharing",
    "digitalMarketing",
    "pressReleaseDraft",
    "pressReleaseApproval",
    "websiteUpdate",
    "exposureData",
];

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Learning, Phase::Development, Phase::Marketing];

    pub fn key(self) -> &'static str {
        match self {
            Phase::Learning => "learning",
            Phase::Development => "development",
            Phase::Marketing => "marketing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Learning => "למידה",
            Phase::Development => "פיתוח",
            Phase::Marketing => "שיווק",
        }
    }

    /// Chaves válidas da fase, na ordem do checklist.
    pub fn steps(self) -> &'static [&'static str] {
        match self {
            Phase::Learning => &LEARNING_STEPS,
            Phase::Development => &DEVELOPMENT_STEPS,
            Phase::Marketing => &MARKETING_STEPS,
        }
    }
}

pub fn step_label(step: &str) -> &str {
    match step {
        "industryReview" => "סקירת הענף",
        "surveyDesign" => "ניסוח שאלון",
        "participantRecruitment" => "גיוס משתתפים",
        "barrierMapping" => "מיפוי חסמים",
        "surveyDistribution" => "הפצת שאלון",
        "responseCollection" => "ריכוז מענים",
        "expertRecruitment" => "גיוס גורם מקצועי",
        "recommendationsReport" => "דוח המלצות",
        "userTesting" => "התנסות",
        "socialPartnerRecruitment" => "גיוס שותף חברתי",
        "developmentRecommendations" => "המלצות לפיתוח",
        "presentRecommendations" => "הצגת המלצות",
        "productDecision" => "בחירת מוצר",
        "ganttCreation" => "בניית גאנט",
        "processCompletion" => "סיום תהליך",
        "solutionValidation" => "תיקוף",
        "productImplementation" => "הטמעה",
        "influencerSharing" => "שיתוף משפיענים",
        "digitalMarketing" => "שיווק דיגיטלי",
        "pressReleaseDraft" => "ניסוח הודעה לעיתונות",
        "pressReleaseApproval" => "אישור הודעה",
        "websiteUpdate" => "עדכון אתר",
        "exposureData" => "נתוני חשיפה",
        other => other,
    }
}

pub type PhaseSteps = BTreeMap<String, Option<StepStatus>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Process {
    #[serde(default)]
    pub learning: PhaseSteps,
    #[serde(default)]
    pub development: PhaseSteps,
    #[serde(default)]
    pub marketing: PhaseSteps,
}

impl Process {
    pub fn phase(&self, phase: Phase) -> &PhaseSteps {
        match phase {
            Phase::Learning => &self.learning,
            Phase::Development => &self.development,
            Phase::Marketing => &self.marketing,
        }
    }

    // Chave ausente conta como `null` (sem avaliação)
    pub fn step(&self, phase: Phase, step: &str) -> Option<StepStatus> {
        self.phase(phase).get(step).copied().flatten()
    }
}

fn validate_process(process: &Process) -> Result<(), ValidationError> {
    for phase in Phase::ALL {
        let valid = phase.steps();
        if let Some(unknown) = process.phase(phase).keys().find(|k| !valid.contains(&k.as_str())) {
            let mut err = ValidationError::new("unknown_step");
            err.message = Some(format!("{}.{}", phase.key(), unknown).into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outcomes {
    pub has_product: Option<bool>,
    pub product_description: Option<String>,
    pub satisfaction: Option<String>,
    pub media_exposure: Option<String>,
}

// --- EMPRESA ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "strauss_food")]
    pub id: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "שטראוס מזון")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Status::is_empty")]
    #[schema(value_type = String, example = "כן")]
    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[schema(value_type = Option<String>, example = "גדולה")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<CompanySize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_source1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_source2: Option<String>,

    // 1=2021, 2=2022, 3=2023, 4+=2024+
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort: Option<i64>,

    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub meeting_held: bool,
    #[serde(default)]
    pub agreement_sent: bool,
    #[serde(default)]
    pub agreement_signed: bool,
    #[serde(default)]
    pub paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruitment_status: Option<String>,

    // Texto rico (HTML) vindo do editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,

    #[validate(custom(function = "validate_process"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Outcomes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<BTreeMap<String, Option<bool>>>,

    // Campos que não modelamos voltam intactos para o arquivo
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl Company {
    pub fn pipeline(&self) -> [bool; 5] {
        [
            self.email_sent,
            self.meeting_held,
            self.agreement_sent,
            self.agreement_signed,
            self.paid,
        ]
    }

    pub fn steps_completed(&self) -> usize {
        self.pipeline().iter().filter(|done| **done).count()
    }

    pub fn is_joined(&self) -> bool {
        self.status == Status::Yes
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref().filter(|s| !s.is_empty())
    }

    pub fn step(&self, phase: Phase, step: &str) -> Option<StepStatus> {
        self.process.as_ref().and_then(|p| p.step(phase, step))
    }
}

/// Formato do arquivo `companies.json` e do corpo das requisições.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompanyList {
    #[validate(nested)]
    pub companies: Vec<Company>,
}
