// src/analytics/kpis.rs

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::analytics::percent_one_decimal;
use crate::models::company::{Company, Status};
use crate::models::report::{CompanyRef, CountMap, StatusCounts};

/// Status fora do enum não entram em nenhuma das três contagens.
pub fn status_counts(companies: &[Company]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for company in companies {
        match company.status {
            Status::Yes => counts.yes += 1,
            Status::No => counts.no += 1,
            Status::Undecided => counts.undecided += 1,
            Status::Unrecognized(_) => {}
        }
    }
    counts
}

pub fn email_to_meeting_rate(companies: &[Company]) -> f64 {
    let emails = companies.iter().filter(|c| c.email_sent).count();
    let meetings = companies.iter().filter(|c| c.meeting_held).count();
    percent_one_decimal(meetings, emails)
}

pub fn all_steps(companies: &[Company]) -> usize {
    companies.iter().filter(|c| c.steps_completed() == 5).count()
}

/// Média de etapas do pipeline entre as empresas aderidas, 1 casa decimal.
pub fn avg_steps(companies: &[Company]) -> f64 {
    let joined: Vec<&Company> = companies.iter().filter(|c| c.is_joined()).collect();
    if joined.is_empty() {
        return 0.0;
    }
    let sum: usize = joined.iter().map(|c| c.steps_completed()).sum();
    (sum as f64 / joined.len() as f64 * 10.0).round() / 10.0
}

pub fn undecided_with_meeting(companies: &[Company]) -> Vec<CompanyRef> {
    companies
        .iter()
        .filter(|c| c.status == Status::Undecided && c.meeting_held)
        .map(CompanyRef::from)
        .collect()
}

/// Presença em eventos da comunidade entre as empresas aderidas.
pub fn community_attendance(companies: &[Company]) -> CountMap {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for company in companies.iter().filter(|c| c.is_joined()) {
        let Some(events) = &company.community else { continue };
        for (event, attended) in events {
            let count = counts.entry(event.as_str()).or_default();
            if *attended == Some(true) {
                *count += 1;
            }
        }
    }
    CountMap::new(counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

/// Rótulo legível do estágio de recrutamento.
pub fn recruitment_status(company: &Company) -> &'static str {
    match company.status {
        Status::Yes if company.paid => "הצטרפו ושילמו",
        Status::Yes if company.agreement_signed => "חתמו על הסכם",
        Status::Yes if company.agreement_sent => "נשלח הסכם",
        Status::Yes if company.meeting_held => "פגישה התקיימה",
        Status::Yes => "מעוניינים",
        Status::No => "סירבו",
        Status::Undecided if company.agreement_signed => "חתמו, ממתינים לאישור סופי",
        Status::Undecided if company.agreement_sent => "נשלח הסכם, ממתינים",
        Status::Undecided if company.meeting_held => "פגישה התקיימה, ממתינים",
        Status::Undecided if company.email_sent => "נשלח מייל, ממתינים",
        Status::Undecided => "טרם יצרנו קשר",
        Status::Unrecognized(_) => "",
    }
}

const HEBREW_MONTHS: [&str; 12] = [
    "ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני",
    "יולי", "אוגוסט", "ספטמבר", "אוקטובר", "נובמבר", "דצמבר",
];

/// Data por extenso, ex.: "18 באוקטובר 2026".
pub fn hebrew_date(date: NaiveDate) -> String {
    let month = HEBREW_MONTHS[date.month0() as usize];
    format!("{} ב{} {}", date.day(), month, date.year())
}
