// src/services/report_service.rs

use chrono::NaiveDate;

use crate::{
    analytics::{cohort, funnel, grouping, kpis, process, pyramid},
    common::error::AppError,
    db::CompanyRepository,
    models::{
        company::Company,
        report::{PipelineTotals, ReportData},
    },
};

#[derive(Clone)]
pub struct ReportService {
    repo: CompanyRepository,
}

impl ReportService {
    pub fn new(repo: CompanyRepository) -> Self {
        Self { repo }
    }

    pub async fn from_store(&self, date: NaiveDate) -> Result<ReportData, AppError> {
        let companies = self.repo.load_all().await?;
        Ok(Self::build(&companies, date))
    }

    /// Monta o relatório completo. Dashboard, PDF e e-mail usam todos esta
    /// mesma função.
    pub fn build(companies: &[Company], date: NaiveDate) -> ReportData {
        let funnel = funnel::funnel(companies);
        let counts = &funnel.stage_counts;
        let status_counts = kpis::status_counts(companies);
        let undecided_items = kpis::undecided_with_meeting(companies);

        ReportData {
            total: companies.len(),
            joined: status_counts.yes,
            meetings: counts[1],
            agreements_signed: counts[3],
            emails_sent: counts[0],
            conversion_rate: funnel.conversion_rate,
            email_to_meeting_rate: kpis::email_to_meeting_rate(companies),
            all_steps: kpis::all_steps(companies),
            avg_steps: kpis::avg_steps(companies),
            undecided: status_counts.undecided,
            undecided_with_meeting: undecided_items.len(),
            industry_counts: grouping::industry_counts(companies),
            size_counts: grouping::size_counts_in_display_order(companies),
            referral_counts: grouping::referral_counts(companies),
            pipeline: PipelineTotals {
                email_sent: counts[0],
                meetings: counts[1],
                agreement_sent: counts[2],
                agreements_signed: counts[3],
                paid: counts[4],
            },
            undecided_list: undecided_items.iter().map(|c| c.name.clone()).collect(),
            undecided_items,
            date: kpis::hebrew_date(date),
            bottleneck: funnel::bottleneck(companies),
            engagement: pyramid::pyramid(companies),
            industry_join_rates: grouping::industry_join_rates(companies),
            process_stats: process::process_stats(companies),
            cohorts: cohort::cohort_stats(companies)
                .iter()
                .map(|c| c.summary())
                .collect(),
            community: kpis::community_attendance(companies),
            status_counts,
            funnel,
        }
    }

    /// Preenche `recruitmentStatus` a partir do pipeline quando o arquivo não traz.
    pub fn with_recruitment_status(mut companies: Vec<Company>) -> Vec<Company> {
        for company in companies.iter_mut().filter(|c| c.recruitment_status.is_none()) {
            let label = kpis::recruitment_status(company);
            if !label.is_empty() {
                company.recruitment_status = Some(label.to_string());
            }
        }
        companies
    }
}
