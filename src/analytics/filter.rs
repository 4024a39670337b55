// src/analytics/filter.rs

use serde::Deserialize;
use utoipa::IntoParams;

use crate::analytics::grouping::canonical_industry;
use crate::models::company::Company;

/// Valor sentinela do dropdown que significa "sem filtro".
pub const ALL: &str = "הכל";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CompanyFilter {
    pub status: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    #[serde(alias = "search")]
    pub search_text: Option<String>,
}

// None, vazio e "הכל" desligam o filtro
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

impl CompanyFilter {
    pub fn matches(&self, company: &Company) -> bool {
        if let Some(status) = active(&self.status) {
            if company.status.as_str() != status {
                return false;
            }
        }

        if let Some(industry) = active(&self.industry) {
            // Aceita tanto o valor cru quanto o grupo canônico
            let matched = company
                .industry()
                .is_some_and(|raw| raw == industry || canonical_industry(raw) == industry);
            if !matched {
                return false;
            }
        }

        if let Some(size) = active(&self.company_size) {
            if company.company_size.as_ref().map(|s| s.as_str()) != Some(size) {
                return false;
            }
        }

        if let Some(text) = active(&self.search_text) {
            let needle = text.to_lowercase();
            let haystacks = [
                Some(company.name.as_str()),
                company.notes.as_deref(),
                company.requirements.as_deref(),
                company.industry.as_deref(),
            ];
            let found = haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        true
    }
}

pub fn filter<'a>(companies: &'a [Company], predicates: &CompanyFilter) -> Vec<&'a Company> {
    companies.iter().filter(|c| predicates.matches(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::company;
    use crate::models::company::{CompanySize, Status};

    fn sample() -> Vec<Company> {
        let mut a = company("a", Status::Yes, [true; 5]);
        a.industry = Some("חשמל".into());
        a.company_size = Some(CompanySize::Large);
        a.notes = Some("<p>Needs ACCESSIBLE packaging</p>".into());

        let mut b = company("b", Status::No, [true, false, false, false, false]);
        b.industry = Some("מזון".into());
        b.company_size = Some(CompanySize::Small);

        let mut c = company("c", Status::Undecided, [true, true, false, false, false]);
        c.industry = Some("תקשורת".into());
        c.requirements = Some("סקר משתמשים".into());

        vec![a, b, c]
    }

    fn ids(found: Vec<&Company>) -> Vec<&str> {
        found.into_iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn sentinel_and_empty_values_disable_filters() {
        let companies = sample();
        let predicates = CompanyFilter {
            status: Some(ALL.into()),
            industry: Some(String::new()),
            company_size: None,
            search_text: Some("   ".into()),
        };
        assert_eq!(filter(&companies, &predicates).len(), 3);
    }

    #[test]
    fn predicates_combine_with_and() {
        let companies = sample();
        let predicates = CompanyFilter {
            status: Some("כן".into()),
            company_size: Some("קטנה".into()),
            ..Default::default()
        };
        assert!(filter(&companies, &predicates).is_empty());

        let predicates = CompanyFilter {
            status: Some("כן".into()),
            company_size: Some("גדולה".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &predicates)), vec!["a"]);
    }

    #[test]
    fn industry_matches_raw_or_canonical_group() {
        let companies = sample();
        let by_group = CompanyFilter {
            industry: Some("חשמל ותקשורת".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &by_group)), vec!["a", "c"]);

        let by_raw = CompanyFilter {
            industry: Some("תקשורת".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &by_raw)), vec!["c"]);
    }

    #[test]
    fn search_is_case_insensitive_across_text_fields() {
        let companies = sample();
        let by_notes = CompanyFilter {
            search_text: Some("accessible".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &by_notes)), vec!["a"]);

        let by_requirements = CompanyFilter {
            search_text: Some("סקר".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &by_requirements)), vec!["c"]);

        let by_name = CompanyFilter {
            search_text: Some("COMPANY B".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter(&companies, &by_name)), vec!["b"]);
    }
}
