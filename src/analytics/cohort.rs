// src/analytics/cohort.rs

use std::collections::BTreeMap;

use crate::analytics::percent_rounded;
use crate::analytics::process::step_tally;
use crate::models::company::{Company, Phase};
use crate::models::report::{CohortBucket, CohortSummary, CompanyRef, PhaseCompletion};

#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    pub bucket: CohortBucket,
    pub companies: Vec<&'a Company>,
    pub phase_completion: Vec<PhaseCompletion>,
}

impl Cohort<'_> {
    pub fn summary(&self) -> CohortSummary {
        CohortSummary {
            cohort: self.bucket.label().to_string(),
            companies: self.companies.iter().map(|c| CompanyRef::from(*c)).collect(),
            phase_completion: self.phase_completion.clone(),
        }
    }
}

// Soma de "כן" sobre soma de avaliadas de todas as empresas da coorte,
// e não a média das porcentagens por empresa.
fn pooled_completion(companies: &[&Company], phase: Phase) -> PhaseCompletion {
    let (yes_count, total) = phase
        .steps()
        .iter()
        .map(|step| step_tally(companies.iter().copied(), phase, step))
        .fold((0, 0), |(yes, total), (y, t)| (yes + y, total + t));

    PhaseCompletion {
        phase,
        yes_count,
        total,
        completion_pct: percent_rounded(yes_count, total),
    }
}

/// Empresas aderidas agrupadas por ano de entrada. Sem coorte vai para
/// "לא משויך" em vez de ser descartada.
pub fn cohort_stats(companies: &[Company]) -> Vec<Cohort<'_>> {
    let mut buckets: BTreeMap<CohortBucket, Vec<&Company>> = BTreeMap::new();
    for company in companies.iter().filter(|c| c.is_joined()) {
        buckets
            .entry(CohortBucket::from_cohort(company.cohort))
            .or_default()
            .push(company);
    }

    buckets
        .into_iter()
        .map(|(bucket, members)| Cohort {
            bucket,
            phase_completion: Phase::ALL
                .iter()
                .map(|&phase| pooled_completion(&members, phase))
                .collect(),
            companies: members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::company;
    use crate::models::company::{Process, Status, StepStatus};

    fn joined(id: &str, cohort: Option<i64>) -> Company {
        let mut c = company(id, Status::Yes, [true; 5]);
        c.cohort = cohort;
        c
    }

    fn labels(cohorts: &[Cohort<'_>]) -> Vec<&'static str> {
        cohorts.iter().map(|c| c.bucket.label()).collect()
    }

    #[test]
    fn buckets_follow_the_fixed_year_mapping() {
        let companies = vec![
            joined("a", Some(1)),
            joined("b", Some(2)),
            joined("c", Some(3)),
            joined("d", Some(4)),
            joined("e", Some(7)),
            joined("f", Some(-1)),
        ];
        let cohorts = cohort_stats(&companies);

        assert_eq!(labels(&cohorts), vec!["2021", "2022", "2023", "2024+"]);
        assert_eq!(cohorts[0].companies.len(), 2);
        assert_eq!(cohorts[3].companies.len(), 2);
    }

    #[test]
    fn missing_cohort_is_unassigned_not_dropped() {
        let companies = vec![joined("a", Some(1)), joined("b", None)];
        let cohorts = cohort_stats(&companies);

        assert_eq!(labels(&cohorts), vec!["2021", "לא משויך"]);
        assert_eq!(cohorts[1].companies[0].id, "b");
    }

    #[test]
    fn non_joined_companies_are_ignored() {
        let mut other = company("x", Status::No, [true; 5]);
        other.cohort = Some(2);
        let companies = [joined("a", Some(1)), other];
        let cohorts = cohort_stats(&companies);
        assert_eq!(labels(&cohorts), vec!["2021"]);
    }

    #[test]
    fn completion_is_pooled_across_the_cohort() {
        // a: 1/1 avaliada; b: 1/4 avaliadas.
        // Média por empresa daria (100 + 25) / 2 = 63; agregado dá 2/5 = 40.
        let mut a = joined("a", Some(2));
        let mut pa = Process::default();
        pa.learning.insert("industryReview".into(), Some(StepStatus::Yes));
        pa.learning.insert("surveyDesign".into(), None);
        a.process = Some(pa);

        let mut b = joined("b", Some(2));
        let mut pb = Process::default();
        pb.learning.insert("industryReview".into(), Some(StepStatus::Yes));
        pb.learning.insert("surveyDesign".into(), Some(StepStatus::No));
        pb.learning.insert("barrierMapping".into(), Some(StepStatus::InProgress));
        pb.learning.insert("userTesting".into(), Some(StepStatus::No));
        b.process = Some(pb);

        let companies = vec![a, b];
        let cohorts = cohort_stats(&companies);
        let learning = &cohorts[0].phase_completion[0];

        assert_eq!(learning.phase, Phase::Learning);
        assert_eq!((learning.yes_count, learning.total), (2, 5));
        assert_eq!(learning.completion_pct, 40);

        let marketing = &cohorts[0].phase_completion[2];
        assert_eq!((marketing.total, marketing.completion_pct), (0, 0));
    }

    #[test]
    fn summary_carries_labels_and_members() {
        let companies = vec![joined("a", Some(3))];
        let summary = cohort_stats(&companies)[0].summary();

        assert_eq!(summary.cohort, "2023");
        assert_eq!(summary.companies[0].id, "a");
        assert_eq!(summary.phase_completion.len(), 3);
    }
}
