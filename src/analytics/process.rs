// src/analytics/process.rs

use crate::analytics::percent_rounded;
use crate::models::company::{step_label, Company, Phase, StepStatus};
use crate::models::report::{PhaseStats, StepStats};

/// Conta (sim, avaliadas) de uma etapa. `null` não entra no denominador;
/// "לא" e "לא רלוונטי" entram.
pub fn step_tally<'a, I>(companies: I, phase: Phase, step: &str) -> (usize, usize)
where
    I: IntoIterator<Item = &'a Company>,
{
    companies
        .into_iter()
        .filter_map(|c| c.step(phase, step))
        .fold((0, 0), |(yes, total), value| {
            (yes + usize::from(value == StepStatus::Yes), total + 1)
        })
}

/// Conclusão por etapa e por fase, só para empresas com `status == כן`.
pub fn process_stats(companies: &[Company]) -> Vec<PhaseStats> {
    let joined: Vec<&Company> = companies.iter().filter(|c| c.is_joined()).collect();

    Phase::ALL
        .iter()
        .map(|&phase| PhaseStats {
            phase,
            label: phase.label().to_string(),
            steps: phase
                .steps()
                .iter()
                .map(|&step| {
                    let (yes_count, total) = step_tally(joined.iter().copied(), phase, step);
                    StepStats {
                        step: step.to_string(),
                        label: step_label(step).to_string(),
                        yes_count,
                        total,
                        completion_pct: (total > 0).then(|| percent_rounded(yes_count, total)),
                    }
                })
                .collect(),
        })
        .collect()
}
