// src/analytics/funnel.rs

use crate::analytics::{percent_one_decimal, percent_rounded};
use crate::models::company::Company;
use crate::models::report::{Bottleneck, FunnelStats, Stage};

pub fn stage_counts(companies: &[Company]) -> [usize; 5] {
    let mut counts = [0; 5];
    for company in companies {
        for (count, stage) in counts.iter_mut().zip(Stage::ALL) {
            if stage.reached(company) {
                *count += 1;
            }
        }
    }
    counts
}

pub fn funnel(companies: &[Company]) -> FunnelStats {
    let counts = stage_counts(companies);

    let stage_conversion = (0..counts.len())
        .map(|i| match i {
            0 => None,
            _ if counts[i - 1] == 0 => None,
            _ => Some(counts[i] as f64 / counts[i - 1] as f64),
        })
        .collect();

    let email_sent = counts[0];
    let paid = counts[4];

    FunnelStats {
        stage_counts: counts.to_vec(),
        stage_conversion,
        conversion_rate: percent_one_decimal(paid, email_sent),
    }
}

/// Transição com a maior queda absoluta. Empate fica com a primeira;
/// sem nenhuma queda, devolve a primeira transição com `dropped_count = 0`.
pub fn bottleneck(companies: &[Company]) -> Bottleneck {
    let counts = stage_counts(companies);

    let mut worst = 0;
    let mut worst_drop = 0;
    for i in 0..counts.len() - 1 {
        let drop = counts[i].saturating_sub(counts[i + 1]);
        if drop > worst_drop {
            worst_drop = drop;
            worst = i;
        }
    }

    let from_count = counts[worst];
    let to_count = counts[worst + 1];

    Bottleneck {
        from_stage: Stage::ALL[worst],
        to_stage: Stage::ALL[worst + 1],
        from_count,
        to_count,
        dropped_count: from_count.saturating_sub(to_count),
        stage_conversion_pct: percent_rounded(to_count, from_count),
    }
}
