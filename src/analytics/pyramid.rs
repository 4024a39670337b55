// src/analytics/pyramid.rs

use crate::models::company::Company;
use crate::models::report::{EngagementTier, TierCount};

/// Nível de engajamento. Cascata ordenada: vale o sinal mais alto, sem
/// validar a consistência dos outros booleanos (pago sem e-mail = PAID).
pub fn classify(company: &Company) -> EngagementTier {
    if company.paid {
        EngagementTier::Paid
    } else if company.agreement_sent {
        EngagementTier::OnTrack
    } else if company.meeting_held {
        EngagementTier::PostMeeting
    } else if company.email_sent {
        EngagementTier::EmailOnly
    } else {
        EngagementTier::NotContacted
    }
}

pub fn pyramid(companies: &[Company]) -> Vec<TierCount> {
    let mut counts = [0usize; 5];
    for company in companies {
        let tier = classify(company);
        if let Some(i) = EngagementTier::ALL.iter().position(|t| *t == tier) {
            counts[i] += 1;
        }
    }

    let max = counts.iter().copied().max().unwrap_or(0).max(1);

    EngagementTier::ALL
        .iter()
        .zip(counts)
        .map(|(tier, count)| TierCount {
            tier: *tier,
            label: tier.label().to_string(),
            count,
            pct_of_max: count as f64 / max as f64 * 100.0,
        })
        .collect()
}
