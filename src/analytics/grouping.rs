// src/analytics/grouping.rs

use std::collections::HashMap;

use crate::analytics::percent_rounded;
use crate::models::company::{Company, CompanySize};
use crate::models::report::{CountMap, JoinRate};

// Tabela fixa de sinônimos: reduz a quantidade de ramos exibidos
const INDUSTRY_GROUPS: [(&str, &str); 14] = [
    ("קניונים ומרכזים מסחריים", "קניונים"),
    ("מוצרי חשמל", "חשמל ותקשורת"),
    ("חשמל", "חשמל ותקשורת"),
    ("תקשורת", "חשמל ותקשורת"),
    ("בריאות", "בריאות ותרופות"),
    ("תרופות", "בריאות ותרופות"),
    ("פיננסים", "פיננסים וביטוח"),
    ("ביטוח", "פיננסים וביטוח"),
    ("תעופה", "תחבורה ותיירות"),
    ("תחבורה", "תחבורה ותיירות"),
    ("תיירות", "תחבורה ותיירות"),
    ("קולנוע", "בידור ואופנה"),
    ("בתי קפה", "בידור ואופנה"),
    ("אופנה", "בידור ואופנה"),
];

/// Grupo canônico do ramo; valores fora da tabela passam inalterados.
pub fn canonical_industry(industry: &str) -> &str {
    INDUSTRY_GROUPS
        .iter()
        .find(|(raw, _)| *raw == industry)
        .map(|(_, group)| *group)
        .unwrap_or(industry)
}

/// Conta por chave. `key_fn` pode devolver zero, uma ou várias chaves por
/// empresa. O resultado vem ordenado por contagem decrescente; empates
/// mantêm a ordem em que a chave apareceu.
pub fn group_count<'a, F, K>(companies: &'a [Company], mut key_fn: F) -> CountMap
where
    F: FnMut(&'a Company) -> K,
    K: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();

    for company in companies {
        for key in key_fn(company) {
            match index.get(key) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(key, entries.len());
                    entries.push((key.to_string(), 1));
                }
            }
        }
    }

    // sort_by é estável
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    CountMap::new(entries)
}

/// Total, aderidas (`status == כן`) e taxa por chave, ordenado por total.
pub fn join_rate<'a, F, K>(companies: &'a [Company], mut key_fn: F) -> Vec<JoinRate>
where
    F: FnMut(&'a Company) -> K,
    K: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rates: Vec<JoinRate> = Vec::new();

    for company in companies {
        for key in key_fn(company) {
            let i = *index.entry(key).or_insert_with(|| {
                rates.push(JoinRate {
                    key: key.to_string(),
                    total: 0,
                    joined: 0,
                    rate_pct: 0,
                });
                rates.len() - 1
            });
            rates[i].total += 1;
            if company.is_joined() {
                rates[i].joined += 1;
            }
        }
    }

    for rate in &mut rates {
        rate.rate_pct = percent_rounded(rate.joined, rate.total);
    }
    rates.sort_by(|a, b| b.total.cmp(&a.total));
    rates
}

// --- Chaves prontas ---

pub fn industry_key(company: &Company) -> Option<&str> {
    company.industry().map(canonical_industry)
}

// Atribuição múltipla: cada fonte conta separadamente, mesmo repetida
pub fn referral_keys(company: &Company) -> impl Iterator<Item = &str> {
    [company.referral_source1.as_deref(), company.referral_source2.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
}

pub fn size_key(company: &Company) -> Option<&str> {
    company
        .company_size
        .as_ref()
        .map(CompanySize::as_str)
        .filter(|s| !s.is_empty())
}

pub fn industry_counts(companies: &[Company]) -> CountMap {
    group_count(companies, industry_key)
}

pub fn industry_join_rates(companies: &[Company]) -> Vec<JoinRate> {
    join_rate(companies, industry_key)
}

pub fn referral_counts(companies: &[Company]) -> CountMap {
    group_count(companies, referral_keys)
}

pub fn size_counts(companies: &[Company]) -> CountMap {
    group_count(companies, size_key)
}

/// Tamanhos na ordem fixa de exibição, omitindo os que não aparecem.
pub fn size_counts_in_display_order(companies: &[Company]) -> CountMap {
    let counts = size_counts(companies);
    let ordered = CompanySize::DISPLAY_ORDER
        .iter()
        .filter_map(|size| {
            counts
                .get(size.as_str())
                .map(|count| (size.as_str().to_string(), count))
        })
        .collect();
    CountMap::new(ordered)
}
