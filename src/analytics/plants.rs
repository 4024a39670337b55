// src/analytics/plants.rs
//
// Dashboard de resiliência das fábricas: filtro por estágio, região e ramo, com
// o mesmo sentinela "הכל" do filtro de empresas.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::analytics::filter::{active, ALL};
use crate::models::plant::{Plant, PlantFilterOptions, PlantSummary, PlantsFile, PlantsOverview};
use crate::models::report::CountMap;

// Ramo vazio cai aqui no gráfico de ramos
const OTHER_SECTOR: &str = "אחר";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlantFilter {
    pub stage: Option<String>,
    #[serde(alias = "geo")]
    pub geography: Option<String>,
    pub sector: Option<String>,
}

impl PlantFilter {
    pub fn matches(&self, plant: &Plant) -> bool {
        [
            (&self.stage, plant.stage.as_str()),
            (&self.geography, plant.geography.as_str()),
            (&self.sector, plant.sector.as_str()),
        ]
        .into_iter()
        .all(|(wanted, value)| active(wanted).is_none_or(|w| w == value))
    }

    pub fn is_active(&self) -> bool {
        [&self.stage, &self.geography, &self.sector]
            .into_iter()
            .any(|value| active(value).is_some())
    }
}

pub fn filter<'a>(plants: &'a [Plant], predicates: &PlantFilter) -> Vec<&'a Plant> {
    plants.iter().filter(|p| predicates.matches(p)).collect()
}

pub fn summarize(plants: &[&Plant]) -> PlantSummary {
    PlantSummary {
        total_plants: plants.len(),
        total_participants: plants.iter().map(|p| p.total_participants).sum(),
        total_sessions: plants.iter().map(|p| p.total_sessions).sum(),
        total_ceos: plants.iter().map(|p| p.ceo_count).sum(),
        total_hr_managers: plants.iter().map(|p| p.hr_manager_count).sum(),
    }
}

// Valores distintos na ordem em que aparecem, depois do sentinela
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = vec![ALL.to_string()];
    for value in values {
        if !seen.iter().any(|v| v == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Opções de cada dropdown, sempre sobre a lista completa.
pub fn filter_options(plants: &[Plant]) -> PlantFilterOptions {
    PlantFilterOptions {
        stages: distinct(plants.iter().map(|p| p.stage.as_str())),
        geographies: distinct(plants.iter().map(|p| p.geography.as_str())),
        sectors: distinct(plants.iter().map(|p| p.sector.as_str())),
    }
}

fn count_by<'a>(plants: &[&'a Plant], key: impl Fn(&'a Plant) -> &'a str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for plant in plants {
        let k = key(*plant);
        match counts.iter_mut().find(|(existing, _)| existing.as_str() == k) {
            Some((_, n)) => *n += 1,
            None => counts.push((k.to_string(), 1)),
        }
    }
    counts
}

/// Fábricas por região, na ordem de aparição.
pub fn geography_counts(plants: &[&Plant]) -> CountMap {
    CountMap::new(count_by(plants, |p| p.geography.as_str()))
}

/// Fábricas por ramo, do maior para o menor. Empate mantém a ordem de aparição.
pub fn sector_counts(plants: &[&Plant]) -> CountMap {
    let mut counts = count_by(plants, |p| {
        if p.sector.is_empty() { OTHER_SECTOR } else { p.sector.as_str() }
    });
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    CountMap::new(counts)
}

pub fn overview(file: PlantsFile, predicates: &PlantFilter) -> PlantsOverview {
    let filtered = filter(&file.plants, predicates);

    PlantsOverview {
        total: file.plants.len(),
        is_filtered: predicates.is_active(),
        summary: summarize(&filtered),
        options: filter_options(&file.plants),
        geography_counts: geography_counts(&filtered),
        sector_counts: sector_counts(&filtered),
        plants: filtered.into_iter().cloned().collect(),
        timeline: file.timeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(id: &str, stage: &str, geography: &str, sector: &str, participants: u64) -> Plant {
        Plant {
            id: id.to_string(),
            name: format!("מפעל {id}"),
            stage: stage.to_string(),
            geography: geography.to_string(),
            sector: sector.to_string(),
            total_participants: participants,
            total_sessions: 2,
            ceo_count: 1,
            hr_manager_count: 1,
            ..Default::default()
        }
    }

    fn sample() -> Vec<Plant> {
        vec![
            plant("a", "פיילוט", "עוטף עזה", "מזון", 10),
            plant("b", "תכנית רחבה", "גליל עליון", "פלסטיק", 20),
            plant("c", "תכנית רחבה", "עוטף עזה", "מזון", 5),
            plant("d", "תכנית רחבה", "רמת הגולן", "", 7),
        ]
    }

    fn ids(found: Vec<&Plant>) -> Vec<&str> {
        found.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn sentinel_keeps_every_plant() {
        let plants = sample();
        let predicates = PlantFilter {
            stage: Some(ALL.into()),
            geography: Some(ALL.into()),
            sector: None,
        };

        assert_eq!(filter(&plants, &predicates).len(), 4);
        assert!(!predicates.is_active());
    }

    #[test]
    fn filters_combine_with_and() {
        let plants = sample();
        let predicates = PlantFilter {
            stage: Some("תכנית רחבה".into()),
            geography: Some("עוטף עזה".into()),
            ..Default::default()
        };

        assert_eq!(ids(filter(&plants, &predicates)), vec!["c"]);
        assert!(predicates.is_active());
    }

    #[test]
    fn summary_sums_the_filtered_plants() {
        let plants = sample();
        let predicates = PlantFilter { sector: Some("מזון".into()), ..Default::default() };
        let summary = summarize(&filter(&plants, &predicates));

        assert_eq!(
            summary,
            PlantSummary {
                total_plants: 2,
                total_participants: 15,
                total_sessions: 4,
                total_ceos: 2,
                total_hr_managers: 2,
            }
        );
        assert_eq!(summarize(&[]), PlantSummary::default());
    }

    #[test]
    fn options_start_with_the_sentinel_in_order_of_appearance() {
        let options = filter_options(&sample());

        assert_eq!(options.stages, vec![ALL, "פיילוט", "תכנית רחבה"]);
        assert_eq!(options.geographies, vec![ALL, "עוטף עזה", "גליל עליון", "רמת הגולן"]);
        assert_eq!(options.sectors, vec![ALL, "מזון", "פלסטיק", ""]);
    }

    #[test]
    fn sectors_sort_by_count_and_blank_becomes_other() {
        let plants = sample();
        let all: Vec<&Plant> = plants.iter().collect();
        let sectors = sector_counts(&all);

        assert_eq!(sectors.keys().collect::<Vec<_>>(), vec!["מזון", "פלסטיק", OTHER_SECTOR]);
        assert_eq!(sectors.get("מזון"), Some(2));

        let regions = geography_counts(&all);
        assert_eq!(regions.keys().collect::<Vec<_>>(), vec!["עוטף עזה", "גליל עליון", "רמת הגולן"]);
        assert_eq!(regions.total(), 4);
    }

    #[test]
    fn overview_keeps_unfiltered_total_and_options() {
        let file = PlantsFile { plants: sample(), ..Default::default() };
        let predicates = PlantFilter { geography: Some("גליל עליון".into()), ..Default::default() };
        let view = overview(file, &predicates);

        assert_eq!(view.total, 4);
        assert!(view.is_filtered);
        assert_eq!(view.plants.len(), 1);
        assert_eq!(view.summary.total_participants, 20);
        assert_eq!(view.options.geographies.len(), 4);
    }
}
