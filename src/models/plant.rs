// src/models/plant.rs

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::report::CountMap;

// --- FÁBRICAS DA INDÚSTRIA KIBUTZIANA ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[schema(example = "plant_01")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kibbutz: String,

    // "פיילוט" ou a tecnologia ampla
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub sector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_months_raw: Option<String>,

    #[serde(default)]
    pub total_participants: u64,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub ceo_count: u64,
    #[serde(default)]
    pub hr_manager_count: u64,

    // Participantes e sessões por camada
    #[serde(default)]
    pub mgmt_participants: u64,
    #[serde(default)]
    pub mgmt_sessions: u64,
    #[serde(default)]
    pub mid_mgmt_participants: u64,
    #[serde(default)]
    pub mid_mgmt_sessions: u64,
    #[serde(default)]
    pub worker_participants: u64,
    #[serde(default)]
    pub worker_sessions: u64,
}

/// Participantes por camada num mês `YYYY-MM`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(default)]
    pub mgmt: f64,
    #[serde(default)]
    pub mid_mgmt: f64,
    #[serde(default)]
    pub workers: f64,
}

/// Formato do arquivo `plants.json`. O `summary` gravado no arquivo é
/// ignorado: os totais são sempre recalculados.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantsFile {
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub timeline: BTreeMap<String, TimelineEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlantSummary {
    #[serde(rename = "totalPlants")]
    pub total_plants: usize,
    #[serde(rename = "totalParticipants")]
    pub total_participants: u64,
    #[serde(rename = "totalSessions")]
    pub total_sessions: u64,
    #[serde(rename = "totalCEOs")]
    pub total_ceos: u64,
    #[serde(rename = "totalHRManagers")]
    pub total_hr_managers: u64,
}

/// Opções dos dropdowns, cada uma começando pelo sentinela "הכל".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlantFilterOptions {
    pub stages: Vec<String>,
    pub geographies: Vec<String>,
    pub sectors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantsOverview {
    pub plants: Vec<Plant>,
    /// Total de fábricas antes do filtro
    pub total: usize,
    pub is_filtered: bool,
    pub summary: PlantSummary,
    pub options: PlantFilterOptions,
    #[schema(value_type = Object)]
    pub geography_counts: CountMap,
    #[schema(value_type = Object)]
    pub sector_counts: CountMap,
    pub timeline: BTreeMap<String, TimelineEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_uses_the_dashboard_keys() {
        let summary = PlantSummary { total_plants: 2, total_ceos: 3, total_hr_managers: 1, ..Default::default() };
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["totalPlants"], 2);
        assert_eq!(json["totalCEOs"], 3);
        assert_eq!(json["totalHRManagers"], 1);
    }

    #[test]
    fn file_summary_is_ignored_and_counts_default_to_zero() {
        let file: PlantsFile = serde_json::from_value(json!({
            "plants": [ { "id": "p1", "name": "מפעל", "stage": "פיילוט", "totalParticipants": 12 } ],
            "timeline": { "2024-01": { "mgmt": 2.5, "workers": 4 } },
            "summary": { "totalPlants": 99 }
        }))
        .unwrap();

        assert_eq!(file.plants[0].total_participants, 12);
        assert_eq!(file.plants[0].ceo_count, 0);
        assert_eq!(file.timeline["2024-01"].mid_mgmt, 0.0);
    }
}
