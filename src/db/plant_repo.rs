// src/db/plant_repo.rs

use std::path::PathBuf;

use crate::{common::error::AppError, models::plant::PlantsFile};

// Arquivo só de leitura, gerado fora do servidor
#[derive(Clone)]
pub struct PlantRepository {
    path: PathBuf,
}

impl PlantRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<PlantsFile, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::PlantsFileNotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_plants_and_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.json");
        std::fs::write(
            &path,
            r#"{ "plants": [ { "id": "p1", "name": "מפעל", "geography": "גליל מערבי" } ],
                 "timeline": { "2023-12": { "mgmt": 3 } } }"#,
        )
        .unwrap();

        let file = PlantRepository::new(path).load().await.unwrap();
        assert_eq!(file.plants[0].geography, "גליל מערבי");
        assert_eq!(file.timeline["2023-12"].mgmt, 3.0);
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlantRepository::new(dir.path().join("plants.json")).load().await.unwrap_err();
        assert!(matches!(err, AppError::PlantsFileNotFound(_)));
    }
}
