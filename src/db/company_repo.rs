// src/db/company_repo.rs

use std::path::{Path, PathBuf};
use validator::Validate;

use crate::{
    common::error::AppError,
    models::company::{Company, CompanyList},
};

// O "banco" é um único arquivo JSON, lido e gravado por inteiro.
// Sem controle de concorrência: quem grava por último vence.
#[derive(Clone)]
pub struct CompanyRepository {
    path: PathBuf,
}

impl CompanyRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_all(&self) -> Result<Vec<Company>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::CompaniesFileNotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let list: CompanyList = serde_json::from_str(&raw)?;
        list.validate()?;

        Ok(list.companies)
    }

    pub async fn save_all(&self, companies: Vec<Company>) -> Result<usize, AppError> {
        let list = CompanyList { companies };
        list.validate()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&list)?;
        tokio::fs::write(&self.path, json).await?;

        Ok(list.companies.len())
    }
}
