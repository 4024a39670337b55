// src/db/logo_repo.rs

use std::path::PathBuf;

use crate::common::error::AppError;

const CANDIDATES_DIR: &str = "candidates";

// Logos ficam como `<logos_dir>/<companyId>.png`; candidatos baixados pelo
// script de busca ficam em `<logos_dir>/candidates/<companyId>/`.
#[derive(Clone)]
pub struct LogoRepository {
    dir: PathBuf,
}

// companyId vira nome de arquivo: só slug
pub fn is_valid_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl LogoRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn logo_path(&self, company_id: &str) -> PathBuf {
        self.dir.join(format!("{company_id}.png"))
    }

    /// IDs com logo salvo. Falha de leitura do diretório = lista vazia.
    pub async fn list_saved(&self) -> Vec<String> {
        let mut saved = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(&self.dir).await else {
            return saved;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == CANDIDATES_DIR {
                continue;
            }
            if let Some(id) = name.strip_suffix(".png") {
                saved.push(id.to_string());
            }
        }

        saved.sort();
        saved
    }

    pub async fn write(&self, company_id: &str, bytes: &[u8]) -> Result<(), AppError> {
        if !is_valid_segment(company_id) {
            return Err(AppError::InvalidCompanyId(company_id.to_string()));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.logo_path(company_id), bytes).await?;
        Ok(())
    }

    /// Conteúdo de um candidato, se existir e não estiver vazio.
    pub async fn read_candidate(&self, company_id: &str, file: &str) -> Option<Vec<u8>> {
        if !is_valid_segment(company_id) || !is_valid_segment(file) {
            return None;
        }
        let path = self.dir.join(CANDIDATES_DIR).join(company_id).join(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_png_stems_and_skips_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LogoRepository::new(dir.path());

        repo.write("migdal", b"png-bytes").await.unwrap();
        repo.write("golf", b"png-bytes").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir_all(dir.path().join("candidates").join("golf")).unwrap();

        assert_eq!(repo.list_saved().await, vec!["golf", "migdal"]);
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LogoRepository::new(dir.path().join("missing"));
        assert!(repo.list_saved().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LogoRepository::new(dir.path());

        assert!(repo.write("../evil", b"x").await.is_err());
        assert!(repo.read_candidate("golf", "../../etc").await.is_none());
    }

    #[tokio::test]
    async fn reads_non_empty_candidates_only() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = dir.path().join("candidates").join("golf");
        std::fs::create_dir_all(&candidates).unwrap();
        std::fs::write(candidates.join("favicon.png"), b"icon").unwrap();
        std::fs::write(candidates.join("empty.png"), b"").unwrap();

        let repo = LogoRepository::new(dir.path());
        assert_eq!(repo.read_candidate("golf", "favicon.png").await, Some(b"icon".to_vec()));
        assert_eq!(repo.read_candidate("golf", "empty.png").await, None);
    }
}
