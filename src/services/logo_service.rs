// src/services/logo_service.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{common::error::AppError, db::LogoRepository};

// Corpo menor que isso é página de erro ou pixel de rastreio, não um logo
const MIN_REMOTE_BYTES: usize = 100;
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Origem da imagem escolhida no seletor de logos.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageData {
    /// `data:image/png;base64,...`
    DataUrl(String),
    Candidate {
        #[serde(rename = "candidateFile")]
        candidate_file: String,
    },
    Remote {
        #[serde(rename = "remoteUrl")]
        remote_url: String,
    },
    Unsupported(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoItem {
    pub company_id: Option<String>,
    #[schema(value_type = Object)]
    pub image_data: Option<ImageData>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoResult {
    pub company_id: String,
    pub ok: bool,
}

#[derive(Clone)]
pub struct LogoService {
    repo: LogoRepository,
    http: reqwest::Client,
}

fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let (_, payload) = data_url.split_once(',')?;
    STANDARD.decode(payload.trim()).ok()
}

impl LogoService {
    pub fn new(repo: LogoRepository, http: reqwest::Client) -> Self {
        Self { repo, http }
    }

    pub async fn list_saved(&self) -> Vec<String> {
        self.repo.list_saved().await
    }

    /// `Ok(false)` quando não havia imagem utilizável; `Err` só para id
    /// inválido ou falha de escrita.
    pub async fn save(&self, company_id: &str, image: &ImageData) -> Result<bool, AppError> {
        let bytes = match image {
            ImageData::DataUrl(url) if url.starts_with("data:") => decode_data_url(url),
            ImageData::Candidate { candidate_file } => {
                self.repo.read_candidate(company_id, candidate_file).await
            }
            ImageData::Remote { remote_url } => self.fetch_remote(remote_url).await,
            _ => None,
        };

        let Some(bytes) = bytes else {
            return Ok(false);
        };

        self.repo.write(company_id, &bytes).await?;
        tracing::info!("Logo salvo: {} ({} bytes)", company_id, bytes.len());
        Ok(true)
    }

    /// Cada item é independente: uma falha não interrompe os demais.
    pub async fn save_bulk(&self, items: &[LogoItem]) -> Vec<LogoResult> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let company_id = item.company_id.clone().unwrap_or_default();
            let ok = match &item.image_data {
                Some(image) if !company_id.is_empty() => {
                    self.save(&company_id, image).await.unwrap_or_else(|e| {
                        tracing::warn!("Falha ao salvar logo {}: {}", company_id, e);
                        false
                    })
                }
                _ => false,
            };
            results.push(LogoResult { company_id, ok });
        }
        results
    }

    async fn fetch_remote(&self, url: &str) -> Option<Vec<u8>> {
        let result = async {
            let response = self
                .http
                .get(url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .send()
                .await?
                .error_for_status()?;
            response.bytes().await
        }
        .await;

        match result {
            Ok(body) if body.len() > MIN_REMOTE_BYTES => Some(body.to_vec()),
            Ok(body) => {
                tracing::warn!("Logo remoto muito pequeno ({} bytes): {}", body.len(), url);
                None
            }
            Err(e) => {
                tracing::warn!("Falha ao baixar {}: {}", url, e);
                None
            }
        }
    }
}
