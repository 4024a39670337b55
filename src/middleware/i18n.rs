// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Idioma das mensagens de erro. O dashboard é em hebraico, então é o padrão.
pub struct Locale(pub String);

impl Locale {
    pub fn is_hebrew(&self) -> bool {
        self.0 == "he" || self.0 == "iw"
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let default_lang = "he".to_string();

        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    // "he-IL" -> "he"
                    .map(|tag_string| {
                        tag_string.split('-').next().unwrap_or(tag_string).to_string()
                    })
            })
            .unwrap_or(default_lang);

        Ok(Locale(lang))
    }
}
