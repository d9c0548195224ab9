use super::{DocumentWordSource, TokenList};
use crate::error::LoadError;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Header carrying the reader's session token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Reported when a failed response carries no usable `message`.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load document content.";

#[derive(Debug, Deserialize)]
struct DocumentWordsResponse {
    words: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Fetches pre-extracted words from the document back end at
/// `GET {api_url}/documents/{id}/words`.
#[derive(Debug, Clone)]
pub struct HttpWordSource {
    client: Client,
    api_url: Url,
    auth_token: Option<String>,
}

impl HttpWordSource {
    /// Must be called outside of an async context; the blocking client owns
    /// its own runtime.
    pub fn new(
        api_url: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LoadError> {
        let api_url = Url::parse(api_url)
            .map_err(|err| LoadError::Transport(format!("invalid api url {api_url}: {err}")))?;
        if api_url.cannot_be_a_base() {
            return Err(LoadError::Transport(format!(
                "api url cannot be used as a base: {api_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LoadError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(client, api_url, auth_token))
    }

    fn with_client(client: Client, api_url: Url, auth_token: Option<String>) -> Self {
        Self {
            client,
            api_url,
            auth_token: auth_token.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn words_url(&self, document_id: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["documents", document_id, "words"]);
        }
        url
    }
}

impl DocumentWordSource for HttpWordSource {
    fn load(&self, document_id: &str) -> Result<TokenList, LoadError> {
        let Some(token) = self.auth_token.as_deref() else {
            warn!(document_id, "No auth token configured for document request");
            return Err(LoadError::Unauthorized);
        };

        let url = self.words_url(document_id);
        info!(%url, "Fetching document words");
        let response = self
            .client
            .get(url)
            .header(AUTH_HEADER, token)
            .send()
            .map_err(|err| LoadError::Transport(err.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(LoadError::NotFound(document_id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LoadError::Unauthorized);
            }
            status if !status.is_success() => {
                let message = response
                    .json::<ErrorResponse>()
                    .unwrap_or_default()
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| LOAD_FAILURE_MESSAGE.to_string());
                warn!(%status, document_id, %message, "Document request failed");
                return Err(LoadError::Transport(message));
            }
            _ => {}
        }

        let body: DocumentWordsResponse = response
            .json()
            .map_err(|err| LoadError::Transport(format!("invalid words response: {err}")))?;
        debug!(document_id, words = body.words.len(), "Received document words");
        TokenList::from_words(body.words).require_content()
    }
}
