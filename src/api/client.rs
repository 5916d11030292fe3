use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{AgentBackend, BackendError, BackendRequest, BackendResponse};
use crate::character::Character;
use crate::utils::url::construct_api_url;

/// JSON-over-HTTP adapter for the agent backend.
#[derive(Clone)]
pub struct HttpAgentBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAgentBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `characters/{id}` with the id escaped as a single path segment.
    fn character_url(&self, id: &str) -> Result<Url, BackendError> {
        let base = construct_api_url(&self.base_url, "characters");
        let mut url = Url::parse(&base)
            .map_err(|err| BackendError::Transport(format!("invalid backend url {base}: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("invalid backend url {base}")))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn process_request(
        &self,
        request: BackendRequest,
    ) -> Result<BackendResponse, BackendError> {
        let url = construct_api_url(&self.base_url, "process");
        debug!(
            character = %request.character_id,
            session = %request.session_id,
            turns = request.context.len(),
            "sending process request"
        );
        let response = self
            .authorize(self.client.post(url))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_character(&self, id: &str) -> Result<Character, BackendError> {
        let url = self.character_url(id)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        let character: Character = Self::decode(response).await?;
        Ok(character.normalized())
    }

    async fn create_character(&self, character: &Character) -> Result<(), BackendError> {
        let url = construct_api_url(&self.base_url, "characters");
        let response = self
            .authorize(self.client.post(url))
            .json(character)
            .send()
            .await?;
        // An already-registered character is reported as a conflict.
        if response.status() == reqwest::StatusCode::CONFLICT {
            return Ok(());
        }
        Self::check_status(response).await?;
        Ok(())
    }
}
