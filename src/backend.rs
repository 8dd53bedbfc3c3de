use crate::config::{ApiConfig, Config};
use crate::consistency::CharacterRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

#[async_trait]
pub trait StoryBackend: Send + Sync + Debug {
    /// Generate the full prompt set for a session.
    async fn generate_prompts(&self, sip_id: &str) -> Result<Vec<String>>;

    /// Fetch the character roster for a session.
    async fn describe_characters(&self, sip_id: &str) -> Result<Vec<CharacterRecord>>;
}

pub fn create_backend(config: &Config) -> Result<Box<dyn StoryBackend>> {
    Ok(Box::new(HttpBackend::new(&config.api)?))
}

#[derive(Debug)]
pub struct HttpBackend {
    generate_url: Url,
    describe_url: Url,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    #[serde(rename = "sipId")]
    sip_id: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    prompts: Vec<String>,
}

#[derive(Deserialize)]
struct DescribeResponse {
    characters: Vec<CharacterRecord>,
}

impl HttpBackend {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let mut base = api.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).context("Invalid api base_url")?;

        let generate_url = base
            .join(api.generate_path.trim_start_matches('/'))
            .context("Invalid generate_path")?;
        let describe_url = base
            .join(api.describe_path.trim_start_matches('/'))
            .context("Invalid describe_path")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            generate_url,
            describe_url,
            client,
        })
    }

    async fn post_session(&self, url: &Url, sip_id: &str) -> Result<String> {
        let resp = self
            .client
            .post(url.clone())
            .json(&SessionRequest { sip_id })
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await?;
            return Err(anyhow!("Backend error ({}): {}", status, error_text));
        }

        resp.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl StoryBackend for HttpBackend {
    async fn generate_prompts(&self, sip_id: &str) -> Result<Vec<String>> {
        debug!("Requesting prompt generation for sipId={}", sip_id);

        let body = self.post_session(&self.generate_url, sip_id).await?;

        // Anything that is not {"prompts": [string, ...]} is rejected whole.
        let result: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            anyhow!(
                "Invalid response from server (expected {{\"prompts\": []}}): {}. Body: {}",
                e,
                body
            )
        })?;

        Ok(result.prompts)
    }

    async fn describe_characters(&self, sip_id: &str) -> Result<Vec<CharacterRecord>> {
        debug!("Requesting character descriptions for sipId={}", sip_id);

        let body = self.post_session(&self.describe_url, sip_id).await?;

        let result: DescribeResponse = serde_json::from_str(&body).map_err(|e| {
            anyhow!(
                "Invalid response from server (expected {{\"characters\": []}}): {}. Body: {}",
                e,
                body
            )
        })?;

        Ok(result.characters)
    }
}
