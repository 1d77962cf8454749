use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::models::{EmailResult, Topic, UpdateDetail, UpdateSummary};

/// Client for the research dashboard backend.
#[derive(Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("failed to read {what} response"))?;

        if !status.is_success() {
            // The backend reports failures as {"error": "..."}.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(anyhow!("{what} failed ({status}): {message}"));
        }

        serde_json::from_str(&text).with_context(|| format!("invalid {what} payload"))
    }

    pub async fn list_updates(&self) -> Result<Vec<UpdateSummary>> {
        let response = self
            .client
            .get(self.url("/api/updates"))
            .send()
            .await
            .context("loading updates failed")?;
        Self::read_json(response, "updates").await
    }

    pub async fn get_update(&self, filename: &str) -> Result<UpdateDetail> {
        if filename.is_empty() || filename.contains('/') {
            bail!("invalid update file name '{filename}'");
        }
        let response = self
            .client
            .get(self.url(&format!("/api/updates/{filename}")))
            .send()
            .await
            .context("loading update details failed")?;
        Self::read_json(response, "update details").await
    }

    pub async fn list_topics(&self) -> Result<Vec<Topic>> {
        let response = self
            .client
            .get(self.url("/api/topics"))
            .send()
            .await
            .context("loading topics failed")?;
        Self::read_json(response, "topics").await
    }

    pub async fn add_topic(&self, name: &str) -> Result<Topic> {
        let name = validate_topic_name(name)?;
        let response = self
            .client
            .post(self.url("/api/topics"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .context("adding topic failed")?;
        Self::read_json(response, "add topic").await
    }

    pub async fn generate_update(&self) -> Result<UpdateDetail> {
        let response = self
            .client
            .post(self.url("/api/update"))
            .json(&json!({}))
            .send()
            .await
            .context("generating update failed")?;
        Self::read_json(response, "generate update").await
    }

    pub async fn send_email_update(&self) -> Result<EmailResult> {
        let response = self
            .client
            .post(self.url("/api/email"))
            .json(&json!({}))
            .send()
            .await
            .context("sending email failed")?;

        // A failed send still carries a {status, message} body.
        let status = response.status();
        let text = response.text().await.context("failed to read email response")?;
        serde_json::from_str::<EmailResult>(&text)
            .with_context(|| format!("unexpected email response ({status}): {text}"))
    }
}

fn validate_topic_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Please enter a topic name.");
    }
    Ok(name)
}
