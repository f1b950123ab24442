use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::submit::model::{ApplicationPayload, Receipt, SubmitResponse};
use crate::wizard::SubmitTicket;

pub mod model;

/// Anything that can take a finished application and report success or failure.
#[async_trait]
pub trait ApplicationSubmitter: Send + Sync {
    async fn submit(&self, ticket: &SubmitTicket) -> Result<Receipt>;
}

/// Posts applications to an HTTP endpoint as `multipart/form-data`.
#[derive(Clone)]
pub struct HttpSubmitter {
    http: Client,
    endpoint: Url,
    token: Option<String>,
}

impl fmt::Debug for HttpSubmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSubmitter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpSubmitter {
    pub fn new(endpoint: Url, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent("artfund/0.1")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn build_request(&self, ticket: &SubmitTicket, form: Form) -> Result<reqwest::Request> {
        let mut req = self
            .http
            .post(self.endpoint.clone())
            .header("Idempotency-Key", ticket.id.to_string())
            .multipart(form);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req.build().context("failed to build submission request")
    }

    /// One `application` JSON part plus a `files` part per staged file that
    /// has a local path.
    async fn build_form(ticket: &SubmitTicket, submitted_at: DateTime<Utc>) -> Result<Form> {
        let payload = build_payload(ticket, submitted_at)?;
        let mut form = Form::new().part(
            "application",
            Part::text(payload.to_string()).mime_str("application/json")?,
        );
        for file in &ticket.files {
            let Some(path) = &file.path else { continue };
            let content = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read file: {}", path.display()))?;
            form = form.part(
                "files",
                Part::bytes(content)
                    .file_name(file.name.clone())
                    .mime_str(&file.content_type)?,
            );
        }
        Ok(form)
    }
}

pub fn build_payload(ticket: &SubmitTicket, submitted_at: DateTime<Utc>) -> Result<Value> {
    let payload = ApplicationPayload {
        submission_id: ticket.id,
        submitted_at,
        application: &ticket.application,
        files: ticket.files.iter().map(|f| f.name.as_str()).collect(),
    };
    serde_json::to_value(&payload).context("failed to serialize application payload")
}

#[async_trait]
impl ApplicationSubmitter for HttpSubmitter {
    #[instrument(skip_all, fields(ticket = %ticket.id))]
    async fn submit(&self, ticket: &SubmitTicket) -> Result<Receipt> {
        let form = Self::build_form(ticket, Utc::now()).await?;
        let request = self.build_request(ticket, form)?;
        info!(url=%request.url(), files = ticket.files.len(), "sending application");
        for (name, value) in request.headers() {
            if name.as_str().eq_ignore_ascii_case("authorization") {
                info!("  {}: Bearer [REDACTED]", name);
            } else {
                info!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }

        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach submission endpoint")?;

        let status = res.status();
        info!(%status, "submission endpoint responded");
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = res.text().await.unwrap_or_default();
            warn!("rate limited by submission endpoint: {}", body);
            return Err(anyhow!("received 429 from submission endpoint: {}", body));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, %body, "submission rejected");
            return Err(anyhow!("submission error {}: {}", status, body));
        }

        let body = res.text().await.context("failed to read submission response")?;
        let payload: SubmitResponse =
            serde_json::from_str(&body).context("invalid submission response JSON")?;
        Ok(Receipt {
            reference: payload.id,
            received_at: Utc::now(),
        })
    }
}

/// Stand-in used when no endpoint is configured: waits, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl ApplicationSubmitter for SimulatedSubmitter {
    async fn submit(&self, ticket: &SubmitTicket) -> Result<Receipt> {
        tokio::time::sleep(self.delay).await;
        info!(ticket = %ticket.id, "simulated submission accepted");
        Ok(Receipt {
            reference: format!("SIM-{}", ticket.id.simple()),
            received_at: Utc::now(),
        })
    }
}

/// HTTP when `submission.endpoint` is set, simulated otherwise.
pub fn submitter_from_config(cfg: &Config) -> Result<Box<dyn ApplicationSubmitter>> {
    match cfg.submission.endpoint.as_deref() {
        Some(endpoint) => {
            let url = Url::parse(endpoint).context("invalid submission endpoint")?;
            let token = Some(cfg.submission.token.clone());
            Ok(Box::new(HttpSubmitter::new(url, token)?))
        }
        None => {
            warn!("no submission endpoint configured; using simulated submitter");
            Ok(Box::new(SimulatedSubmitter::new(Duration::from_millis(
                cfg.submission.simulated_delay_ms,
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtForm;
    use crate::wizard::{Application, StagedFile};
    use uuid::Uuid;

    fn sample_ticket() -> SubmitTicket {
        SubmitTicket {
            id: Uuid::new_v4(),
            application: Application {
                first_name: "Amina".into(),
                last_name: "Okafor".into(),
                email: "amina@example.org".into(),
                phone: "555-010-0199".into(),
                address: "12 Elm Street".into(),
                child_name: "Zed".into(),
                child_age: 11,
                art_form: ArtForm::Sculpture,
                experience: "Two years of weekend classes".into(),
                funding_amount: 750,
                funding_purpose: "Summer studio program tuition".into(),
                timeline: "Before June 2027".into(),
                previous_funding: true,
                other_support: String::new(),
            },
            files: vec![StagedFile::new("portfolio.pdf", 2048)],
        }
    }

    #[test]
    fn payload_carries_application_and_file_names() {
        let ticket = sample_ticket();
        let body = build_payload(&ticket, Utc::now()).unwrap();
        assert!(body.is_object());
        assert_eq!(body["submission_id"], ticket.id.to_string());
        assert_eq!(body["application"]["art_form"], "sculpture");
        assert_eq!(body["application"]["child_age"], 11);
        assert_eq!(body["application"]["previous_funding"], true);
        assert_eq!(body["files"][0], "portfolio.pdf");
    }

    #[test]
    fn build_request_sets_headers() {
        let ticket = sample_ticket();
        let url = Url::parse("https://apply.example.org/v1/applications").unwrap();
        let client = HttpSubmitter::new(url, Some("token".into())).unwrap();
        let request = client.build_request(&ticket, Form::new()).unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/v1/applications");
        let headers = request.headers();
        assert_eq!(
            headers.get("Authorization").and_then(|h| h.to_str().ok()),
            Some("Bearer token")
        );
        assert_eq!(
            headers.get("Idempotency-Key").and_then(|h| h.to_str().ok()),
            Some(ticket.id.to_string().as_str())
        );
        assert!(headers
            .get("Content-Type")
            .and_then(|h| h.to_str().ok())
            .unwrap()
            .starts_with("multipart/form-data"));
    }

    #[test]
    fn blank_token_sends_no_authorization() {
        let url = Url::parse("https://apply.example.org/").unwrap();
        let client = HttpSubmitter::new(url, Some("  ".into())).unwrap();
        let request = client.build_request(&sample_ticket(), Form::new()).unwrap();
        assert!(request.headers().get("Authorization").is_none());
    }

    #[tokio::test]
    async fn form_fails_on_unreadable_file() {
        let mut ticket = sample_ticket();
        ticket.files[0].path = Some("/nonexistent/portfolio.pdf".into());
        let err = HttpSubmitter::build_form(&ticket, Utc::now()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read file"));
    }

    #[tokio::test]
    async fn form_without_local_files_carries_application_part() {
        let ticket = sample_ticket();
        let form = HttpSubmitter::build_form(&ticket, Utc::now()).await.unwrap();
        assert!(!form.boundary().is_empty());
        let body = build_payload(&ticket, Utc::now()).unwrap();
        assert_eq!(body["application"]["email"], "amina@example.org");
        assert!(!body["application"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_submitter_waits_then_succeeds() {
        let sim = SimulatedSubmitter::default();
        let ticket = sample_ticket();
        let started = tokio::time::Instant::now();
        let receipt = sim.submit(&ticket).await.unwrap();
        assert!(started.elapsed() >= SimulatedSubmitter::DEFAULT_DELAY);
        assert!(receipt.reference.starts_with("SIM-"));
    }
}
