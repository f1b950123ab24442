//! Payload and receipt types exchanged with the submission endpoint.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::wizard::Application;

/// Body of the `application` multipart part.
#[derive(Debug, Serialize)]
pub struct ApplicationPayload<'a> {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub application: &'a Application,
    pub files: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Proof the endpoint accepted an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: String,
    pub received_at: DateTime<Utc>,
}
