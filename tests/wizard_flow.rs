use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use artfund::submit::model::Receipt;
use artfund::submit::{ApplicationSubmitter, SimulatedSubmitter};
use artfund::wizard::{Field, Phase, Stage, StagedFile, SubmitTicket, Wizard, WizardError};

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct SubmitCall {
    email: String,
    child_age: u8,
    files: Vec<String>,
}

#[derive(Clone, Default)]
struct RecordingSubmitter {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    calls: Arc<Mutex<Vec<SubmitCall>>>,
    delay: Option<Duration>,
}

impl RecordingSubmitter {
    fn with_responses(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Default::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    async fn pop_response(&self) -> Result<String> {
        let mut guard = self.responses.lock().await;
        guard.pop_front().unwrap_or_else(|| Ok("APP-1".into()))
    }

    async fn calls(&self) -> Vec<SubmitCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ApplicationSubmitter for RecordingSubmitter {
    async fn submit(&self, ticket: &SubmitTicket) -> Result<Receipt> {
        self.calls.lock().await.push(SubmitCall {
            email: ticket.application.email.clone(),
            child_age: ticket.application.child_age,
            files: ticket.files.iter().map(|f| f.name.clone()).collect(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reference = self.pop_response().await?;
        Ok(Receipt {
            reference,
            received_at: Utc::now(),
        })
    }
}

/// Fill every field through the wizard, as a form would.
fn fill_valid(w: &mut Wizard) {
    let text = [
        (Field::FirstName, "Amina"),
        (Field::LastName, "Okafor"),
        (Field::Email, "amina@example.org"),
        (Field::Phone, "(555) 010-0199"),
        (Field::Address, "12 Elm Street, Springfield"),
        (Field::ChildName, "Zed"),
        (Field::ChildAge, "11"),
        (Field::ArtForm, "painting"),
        (Field::Experience, "Two years of weekend painting classes"),
        (Field::FundingAmount, "750"),
        (Field::FundingPurpose, "Tuition for the summer studio program"),
        (Field::Timeline, "Before June 2027"),
        (Field::OtherSupport, ""),
    ];
    for (field, value) in text {
        w.set_text(field, value).unwrap();
    }
    w.set_flag(Field::PreviousFunding, false).unwrap();
    w.set_flag(Field::Agreement, true).unwrap();
}

fn to_review(w: &mut Wizard) {
    assert_eq!(w.next(), Ok(Stage::ChildDetails));
    assert_eq!(w.next(), Ok(Stage::Funding));
    assert_eq!(w.next(), Ok(Stage::Review));
}

#[tokio::test]
async fn scenario_c_valid_draft_is_submitted_and_files_cleared() {
    let submitter = RecordingSubmitter::with_responses(vec![Ok("APP-42".into())]);
    let mut w = Wizard::new();
    assert_eq!(w.stage(), Some(Stage::Contact));
    fill_valid(&mut w);
    w.stage_files(vec![
        StagedFile::new("sunflowers.jpg", 1_200_000),
        StagedFile::new("portfolio.pdf", 300_000),
    ])
    .unwrap();
    to_review(&mut w);
    assert!(w.can_submit());

    let receipt = w.submit(&submitter, TIMEOUT).await.unwrap();
    assert_eq!(receipt.reference, "APP-42");
    assert!(matches!(w.phase(), Phase::Submitted(_)));
    assert!(w.staged_files().is_empty());
    assert_eq!(w.draft().email, "");

    let calls = submitter.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].email, "amina@example.org");
    assert_eq!(calls[0].child_age, 11);
    assert_eq!(calls[0].files, vec!["sunflowers.jpg", "portfolio.pdf"]);
}

#[tokio::test]
async fn scenario_d_age_nineteen_blocks_submission() {
    let submitter = RecordingSubmitter::default();
    let mut w = Wizard::new();
    fill_valid(&mut w);
    to_review(&mut w);
    w.set_text(Field::ChildAge, "19").unwrap();
    assert!(!w.can_submit());

    match w.submit(&submitter, TIMEOUT).await {
        Err(WizardError::Blocked(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, Field::ChildAge);
        }
        other => panic!("expected blocked submit, got {:?}", other.map(|r| r.clone())),
    }
    assert_eq!(w.stage(), Some(Stage::Review));
    assert!(submitter.calls().await.is_empty());
}

#[tokio::test]
async fn missing_consent_blocks_submission() {
    let mut w = Wizard::new();
    fill_valid(&mut w);
    w.set_flag(Field::Agreement, false).unwrap();
    to_review(&mut w);
    assert!(!w.can_submit());
    assert!(matches!(w.begin_submit(), Err(WizardError::Blocked(_))));
    w.set_flag(Field::Agreement, true).unwrap();
    assert!(w.can_submit());
}

#[tokio::test]
async fn failure_returns_to_review_and_retry_succeeds() {
    let submitter = RecordingSubmitter::with_responses(vec![
        Err(anyhow!("503 service unavailable")),
        Ok("APP-7".into()),
    ]);
    let mut w = Wizard::new();
    fill_valid(&mut w);
    w.stage_files(vec![StagedFile::new("sketch.png", 10)]).unwrap();
    to_review(&mut w);

    let err = w.submit(&submitter, TIMEOUT).await.unwrap_err();
    assert!(matches!(&err, WizardError::SubmitFailed(msg) if msg.contains("503")));
    assert_eq!(w.stage(), Some(Stage::Review));
    assert!(w.last_error().unwrap().contains("503"));
    assert_eq!(w.staged_files().len(), 1);

    let receipt = w.submit(&submitter, TIMEOUT).await.unwrap();
    assert_eq!(receipt.reference, "APP-7");
    assert_eq!(submitter.calls().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_returns_to_review() {
    let submitter = RecordingSubmitter::slow(Duration::from_secs(60));
    let mut w = Wizard::new();
    fill_valid(&mut w);
    to_review(&mut w);

    let err = w
        .submit(&submitter, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::SubmitFailed(ref msg) if msg.contains("timed out")));
    assert_eq!(w.stage(), Some(Stage::Review));
    assert!(!w.is_submitting());
}

#[tokio::test(start_paused = true)]
async fn simulated_submitter_completes_after_delay() {
    let mut w = Wizard::new();
    fill_valid(&mut w);
    to_review(&mut w);
    let started = tokio::time::Instant::now();
    let receipt = w
        .submit(&SimulatedSubmitter::default(), TIMEOUT)
        .await
        .unwrap()
        .clone();
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(receipt.reference.starts_with("SIM-"));
}

#[test]
fn navigation_clamps_at_both_ends() {
    let mut w = Wizard::new();
    assert_eq!(w.previous(), Ok(Stage::Contact));
    assert_eq!(w.stage(), Some(Stage::Contact));
    fill_valid(&mut w);
    to_review(&mut w);
    assert_eq!(w.next(), Ok(Stage::Review));
    assert_eq!(w.stage(), Some(Stage::Review));
}

#[test]
fn split_submit_rejects_reentry_and_navigation() {
    let mut w = Wizard::new();
    fill_valid(&mut w);
    to_review(&mut w);
    let ticket = w.begin_submit().unwrap();
    assert_eq!(w.begin_submit(), Err(WizardError::Busy));
    assert_eq!(w.previous(), Err(WizardError::Busy));
    assert_eq!(w.next(), Err(WizardError::Busy));
    assert!(w.finish_submit(
        ticket.id,
        Ok(Receipt {
            reference: "APP-9".into(),
            received_at: Utc::now(),
        })
    ));
    assert_eq!(w.receipt().map(|r| r.reference.as_str()), Some("APP-9"));
}

#[test]
fn example_draft_file_is_submittable() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("draft.example.yaml");
    let raw = std::fs::read_to_string(path).unwrap();
    let draft: artfund::wizard::Draft = serde_yaml::from_str(&raw).unwrap();
    let mut w = Wizard::with_draft(draft);
    to_review(&mut w);
    assert!(w.can_submit());
}

#[test]
fn example_config_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.yaml");
    let cfg = artfund::config::load(Some(&path)).unwrap();
    let expected: artfund::config::Config =
        serde_yaml::from_str(artfund::config::example()).unwrap();
    assert_eq!(cfg, expected);
}
