//! Grant application wizard.
//!
//! Four editing stages followed by submission. All transitions are synchronous
//! `&mut self` calls except [`Wizard::submit`], which awaits the injected
//! [`ApplicationSubmitter`]. Front ends that run their own event loop can use
//! the split [`Wizard::begin_submit`] / [`Wizard::finish_submit`] pair instead.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::submit::model::Receipt;
use crate::submit::ApplicationSubmitter;

pub mod draft;
pub mod files;

pub use draft::{Application, Draft, Field, FieldError};
pub use files::StagedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Contact,
    ChildDetails,
    Funding,
    Review,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Contact, Stage::ChildDetails, Stage::Funding, Stage::Review];

    /// 1-based position shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Stage::Contact => 1,
            Stage::ChildDetails => 2,
            Stage::Funding => 3,
            Stage::Review => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Contact => "Personal Info",
            Stage::ChildDetails => "Child's Details",
            Stage::Funding => "Funding Request",
            Stage::Review => "Review",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Contact => Some(Stage::ChildDetails),
            Stage::ChildDetails => Some(Stage::Funding),
            Stage::Funding => Some(Stage::Review),
            Stage::Review => None,
        }
    }

    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Contact => None,
            Stage::ChildDetails => Some(Stage::Contact),
            Stage::Funding => Some(Stage::ChildDetails),
            Stage::Review => Some(Stage::Funding),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// `error` carries the last failed submission, shown on the review stage.
    Editing { stage: Stage, error: Option<String> },
    Submitting { ticket_id: Uuid },
    Submitted(Receipt),
}

/// Everything a submitter needs for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub id: Uuid,
    pub application: Application,
    pub files: Vec<StagedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{stage} has {} invalid field(s)", .errors.len())]
    StageIncomplete { stage: Stage, errors: Vec<FieldError> },
    #[error("application has {} invalid field(s)", .0.len())]
    Blocked(Vec<FieldError>),
    #[error("applications can only be submitted from the review stage")]
    NotOnReview,
    #[error("a submission is already in progress")]
    Busy,
    #[error("application was already submitted")]
    AlreadySubmitted,
    #[error("{0} is a checkbox")]
    FlagField(Field),
    #[error("{0} is not a checkbox")]
    NotAFlag(Field),
    #[error("submission failed: {0}")]
    SubmitFailed(String),
}

#[derive(Debug)]
pub struct Wizard {
    draft: Draft,
    files: Vec<StagedFile>,
    phase: Phase,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::with_draft(Draft::default())
    }

    /// Start from a prefilled draft, still on the first stage.
    pub fn with_draft(draft: Draft) -> Self {
        Self {
            draft,
            files: Vec::new(),
            phase: Phase::Editing {
                stage: Stage::Contact,
                error: None,
            },
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Current stage while editing; `None` once submission started.
    pub fn stage(&self) -> Option<Stage> {
        match self.phase {
            Phase::Editing { stage, .. } => Some(stage),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match &self.phase {
            Phase::Submitted(receipt) => Some(receipt),
            _ => None,
        }
    }

    fn editing_stage(&self) -> Result<Stage, WizardError> {
        match self.phase {
            Phase::Editing { stage, .. } => Ok(stage),
            Phase::Submitting { .. } => Err(WizardError::Busy),
            Phase::Submitted(_) => Err(WizardError::AlreadySubmitted),
        }
    }

    fn clear_error(&mut self) {
        if let Phase::Editing { error, .. } = &mut self.phase {
            *error = None;
        }
    }

    fn set_stage(&mut self, next: Stage) {
        if let Phase::Editing { stage, .. } = &mut self.phase {
            *stage = next;
        }
    }

    pub fn set_text(&mut self, field: Field, value: &str) -> Result<(), WizardError> {
        self.editing_stage()?;
        if field.is_flag() {
            return Err(WizardError::FlagField(field));
        }
        self.draft.set_text(field, value);
        self.clear_error();
        debug!(%field, valid = self.draft.check(field).is_ok(), "field updated");
        Ok(())
    }

    pub fn set_flag(&mut self, field: Field, value: bool) -> Result<(), WizardError> {
        self.editing_stage()?;
        if !field.is_flag() {
            return Err(WizardError::NotAFlag(field));
        }
        self.draft.set_flag(field, value);
        self.clear_error();
        debug!(%field, value, "flag updated");
        Ok(())
    }

    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        self.draft.check(field).err()
    }

    pub fn stage_errors(&self, stage: Stage) -> Vec<FieldError> {
        self.draft
            .errors()
            .into_iter()
            .filter(|e| e.field.stage() == stage)
            .collect()
    }

    /// True when every rule passes, consent included.
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, Phase::Editing { .. }) && self.draft.errors().is_empty()
    }

    /// Advance one stage. Blocked while the current stage has invalid fields;
    /// a no-op on the review stage.
    pub fn next(&mut self) -> Result<Stage, WizardError> {
        let stage = self.editing_stage()?;
        let Some(next) = stage.next() else {
            return Ok(stage);
        };
        let errors = self.stage_errors(stage);
        if !errors.is_empty() {
            return Err(WizardError::StageIncomplete { stage, errors });
        }
        self.set_stage(next);
        info!(from = stage.number(), to = next.number(), "wizard advanced");
        Ok(next)
    }

    /// Go back one stage; a no-op on the first stage.
    pub fn previous(&mut self) -> Result<Stage, WizardError> {
        let stage = self.editing_stage()?;
        let prev = stage.previous().unwrap_or(stage);
        self.set_stage(prev);
        Ok(prev)
    }

    /// Replace the staged selection. Files that are neither images nor PDFs
    /// are left out and returned.
    pub fn stage_files(&mut self, files: Vec<StagedFile>) -> Result<Vec<StagedFile>, WizardError> {
        self.editing_stage()?;
        let (accepted, rejected): (Vec<_>, Vec<_>) =
            files.into_iter().partition(StagedFile::is_accepted);
        for file in accepted.iter().filter(|f| f.exceeds_advisory_limit()) {
            warn!(name = %file.name, size = %file.display_size(), "file exceeds advisory size limit");
        }
        for file in &rejected {
            warn!(name = %file.name, content_type = %file.content_type, "unsupported file type skipped");
        }
        self.files = accepted;
        Ok(rejected)
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Enter `Submitting` and hand out the ticket for one attempt.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WizardError> {
        if self.editing_stage()? != Stage::Review {
            return Err(WizardError::NotOnReview);
        }
        let application = self.draft.validate().map_err(WizardError::Blocked)?;
        let ticket = SubmitTicket {
            id: Uuid::new_v4(),
            application,
            files: self.files.clone(),
        };
        self.phase = Phase::Submitting {
            ticket_id: ticket.id,
        };
        info!(ticket = %ticket.id, files = ticket.files.len(), "submission started");
        Ok(ticket)
    }

    /// Apply the outcome of the attempt identified by `ticket_id`. Outcomes of
    /// stale attempts (cancelled or superseded) are ignored and return false.
    pub fn finish_submit(&mut self, ticket_id: Uuid, outcome: Result<Receipt, String>) -> bool {
        match self.phase {
            Phase::Submitting { ticket_id: current } if current == ticket_id => {}
            _ => {
                warn!(ticket = %ticket_id, "ignoring outcome of stale submission");
                return false;
            }
        }
        match outcome {
            Ok(receipt) => {
                info!(ticket = %ticket_id, reference = %receipt.reference, "application submitted");
                self.draft = Draft::default();
                self.files.clear();
                self.phase = Phase::Submitted(receipt);
            }
            Err(message) => {
                warn!(ticket = %ticket_id, error = %message, "submission failed; back to review");
                self.phase = Phase::Editing {
                    stage: Stage::Review,
                    error: Some(message),
                };
            }
        }
        true
    }

    /// Abandon an in-flight submission and return to the review stage.
    pub fn cancel_submit(&mut self) -> bool {
        if let Phase::Submitting { ticket_id } = self.phase {
            info!(ticket = %ticket_id, "submission cancelled");
            self.phase = Phase::Editing {
                stage: Stage::Review,
                error: Some("Submission cancelled".to_string()),
            };
            return true;
        }
        false
    }

    /// Submit through `submitter`, giving up after `timeout`.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        submitter: &dyn ApplicationSubmitter,
        timeout: Duration,
    ) -> Result<&Receipt, WizardError> {
        let ticket = self.begin_submit()?;
        let outcome = match tokio::time::timeout(timeout, submitter.submit(&ticket)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => {
                error!(?err, ticket = %ticket.id, "submitter returned an error");
                Err(format!("{:#}", err))
            }
            Err(_) => Err(format!(
                "Submission timed out after {}ms",
                timeout.as_millis()
            )),
        };
        let failure = outcome.as_ref().err().cloned();
        self.finish_submit(ticket.id, outcome);
        match (&self.phase, failure) {
            (Phase::Submitted(receipt), _) => Ok(receipt),
            (_, Some(message)) => Err(WizardError::SubmitFailed(message)),
            _ => Err(WizardError::Busy),
        }
    }
}
