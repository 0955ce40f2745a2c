use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{AnswerSet, FieldName, WizardStep};
use super::payload::SubmissionPayload;
use super::pricing::{quote_for, PriceQuote};
use super::review::{self, ReviewSection, StepIndicator};
use super::schema::{self, FieldErrors};
use super::sink::{SinkError, SubmissionSink};

/// Transient state of the final network send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast surfaced to the applicant once a submission settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn submitted() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Registration Submitted!".to_string(),
            description: "We've received your details. Someone will reach out shortly."
                .to_string(),
        }
    }

    pub fn submission_failed() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Submission Failed".to_string(),
            description:
                "We couldn't send your registration. Your answers are saved, please try again."
                    .to_string(),
        }
    }
}

/// Result of a settled send.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Delivered {
        notification: Notification,
    },
    Failed {
        notification: Notification,
        error: SinkError,
    },
}

impl SubmissionOutcome {
    pub fn notification(&self) -> &Notification {
        match self {
            SubmissionOutcome::Delivered { notification }
            | SubmissionOutcome::Failed { notification, .. } => notification,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered { .. })
    }
}

/// Rejected wizard actions. State is left as described on each variant.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Step unchanged; the wizard's error map now holds `errors`.
    #[error("{step} has {} field(s) that need attention", .errors.len())]
    StepIncomplete {
        step: WizardStep,
        errors: FieldErrors,
    },
    #[error("cannot jump ahead to {requested} from {current}")]
    StepLocked {
        requested: WizardStep,
        current: WizardStep,
    },
    #[error("registration can only be submitted from the {} step", WizardStep::last())]
    NotAtFinalStep { current: WizardStep },
    /// Step unchanged; the wizard's error map now holds `errors`.
    #[error("registration has {} field(s) that need attention", .errors.len())]
    Incomplete { errors: FieldErrors },
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("no submission is in progress")]
    NoSubmissionInFlight,
}

/// Single-session pre-registration wizard: current step, answers, field errors and send status.
#[derive(Debug, Clone, Default)]
pub struct RegistrationWizard {
    step: WizardStep,
    answers: AnswerSet,
    errors: FieldErrors,
    status: SubmissionStatus,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Apply a field edit. Fields already showing an error are re-checked and cleared once valid.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut AnswerSet),
    {
        edit(&mut self.answers);

        let answers = &self.answers;
        self.errors
            .retain(|field, _| schema::validate_field(answers, *field).is_some());
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let errors = schema::validate_step(&self.answers, self.step);
        if !errors.is_empty() {
            warn!(
                step = self.step.code(),
                invalid_fields = errors.len(),
                "step advance rejected"
            );
            self.errors = errors.clone();
            return Err(WizardError::StepIncomplete {
                step: self.step,
                errors,
            });
        }

        self.errors.clear();
        let from = self.step;
        self.step = self.step.next();
        debug!(from = from.code(), to = self.step.code(), "wizard advanced");
        Ok(self.step)
    }

    /// Step back without validation; answers are kept.
    pub fn retreat(&mut self) -> WizardStep {
        self.errors.clear();
        self.step = self.step.previous();
        self.step
    }

    /// Return to an already-visited step, e.g. from a review "Edit" link.
    pub fn jump_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        if step > self.step {
            return Err(WizardError::StepLocked {
                requested: step,
                current: self.step,
            });
        }

        if step != self.step {
            self.errors.clear();
            self.step = step;
        }
        Ok(self.step)
    }

    pub fn quote(&self) -> Option<PriceQuote> {
        quote_for(&self.answers)
    }

    pub fn visible_fields(&self) -> Vec<FieldName> {
        schema::visible_fields(&self.answers, self.step)
    }

    pub fn review(&self) -> Vec<ReviewSection> {
        review::summarize(&self.answers)
    }

    pub fn stepper(&self) -> Vec<StepIndicator> {
        review::stepper(self.step)
    }

    pub fn progress_percent(&self) -> u8 {
        review::progress_percent(self.step)
    }

    /// Validate everything and package the payload, entering `Submitting`.
    ///
    /// Rejected without side effects while another submission is outstanding.
    pub fn begin_submission(
        &mut self,
        submitted_at: DateTime<Local>,
    ) -> Result<SubmissionPayload, WizardError> {
        if self.status == SubmissionStatus::Submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        if !self.step.is_final() {
            return Err(WizardError::NotAtFinalStep { current: self.step });
        }

        let errors = schema::validate_all(&self.answers);
        if !errors.is_empty() {
            warn!(
                invalid_fields = errors.len(),
                "submission rejected by validation"
            );
            self.errors = errors.clone();
            return Err(WizardError::Incomplete { errors });
        }

        self.errors.clear();
        self.status = SubmissionStatus::Submitting;
        Ok(SubmissionPayload::package(&self.answers, submitted_at))
    }

    /// Apply the transport outcome of the outstanding submission.
    pub fn finish_submission(
        &mut self,
        result: Result<(), SinkError>,
    ) -> Result<SubmissionOutcome, WizardError> {
        if self.status != SubmissionStatus::Submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }

        match result {
            Ok(()) => {
                info!("registration submitted");
                *self = Self {
                    status: SubmissionStatus::Succeeded,
                    ..Self::default()
                };
                Ok(SubmissionOutcome::Delivered {
                    notification: Notification::submitted(),
                })
            }
            Err(error) => {
                warn!(%error, "registration submission failed");
                self.status = SubmissionStatus::Failed;
                Ok(SubmissionOutcome::Failed {
                    notification: Notification::submission_failed(),
                    error,
                })
            }
        }
    }

    /// Validate, package, deliver through `sink`, then settle.
    pub async fn submit<S>(
        &mut self,
        sink: &S,
        submitted_at: DateTime<Local>,
    ) -> Result<SubmissionOutcome, WizardError>
    where
        S: SubmissionSink + ?Sized,
    {
        let payload = self.begin_submission(submitted_at)?;
        let result = sink.deliver(&payload).await;
        self.finish_submission(result)
    }
}
