//! Pre-registration wizard for the review program.
//!
//! The wizard collects an applicant's answers over a fixed sequence of steps, gates each
//! forward move on that step's schema, conditionally requires proof documents, prices the
//! selected program, and packages the answers for the external spreadsheet sink. Wizard state is
//! a plain owned value; the HTTP router only exposes the pure checks and a relay to the sink.

pub mod catalog;
pub mod domain;
pub mod payload;
pub mod pricing;
pub mod review;
pub mod router;
pub mod schema;
pub mod sink;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use catalog::RegistrationCatalog;
pub use domain::{
    AnswerSet, Attachment, AttachmentError, Choice, EncodedAttachment, ExamType, ExamineeType,
    FieldName, SittingIntent, TargetCohort, WizardStep, YesNo,
};
pub use payload::{PayloadValue, SubmissionPayload, MISSING, NOT_APPLICABLE};
pub use pricing::{quote, quote_for, quote_from_codes, PriceLabel, PriceQuote, QuoteError};
pub use review::{ReviewSection, StepIndicator, StepState};
pub use router::registration_router;
pub use schema::FieldErrors;
pub use sink::{HttpSubmissionSink, SinkError, SinkMode, SubmissionSink, UnconfiguredSink};
pub use wizard::{
    Notification, NotificationKind, RegistrationWizard, SubmissionOutcome, SubmissionStatus,
    WizardError,
};
