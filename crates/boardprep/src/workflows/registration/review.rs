use serde::Serialize;

use super::domain::{AnswerSet, FieldName, WizardStep};
use super::pricing::quote_for;
use super::schema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub label: &'static str,
    pub value: String,
}

/// One block of the final review screen; `edit_step` is the target of its "Edit" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub title: &'static str,
    pub edit_step: WizardStep,
    pub entries: Vec<ReviewEntry>,
}

fn entry(label: &'static str, value: impl Into<String>) -> ReviewEntry {
    ReviewEntry {
        label,
        value: value.into(),
    }
}

fn field_entries(answers: &AnswerSet, fields: &[FieldName]) -> Vec<ReviewEntry> {
    fields
        .iter()
        .filter(|field| schema::is_applicable(answers, **field))
        .map(|field| entry(field.label(), answers.value(*field).display()))
        .collect()
}

pub fn summarize(answers: &AnswerSet) -> Vec<ReviewSection> {
    let mut personal = vec![entry("Full Name", answers.full_name())];
    personal.extend(field_entries(
        answers,
        &[FieldName::Email, FieldName::Phone, FieldName::Gender],
    ));
    personal.push(entry(
        "Location",
        format!("{}, {}", answers.city.trim(), answers.province.trim())
            .trim_matches(|c: char| c == ',' || c.is_whitespace())
            .to_string(),
    ));

    let amount_due = quote_for(answers)
        .map(|quote| quote.display())
        .unwrap_or_else(|| "Select an exam to see pricing".to_string());
    let mut payment = vec![entry("Amount Due", amount_due)];
    payment.extend(field_entries(
        answers,
        &[FieldName::PaymentProof, FieldName::Remarks],
    ));

    vec![
        ReviewSection {
            title: "Pre-Check",
            edit_step: WizardStep::PreCheck,
            entries: field_entries(
                answers,
                &[
                    FieldName::HasPreRegistered,
                    FieldName::PreRegistrationProof,
                    FieldName::IsLatinHonor,
                    FieldName::LatinHonorProof,
                ],
            ),
        },
        ReviewSection {
            title: "Personal Information",
            edit_step: WizardStep::Personal,
            entries: personal,
        },
        ReviewSection {
            title: "Academic Background",
            edit_step: WizardStep::Academic,
            entries: field_entries(
                answers,
                &[
                    FieldName::School,
                    FieldName::GraduationYear,
                    FieldName::SelfDescription,
                    FieldName::EmploymentStatus,
                    FieldName::IsExistingSubscriber,
                    FieldName::ExistingSubscriberEmail,
                ],
            ),
        },
        ReviewSection {
            title: "Exam Details",
            edit_step: WizardStep::Exam,
            entries: field_entries(
                answers,
                &[
                    FieldName::ExamType,
                    FieldName::TargetDate,
                    FieldName::NextSitting,
                    FieldName::ExamineeType,
                    FieldName::OtherReviewCenter,
                    FieldName::OtherReviewCenterName,
                ],
            ),
        },
        ReviewSection {
            title: "Payment",
            edit_step: WizardStep::Payment,
            entries: payment,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub step: WizardStep,
    pub label: &'static str,
    pub state: StepState,
}

impl StepIndicator {
    /// Completed steps double as jump targets.
    pub fn is_clickable(&self) -> bool {
        self.state == StepState::Completed
    }
}

pub fn stepper(current: WizardStep) -> Vec<StepIndicator> {
    WizardStep::ALL
        .iter()
        .map(|step| StepIndicator {
            step: *step,
            label: step.label(),
            state: match step.cmp(&current) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Upcoming,
            },
        })
        .collect()
}

/// Fill of the progress bar between the first and last step markers.
pub fn progress_percent(current: WizardStep) -> u8 {
    let span = WizardStep::ALL.len().saturating_sub(1).max(1);
    ((current.index() * 100) / span) as u8
}
