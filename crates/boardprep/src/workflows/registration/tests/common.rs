use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use crate::workflows::registration::domain::{
    AnswerSet, Attachment, ExamType, ExamineeType, SittingIntent, TargetCohort, YesNo,
};
use crate::workflows::registration::payload::SubmissionPayload;
use crate::workflows::registration::sink::{SinkError, SubmissionSink};
use crate::workflows::registration::wizard::RegistrationWizard;
use crate::workflows::registration::WizardStep;

pub(super) fn receipt() -> Attachment {
    Attachment::new("gcash-receipt.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .expect("valid receipt")
}

pub(super) fn reservation_slip() -> Attachment {
    Attachment::new("reservation.pdf", "application/pdf", b"%PDF-1.7".to_vec())
        .expect("valid reservation slip")
}

pub(super) fn honors_certificate() -> Attachment {
    Attachment::new("cum-laude.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff])
        .expect("valid certificate")
}

pub(super) fn submitted_at() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .single()
        .expect("unambiguous local time")
}

pub(super) fn fill_pre_check(answers: &mut AnswerSet) {
    answers.has_pre_registered = Some(YesNo::No);
    answers.is_latin_honor = Some(YesNo::No);
}

pub(super) fn fill_personal(answers: &mut AnswerSet) {
    answers.first_name = "Maria".to_string();
    answers.last_name = "Santos".to_string();
    answers.gender = "Female".to_string();
    answers.email = "maria.santos@example.com".to_string();
    answers.phone = "+63 917 555 0123".to_string();
    answers.province = "Laguna".to_string();
    answers.city = "Los Baños".to_string();
}

pub(super) fn fill_academic(answers: &mut AnswerSet) {
    answers.school = "University of the Philippines Los Baños".to_string();
    answers.graduation_year = "2024".to_string();
    answers.self_description = "Fresh graduate".to_string();
    answers.employment_status = "Unemployed".to_string();
    answers.is_existing_subscriber = Some(YesNo::No);
}

pub(super) fn fill_exam(answers: &mut AnswerSet) {
    answers.exam_type = Some(ExamType::Veterinary);
    answers.target_date = Some(TargetCohort::August2026);
    answers.next_sitting = Some(SittingIntent::Yes);
    answers.examinee_type = Some(ExamineeType::FirstTimer);
    answers.other_review_center = Some(YesNo::No);
}

pub(super) fn fill_payment(answers: &mut AnswerSet) {
    answers.payment_proof = Some(receipt());
    answers.agreed_to_terms = true;
}

pub(super) fn complete_answers() -> AnswerSet {
    let mut answers = AnswerSet::default();
    fill_pre_check(&mut answers);
    fill_personal(&mut answers);
    fill_academic(&mut answers);
    fill_exam(&mut answers);
    fill_payment(&mut answers);
    answers
}

/// Wizard filled out and walked to the final step.
pub(super) fn wizard_at_payment() -> RegistrationWizard {
    let mut wizard = RegistrationWizard::new();
    wizard.update(|answers| *answers = complete_answers());
    while wizard.step() != WizardStep::Payment {
        wizard.advance().expect("complete answers advance");
    }
    wizard
}

#[derive(Default, Clone)]
pub(super) struct RecordingSink {
    deliveries: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl RecordingSink {
    pub(super) fn deliveries(&self) -> Vec<SubmissionPayload> {
        self.deliveries.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        self.deliveries
            .lock()
            .expect("sink mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct OfflineSink {
    attempts: AtomicUsize,
}

impl OfflineSink {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionSink for OfflineSink {
    async fn deliver(&self, _payload: &SubmissionPayload) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Transport("network unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
