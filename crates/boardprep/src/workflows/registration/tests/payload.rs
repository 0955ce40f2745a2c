use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use super::common::*;

use crate::workflows::registration::domain::{FieldName, YesNo};
use crate::workflows::registration::payload::{
    PayloadValue, SubmissionPayload, AMOUNT_DUE_LABEL, MISSING, NOT_APPLICABLE,
    PRICE_LABEL_LABEL, TIMESTAMP_LABEL,
};

fn text<'a>(payload: &'a SubmissionPayload, label: &str) -> &'a str {
    payload
        .get(label)
        .and_then(PayloadValue::as_text)
        .unwrap_or_else(|| panic!("expected text under '{label}'"))
}

#[test]
fn package_carries_every_field_plus_bookkeeping_columns() {
    let payload = SubmissionPayload::package(&complete_answers(), submitted_at());

    assert_eq!(payload.len(), FieldName::ALL.len() + 3);
    assert_eq!(text(&payload, "First Name"), "Maria");
    assert_eq!(text(&payload, "Licensure Exam"), "Veterinary Medicine (VET)");
    assert_eq!(text(&payload, "Agreed to Terms"), "Yes");
    assert_eq!(text(&payload, TIMESTAMP_LABEL), "3/14/2025, 3:09:26 PM");
    assert_eq!(text(&payload, AMOUNT_DUE_LABEL), "9,999");
    assert_eq!(text(&payload, PRICE_LABEL_LABEL), "regular price");
}

#[test]
fn attachments_are_base64_encoded_with_their_media_type() {
    let payload = SubmissionPayload::package(&complete_answers(), submitted_at());

    let encoded = payload
        .field(FieldName::PaymentProof)
        .and_then(PayloadValue::as_attachment)
        .expect("payment proof attached");
    assert_eq!(encoded.file_name, "gcash-receipt.png");
    assert_eq!(encoded.mime_type, "image/png");
    assert_eq!(
        general_purpose::STANDARD
            .decode(&encoded.data)
            .expect("valid base64"),
        receipt().bytes()
    );
    assert_eq!(payload.attachment_count(), 1);
}

#[test]
fn untriggered_conditional_fields_are_not_applicable() {
    let payload = SubmissionPayload::package(&complete_answers(), submitted_at());

    for field in [
        FieldName::PreRegistrationProof,
        FieldName::LatinHonorProof,
        FieldName::ExistingSubscriberEmail,
        FieldName::OtherReviewCenterName,
    ] {
        assert_eq!(text(&payload, field.label()), NOT_APPLICABLE, "{field}");
    }
}

#[test]
fn triggered_proofs_without_files_are_missing() {
    let mut answers = complete_answers();
    answers.has_pre_registered = Some(YesNo::Yes);
    answers.is_latin_honor = Some(YesNo::Yes);
    answers.latin_honor_proof = Some(honors_certificate());

    let payload = SubmissionPayload::package(&answers, submitted_at());

    assert_eq!(text(&payload, "Pre-Registration Proof"), MISSING);
    assert!(payload
        .field(FieldName::LatinHonorProof)
        .and_then(PayloadValue::as_attachment)
        .is_some());
    assert_eq!(text(&payload, AMOUNT_DUE_LABEL), "4,749");
    assert_eq!(text(&payload, PRICE_LABEL_LABEL), "50% discount");
}

#[test]
fn switching_back_to_no_drops_a_stale_proof() {
    let mut answers = complete_answers();
    answers.has_pre_registered = Some(YesNo::No);
    answers.pre_registration_proof = Some(reservation_slip());
    answers.is_latin_honor = Some(YesNo::No);
    answers.latin_honor_proof = Some(honors_certificate());

    let payload = SubmissionPayload::package(&answers, submitted_at());

    assert_eq!(text(&payload, "Pre-Registration Proof"), NOT_APPLICABLE);
    assert_eq!(text(&payload, "Latin Honor Proof"), NOT_APPLICABLE);
    assert_eq!(payload.attachment_count(), 1);
    assert_eq!(text(&payload, AMOUNT_DUE_LABEL), "9,999");
}

#[test]
fn triggered_text_fields_carry_their_answers() {
    let mut answers = complete_answers();
    answers.other_review_center = Some(YesNo::Yes);
    answers.other_review_center_name = "Acme Review Hub".to_string();
    answers.is_existing_subscriber = Some(YesNo::Yes);
    answers.existing_subscriber_email = "maria@old-account.ph".to_string();

    let payload = SubmissionPayload::package(&answers, submitted_at());

    assert_eq!(text(&payload, "Other Review Center Name"), "Acme Review Hub");
    assert_eq!(text(&payload, "Subscriber Email"), "maria@old-account.ph");
}

#[test]
fn amount_is_not_applicable_without_an_exam() {
    let mut answers = complete_answers();
    answers.exam_type = None;

    let payload = SubmissionPayload::package(&answers, submitted_at());

    assert_eq!(text(&payload, AMOUNT_DUE_LABEL), NOT_APPLICABLE);
    assert_eq!(text(&payload, PRICE_LABEL_LABEL), NOT_APPLICABLE);
}

#[test]
fn body_is_a_flat_json_object_keyed_by_label() {
    let payload = SubmissionPayload::package(&complete_answers(), submitted_at());

    let body = payload.to_body().expect("serializes");
    let parsed: Value = serde_json::from_str(&body).expect("body is json");

    let object = parsed.as_object().expect("flat object");
    assert_eq!(object.len(), payload.len());
    assert_eq!(object["Last Name"], "Santos");
    assert_eq!(object["Proof of Payment"]["fileName"], "gcash-receipt.png");
    assert_eq!(object["Proof of Payment"]["mimeType"], "image/png");
    assert_eq!(object["Latin Honor Proof"], NOT_APPLICABLE);
}
