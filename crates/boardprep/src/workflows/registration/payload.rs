use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::domain::{AnswerSet, EncodedAttachment, FieldName, FieldValue};
use super::pricing::{group_thousands, quote_for};
use super::schema;

/// Sentinel for an answer the conditional policy did not ask for.
pub const NOT_APPLICABLE: &str = "N/A";
/// Sentinel for a required answer that is absent. Submission blocks this; the payload still
/// distinguishes it for downstream auditing.
pub const MISSING: &str = "MISSING";

pub const TIMESTAMP_LABEL: &str = "Timestamp";
pub const AMOUNT_DUE_LABEL: &str = "Amount Due";
pub const PRICE_LABEL_LABEL: &str = "Price Label";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    Attachment(EncodedAttachment),
}

impl PayloadValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(text) => Some(text),
            PayloadValue::Attachment(_) => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&EncodedAttachment> {
        match self {
            PayloadValue::Attachment(encoded) => Some(encoded),
            PayloadValue::Text(_) => None,
        }
    }
}

/// Flat label-to-value mapping forwarded to the spreadsheet sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: BTreeMap<String, PayloadValue>,
}

impl SubmissionPayload {
    pub fn package(answers: &AnswerSet, submitted_at: DateTime<Local>) -> Self {
        let mut fields = BTreeMap::new();

        for field in FieldName::ALL {
            fields.insert(field.label().to_string(), package_field(answers, field));
        }

        let (amount, price_label) = match quote_for(answers) {
            Some(quote) => (
                group_thousands(quote.amount),
                quote.label.text().to_string(),
            ),
            None => (NOT_APPLICABLE.to_string(), NOT_APPLICABLE.to_string()),
        };
        fields.insert(AMOUNT_DUE_LABEL.to_string(), PayloadValue::Text(amount));
        fields.insert(
            PRICE_LABEL_LABEL.to_string(),
            PayloadValue::Text(price_label),
        );
        fields.insert(
            TIMESTAMP_LABEL.to_string(),
            PayloadValue::Text(submitted_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()),
        );

        Self { fields }
    }

    pub fn get(&self, label: &str) -> Option<&PayloadValue> {
        self.fields.get(label)
    }

    pub fn field(&self, field: FieldName) -> Option<&PayloadValue> {
        self.get(field.label())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields
            .iter()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn attachment_count(&self) -> usize {
        self.fields
            .values()
            .filter(|value| value.as_attachment().is_some())
            .count()
    }

    /// JSON body sent as `text/plain`.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn package_field(answers: &AnswerSet, field: FieldName) -> PayloadValue {
    // Inactive conditional fields are N/A even if an upload or answer lingers from earlier.
    if !schema::is_applicable(answers, field) {
        return PayloadValue::Text(NOT_APPLICABLE.to_string());
    }
    match answers.value(field) {
        FieldValue::Attachment(Some(attachment)) => PayloadValue::Attachment(attachment.encode()),
        FieldValue::Attachment(None) if schema::is_required(answers, field) => {
            PayloadValue::Text(MISSING.to_string())
        }
        FieldValue::Attachment(None) => PayloadValue::Text(NOT_APPLICABLE.to_string()),
        value => PayloadValue::Text(value.display()),
    }
}
