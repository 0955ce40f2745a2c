//! Declarative field schema and conditional requirement rules.
//!
//! Every required answer is listed once in [`FIELD_SPECS`] together with the step that owns it,
//! and every answer whose requirement depends on another answer is listed in
//! [`CONDITIONAL_RULES`]. Validation is a pure function of an [`AnswerSet`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::domain::{AnswerSet, FieldName, FieldValue, WizardStep};

/// Field-keyed validation messages surfaced beside each input.
pub type FieldErrors = BTreeMap<FieldName, String>;

/// Shape an answer must have before its step can be left forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Trimmed text of at least this many characters.
    MinChars(usize),
    /// At least this many ASCII digits anywhere in the text.
    MinDigits(usize),
    Email,
    /// Four-digit year between 1900 and 2099.
    Year,
    /// A choice was picked (or a select-style text field is non-empty).
    Selected,
    /// Checkbox must be ticked.
    Accepted,
    AttachmentPresent,
    Optional,
}

impl Constraint {
    pub fn is_satisfied(self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Constraint::Optional, _) => true,
            (Constraint::MinChars(min), FieldValue::Text(text)) => {
                text.trim().chars().count() >= min
            }
            (Constraint::MinDigits(min), FieldValue::Text(text)) => {
                text.chars().filter(char::is_ascii_digit).count() >= min
            }
            (Constraint::Email, FieldValue::Text(text)) => email_pattern().is_match(text.trim()),
            (Constraint::Year, FieldValue::Text(text)) => year_pattern().is_match(text.trim()),
            (Constraint::Selected, FieldValue::Text(text)) => !text.trim().is_empty(),
            (Constraint::Selected, FieldValue::Choice(choice)) => choice.is_some(),
            (Constraint::Accepted, FieldValue::Flag(flag)) => *flag,
            (Constraint::AttachmentPresent, FieldValue::Attachment(attachment)) => {
                attachment.is_some()
            }
            _ => false,
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(19|20)\d{2}$").expect("year pattern compiles"))
}

/// Unconditional requirement bound to one wizard step.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: FieldName,
    pub step: WizardStep,
    pub constraint: Constraint,
    pub message: &'static str,
}

const fn spec(
    field: FieldName,
    step: WizardStep,
    constraint: Constraint,
    message: &'static str,
) -> FieldSpec {
    FieldSpec {
        field,
        step,
        constraint,
        message,
    }
}

pub const FIELD_SPECS: &[FieldSpec] = &[
    spec(
        FieldName::HasPreRegistered,
        WizardStep::PreCheck,
        Constraint::Selected,
        "Please tell us if you pre-registered",
    ),
    spec(
        FieldName::IsLatinHonor,
        WizardStep::PreCheck,
        Constraint::Selected,
        "Please tell us if you are a Latin Honor candidate/graduate",
    ),
    spec(
        FieldName::FirstName,
        WizardStep::Personal,
        Constraint::MinChars(2),
        "First name must be at least 2 characters",
    ),
    spec(
        FieldName::LastName,
        WizardStep::Personal,
        Constraint::MinChars(2),
        "Last name must be at least 2 characters",
    ),
    spec(
        FieldName::Gender,
        WizardStep::Personal,
        Constraint::Selected,
        "Please select your gender",
    ),
    spec(
        FieldName::Email,
        WizardStep::Personal,
        Constraint::Email,
        "Invalid email address",
    ),
    spec(
        FieldName::Phone,
        WizardStep::Personal,
        Constraint::MinDigits(10),
        "Phone number must be at least 10 digits",
    ),
    spec(
        FieldName::Province,
        WizardStep::Personal,
        Constraint::MinChars(2),
        "Province is required",
    ),
    spec(
        FieldName::City,
        WizardStep::Personal,
        Constraint::MinChars(2),
        "City is required",
    ),
    spec(
        FieldName::School,
        WizardStep::Academic,
        Constraint::MinChars(2),
        "School is required",
    ),
    spec(
        FieldName::GraduationYear,
        WizardStep::Academic,
        Constraint::Year,
        "Please enter a valid graduation year",
    ),
    spec(
        FieldName::SelfDescription,
        WizardStep::Academic,
        Constraint::Selected,
        "Please select what best describes you",
    ),
    spec(
        FieldName::EmploymentStatus,
        WizardStep::Academic,
        Constraint::Selected,
        "Please select your employment status",
    ),
    spec(
        FieldName::IsExistingSubscriber,
        WizardStep::Academic,
        Constraint::Selected,
        "Please tell us if you are an existing subscriber",
    ),
    spec(
        FieldName::ExamType,
        WizardStep::Exam,
        Constraint::Selected,
        "Please select an exam type",
    ),
    spec(
        FieldName::TargetDate,
        WizardStep::Exam,
        Constraint::Selected,
        "Please select a target exam date",
    ),
    spec(
        FieldName::NextSitting,
        WizardStep::Exam,
        Constraint::Selected,
        "Please tell us if you are taking the next board exam",
    ),
    spec(
        FieldName::ExamineeType,
        WizardStep::Exam,
        Constraint::Selected,
        "Please select your examinee type",
    ),
    spec(
        FieldName::OtherReviewCenter,
        WizardStep::Exam,
        Constraint::Selected,
        "Please tell us if you enrolled in another review center",
    ),
    spec(
        FieldName::PaymentProof,
        WizardStep::Payment,
        Constraint::AttachmentPresent,
        "Proof of payment is required",
    ),
    spec(
        FieldName::Remarks,
        WizardStep::Payment,
        Constraint::Optional,
        "",
    ),
    spec(
        FieldName::AgreedToTerms,
        WizardStep::Payment,
        Constraint::Accepted,
        "You must agree to the terms",
    ),
];

/// How strictly an activated conditional field is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Blocks the owning step until satisfied.
    Required {
        constraint: Constraint,
        message: &'static str,
    },
    /// Shown and collected, never blocks.
    Collected,
}

/// "`field` applies when `when` equals `equals`."
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRule {
    pub when: FieldName,
    pub equals: &'static str,
    pub field: FieldName,
    pub step: WizardStep,
    pub enforcement: Enforcement,
}

impl ConditionalRule {
    pub fn is_active(&self, answers: &AnswerSet) -> bool {
        answers.value(self.when).choice_code() == Some(self.equals)
    }

    pub fn is_enforced(&self, answers: &AnswerSet) -> bool {
        matches!(self.enforcement, Enforcement::Required { .. }) && self.is_active(answers)
    }

    fn violation(&self, answers: &AnswerSet) -> Option<&'static str> {
        match self.enforcement {
            Enforcement::Required {
                constraint,
                message,
            } if self.is_active(answers) => {
                (!constraint.is_satisfied(&answers.value(self.field))).then_some(message)
            }
            _ => None,
        }
    }
}

pub const PRE_REGISTRATION_PROOF_MESSAGE: &str = "Proof is required if you pre-registered.";
pub const LATIN_HONOR_PROOF_MESSAGE: &str =
    "Proof is required if you are a Latin Honor candidate/graduate.";
pub const OTHER_REVIEW_CENTER_MESSAGE: &str = "Please enter the name of the other review center";

pub const CONDITIONAL_RULES: &[ConditionalRule] = &[
    ConditionalRule {
        when: FieldName::HasPreRegistered,
        equals: "yes",
        field: FieldName::PreRegistrationProof,
        step: WizardStep::PreCheck,
        enforcement: Enforcement::Required {
            constraint: Constraint::AttachmentPresent,
            message: PRE_REGISTRATION_PROOF_MESSAGE,
        },
    },
    ConditionalRule {
        when: FieldName::IsLatinHonor,
        equals: "yes",
        field: FieldName::LatinHonorProof,
        step: WizardStep::PreCheck,
        enforcement: Enforcement::Required {
            constraint: Constraint::AttachmentPresent,
            message: LATIN_HONOR_PROOF_MESSAGE,
        },
    },
    // Collected as typed; the subscriber email is never checked.
    ConditionalRule {
        when: FieldName::IsExistingSubscriber,
        equals: "yes",
        field: FieldName::ExistingSubscriberEmail,
        step: WizardStep::Academic,
        enforcement: Enforcement::Collected,
    },
    ConditionalRule {
        when: FieldName::OtherReviewCenter,
        equals: "yes",
        field: FieldName::OtherReviewCenterName,
        step: WizardStep::Exam,
        enforcement: Enforcement::Required {
            constraint: Constraint::MinChars(2),
            message: OTHER_REVIEW_CENTER_MESSAGE,
        },
    },
];

fn conditional_rule(field: FieldName) -> Option<&'static ConditionalRule> {
    CONDITIONAL_RULES.iter().find(|rule| rule.field == field)
}

fn field_spec(field: FieldName) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.field == field)
}

/// Step that displays and owns `field`.
pub fn step_of(field: FieldName) -> WizardStep {
    field_spec(field)
        .map(|spec| spec.step)
        .or_else(|| conditional_rule(field).map(|rule| rule.step))
        .unwrap_or(WizardStep::last())
}

/// Whether the current answers make `field` mandatory.
pub fn is_required(answers: &AnswerSet, field: FieldName) -> bool {
    match conditional_rule(field) {
        Some(rule) => rule.is_enforced(answers),
        None => field_spec(field)
            .map(|spec| spec.constraint != Constraint::Optional)
            .unwrap_or(false),
    }
}

/// Whether `field` applies at all; conditional fields apply only while their trigger holds.
pub fn is_applicable(answers: &AnswerSet, field: FieldName) -> bool {
    match conditional_rule(field) {
        Some(rule) => rule.is_active(answers),
        None => true,
    }
}

/// Fields rendered on `step`.
pub fn visible_fields(answers: &AnswerSet, step: WizardStep) -> Vec<FieldName> {
    FieldName::ALL
        .iter()
        .copied()
        .filter(|field| step_of(*field) == step && is_applicable(answers, *field))
        .collect()
}

/// Error message for `field` under the current answers, if any.
pub fn validate_field(answers: &AnswerSet, field: FieldName) -> Option<String> {
    if let Some(rule) = conditional_rule(field) {
        return rule.violation(answers).map(str::to_string);
    }

    let spec = field_spec(field)?;
    (!spec.constraint.is_satisfied(&answers.value(field))).then(|| spec.message.to_string())
}

/// Errors for the fields owned by `step` only.
pub fn validate_step(answers: &AnswerSet, step: WizardStep) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for spec in FIELD_SPECS.iter().filter(|spec| spec.step == step) {
        if !spec.constraint.is_satisfied(&answers.value(spec.field)) {
            errors.insert(spec.field, spec.message.to_string());
        }
    }

    for rule in CONDITIONAL_RULES.iter().filter(|rule| rule.step == step) {
        if let Some(message) = rule.violation(answers) {
            errors.insert(rule.field, message.to_string());
        }
    }

    errors
}

/// Errors across every step, as checked before submission.
pub fn validate_all(answers: &AnswerSet) -> FieldErrors {
    WizardStep::ALL
        .iter()
        .flat_map(|step| validate_step(answers, *step))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::registration::domain::{Attachment, YesNo};

    #[test]
    fn every_field_is_declared_exactly_once() {
        for field in FieldName::ALL {
            let declared = FIELD_SPECS.iter().filter(|spec| spec.field == field).count()
                + CONDITIONAL_RULES
                    .iter()
                    .filter(|rule| rule.field == field)
                    .count();
            assert_eq!(declared, 1, "{field} declared {declared} times");
        }
    }

    #[test]
    fn conditional_rules_trigger_on_same_step_or_earlier() {
        for rule in CONDITIONAL_RULES {
            assert!(step_of(rule.when) <= rule.step, "{} triggers late", rule.field);
        }
    }

    #[test]
    fn email_constraint_requires_domain_with_dot() {
        let check = |raw: &str| Constraint::Email.is_satisfied(&FieldValue::Text(raw));
        assert!(check("maria@example.com"));
        assert!(check("  juan.cruz@up.edu.ph "));
        assert!(!check("maria@example"));
        assert!(!check("maria example@x.com"));
        assert!(!check(""));
    }

    #[test]
    fn phone_constraint_counts_digits() {
        let check = |raw: &str| Constraint::MinDigits(10).is_satisfied(&FieldValue::Text(raw));
        assert!(check("+63 917 123 4567"));
        assert!(check("09171234567"));
        assert!(!check("0917-123"));
        assert!(!check("phone number"));
    }

    #[test]
    fn year_constraint_accepts_four_digit_years() {
        let check = |raw: &str| Constraint::Year.is_satisfied(&FieldValue::Text(raw));
        assert!(check("2024"));
        assert!(!check("24"));
        assert!(!check("3024"));
    }

    #[test]
    fn subscriber_email_is_collected_but_never_required() {
        let answers = AnswerSet {
            is_existing_subscriber: Some(YesNo::Yes),
            ..AnswerSet::default()
        };

        assert!(visible_fields(&answers, WizardStep::Academic)
            .contains(&FieldName::ExistingSubscriberEmail));
        assert!(!is_required(&answers, FieldName::ExistingSubscriberEmail));
        assert!(validate_field(&answers, FieldName::ExistingSubscriberEmail).is_none());
    }

    #[test]
    fn inactive_conditional_fields_are_hidden() {
        let answers = AnswerSet {
            has_pre_registered: Some(YesNo::No),
            ..AnswerSet::default()
        };

        let visible = visible_fields(&answers, WizardStep::PreCheck);
        assert_eq!(
            visible,
            vec![FieldName::HasPreRegistered, FieldName::IsLatinHonor]
        );
    }

    #[test]
    fn latin_honor_proof_satisfies_rule() {
        let mut answers = AnswerSet {
            has_pre_registered: Some(YesNo::No),
            is_latin_honor: Some(YesNo::Yes),
            ..AnswerSet::default()
        };
        assert_eq!(
            validate_step(&answers, WizardStep::PreCheck)
                .get(&FieldName::LatinHonorProof)
                .map(String::as_str),
            Some(LATIN_HONOR_PROOF_MESSAGE)
        );

        answers.latin_honor_proof =
            Some(Attachment::new("diploma.pdf", "application/pdf", vec![7]).expect("valid"));
        assert!(validate_step(&answers, WizardStep::PreCheck).is_empty());
    }
}
