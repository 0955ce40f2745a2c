use std::fmt;

use base64::{engine::general_purpose, Engine};
use mime::Mime;
use serde::{Deserialize, Serialize};

/// Ordered steps of the pre-registration wizard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    PreCheck,
    Personal,
    Academic,
    Exam,
    Payment,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::PreCheck,
        WizardStep::Personal,
        WizardStep::Academic,
        WizardStep::Exam,
        WizardStep::Payment,
    ];

    pub const fn first() -> Self {
        WizardStep::PreCheck
    }

    pub const fn last() -> Self {
        WizardStep::Payment
    }

    pub const fn index(self) -> usize {
        match self {
            WizardStep::PreCheck => 0,
            WizardStep::Personal => 1,
            WizardStep::Academic => 2,
            WizardStep::Exam => 3,
            WizardStep::Payment => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Following step, clamped to the final step.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }

    /// Preceding step, clamped to the first step.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(self)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, WizardStep::Payment)
    }

    pub const fn code(self) -> &'static str {
        match self {
            WizardStep::PreCheck => "pre_check",
            WizardStep::Personal => "personal",
            WizardStep::Academic => "academic",
            WizardStep::Exam => "exam",
            WizardStep::Payment => "payment",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::PreCheck => "Pre-Check",
            WizardStep::Personal => "Personal Details",
            WizardStep::Academic => "Academic Background",
            WizardStep::Exam => "Exam Selection",
            WizardStep::Payment => "Payment & Review",
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|step| {
                step.code().eq_ignore_ascii_case(raw) || step.code().replace('_', "-") == raw
            })
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of answers offered through a select or radio group.
pub trait Choice: Copy + Sized + 'static {
    const OPTIONS: &'static [Self];

    /// Stable wire value submitted by the form.
    fn code(self) -> &'static str;

    /// Human-readable label shown in the review screen and the outbound payload.
    fn label(self) -> &'static str;

    fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|option| option.code().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const OPTIONS: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn code(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }

    fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// Licensure exams covered by the review program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "vet")]
    Veterinary,
    #[serde(rename = "food-tech")]
    FoodTechnology,
    #[serde(rename = "fisheries")]
    Fisheries,
    #[serde(rename = "abe")]
    AgriculturalBiosystems,
}

impl Choice for ExamType {
    const OPTIONS: &'static [Self] = &[
        ExamType::Veterinary,
        ExamType::FoodTechnology,
        ExamType::Fisheries,
        ExamType::AgriculturalBiosystems,
    ];

    fn code(self) -> &'static str {
        match self {
            ExamType::Veterinary => "vet",
            ExamType::FoodTechnology => "food-tech",
            ExamType::Fisheries => "fisheries",
            ExamType::AgriculturalBiosystems => "abe",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExamType::Veterinary => "Veterinary Medicine (VET)",
            ExamType::FoodTechnology => "Food Technology (FTLE)",
            ExamType::Fisheries => "Fisheries Professional",
            ExamType::AgriculturalBiosystems => "Agricultural and Biosystems Engineering (ABE)",
        }
    }
}

/// Board exam cohorts currently open for pre-registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetCohort {
    #[serde(rename = "august-2025")]
    August2025,
    #[serde(rename = "february-2026")]
    February2026,
    #[serde(rename = "august-2026")]
    August2026,
}

impl Choice for TargetCohort {
    const OPTIONS: &'static [Self] = &[
        TargetCohort::August2025,
        TargetCohort::February2026,
        TargetCohort::August2026,
    ];

    fn code(self) -> &'static str {
        match self {
            TargetCohort::August2025 => "august-2025",
            TargetCohort::February2026 => "february-2026",
            TargetCohort::August2026 => "august-2026",
        }
    }

    fn label(self) -> &'static str {
        match self {
            TargetCohort::August2025 => "August 2025",
            TargetCohort::February2026 => "February 2026",
            TargetCohort::August2026 => "August 2026",
        }
    }
}

/// Whether the applicant intends to sit for the next scheduled board exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SittingIntent {
    Yes,
    No,
    Undecided,
}

impl Choice for SittingIntent {
    const OPTIONS: &'static [Self] = &[
        SittingIntent::Yes,
        SittingIntent::No,
        SittingIntent::Undecided,
    ];

    fn code(self) -> &'static str {
        match self {
            SittingIntent::Yes => "yes",
            SittingIntent::No => "no",
            SittingIntent::Undecided => "undecided",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SittingIntent::Yes => "Yes",
            SittingIntent::No => "No",
            SittingIntent::Undecided => "Undecided",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamineeType {
    #[serde(rename = "first-timer")]
    FirstTimer,
    #[serde(rename = "retaker")]
    Retaker,
    #[serde(rename = "refresher")]
    Refresher,
}

impl Choice for ExamineeType {
    const OPTIONS: &'static [Self] = &[
        ExamineeType::FirstTimer,
        ExamineeType::Retaker,
        ExamineeType::Refresher,
    ];

    fn code(self) -> &'static str {
        match self {
            ExamineeType::FirstTimer => "first-timer",
            ExamineeType::Retaker => "retaker",
            ExamineeType::Refresher => "refresher",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExamineeType::FirstTimer => "First-timer",
            ExamineeType::Retaker => "Retaker",
            ExamineeType::Refresher => "Refresher",
        }
    }
}

/// Upload rejected before it reaches the answer set.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("attachment is missing a file name")]
    MissingFileName,
    #[error("attachment '{0}' is empty")]
    Empty(String),
    #[error("unrecognized media type '{0}'")]
    UnparsableMediaType(String),
    #[error("media type '{0}' is not accepted; upload an image or a PDF")]
    UnsupportedMediaType(String),
    #[error("attachment data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

/// Uploaded proof document (image or PDF) held in memory until submission.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedAttachment", into = "EncodedAttachment")]
pub struct Attachment {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(AttachmentError::MissingFileName);
        }

        let parsed: Mime = media_type
            .trim()
            .parse()
            .map_err(|_| AttachmentError::UnparsableMediaType(media_type.to_string()))?;
        let accepted = parsed.type_() == mime::IMAGE
            || (parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::PDF);
        if !accepted {
            return Err(AttachmentError::UnsupportedMediaType(
                parsed.essence_str().to_string(),
            ));
        }

        if bytes.is_empty() {
            return Err(AttachmentError::Empty(file_name));
        }

        Ok(Self {
            file_name,
            media_type: parsed.essence_str().to_string(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Transport-safe representation used by the outbound payload.
    pub fn encode(&self) -> EncodedAttachment {
        EncodedAttachment {
            file_name: self.file_name.clone(),
            mime_type: self.media_type.clone(),
            data: general_purpose::STANDARD.encode(&self.bytes),
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Base64 form of an attachment paired with its media type and original name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: String,
}

impl TryFrom<EncodedAttachment> for Attachment {
    type Error = AttachmentError;

    fn try_from(value: EncodedAttachment) -> Result<Self, Self::Error> {
        let bytes = general_purpose::STANDARD.decode(value.data.trim())?;
        Attachment::new(value.file_name, &value.mime_type, bytes)
    }
}

impl From<Attachment> for EncodedAttachment {
    fn from(value: Attachment) -> Self {
        value.encode()
    }
}

/// Every answer collected by the wizard, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    HasPreRegistered,
    PreRegistrationProof,
    IsLatinHonor,
    LatinHonorProof,
    FirstName,
    LastName,
    Gender,
    Email,
    Phone,
    Province,
    City,
    School,
    GraduationYear,
    SelfDescription,
    EmploymentStatus,
    IsExistingSubscriber,
    ExistingSubscriberEmail,
    ExamType,
    TargetDate,
    NextSitting,
    ExamineeType,
    OtherReviewCenter,
    OtherReviewCenterName,
    PaymentProof,
    Remarks,
    AgreedToTerms,
}

impl FieldName {
    pub const ALL: [FieldName; 26] = [
        FieldName::HasPreRegistered,
        FieldName::PreRegistrationProof,
        FieldName::IsLatinHonor,
        FieldName::LatinHonorProof,
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Gender,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Province,
        FieldName::City,
        FieldName::School,
        FieldName::GraduationYear,
        FieldName::SelfDescription,
        FieldName::EmploymentStatus,
        FieldName::IsExistingSubscriber,
        FieldName::ExistingSubscriberEmail,
        FieldName::ExamType,
        FieldName::TargetDate,
        FieldName::NextSitting,
        FieldName::ExamineeType,
        FieldName::OtherReviewCenter,
        FieldName::OtherReviewCenterName,
        FieldName::PaymentProof,
        FieldName::Remarks,
        FieldName::AgreedToTerms,
    ];

    /// Form key, matching the camelCase names used on the wire.
    pub const fn key(self) -> &'static str {
        match self {
            FieldName::HasPreRegistered => "hasPreRegistered",
            FieldName::PreRegistrationProof => "preRegistrationProof",
            FieldName::IsLatinHonor => "isLatinHonor",
            FieldName::LatinHonorProof => "latinHonorProof",
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Gender => "gender",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::Province => "province",
            FieldName::City => "city",
            FieldName::School => "school",
            FieldName::GraduationYear => "graduationYear",
            FieldName::SelfDescription => "selfDescription",
            FieldName::EmploymentStatus => "employmentStatus",
            FieldName::IsExistingSubscriber => "isExistingSubscriber",
            FieldName::ExistingSubscriberEmail => "existingSubscriberEmail",
            FieldName::ExamType => "examType",
            FieldName::TargetDate => "targetDate",
            FieldName::NextSitting => "nextSitting",
            FieldName::ExamineeType => "examineeType",
            FieldName::OtherReviewCenter => "otherReviewCenter",
            FieldName::OtherReviewCenterName => "otherReviewCenterName",
            FieldName::PaymentProof => "paymentProof",
            FieldName::Remarks => "remarks",
            FieldName::AgreedToTerms => "agreedToTerms",
        }
    }

    /// Column label used by the spreadsheet sink.
    pub const fn label(self) -> &'static str {
        match self {
            FieldName::HasPreRegistered => "Pre-Registered",
            FieldName::PreRegistrationProof => "Pre-Registration Proof",
            FieldName::IsLatinHonor => "Latin Honor",
            FieldName::LatinHonorProof => "Latin Honor Proof",
            FieldName::FirstName => "First Name",
            FieldName::LastName => "Last Name",
            FieldName::Gender => "Gender",
            FieldName::Email => "Email",
            FieldName::Phone => "Phone Number",
            FieldName::Province => "Province",
            FieldName::City => "City",
            FieldName::School => "School",
            FieldName::GraduationYear => "Graduation Year",
            FieldName::SelfDescription => "Describes You",
            FieldName::EmploymentStatus => "Employment Status",
            FieldName::IsExistingSubscriber => "Existing Subscriber",
            FieldName::ExistingSubscriberEmail => "Subscriber Email",
            FieldName::ExamType => "Licensure Exam",
            FieldName::TargetDate => "Target Exam Date",
            FieldName::NextSitting => "Taking Next Board Exam",
            FieldName::ExamineeType => "Examinee Type",
            FieldName::OtherReviewCenter => "Other Review Center",
            FieldName::OtherReviewCenterName => "Other Review Center Name",
            FieldName::PaymentProof => "Proof of Payment",
            FieldName::Remarks => "Remarks",
            FieldName::AgreedToTerms => "Agreed to Terms",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == raw)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Selected option of a choice field, carried with both renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceValue {
    pub code: &'static str,
    pub label: &'static str,
}

impl ChoiceValue {
    fn of<C: Choice>(choice: Option<C>) -> Option<Self> {
        choice.map(|choice| ChoiceValue {
            code: choice.code(),
            label: choice.label(),
        })
    }
}

/// Borrowed view of a single answer so validation rules can stay declarative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Choice(Option<ChoiceValue>),
    Flag(bool),
    Attachment(Option<&'a Attachment>),
}

impl FieldValue<'_> {
    pub fn choice_code(&self) -> Option<&'static str> {
        match self {
            FieldValue::Choice(Some(choice)) => Some(choice.code),
            _ => None,
        }
    }

    /// Rendering used by the review screen; empty when nothing was entered.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.trim().to_string(),
            FieldValue::Choice(choice) => choice
                .map(|choice| choice.label.to_string())
                .unwrap_or_default(),
            FieldValue::Flag(flag) => (if *flag { "Yes" } else { "No" }).to_string(),
            FieldValue::Attachment(attachment) => attachment
                .map(|attachment| attachment.file_name().to_string())
                .unwrap_or_default(),
        }
    }
}

/// In-progress answers of a single applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerSet {
    pub has_pre_registered: Option<YesNo>,
    pub pre_registration_proof: Option<Attachment>,
    pub is_latin_honor: Option<YesNo>,
    pub latin_honor_proof: Option<Attachment>,

    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub province: String,
    pub city: String,

    pub school: String,
    pub graduation_year: String,
    pub self_description: String,
    pub employment_status: String,
    pub is_existing_subscriber: Option<YesNo>,
    pub existing_subscriber_email: String,

    pub exam_type: Option<ExamType>,
    pub target_date: Option<TargetCohort>,
    pub next_sitting: Option<SittingIntent>,
    pub examinee_type: Option<ExamineeType>,
    pub other_review_center: Option<YesNo>,
    pub other_review_center_name: String,

    pub payment_proof: Option<Attachment>,
    pub remarks: String,
    pub agreed_to_terms: bool,
}

impl AnswerSet {
    pub fn value(&self, field: FieldName) -> FieldValue<'_> {
        match field {
            FieldName::HasPreRegistered => {
                FieldValue::Choice(ChoiceValue::of(self.has_pre_registered))
            }
            FieldName::PreRegistrationProof => {
                FieldValue::Attachment(self.pre_registration_proof.as_ref())
            }
            FieldName::IsLatinHonor => FieldValue::Choice(ChoiceValue::of(self.is_latin_honor)),
            FieldName::LatinHonorProof => FieldValue::Attachment(self.latin_honor_proof.as_ref()),
            FieldName::FirstName => FieldValue::Text(&self.first_name),
            FieldName::LastName => FieldValue::Text(&self.last_name),
            FieldName::Gender => FieldValue::Text(&self.gender),
            FieldName::Email => FieldValue::Text(&self.email),
            FieldName::Phone => FieldValue::Text(&self.phone),
            FieldName::Province => FieldValue::Text(&self.province),
            FieldName::City => FieldValue::Text(&self.city),
            FieldName::School => FieldValue::Text(&self.school),
            FieldName::GraduationYear => FieldValue::Text(&self.graduation_year),
            FieldName::SelfDescription => FieldValue::Text(&self.self_description),
            FieldName::EmploymentStatus => FieldValue::Text(&self.employment_status),
            FieldName::IsExistingSubscriber => {
                FieldValue::Choice(ChoiceValue::of(self.is_existing_subscriber))
            }
            FieldName::ExistingSubscriberEmail => {
                FieldValue::Text(&self.existing_subscriber_email)
            }
            FieldName::ExamType => FieldValue::Choice(ChoiceValue::of(self.exam_type)),
            FieldName::TargetDate => FieldValue::Choice(ChoiceValue::of(self.target_date)),
            FieldName::NextSitting => FieldValue::Choice(ChoiceValue::of(self.next_sitting)),
            FieldName::ExamineeType => FieldValue::Choice(ChoiceValue::of(self.examinee_type)),
            FieldName::OtherReviewCenter => {
                FieldValue::Choice(ChoiceValue::of(self.other_review_center))
            }
            FieldName::OtherReviewCenterName => FieldValue::Text(&self.other_review_center_name),
            FieldName::PaymentProof => FieldValue::Attachment(self.payment_proof.as_ref()),
            FieldName::Remarks => FieldValue::Text(&self.remarks),
            FieldName::AgreedToTerms => FieldValue::Flag(self.agreed_to_terms),
        }
    }

    pub fn has_pre_registered(&self) -> bool {
        self.has_pre_registered == Some(YesNo::Yes)
    }

    pub fn is_latin_honor(&self) -> bool {
        self.is_latin_honor == Some(YesNo::Yes)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}
