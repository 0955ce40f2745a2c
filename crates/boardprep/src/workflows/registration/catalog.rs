use serde::Serialize;

use super::domain::{Choice, ExamType, ExamineeType, SittingIntent, TargetCohort, WizardStep};
use super::pricing::{price_tier, PriceTier, RESERVATION_CREDIT};

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub pricing: PriceTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub id: &'static str,
    pub position: usize,
    pub name: &'static str,
}

/// Everything a form renderer needs to draw the wizard's selects and stepper.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationCatalog {
    pub steps: Vec<StepView>,
    pub exam_types: Vec<ExamOptionView>,
    pub target_dates: Vec<OptionView>,
    pub next_sitting: Vec<OptionView>,
    pub examinee_types: Vec<OptionView>,
    pub reservation_credit: u32,
    pub accepted_attachment_types: Vec<&'static str>,
}

fn options<C: Choice>() -> Vec<OptionView> {
    C::OPTIONS
        .iter()
        .map(|option| OptionView {
            value: option.code(),
            label: option.label(),
        })
        .collect()
}

impl RegistrationCatalog {
    pub fn standard() -> Self {
        Self {
            steps: WizardStep::ALL
                .iter()
                .map(|step| StepView {
                    id: step.code(),
                    position: step.index() + 1,
                    name: step.label(),
                })
                .collect(),
            exam_types: ExamType::OPTIONS
                .iter()
                .map(|exam| ExamOptionView {
                    value: exam.code(),
                    label: exam.label(),
                    pricing: price_tier(*exam),
                })
                .collect(),
            target_dates: options::<TargetCohort>(),
            next_sitting: options::<SittingIntent>(),
            examinee_types: options::<ExamineeType>(),
            reservation_credit: RESERVATION_CREDIT,
            accepted_attachment_types: vec!["image/*", "application/pdf"],
        }
    }
}
