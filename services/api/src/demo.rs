use crate::infra::{configured_sink, load_attachment, PreviewSink};
use boardprep::config::AppConfig;
use boardprep::error::AppError;
use boardprep::workflows::registration::pricing::group_thousands;
use boardprep::workflows::registration::{
    quote_from_codes, AnswerSet, Attachment, Choice, ExamType, ExamineeType, FieldErrors,
    PayloadValue, RegistrationWizard, SittingIntent, SubmissionOutcome, SubmissionPayload,
    TargetCohort, WizardStep, YesNo,
};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

/// Eight-byte PNG signature; enough for the demo's stand-in receipt.
const SAMPLE_RECEIPT: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Exam program code (vet, food-tech, fisheries, abe)
    #[arg(long)]
    pub(crate) exam_type: String,
    /// Apply the pre-registration reservation credit
    #[arg(long)]
    pub(crate) pre_registered: bool,
    /// Apply the Latin Honor half-price discount
    #[arg(long)]
    pub(crate) latin_honor: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Proof of payment to attach. Defaults to a generated sample receipt.
    #[arg(long)]
    pub(crate) payment_proof: Option<PathBuf>,
    /// Pre-registration proof; when given the applicant answers that they pre-registered.
    #[arg(long)]
    pub(crate) pre_registration_proof: Option<PathBuf>,
    /// Send the packaged registration to REGISTRATION_SINK_URL instead of printing it.
    #[arg(long)]
    pub(crate) deliver: bool,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let quote = quote_from_codes(
        Some(args.exam_type.as_str()),
        Some(yes_no(args.pre_registered)),
        Some(yes_no(args.latin_honor)),
    )?;

    println!("{}", quote.exam_type.label());
    println!("- Regular price: ₱{}", group_thousands(quote.regular_price));
    if quote.reservation_credit > 0 {
        println!(
            "- Reservation credit: -₱{}",
            group_thousands(quote.reservation_credit)
        );
    }
    println!("- Amount due: {}", quote.display());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        payment_proof,
        pre_registration_proof,
        deliver,
    } = args;

    let payment_proof = match payment_proof {
        Some(path) => load_attachment(&path)?,
        None => Attachment::new("sample-receipt.png", "image/png", SAMPLE_RECEIPT.to_vec())?,
    };
    let pre_registration_proof = pre_registration_proof
        .map(|path| load_attachment(&path))
        .transpose()?;

    println!("BoardPrep pre-registration demo");
    let mut wizard = RegistrationWizard::new();
    render_step(&wizard);

    println!("\nTrying to continue with nothing answered...");
    if let Err(err) = wizard.advance() {
        println!("Blocked: {err}");
        render_errors(wizard.errors());
    }

    wizard.update(|answers| {
        answers.has_pre_registered = Some(if pre_registration_proof.is_some() {
            YesNo::Yes
        } else {
            YesNo::No
        });
        answers.pre_registration_proof = pre_registration_proof;
        answers.is_latin_honor = Some(YesNo::No);
    });
    wizard.update(sample_personal);
    wizard.update(sample_academic);
    wizard.update(sample_exam);
    wizard.update(|answers| {
        answers.payment_proof = Some(payment_proof);
        answers.remarks = "Prefers weekend classes".to_string();
        answers.agreed_to_terms = true;
    });

    while !wizard.step().is_final() {
        wizard.advance()?;
        render_step(&wizard);
    }

    render_review(&wizard);

    let outcome = if deliver {
        let config = AppConfig::load()?;
        let sink = configured_sink(&config.sink)?;
        println!("\nDelivering to the configured registration sink...");
        wizard.submit(sink.as_ref(), Local::now()).await?
    } else {
        let preview = PreviewSink::default();
        let outcome = wizard.submit(&preview, Local::now()).await?;
        if let Some(payload) = preview.payloads().first() {
            render_payload(payload);
        }
        outcome
    };

    render_outcome(&outcome);
    match outcome {
        SubmissionOutcome::Delivered { .. } => Ok(()),
        SubmissionOutcome::Failed { error, .. } => Err(error.into()),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn sample_personal(answers: &mut AnswerSet) {
    answers.first_name = "Juan".to_string();
    answers.last_name = "Dela Cruz".to_string();
    answers.gender = "Male".to_string();
    answers.email = "juan.delacruz@example.com".to_string();
    answers.phone = "0917 123 4567".to_string();
    answers.province = "Nueva Ecija".to_string();
    answers.city = "Science City of Muñoz".to_string();
}

fn sample_academic(answers: &mut AnswerSet) {
    answers.school = "Central Luzon State University".to_string();
    answers.graduation_year = "2025".to_string();
    answers.self_description = "Fresh graduate".to_string();
    answers.employment_status = "Unemployed".to_string();
    answers.is_existing_subscriber = Some(YesNo::No);
}

fn sample_exam(answers: &mut AnswerSet) {
    answers.exam_type = Some(ExamType::Veterinary);
    answers.target_date = Some(TargetCohort::February2026);
    answers.next_sitting = Some(SittingIntent::Yes);
    answers.examinee_type = Some(ExamineeType::FirstTimer);
    answers.other_review_center = Some(YesNo::No);
}

fn render_step(wizard: &RegistrationWizard) {
    let markers: Vec<String> = wizard
        .stepper()
        .iter()
        .map(|indicator| {
            let mark = if indicator.step == wizard.step() {
                ">"
            } else if indicator.is_clickable() {
                "x"
            } else {
                " "
            };
            format!("[{mark}] {}", indicator.label)
        })
        .collect();

    println!(
        "\nStep {} of {} ({}% complete)",
        wizard.step().index() + 1,
        WizardStep::ALL.len(),
        wizard.progress_percent()
    );
    println!("{}", markers.join("  "));
    let fields: Vec<String> = wizard
        .visible_fields()
        .iter()
        .map(|field| field.label().to_string())
        .collect();
    println!("Fields: {}", fields.join(", "));
}

fn render_errors(errors: &FieldErrors) {
    for (field, message) in errors {
        println!("  - {}: {message}", field.label());
    }
}

fn render_review(wizard: &RegistrationWizard) {
    println!("\nReview your registration");
    for section in wizard.review() {
        println!("{} (edit: {})", section.title, section.edit_step);
        for entry in section.entries {
            println!("  {}: {}", entry.label, entry.value);
        }
    }
}

fn render_payload(payload: &SubmissionPayload) {
    println!(
        "\nPackaged payload ({} columns, {} attachment(s)); not sent, pass --deliver to send",
        payload.len(),
        payload.attachment_count()
    );
    for (label, value) in payload.iter() {
        match value {
            PayloadValue::Text(text) => println!("  {label}: {text}"),
            PayloadValue::Attachment(encoded) => println!(
                "  {label}: {} ({}, {} base64 chars)",
                encoded.file_name,
                encoded.mime_type,
                encoded.data.len()
            ),
        }
    }
}

fn render_outcome(outcome: &SubmissionOutcome) {
    let notification = outcome.notification();
    println!("\n{}", notification.title);
    println!("{}", notification.description);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_walkthrough_packages_without_delivering() {
        run_demo(DemoArgs::default())
            .await
            .expect("demo completes with the preview sink");
    }

    #[test]
    fn quote_command_rejects_unknown_programs() {
        let args = QuoteArgs {
            exam_type: "nursing".to_string(),
            pre_registered: false,
            latin_honor: false,
        };
        assert!(matches!(run_quote(args), Err(AppError::Quote(_))));
    }

    #[test]
    fn sample_answers_clear_every_step() {
        let mut answers = AnswerSet::default();
        answers.has_pre_registered = Some(YesNo::No);
        answers.is_latin_honor = Some(YesNo::No);
        sample_personal(&mut answers);
        sample_academic(&mut answers);
        sample_exam(&mut answers);
        answers.payment_proof = Some(
            Attachment::new("sample-receipt.png", "image/png", SAMPLE_RECEIPT.to_vec())
                .expect("png is accepted"),
        );
        answers.agreed_to_terms = true;

        let mut wizard = RegistrationWizard::new();
        wizard.update(|current| *current = answers);
        while !wizard.step().is_final() {
            wizard.advance().expect("sample answers are valid");
        }
        assert_eq!(wizard.step(), WizardStep::Payment);
        // Advancing on the final step validates it without moving.
        assert_eq!(
            wizard.advance().expect("payment answers are valid"),
            WizardStep::Payment
        );
        assert!(wizard.errors().is_empty());
    }
}
