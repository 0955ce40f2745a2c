use serde::Serialize;

use super::domain::{AnswerSet, Choice, ExamType, YesNo};

/// Credit applied when the applicant already paid the pre-registration reservation.
pub const RESERVATION_CREDIT: u32 = 500;

/// Published list prices for one exam program, in whole pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceTier {
    pub regular: u32,
    pub discounted: u32,
}

pub const fn price_tier(exam_type: ExamType) -> PriceTier {
    match exam_type {
        ExamType::Veterinary => PriceTier {
            regular: 9_999,
            discounted: 4_999,
        },
        ExamType::FoodTechnology => PriceTier {
            regular: 7_999,
            discounted: 3_999,
        },
        ExamType::Fisheries => PriceTier {
            regular: 7_999,
            discounted: 3_999,
        },
        ExamType::AgriculturalBiosystems => PriceTier {
            regular: 8_999,
            discounted: 4_499,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLabel {
    RegularPrice,
    HalfDiscount,
}

impl PriceLabel {
    pub const fn text(self) -> &'static str {
        match self {
            PriceLabel::RegularPrice => "regular price",
            PriceLabel::HalfDiscount => "50% discount",
        }
    }
}

/// Amount displayed to the applicant for the selected program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub exam_type: ExamType,
    pub regular_price: u32,
    pub reservation_credit: u32,
    pub amount: u32,
    pub label: PriceLabel,
}

impl PriceQuote {
    /// e.g. `₱4,749 (50% discount)`.
    pub fn display(&self) -> String {
        format!("₱{} ({})", group_thousands(self.amount), self.label.text())
    }
}

/// Pure price computation: reservation credit first, then the Latin Honor half-off rounded down.
pub fn quote(exam_type: ExamType, has_pre_registered: bool, is_latin_honor: bool) -> PriceQuote {
    let regular_price = price_tier(exam_type).regular;
    let reservation_credit = if has_pre_registered {
        RESERVATION_CREDIT
    } else {
        0
    };
    let base = regular_price.saturating_sub(reservation_credit);

    let (amount, label) = if is_latin_honor {
        (base / 2, PriceLabel::HalfDiscount)
    } else {
        (base, PriceLabel::RegularPrice)
    };

    PriceQuote {
        exam_type,
        regular_price,
        reservation_credit,
        amount,
        label,
    }
}

/// Quote for the current answers; `None` until an exam type is selected.
pub fn quote_for(answers: &AnswerSet) -> Option<PriceQuote> {
    answers.exam_type.map(|exam_type| {
        quote(
            exam_type,
            answers.has_pre_registered(),
            answers.is_latin_honor(),
        )
    })
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("an exam type is required to compute a price")]
    MissingExamType,
    #[error("unknown exam type '{0}'")]
    UnknownExamType(String),
    #[error("'{value}' is not a valid answer for {field}; expected yes or no")]
    InvalidAnswer { field: &'static str, value: String },
}

/// Parse wire codes (as sent by the form or the CLI) into a quote.
pub fn quote_from_codes(
    exam_type: Option<&str>,
    has_pre_registered: Option<&str>,
    is_latin_honor: Option<&str>,
) -> Result<PriceQuote, QuoteError> {
    let raw_exam = exam_type
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or(QuoteError::MissingExamType)?;
    let exam_type = ExamType::from_code(raw_exam)
        .ok_or_else(|| QuoteError::UnknownExamType(raw_exam.to_string()))?;

    let pre_registered = parse_flag("hasPreRegistered", has_pre_registered)?;
    let latin_honor = parse_flag("isLatinHonor", is_latin_honor)?;

    Ok(quote(exam_type, pre_registered, latin_honor))
}

fn parse_flag(field: &'static str, raw: Option<&str>) -> Result<bool, QuoteError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => YesNo::from_code(raw)
                .map(|answer| answer == YesNo::Yes)
                .ok_or_else(|| QuoteError::InvalidAnswer {
                    field,
                    value: raw.to_string(),
                }),
        },
    }
}

/// `9999` becomes `"9,999"`.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
