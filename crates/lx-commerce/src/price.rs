use serde::{Deserialize, Deserializer};

/// A unit price as it reaches the store: a typed amount, or display text
/// scraped from the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceInput<'a> {
    Amount(f64),
    Text(&'a str),
}

impl PriceInput<'_> {
    pub fn resolve(self) -> f64 {
        match self {
            PriceInput::Amount(amount) if amount.is_finite() => amount,
            PriceInput::Amount(_) => 0.0,
            PriceInput::Text(text) => parse_price(text),
        }
    }
}

impl From<f64> for PriceInput<'_> {
    fn from(amount: f64) -> Self {
        PriceInput::Amount(amount)
    }
}

impl<'a> From<&'a str> for PriceInput<'a> {
    fn from(text: &'a str) -> Self {
        PriceInput::Text(text)
    }
}

/// Parse display text such as `"$1,299.00"`. Everything except digits and
/// `.` is dropped; anything left that is not a finite number yields `0.0`.
/// The whole remainder must parse, so `"1.2.3"` is `0.0` rather than a
/// leading-prefix `1.2`.
pub fn parse_price(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Stored prices are numbers, or strings from older page scripts.
pub(crate) fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) => PriceInput::Amount(value).resolve(),
        Some(NumberOrText::Text(text)) => parse_price(&text),
        None => 0.0,
    })
}

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lx_api_types::RecordId::deserialize(deserializer).map(|id| id.0)
}
