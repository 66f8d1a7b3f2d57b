//! Date and place tokens filled after the record mapping

use crate::error::{BatchError, Result};
use chrono::NaiveDate;
use fill_engine::TokenMapping;
use std::fmt::Write;
use store::BatchSettings;

/// Mapping of the configured date tokens to `today` and place tokens to
/// the configured place
pub fn date_place_mapping(settings: &BatchSettings, today: NaiveDate) -> Result<TokenMapping> {
    let mut date = String::new();
    write!(date, "{}", today.format(&settings.date_format))
        .map_err(|_| BatchError::InvalidDateFormat(settings.date_format.clone()))?;
    let mut mapping = TokenMapping::new();
    for token in &settings.date_tokens {
        mapping.insert(token.as_str(), date.as_str())?;
    }
    for token in &settings.place_tokens {
        mapping.insert(token.as_str(), settings.place.as_str())?;
    }
    Ok(mapping)
}

/// Current local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
