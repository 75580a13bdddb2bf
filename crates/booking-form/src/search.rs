//! Train search form

use crate::{parse_spoken_number, FormError};
use serde::{Deserialize, Serialize};
use time::Date;

/// Search fields that accept voice input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    From,
    To,
    Passengers,
}

impl SearchField {
    pub fn key(&self) -> &'static str {
        match self {
            SearchField::From => "from",
            SearchField::To => "to",
            SearchField::Passengers => "passengers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub date: Option<Date>,
    pub passengers: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            date: None,
            passengers: 1,
        }
    }
}

/// A complete, validated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub from: String,
    pub to: String,
    pub date: Date,
    pub passengers: u32,
}

impl SearchRequest {
    pub fn announcement(&self) -> String {
        format!(
            "Searching trains from {} to {} for {} passengers",
            self.from, self.to, self.passengers
        )
    }
}

impl SearchForm {
    /// Store a transcript in `field` and return the confirmation to speak.
    ///
    /// Stations keep the lowercased, trimmed transcript. Passengers take the
    /// first number heard and fall back to 1.
    pub fn apply_voice_input(&mut self, field: SearchField, transcript: &str) -> String {
        let clean = transcript.trim().to_lowercase();
        match field {
            SearchField::From | SearchField::To => {
                let confirmation = format!("{} station set to {}", field.key(), clean);
                if field == SearchField::From {
                    self.from = clean;
                } else {
                    self.to = clean;
                }
                confirmation
            }
            SearchField::Passengers => {
                let n = parse_spoken_number(&clean).unwrap_or_else(|| {
                    tracing::debug!(transcript = %clean, "no passenger count heard, using 1");
                    1
                });
                self.passengers = n;
                format!("Number of passengers set to {n}")
            }
        }
    }

    pub fn swap_stations(&mut self) -> &'static str {
        std::mem::swap(&mut self.from, &mut self.to);
        "Stations swapped"
    }

    pub fn validate(&self) -> Result<SearchRequest, FormError> {
        match self.date {
            Some(date) if !self.from.is_empty() && !self.to.is_empty() => Ok(SearchRequest {
                from: self.from.clone(),
                to: self.to.clone(),
                date,
                passengers: self.passengers,
            }),
            _ => Err(FormError::MissingFields(
                "departure station, destination station, and travel date",
            )),
        }
    }
}
