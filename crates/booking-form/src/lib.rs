//! Booking forms driven by voice input
//!
//! Consumers of the voice controller: each field takes the raw transcript
//! delivered to its `start_listening` callback, normalizes it, and returns
//! the confirmation the application speaks back.

mod numbers;
pub use numbers::parse_spoken_number;

mod search;
pub use search::{SearchField, SearchForm, SearchRequest};

mod passenger;
pub use passenger::{PassengerDetails, PassengerField, BOOKING_CONFIRMED, BOOKING_PROCESSING};

mod trains;
pub use trains::{mock_trains, results_announcement, Train, TrainClass};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Spoken verbatim to the user.
    #[error("Please fill in all required fields: {0}")]
    MissingFields(&'static str),
}
