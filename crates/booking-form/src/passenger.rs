//! Passenger details form on the booking page

use crate::FormError;
use serde::{Deserialize, Serialize};

pub const BOOKING_PROCESSING: &str = "Processing your booking. Please wait.";
pub const BOOKING_CONFIRMED: &str = "Booking confirmed! Your ticket has been booked successfully.";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerField {
    Name,
    Age,
    Gender,
    Phone,
    Email,
}

impl PassengerField {
    pub const ALL: [PassengerField; 5] = [
        PassengerField::Name,
        PassengerField::Age,
        PassengerField::Gender,
        PassengerField::Phone,
        PassengerField::Email,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PassengerField::Name => "name",
            PassengerField::Age => "age",
            PassengerField::Gender => "gender",
            PassengerField::Phone => "phone",
            PassengerField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
}

impl PassengerDetails {
    pub fn get(&self, field: PassengerField) -> &str {
        match field {
            PassengerField::Name => &self.name,
            PassengerField::Age => &self.age,
            PassengerField::Gender => &self.gender,
            PassengerField::Phone => &self.phone,
            PassengerField::Email => &self.email,
        }
    }

    /// Store the trimmed transcript as-is; case is preserved for names and
    /// email addresses.
    pub fn apply_voice_input(&mut self, field: PassengerField, transcript: &str) -> String {
        let clean = transcript.trim().to_string();
        let confirmation = format!("{} set to {}", field.key(), clean);
        let slot = match field {
            PassengerField::Name => &mut self.name,
            PassengerField::Age => &mut self.age,
            PassengerField::Gender => &mut self.gender,
            PassengerField::Phone => &mut self.phone,
            PassengerField::Email => &mut self.email,
        };
        *slot = clean;
        confirmation
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.is_empty() || self.age.is_empty() || self.phone.is_empty() {
            return Err(FormError::MissingFields("name, age, and phone number"));
        }
        Ok(())
    }
}
