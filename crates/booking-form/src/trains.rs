//! Search results

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TrainClass {
    #[serde(rename = "AC")]
    Ac,
    #[serde(rename = "Non-AC")]
    NonAc,
    Sleeper,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub id: String,
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub price: u32,
    pub available_seats: u32,
    pub class: TrainClass,
}

impl Train {
    pub fn booking_announcement(&self) -> String {
        format!(
            "Booking {} departing at {} for {} dollars",
            self.name, self.departure, self.price
        )
    }

    pub fn booked_description(&self) -> String {
        format!("Your ticket for {} has been booked successfully.", self.name)
    }
}

pub fn results_announcement(count: usize) -> String {
    format!("Found {count} trains for your journey")
}

/// Fixed timetable used until a real search backend exists.
pub fn mock_trains() -> Vec<Train> {
    let train = |id: &str, name: &str, dep: &str, arr: &str, price, seats, class| Train {
        id: id.to_string(),
        name: name.to_string(),
        departure: dep.to_string(),
        arrival: arr.to_string(),
        duration: "6h 30m".to_string(),
        price,
        available_seats: seats,
        class,
    };
    vec![
        train("1", "Express 2001", "08:00 AM", "02:30 PM", 45, 23, TrainClass::Ac),
        train("2", "Superfast 1234", "10:15 AM", "04:45 PM", 38, 8, TrainClass::NonAc),
        train("3", "Night Express", "11:30 PM", "06:00 AM", 32, 45, TrainClass::Sleeper),
    ]
}
