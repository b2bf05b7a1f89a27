//! Meteorological seasons from calendar months.
//!
//! Four three-month buckets: Dec–Feb, Mar–May, Jun–Aug, Sep–Nov. Each season
//! shifts the day's baseline temperature by a fixed offset. The offsets are
//! northern-hemisphere flavoured and applied everywhere; the readings are
//! illustrative, not modelled.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Season of a calendar month (1 = January … 12 = December).
    pub fn from_month(month: u32) -> Self {
        match (month % 12 + 3) / 3 {
            1 => Season::Winter,
            2 => Season::Spring,
            3 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    /// Additive temperature offset in °C.
    pub fn temperature_offset_c(self) -> f64 {
        match self {
            Season::Winter => -10.0,
            Season::Spring => 5.0,
            Season::Summer => 15.0,
            Season::Autumn => 0.0,
        }
    }
}
