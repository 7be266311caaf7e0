//! Employee model and related types.
//!
//! This module defines the Employee struct and the Crew enum for
//! representing workers on the rotating shift pattern.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the four crews working the same 4-day cycle at different offsets.
///
/// Serialized as its number (1 to 4).
///
/// # Example
///
/// ```
/// use shift_ledger::models::Crew;
///
/// let crew = Crew::try_from(2).unwrap();
/// assert_eq!(crew, Crew::Two);
/// assert_eq!(crew.number(), 2);
/// assert!(Crew::try_from(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Crew {
    /// Crew 1, on the first day of the cycle at the epoch.
    One,
    /// Crew 2, one phase ahead of crew 1.
    Two,
    /// Crew 3, two phases ahead of crew 1.
    Three,
    /// Crew 4, three phases ahead of crew 1.
    Four,
}

impl Crew {
    /// All crews in order.
    pub const ALL: [Crew; 4] = [Crew::One, Crew::Two, Crew::Three, Crew::Four];

    /// Returns the crew number (1 to 4).
    pub fn number(self) -> u8 {
        match self {
            Crew::One => 1,
            Crew::Two => 2,
            Crew::Three => 3,
            Crew::Four => 4,
        }
    }

    /// Returns how many phases this crew runs ahead of crew 1.
    pub fn cycle_offset(self) -> i64 {
        i64::from(self.number()) - 1
    }
}

impl TryFrom<u8> for Crew {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Crew::One),
            2 => Ok(Crew::Two),
            3 => Ok(Crew::Three),
            4 => Ok(Crew::Four),
            other => Err(EngineError::InvalidCrew {
                value: other.to_string(),
            }),
        }
    }
}

impl From<Crew> for u8 {
    fn from(crew: Crew) -> Self {
        crew.number()
    }
}

impl fmt::Display for Crew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Represents an employee on the shift pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// External-system unique numeric identifier.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// The crew whose rotation this employee follows.
    pub crew: Crew,
    /// Pay per recorded vacation day.
    #[serde(default)]
    pub vacation_rate: Decimal,
    /// Pay per recorded sick day.
    #[serde(default)]
    pub sick_rate: Decimal,
}

/// Data needed to register a new employee. Rates start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// External-system unique numeric identifier.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// The crew whose rotation this employee follows.
    pub crew: Crew,
}

/// A partial update of an employee's absence day-rates.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateUpdate {
    /// New pay per vacation day.
    #[serde(default)]
    pub vacation_rate: Option<Decimal>,
    /// New pay per sick day.
    #[serde(default)]
    pub sick_rate: Option<Decimal>,
}

impl RateUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.vacation_rate.is_none() && self.sick_rate.is_none()
    }

    /// Rejects negative rates.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("vacation_rate", self.vacation_rate),
            ("sick_rate", self.sick_rate),
        ] {
            if let Some(amount) = value.filter(|a| a.is_sign_negative()) {
                return Err(EngineError::InvalidAmount {
                    field: field.to_string(),
                    amount,
                });
            }
        }
        Ok(())
    }
}
