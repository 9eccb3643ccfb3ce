use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based slot identifier.
pub type SlotId = u32;

/// Hard ceiling on the capacity any `create_parking_lot` may request.
pub const MAX_SLOTS: u32 = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    registration_number: String,
    color: String,
}

impl Vehicle {
    pub fn new(registration_number: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            registration_number: registration_number.into(),
            color: color.into(),
        }
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.registration_number, self.color)
    }
}
