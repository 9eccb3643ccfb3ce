pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::core::{
    command::{Command, Reply},
    dispatcher::{BatchPlan, CommandDispatcher, Dispatch, ParseError},
    parking_lot::{LotError, ParkingLot},
    session::{Session, SessionReport},
};
pub use domain::model::{SlotId, Vehicle, MAX_SLOTS};
pub use utils::error::{ParkingError, Result};
