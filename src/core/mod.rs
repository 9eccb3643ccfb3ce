pub mod command;
pub mod dispatcher;
pub mod parking_lot;
pub mod session;

pub use crate::domain::model::{SlotId, Vehicle, MAX_SLOTS};
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::Result;
