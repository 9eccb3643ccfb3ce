use crate::core::parking_lot::{LotError, ParkingLot};
use crate::domain::model::{SlotId, Vehicle};
use std::fmt;

pub const TOKEN_CREATE_PARKING_LOT: &str = "create_parking_lot";
pub const TOKEN_PARK: &str = "park";
pub const TOKEN_LEAVE: &str = "leave";
pub const TOKEN_STATUS: &str = "status";
pub const TOKEN_REGISTRATIONS_BY_COLOR: &str = "registration_numbers_for_cars_with_color";
pub const TOKEN_SLOT_BY_REGISTRATION: &str = "slot_number_for_registration_number";
pub const TOKEN_SLOTS_BY_COLOR: &str = "slot_numbers_for_cars_with_color";

/// One unit of work against the lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateLot { capacity: i64 },
    Park { vehicle: Vehicle },
    Leave { slot: i64 },
    Status,
    RegistrationsByColor { color: String },
    SlotByRegistration { registration_number: String },
    SlotsByColor { color: String },
}

/// Successful result of a command, rendered for the output sink via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Created { capacity: u32 },
    Allocated(SlotId),
    Freed(SlotId),
    Status(Vec<(SlotId, Vehicle)>),
    Registrations(Vec<String>),
    Slot(SlotId),
    Slots(Vec<SlotId>),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateLot { .. } => TOKEN_CREATE_PARKING_LOT,
            Command::Park { .. } => TOKEN_PARK,
            Command::Leave { .. } => TOKEN_LEAVE,
            Command::Status => TOKEN_STATUS,
            Command::RegistrationsByColor { .. } => TOKEN_REGISTRATIONS_BY_COLOR,
            Command::SlotByRegistration { .. } => TOKEN_SLOT_BY_REGISTRATION,
            Command::SlotsByColor { .. } => TOKEN_SLOTS_BY_COLOR,
        }
    }

    /// Only `CreateLot`, `Park` and `Leave` change state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::CreateLot { .. } | Command::Park { .. } | Command::Leave { .. }
        )
    }

    /// Runs the command against the session's lot.
    ///
    /// `CreateLot` replaces the lot only when the new one is valid; every
    /// other command needs an existing lot. On `Err` the lot is unchanged.
    pub fn execute(&self, lot: &mut Option<ParkingLot>) -> Result<Reply, LotError> {
        match self {
            Command::CreateLot { capacity } => {
                let created = ParkingLot::create(*capacity)?;
                let capacity = created.capacity();
                *lot = Some(created);
                tracing::info!(capacity, "parking lot created");
                Ok(Reply::Created { capacity })
            }
            Command::Park { vehicle } => require(lot)?.allocate(vehicle.clone()).map(Reply::Allocated),
            Command::Leave { slot } => {
                require(lot)?.release(*slot)?;
                Ok(Reply::Freed(*slot as SlotId))
            }
            Command::Status => Ok(Reply::Status(require(lot)?.occupied_snapshot())),
            Command::RegistrationsByColor { color } => {
                let lot = require(lot)?;
                let registrations = non_empty(lot.vehicles_of_color(color)?)?
                    .iter()
                    .map(|v| v.registration_number().to_string())
                    .collect();
                Ok(Reply::Registrations(registrations))
            }
            Command::SlotByRegistration {
                registration_number,
            } => require(lot)?.slot_for(registration_number).map(Reply::Slot),
            Command::SlotsByColor { color } => {
                let lot: &ParkingLot = require(lot)?;
                // color buckets and the registration index hold the same vehicles
                let slots = non_empty(lot.vehicles_of_color(color)?)?
                    .iter()
                    .filter_map(|v| lot.slot_for(v.registration_number()).ok())
                    .collect();
                Ok(Reply::Slots(slots))
            }
        }
    }
}

fn require(lot: &mut Option<ParkingLot>) -> Result<&mut ParkingLot, LotError> {
    lot.as_mut().ok_or(LotError::NoLot)
}

fn non_empty(vehicles: &[Vehicle]) -> Result<&[Vehicle], LotError> {
    if vehicles.is_empty() {
        Err(LotError::NotFound)
    } else {
        Ok(vehicles)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Created { capacity } => {
                write!(f, "Created a parking lot with {capacity} slots")
            }
            Reply::Allocated(slot) => write!(f, "Allocated slot number: {slot}"),
            Reply::Freed(slot) => write!(f, "Slot number {slot} is free"),
            Reply::Status(rows) => {
                let header = format!("{:<10} {:<20} {:<10}", "Slot No.", "Registration No", "Color");
                write!(f, "{}", header.trim_end())?;
                for (slot, vehicle) in rows {
                    let row = format!(
                        "{:<10} {:<20} {:<10}",
                        slot,
                        vehicle.registration_number(),
                        vehicle.color()
                    );
                    write!(f, "\n{}", row.trim_end())?;
                }
                Ok(())
            }
            Reply::Registrations(registrations) => write!(f, "{}", registrations.join(", ")),
            Reply::Slot(slot) => write!(f, "{slot}"),
            Reply::Slots(slots) => {
                let joined: Vec<String> = slots.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}
