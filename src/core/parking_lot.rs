use crate::domain::model::{SlotId, Vehicle, MAX_SLOTS};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Soft failures of lot operations. None of them mutate the lot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotError {
    #[error("cannot create :{requested} slots. max slots available: {max}")]
    CapacityExceeded { requested: i64, max: u32 },

    #[error("invalid slot number: {0}")]
    InvalidCapacity(i64),

    #[error("Sorry, parking lot is full")]
    Full,

    #[error("slot {0} is not occupied")]
    NotOccupied(i64),

    #[error("Vehicle {registration} is already parked at slot {slot}")]
    AlreadyParked { registration: String, slot: SlotId },

    #[error("Not found")]
    NotFound,

    #[error("Please create a parking lot first")]
    NoLot,
}

/// Fixed-capacity slot registry with three indexes kept in step.
///
/// Every mutating operation takes `&mut self`, so a lot can only be changed
/// through a single exclusive handle. It is not meant to be shared between
/// threads; wrap it in a lock yourself if you need that.
///
/// Free slots live in an ordered set, so allocation always hands out the
/// lowest free slot. Removing a vehicle from its color bucket is a linear
/// scan over the vehicles of that color.
#[derive(Debug, Clone)]
pub struct ParkingLot {
    capacity: u32,
    available: BTreeSet<SlotId>,
    occupied: BTreeMap<SlotId, Vehicle>,
    slot_by_registration: HashMap<String, SlotId>,
    vehicles_by_color: HashMap<String, Vec<Vehicle>>,
}

impl ParkingLot {
    pub fn create(capacity: i64) -> Result<Self, LotError> {
        if capacity > i64::from(MAX_SLOTS) {
            return Err(LotError::CapacityExceeded {
                requested: capacity,
                max: MAX_SLOTS,
            });
        }
        if capacity <= 0 {
            return Err(LotError::InvalidCapacity(capacity));
        }

        let capacity = capacity as u32;
        Ok(Self {
            capacity,
            available: (1..=capacity).collect(),
            occupied: BTreeMap::new(),
            slot_by_registration: HashMap::new(),
            vehicles_by_color: HashMap::new(),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Free slot IDs in ascending order.
    pub fn available_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.available.iter().copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_full(&self) -> bool {
        self.available.is_empty()
    }

    /// Parks `vehicle` in the lowest free slot.
    pub fn allocate(&mut self, vehicle: Vehicle) -> Result<SlotId, LotError> {
        if let Some(&slot) = self.slot_by_registration.get(vehicle.registration_number()) {
            return Err(LotError::AlreadyParked {
                registration: vehicle.registration_number().to_string(),
                slot,
            });
        }
        let slot = self.available.pop_first().ok_or(LotError::Full)?;

        self.slot_by_registration
            .insert(vehicle.registration_number().to_string(), slot);
        self.vehicles_by_color
            .entry(vehicle.color().to_string())
            .or_default()
            .push(vehicle.clone());
        self.occupied.insert(slot, vehicle);

        tracing::debug!(slot, "slot allocated");
        Ok(slot)
    }

    /// Frees `slot` and returns the vehicle that was parked there.
    pub fn release(&mut self, slot: i64) -> Result<Vehicle, LotError> {
        let id = SlotId::try_from(slot).map_err(|_| LotError::NotOccupied(slot))?;
        let vehicle = self.occupied.remove(&id).ok_or(LotError::NotOccupied(slot))?;

        self.slot_by_registration.remove(vehicle.registration_number());
        if let Some(bucket) = self.vehicles_by_color.get_mut(vehicle.color()) {
            if let Some(pos) = bucket
                .iter()
                .position(|v| v.registration_number() == vehicle.registration_number())
            {
                bucket.remove(pos);
            }
        }
        self.available.insert(id);

        tracing::debug!(slot = id, "slot released");
        Ok(vehicle)
    }

    pub fn slot_for(&self, registration_number: &str) -> Result<SlotId, LotError> {
        self.slot_by_registration
            .get(registration_number)
            .copied()
            .ok_or(LotError::NotFound)
    }

    /// Vehicles of `color` in park order.
    ///
    /// A color that was never parked is `NotFound`; a color whose vehicles
    /// have all left yields an empty slice.
    pub fn vehicles_of_color(&self, color: &str) -> Result<&[Vehicle], LotError> {
        self.vehicles_by_color
            .get(color)
            .map(Vec::as_slice)
            .ok_or(LotError::NotFound)
    }

    /// Occupied slots, ascending by slot.
    pub fn occupied_snapshot(&self) -> Vec<(SlotId, Vehicle)> {
        self.occupied
            .iter()
            .map(|(slot, vehicle)| (*slot, vehicle.clone()))
            .collect()
    }

    /// Verifies that the free pool and the three indexes agree.
    pub fn check_invariants(&self) -> Result<(), String> {
        let total = self.available.len() + self.occupied.len();
        if total != self.capacity as usize {
            return Err(format!(
                "free {} + occupied {} != capacity {}",
                self.available.len(),
                self.occupied.len(),
                self.capacity
            ));
        }

        for slot in 1..=self.capacity {
            let free = self.available.contains(&slot);
            let taken = self.occupied.contains_key(&slot);
            if free == taken {
                return Err(format!("slot {slot} free={free} occupied={taken}"));
            }
        }

        if self.slot_by_registration.len() != self.occupied.len() {
            return Err("registration index size differs from occupied slots".to_string());
        }

        for (slot, vehicle) in &self.occupied {
            match self.slot_by_registration.get(vehicle.registration_number()) {
                Some(indexed) if indexed == slot => {}
                other => {
                    return Err(format!(
                        "registration {} indexed at {:?}, parked at {}",
                        vehicle.registration_number(),
                        other,
                        slot
                    ))
                }
            }

            let hits = self
                .vehicles_by_color
                .get(vehicle.color())
                .map(|bucket| bucket.iter().filter(|v| *v == vehicle).count())
                .unwrap_or(0);
            if hits != 1 {
                return Err(format!(
                    "vehicle {} appears {} times in its color bucket",
                    vehicle, hits
                ));
            }
        }

        let bucketed: usize = self.vehicles_by_color.values().map(Vec::len).sum();
        if bucketed != self.occupied.len() {
            return Err(format!(
                "color buckets hold {} vehicles, {} parked",
                bucketed,
                self.occupied.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(reg: &str, color: &str) -> Vehicle {
        Vehicle::new(reg, color)
    }

    #[test]
    fn test_create_rejects_out_of_range_capacity() {
        assert_eq!(
            ParkingLot::create(20_001).unwrap_err(),
            LotError::CapacityExceeded {
                requested: 20_001,
                max: MAX_SLOTS
            }
        );
        assert_eq!(ParkingLot::create(0).unwrap_err(), LotError::InvalidCapacity(0));
        assert_eq!(ParkingLot::create(-3).unwrap_err(), LotError::InvalidCapacity(-3));
        assert_eq!(ParkingLot::create(20_000).unwrap().capacity(), 20_000);
    }

    #[test]
    fn test_allocate_fills_in_order_then_reports_full() {
        let mut lot = ParkingLot::create(3).unwrap();
        assert_eq!(lot.allocate(car("A-1", "White")), Ok(1));
        assert_eq!(lot.allocate(car("A-2", "White")), Ok(2));
        assert_eq!(lot.allocate(car("A-3", "Red")), Ok(3));
        assert!(lot.is_full());
        assert_eq!(lot.allocate(car("A-4", "Red")), Err(LotError::Full));
        assert_eq!(lot.occupied_count(), 3);
        lot.check_invariants().unwrap();
    }

    #[test]
    fn test_release_returns_slot_to_pool_in_order() {
        let mut lot = ParkingLot::create(5).unwrap();
        for i in 1..=5 {
            lot.allocate(car(&format!("R-{i}"), "Blue")).unwrap();
        }
        lot.release(4).unwrap();
        lot.release(2).unwrap();
        assert_eq!(lot.available_slots().collect::<Vec<_>>(), vec![2, 4]);

        assert_eq!(lot.allocate(car("N-1", "Black")), Ok(2));
        assert_eq!(lot.allocate(car("N-2", "Black")), Ok(4));
        lot.check_invariants().unwrap();
    }

    #[test]
    fn test_release_unoccupied_slot_leaves_lot_untouched() {
        let mut lot = ParkingLot::create(2).unwrap();
        lot.allocate(car("A-1", "White")).unwrap();

        assert_eq!(lot.release(2), Err(LotError::NotOccupied(2)));
        assert_eq!(lot.release(0), Err(LotError::NotOccupied(0)));
        assert_eq!(lot.release(-1), Err(LotError::NotOccupied(-1)));
        assert_eq!(lot.release(99), Err(LotError::NotOccupied(99)));
        assert_eq!(lot.available_slots().collect::<Vec<_>>(), vec![2]);
        lot.check_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_registration_is_refused() {
        let mut lot = ParkingLot::create(4).unwrap();
        lot.allocate(car("KA-01", "White")).unwrap();

        let err = lot.allocate(car("KA-01", "Red")).unwrap_err();
        assert_eq!(
            err,
            LotError::AlreadyParked {
                registration: "KA-01".to_string(),
                slot: 1
            }
        );
        assert_eq!(lot.occupied_count(), 1);
        assert_eq!(lot.vehicles_of_color("Red"), Err(LotError::NotFound));
        lot.check_invariants().unwrap();
    }

    #[test]
    fn test_color_index_distinguishes_unseen_from_emptied() {
        let mut lot = ParkingLot::create(3).unwrap();
        assert_eq!(lot.vehicles_of_color("Red"), Err(LotError::NotFound));

        lot.allocate(car("R-1", "Red")).unwrap();
        lot.allocate(car("W-1", "White")).unwrap();
        lot.allocate(car("R-2", "Red")).unwrap();
        let reds: Vec<_> = lot
            .vehicles_of_color("Red")
            .unwrap()
            .iter()
            .map(|v| v.registration_number().to_string())
            .collect();
        assert_eq!(reds, vec!["R-1", "R-2"]);

        lot.release(1).unwrap();
        lot.release(3).unwrap();
        assert_eq!(lot.vehicles_of_color("Red").unwrap().len(), 0);
    }

    #[test]
    fn test_reverse_lookups_follow_snapshot() {
        let mut lot = ParkingLot::create(6).unwrap();
        lot.allocate(car("KA-01-HH-1234", "White")).unwrap();
        lot.allocate(car("KA-01-HH-9999", "White")).unwrap();
        lot.allocate(car("KA-01-BB-0001", "Black")).unwrap();
        lot.release(2).unwrap();

        for (slot, vehicle) in lot.occupied_snapshot() {
            assert_eq!(lot.slot_for(vehicle.registration_number()), Ok(slot));
        }
        assert_eq!(lot.slot_for("KA-01-HH-9999"), Err(LotError::NotFound));
        let slots: Vec<_> = lot.occupied_snapshot().into_iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![1, 3]);
    }
}
