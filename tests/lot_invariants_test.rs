use parking_lot_cli::{Command, LotError, ParkingLot, Reply, Vehicle, MAX_SLOTS};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(i64),
    Park(u8, u8),
    Leave(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (-2i64..12).prop_map(Op::Create),
        6 => (0u8..16, 0u8..4).prop_map(|(reg, color)| Op::Park(reg, color)),
        4 => (-1i64..14).prop_map(Op::Leave),
    ]
}

fn to_command(op: &Op) -> Command {
    const COLORS: [&str; 4] = ["White", "Red", "Blue", "Black"];
    match op {
        Op::Create(capacity) => Command::CreateLot {
            capacity: *capacity,
        },
        Op::Park(reg, color) => Command::Park {
            vehicle: Vehicle::new(format!("KA-01-{reg:04}"), COLORS[*color as usize]),
        },
        Op::Leave(slot) => Command::Leave { slot: *slot },
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_command(
        capacity in 1i64..12,
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut lot = None;
        Command::CreateLot { capacity }.execute(&mut lot).unwrap();

        for op in &ops {
            let before = lot.as_ref().map(ParkingLot::occupied_snapshot);
            let lowest_free = lot.as_ref().and_then(|l| l.available_slots().next());

            let outcome = to_command(op).execute(&mut lot);

            let current = lot.as_ref().unwrap();
            prop_assert!(current.check_invariants().is_ok(), "{:?}", current.check_invariants());

            match (op, &outcome) {
                (Op::Park(..), Ok(Reply::Allocated(slot))) => {
                    prop_assert_eq!(Some(*slot), lowest_free);
                }
                (_, Err(_)) => {
                    prop_assert_eq!(before, Some(current.occupied_snapshot()));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn reverse_indexes_agree_with_snapshot(
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut lot = None;
        Command::CreateLot { capacity: 8 }.execute(&mut lot).unwrap();
        for op in ops.iter().filter(|op| !matches!(op, Op::Create(_))) {
            let _ = to_command(op).execute(&mut lot);
        }

        let lot = lot.unwrap();
        for (slot, vehicle) in lot.occupied_snapshot() {
            prop_assert_eq!(lot.slot_for(vehicle.registration_number()), Ok(slot));
            let same = lot
                .vehicles_of_color(vehicle.color())
                .unwrap()
                .iter()
                .filter(|v| **v == vehicle)
                .count();
            prop_assert_eq!(same, 1);
        }
    }
}

#[test]
fn test_every_capacity_fills_exactly() {
    for capacity in [1u32, 2, 7, 64, 1000, MAX_SLOTS] {
        let mut lot = ParkingLot::create(i64::from(capacity)).unwrap();
        for i in 1..=capacity {
            assert_eq!(lot.allocate(Vehicle::new(format!("R-{i}"), "White")), Ok(i));
        }
        assert_eq!(
            lot.allocate(Vehicle::new("overflow", "White")),
            Err(LotError::Full)
        );
        assert_eq!(lot.available_slots().count(), 0);
    }
}

#[test]
fn test_over_limit_capacity_creates_nothing() {
    let mut lot = None;
    let err = Command::CreateLot {
        capacity: i64::from(MAX_SLOTS) + 1,
    }
    .execute(&mut lot)
    .unwrap_err();
    assert!(matches!(err, LotError::CapacityExceeded { .. }));
    assert!(lot.is_none());
}
