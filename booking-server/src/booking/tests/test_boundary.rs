use super::*;

#[test]
fn test_non_owner_cannot_mutate() {
    let manager = create_test_manager();

    let reservation = manager
        .create(&instructor("p1"), booking("r1", "08:00", "10:00"))
        .unwrap();

    let intruder = instructor("p2");
    let patch = ReservationUpdate {
        end: Some("2024-01-15T11:00".into()),
        ..Default::default()
    };
    assert!(matches!(
        manager.update(&intruder, reservation.id, patch),
        Err(BookingError::Forbidden(_))
    ));
    assert!(matches!(
        manager.cancel(&intruder, reservation.id),
        Err(BookingError::Forbidden(_))
    ));
}

#[test]
fn test_coordinator_overrides_ownership() {
    let manager = create_test_manager();

    let reservation = manager
        .create(&instructor("p1"), booking("r1", "08:00", "10:00"))
        .unwrap();

    let patch = ReservationUpdate {
        end: Some("2024-01-15T11:00".into()),
        ..Default::default()
    };
    let updated = manager.update(&coordinator(), reservation.id, patch).unwrap();
    assert_eq!(updated.end, millis("11:00"));

    let cancelled = manager.cancel(&coordinator(), reservation.id).unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
}

#[test]
fn test_participants_are_read_only() {
    let manager = create_test_manager();
    let guest = participant("s1");

    assert!(matches!(
        manager.create(&guest, booking("r1", "08:00", "10:00")),
        Err(BookingError::Forbidden(_))
    ));

    let reservation = manager
        .create(&instructor("p1"), booking("r1", "08:00", "10:00"))
        .unwrap();
    assert!(matches!(
        manager.cancel(&guest, reservation.id),
        Err(BookingError::Forbidden(_))
    ));

    // Listing stays open
    assert_eq!(manager.list(&ReservationQuery::default()).unwrap().len(), 1);
}

#[test]
fn test_unknown_reservation_is_not_found() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    assert!(matches!(
        manager.get(424242),
        Err(BookingError::NotFound(424242))
    ));
    assert!(matches!(
        manager.update(&actor, 424242, ReservationUpdate::default()),
        Err(BookingError::NotFound(424242))
    ));
    assert!(matches!(
        manager.cancel(&actor, 424242),
        Err(BookingError::NotFound(424242))
    ));
}

#[test]
fn test_terminal_states_are_terminal() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    manager.cancel(&actor, reservation.id).unwrap();

    // cancelled → active is refused
    let patch = ReservationUpdate {
        status: Some("active".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));

    // cancelled → rejected is refused as well
    let patch = ReservationUpdate {
        status: Some("rejected".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));

    let unchanged = manager.get(reservation.id).unwrap();
    assert_eq!(unchanged.status, ReservationStatus::Cancelled);
}

#[test]
fn test_reject_via_update() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    let patch = ReservationUpdate {
        status: Some("rejected".into()),
        ..Default::default()
    };
    let rejected = manager.update(&actor, reservation.id, patch).unwrap();
    assert_eq!(rejected.status, ReservationStatus::Rejected);

    // A rejected reservation cannot be cancelled
    expect_validation(manager.cancel(&actor, reservation.id));

    // ...and its slot is free again
    manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
}

#[test]
fn test_recancel_is_idempotent() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    manager.cancel(&actor, reservation.id).unwrap();

    let notes_before = manager.notifications_for("p1").unwrap().len();
    let again = manager.cancel(&actor, reservation.id).unwrap();
    assert_eq!(again.status, ReservationStatus::Cancelled);

    // The no-op transition emits nothing
    assert_eq!(manager.notifications_for("p1").unwrap().len(), notes_before);
}

#[test]
fn test_invalid_status_value_rejected() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    let patch = ReservationUpdate {
        status: Some("paused".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));
}

#[test]
fn test_moving_a_cancelled_reservation_is_refused() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    manager.cancel(&actor, reservation.id).unwrap();

    let patch = ReservationUpdate {
        start: Some("2024-01-15T09:00".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));
}

#[test]
fn test_update_validates_effective_interval() {
    let manager = create_test_manager();
    let actor = instructor("p1");

    let reservation = manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();

    // Patch start beyond the existing end
    let patch = ReservationUpdate {
        start: Some("2024-01-15T11:00".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));

    let patch = ReservationUpdate {
        start: Some("garbage".into()),
        ..Default::default()
    };
    expect_validation(manager.update(&actor, reservation.id, patch));
}

#[test]
fn test_ownership_reassignment_is_coordinator_only() {
    let manager = create_test_manager();

    let reservation = manager
        .create(&instructor("p1"), booking("r1", "08:00", "10:00"))
        .unwrap();

    let patch = ReservationUpdate {
        owner_id: Some("p2".into()),
        ..Default::default()
    };
    assert!(matches!(
        manager.update(&instructor("p1"), reservation.id, patch.clone()),
        Err(BookingError::Forbidden(_))
    ));

    let updated = manager.update(&coordinator(), reservation.id, patch).unwrap();
    assert_eq!(updated.owner_id, "p2");

    // The new owner can now manage the reservation, the old one cannot
    assert!(matches!(
        manager.cancel(&instructor("p1"), reservation.id),
        Err(BookingError::Forbidden(_))
    ));
    manager.cancel(&instructor("p2"), reservation.id).unwrap();
}

#[test]
fn test_room_directory_gates_creates() {
    let mut rooms = StaticRoomDirectory::new();
    rooms.set("r1", RoomAvailability::Bookable);
    rooms.set("r5", RoomAvailability::Unavailable);

    let store = RedbStore::open_in_memory().unwrap();
    let notifier = NotificationEmitter::new(Arc::new(store.clone()));
    let manager = ReservationManager::new(store, notifier).with_room_directory(Arc::new(rooms));
    let actor = instructor("p1");

    manager
        .create(&actor, booking("r1", "08:00", "10:00"))
        .unwrap();
    expect_validation(manager.create(&actor, booking("r5", "08:00", "10:00")));

    // Rooms the directory does not know are accepted
    manager
        .create(&actor, booking("r9", "08:00", "10:00"))
        .unwrap();

    // Status-only transitions skip the directory entirely
    let reservation = manager
        .create(&actor, booking("r1", "10:00", "12:00"))
        .unwrap();
    manager.cancel(&actor, reservation.id).unwrap();
}
