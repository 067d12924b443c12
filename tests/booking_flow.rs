//! End-to-end engine scenarios through the public API.

use opd_tokens::engine::{ClockTime, Doctor, OpdEngine, Slot, SlotStatus, Source};

fn slot(id: &str, start: &str, end: &str, hard_limit: usize) -> Slot {
    Slot::new(
        id,
        ClockTime::parse(start).unwrap(),
        ClockTime::parse(end).unwrap(),
        hard_limit,
    )
}

fn engine_with_d1() -> OpdEngine {
    let engine = OpdEngine::new();
    let mut d1 = Doctor::new("d1", "Dr. Smith", "Cardiology");
    d1.add_slot(slot("s1", "09:00", "10:00", 3));
    d1.add_slot(slot("s2", "10:00", "11:00", 3));
    engine.add_doctor(d1).unwrap();
    engine
}

#[test]
fn emergency_overflows_a_fully_walkin_slot() {
    let engine = engine_with_d1();
    for name in ["w1", "w2", "w3"] {
        engine.request_token("d1", name, Source::Walkin).unwrap();
    }
    // s1 now full at 3/3; fill s2 too so only overflow can admit
    for name in ["w4", "w5", "w6"] {
        engine.request_token("d1", name, Source::Walkin).unwrap();
    }

    let res = engine
        .request_token("d1", "Px EMERGENCY", Source::Emergency)
        .unwrap();
    assert!(res.success);
    assert_eq!(res.slot_id.as_deref(), Some("s1"));

    let snapshot = engine.snapshot();
    let s1 = &snapshot["d1"].slots[0];
    assert_eq!(s1.current_tokens.len(), 4); // 4/3
    assert_eq!(s1.current_tokens[0].patient_name, "Px EMERGENCY");
}

#[test]
fn fifteen_minute_delay_shifts_both_slots() {
    let engine = engine_with_d1();
    engine.report_delay("d1", "s1", 15).unwrap();

    let snapshot = engine.snapshot();
    let slots = &snapshot["d1"].slots;
    assert_eq!(
        (slots[0].start_time.to_string(), slots[0].end_time.to_string()),
        ("09:15".to_string(), "10:15".to_string())
    );
    assert_eq!(
        (slots[1].start_time.to_string(), slots[1].end_time.to_string()),
        ("10:15".to_string(), "11:15".to_string())
    );
    assert!(slots.iter().all(|s| s.status == SlotStatus::Delayed));
}

#[test]
fn booking_cancel_and_rebook_reuses_the_freed_seat() {
    let engine = engine_with_d1();
    for i in 0..6 {
        engine
            .request_token("d1", &format!("p{}", i), Source::Online)
            .unwrap();
    }
    let rejected = engine.request_token("d1", "late", Source::Online).unwrap();
    assert!(!rejected.success);

    assert!(engine.cancel_token("d1", "s2", 1));
    let rebooked = engine.request_token("d1", "late", Source::Online).unwrap();
    assert!(rebooked.success);
    assert_eq!(rebooked.slot_id.as_deref(), Some("s2"));
}

#[test]
fn operations_on_different_doctors_are_independent() {
    let engine = engine_with_d1();
    let mut d2 = Doctor::new("d2", "Dr. Jones", "Orthopedics");
    d2.add_slot(slot("j1", "09:00", "10:00", 4));
    engine.add_doctor(d2).unwrap();

    engine.request_token("d1", "Alice", Source::Online).unwrap();
    engine.report_delay("d2", "j1", 30).unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot["d1"].slots[0].status, SlotStatus::OnTime);
    assert_eq!(snapshot["d2"].slots[0].start_time.to_string(), "09:30");
    assert!(snapshot["d2"].slots[0].current_tokens.is_empty());
}

#[test]
fn parallel_bookings_respect_per_doctor_serialization() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(engine_with_d1());
    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            engine
                .request_token("d1", &format!("p{}", i), Source::Online)
                .unwrap()
        }));
    }
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.success)
        .count();

    // Capacity is 3 + 3; exactly six bookings land, the rest are rejected
    assert_eq!(successes, 6);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot["d1"].slots[0].current_tokens.len(), 3);
    assert_eq!(snapshot["d1"].slots[1].current_tokens.len(), 3);
}
