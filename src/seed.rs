use crate::engine::{ClockTime, Doctor, OpdEngine, Slot};

fn slot(id: &str, start: &str, end: &str, hard_limit: usize) -> Slot {
    let start = ClockTime::parse(start).unwrap();
    let end = ClockTime::parse(end).unwrap();
    Slot::new(id, start, end, hard_limit)
}

/// Demo doctors registered at web startup so the dashboard has data to show.
pub fn seed_demo_doctors(engine: &OpdEngine) {
    let mut doc1 = Doctor::new("doc1", "Dr. Pankaj", "Cardiology");
    doc1.add_slot(slot("s1", "09:00", "10:00", 3));
    doc1.add_slot(slot("s2", "10:00", "11:00", 3));

    let mut doc2 = Doctor::new("doc2", "Dr. Alia", "Pediatrics");
    doc2.add_slot(slot("p1", "09:00", "10:00", 5));
    doc2.add_slot(slot("p2", "10:00", "11:00", 5));

    let mut doc3 = Doctor::new("doc3", "Dr. Rahul", "Orthopedics");
    doc3.add_slot(slot("o1", "11:00", "12:00", 2));
    doc3.add_slot(slot("o2", "12:00", "13:00", 3));

    for doctor in [doc1, doc2, doc3] {
        // Seed data is static and valid; a failure here is a programming error
        engine
            .add_doctor(doctor)
            .expect("seed doctors must be valid");
    }
}
