use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::{ClockTime, Doctor, OpdEngine, Slot, SlotStatus, Source};

fn slot(id: &str, start: &str, end: &str, hard_limit: usize) -> Slot {
    let start = ClockTime::parse(start).unwrap();
    let end = ClockTime::parse(end).unwrap();
    Slot::new(id, start, end, hard_limit)
}

/// Scripted three-doctor scenario: fills a slot with mixed sources, forces
/// an emergency past the hard limit, cascades a delay and demonstrates a
/// capacity rejection.
pub fn run_scripted() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Starting OPD Simulation (3 Doctor Scenario) ===\n");

    let engine = OpdEngine::new();

    println!("-> Setting up 3 Doctors...");
    let mut d1 = Doctor::new("d1", "Dr. Smith", "Cardiology");
    d1.add_slot(slot("s1-1", "09:00", "10:00", 3));
    d1.add_slot(slot("s1-2", "10:00", "11:00", 3));
    engine.add_doctor(d1)?;

    let mut d2 = Doctor::new("d2", "Dr. Jones", "Orthopedics");
    d2.add_slot(slot("s2-1", "09:00", "10:00", 4));
    d2.add_slot(slot("s2-2", "10:00", "11:00", 4));
    engine.add_doctor(d2)?;

    // Long slot, low cap
    let mut d3 = Doctor::new("d3", "Dr. Strange", "Neurology");
    d3.add_slot(slot("s3-1", "09:00", "12:00", 2));
    engine.add_doctor(d3)?;
    println!("-> Doctors Setup Complete: Smith, Jones, Strange\n");

    println!("-> [Dr. Smith] Booking mixed sources...");
    engine.request_token("d1", "Alice (Online)", Source::Online)?;
    engine.request_token("d1", "Bob (Walkin)", Source::Walkin)?;
    engine.request_token("d1", "Charlie (Paid)", Source::Paid)?;
    print_slot(&engine, "d1", "s1-1"); // Full (3/3)

    println!("\n-> [Dr. Smith] Emergency Arrives (Slot Full)...");
    let emerg = engine.request_token("d1", "Px EMERGENCY", Source::Emergency)?;
    println!(
        "   Outcome: {} (Slot: {})",
        if emerg.success { "ACCEPTED" } else { "REJECTED" },
        emerg.slot_id.as_deref().unwrap_or("-")
    );
    print_slot(&engine, "d1", "s1-1"); // Elastic overflow (4/3)

    println!("\n-> [Dr. Jones] Reporting 15 min delay...");
    engine.report_delay("d2", "s2-1", 15)?;
    println!("   Dr. Jones Schedule Updated:");
    for s in &engine.snapshot()["d2"].slots {
        let status = if s.status == SlotStatus::Delayed {
            "DELAYED"
        } else {
            "ON_TIME"
        };
        println!("   Slot {}: {} - {} ({})", s.id, s.start_time, s.end_time, status);
    }

    println!("\n-> [Dr. Strange] Filling Capacity...");
    engine.request_token("d3", "User 1", Source::Online)?;
    engine.request_token("d3", "User 2", Source::Online)?;
    let res3 = engine.request_token("d3", "User 3", Source::Walkin)?;
    println!(
        "   User 3 (Walkin) Outcome: {}",
        if res3.success { "Success" } else { "REJECTED (Full)" }
    );

    println!("\n=== Simulation Complete ===");
    Ok(())
}

fn print_slot(engine: &OpdEngine, doctor_id: &str, slot_id: &str) {
    let snapshot = engine.snapshot();
    let Some(doctor) = snapshot.get(doctor_id) else {
        return;
    };
    let Some(slot) = doctor.slots.iter().find(|s| s.id == slot_id) else {
        return;
    };
    let names: Vec<String> = slot
        .current_tokens
        .iter()
        .map(|t| format!("{} ({})", t.patient_name, t.priority_score))
        .collect();
    println!(
        "   [{}] ({}/{}): {}",
        slot_id,
        slot.current_tokens.len(),
        slot.hard_limit,
        names.join(", ")
    );
}

const NAMES: [&str; 10] = [
    "Alice", "Bob", "Charlie", "David", "Eva", "Frank", "Grace", "Henry", "Ivy", "Jack",
];

/// Randomized real-time loop: each tick books (60%), cancels (20%), delays
/// (10%) or idles (10%); prints a live status board every 10 ticks. Runs
/// until interrupted.
pub async fn run_live(tick_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("Initializing Dynamic OPD Simulation...");

    let engine = OpdEngine::new();

    let mut d1 = Doctor::new("d1", "Dr. Pankaj", "Cardiology");
    d1.add_slot(slot("s1", "09:00", "10:00", 3));
    d1.add_slot(slot("s2", "10:00", "11:00", 3));
    engine.add_doctor(d1)?;

    let mut d2 = Doctor::new("d2", "Dr. Rahul", "Diagnostics");
    d2.add_slot(slot("h1", "09:00", "10:00", 2)); // Strict limit
    d2.add_slot(slot("h2", "10:00", "12:00", 4));
    engine.add_doctor(d2)?;

    println!("Doctors Ready.\n");

    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms));
    let mut tick = 0u64;
    loop {
        ticker.tick().await;
        tick += 1;

        let p: f64 = rand::thread_rng().gen();
        if p < 0.6 {
            action_book(&engine);
        } else if p < 0.8 {
            action_cancel(&engine);
        } else if p < 0.9 {
            action_delay(&engine);
        } else {
            println!("...");
        }

        if tick % 10 == 0 {
            print_board(&engine);
        }
    }
}

fn action_book(engine: &OpdEngine) {
    let mut rng = rand::thread_rng();
    let ids = engine.doctor_ids();
    let Some(doctor_id) = ids.choose(&mut rng) else {
        return;
    };
    let name = format!(
        "{}-{}",
        NAMES.choose(&mut rng).unwrap(),
        rng.gen_range(1..=999)
    );
    let source = if rng.gen_bool(0.8) {
        [Source::Online, Source::Walkin].choose(&mut rng).unwrap().clone()
    } else {
        [Source::Paid, Source::Emergency].choose(&mut rng).unwrap().clone()
    };

    match engine.request_token(doctor_id, &name, source.clone()) {
        Ok(res) if res.success => println!(
            "[BOOK] {} ({}) -> {} (Slot: {})",
            name,
            source.as_str(),
            doctor_id,
            res.slot_id.as_deref().unwrap_or("-")
        ),
        Ok(_) => println!(
            "[FULL] {} ({}) -> {} Rejected (No Slots)",
            name,
            source.as_str(),
            doctor_id
        ),
        Err(e) => eprintln!("Error booking: {}", e),
    }
}

fn action_cancel(engine: &OpdEngine) {
    let mut rng = rand::thread_rng();
    let snapshot = engine.snapshot();
    let doctors: Vec<&Doctor> = snapshot.values().collect();
    let Some(&doctor) = doctors.choose(&mut rng) else {
        return;
    };
    let occupied: Vec<&Slot> = doctor
        .slots
        .iter()
        .filter(|s| !s.current_tokens.is_empty())
        .collect();
    let Some(slot) = occupied.choose(&mut rng) else {
        return; // Nothing to cancel
    };
    let idx = rng.gen_range(0..slot.current_tokens.len());
    let patient = slot.current_tokens[idx].patient_name.clone();

    if engine.cancel_token(&doctor.id, &slot.id, idx) {
        println!(
            "[CANCEL] {} cancelled from {} (Slot: {})",
            patient, doctor.name, slot.id
        );
    }
}

fn action_delay(engine: &OpdEngine) {
    let mut rng = rand::thread_rng();
    let snapshot = engine.snapshot();
    let doctors: Vec<&Doctor> = snapshot.values().collect();
    let Some(&doctor) = doctors.choose(&mut rng) else {
        return;
    };
    let Some(slot) = doctor.slots.choose(&mut rng) else {
        return;
    };
    let delay = rng.gen_range(10..=45);

    println!("[EVENT] {} Slot {} DELAYED by {} mins!", doctor.name, slot.id, delay);
    if engine.report_delay(&doctor.id, &slot.id, delay).is_ok() {
        let times: Vec<String> = engine.snapshot()[&doctor.id]
            .slots
            .iter()
            .map(|s| format!("{}-{}", s.start_time, s.end_time))
            .collect();
        println!("   -> New Schedule: {}", times.join(", "));
    }
}

fn print_board(engine: &OpdEngine) {
    println!("\n--- LIVE BOARD STATUS ---");
    let snapshot = engine.snapshot();
    let mut doctors: Vec<_> = snapshot.values().collect();
    doctors.sort_by(|a, b| a.id.cmp(&b.id));
    for doctor in doctors {
        println!("{} ({}):", doctor.name, doctor.specialty);
        for s in &doctor.slots {
            let used = s.current_tokens.len();
            let bar = "█".repeat(used) + &"░".repeat(s.hard_limit.saturating_sub(used));
            let status = if s.status == SlotStatus::Delayed {
                " [DELAYED]"
            } else {
                ""
            };
            println!(
                "  {}-{} | {}/{} [{}]{}",
                s.start_time, s.end_time, used, s.hard_limit, bar, status
            );
        }
    }
    println!("--------------------------\n");
}
