pub mod admission;
pub mod clock;
pub mod delay;
pub mod error;
pub mod types;

pub use clock::ClockTime;
pub use delay::MAX_DELAY_MINUTES;
pub use error::EngineError;
pub use types::{BookingOutcome, Doctor, Slot, SlotStatus, Source, Token};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::info;

/// The token allocation engine. Owns the doctor registry; each doctor is its
/// own unit of mutual exclusion, so operations on different doctors run in
/// parallel while all mutations of one doctor's schedule are serialized. No
/// operation does I/O or blocks while holding a lock.
pub struct OpdEngine {
    doctors: RwLock<HashMap<String, Mutex<Doctor>>>,
    /// Monotonic sequence for token creation order (tie-breaking only).
    token_seq: AtomicU64,
}

impl OpdEngine {
    pub fn new() -> Self {
        OpdEngine {
            doctors: RwLock::new(HashMap::new()),
            token_seq: AtomicU64::new(0),
        }
    }

    /// Registers a doctor. Re-registering an existing id replaces the
    /// previous registration. Duplicate slot ids within one doctor are
    /// rejected since slot lookups (delay, cancel) would be ambiguous.
    pub fn add_doctor(&self, doctor: Doctor) -> Result<(), EngineError> {
        for (i, slot) in doctor.slots.iter().enumerate() {
            if slot.id.is_empty() {
                return Err(EngineError::InvalidArgument("empty slot id".to_string()));
            }
            if doctor.slots[..i].iter().any(|s| s.id == slot.id) {
                return Err(EngineError::InvalidArgument(format!(
                    "duplicate slot id '{}'",
                    slot.id
                )));
            }
        }
        if doctor.id.is_empty() {
            return Err(EngineError::InvalidArgument("empty doctor id".to_string()));
        }

        info!(doctor = %doctor.id, slots = doctor.slots.len(), "doctor registered");
        self.doctors
            .write()
            .unwrap()
            .insert(doctor.id.clone(), Mutex::new(doctor));
        Ok(())
    }

    /// Books a token for a patient with the given doctor. Capacity
    /// exhaustion is reported through the outcome, not as an error.
    pub fn request_token(
        &self,
        doctor_id: &str,
        patient_name: &str,
        source: Source,
    ) -> Result<BookingOutcome, EngineError> {
        let doctors = self.doctors.read().unwrap();
        let doctor = doctors
            .get(doctor_id)
            .ok_or_else(|| EngineError::NotFound(format!("doctor '{}'", doctor_id)))?;

        let timestamp = self.token_seq.fetch_add(1, Ordering::Relaxed);
        let token = Token::new(patient_name, source, timestamp);
        let outcome = admission::admit(&mut doctor.lock().unwrap(), token);
        Ok(outcome)
    }

    /// Shifts the given slot and all later slots of the doctor by
    /// `delay_minutes`, marking them DELAYED.
    pub fn report_delay(
        &self,
        doctor_id: &str,
        slot_id: &str,
        delay_minutes: u32,
    ) -> Result<(), EngineError> {
        let doctors = self.doctors.read().unwrap();
        let doctor = doctors
            .get(doctor_id)
            .ok_or_else(|| EngineError::NotFound(format!("doctor '{}'", doctor_id)))?;
        let result = delay::propagate_delay(&mut doctor.lock().unwrap(), slot_id, delay_minutes);
        result
    }

    /// Removes the occupant at `token_index` (0-based display rank) from the
    /// slot. Unknown ids or an out-of-range index are a failing no-op.
    pub fn cancel_token(&self, doctor_id: &str, slot_id: &str, token_index: usize) -> bool {
        let doctors = self.doctors.read().unwrap();
        let Some(doctor) = doctors.get(doctor_id) else {
            return false;
        };
        let mut doctor = doctor.lock().unwrap();
        let Some(slot) = doctor.slots.iter_mut().find(|s| s.id == slot_id) else {
            return false;
        };
        if token_index >= slot.current_tokens.len() {
            return false;
        }
        // Removal preserves the relative order of the rest; no re-sort.
        let removed = slot.current_tokens.remove(token_index);
        info!(
            doctor = %doctor_id,
            slot = %slot_id,
            patient = %removed.patient_name,
            "token cancelled"
        );
        true
    }

    /// Read-only snapshot of every doctor, keyed by id, for the dashboard.
    /// Token lists come out in rank order.
    pub fn snapshot(&self) -> HashMap<String, Doctor> {
        let doctors = self.doctors.read().unwrap();
        doctors
            .iter()
            .map(|(id, doctor)| (id.clone(), doctor.lock().unwrap().clone()))
            .collect()
    }

    pub fn doctor_ids(&self) -> Vec<String> {
        self.doctors.read().unwrap().keys().cloned().collect()
    }
}

impl Default for OpdEngine {
    fn default() -> Self {
        Self::new()
    }
}
