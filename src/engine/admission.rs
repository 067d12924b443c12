use tracing::{info, warn};

use super::types::{BookingOutcome, Doctor, Slot, Source, Token};

/// Places a new token on the doctor's schedule. Stages run in strict order
/// and the first one that admits wins:
/// 1. Direct fit into the first slot with spare capacity.
/// 2. Emergency overflow: an EMERGENCY token is forced into the first slot
///    even past its hard limit.
/// 3. Priority displacement: bump a slot's lowest-ranked occupant one slot
///    later to make room for a higher-priority newcomer.
/// If no stage admits, the request is rejected (a normal outcome, not an
/// error).
pub fn admit(doctor: &mut Doctor, token: Token) -> BookingOutcome {
    // 1. First slot with space, in sequence order
    if let Some(idx) = doctor.slots.iter().position(|s| !s.is_full()) {
        let placed = assign_to_slot(doctor, idx, token);
        return BookingOutcome::admitted(placed);
    }

    // 2. Elastic overflow for emergencies: force into the earliest slot
    if token.source == Source::Emergency {
        if doctor.slots.is_empty() {
            return BookingOutcome::rejected("No slots available");
        }
        warn!(
            doctor = %doctor.id,
            patient = %token.patient_name,
            slot = %doctor.slots[0].id,
            "forcing emergency past hard limit into first slot"
        );
        let placed = assign_to_slot(doctor, 0, token);
        return BookingOutcome::admitted(placed);
    }

    // 3. Priority displacement: relocate a lower-priority occupant one slot
    // later. The hop does not cascade; a full next slot fails the bump and
    // scanning moves on.
    for idx in 0..doctor.slots.len() {
        let outranked = doctor.slots[idx]
            .lowest_ranked()
            .is_some_and(|lowest| token.priority_score > lowest.priority_score);
        if !outranked {
            continue;
        }
        if bump_lowest_to_next(doctor, idx) {
            info!(
                doctor = %doctor.id,
                slot = %doctor.slots[idx].id,
                patient = %token.patient_name,
                "displaced lowest-priority occupant to the next slot"
            );
            let placed = assign_to_slot(doctor, idx, token);
            return BookingOutcome::admitted(placed);
        }
    }

    BookingOutcome::rejected("No slots available")
}

/// Inserts the token into the slot at `slot_index`, sets its back-reference
/// and restores the within-slot ordering. Returns a copy of the placed token
/// for the caller's response.
fn assign_to_slot(doctor: &mut Doctor, slot_index: usize, mut token: Token) -> Token {
    let slot = &mut doctor.slots[slot_index];
    token.assigned_slot_id = Some(slot.id.clone());
    let placed = token.clone();
    slot.current_tokens.push(token);
    sort_occupants(slot);
    placed
}

/// Within-slot ordering invariant: priority descending, then creation order
/// ascending. The last element is always the lowest-ranked occupant.
pub(crate) fn sort_occupants(slot: &mut Slot) {
    slot.current_tokens.sort_by(|a, b| {
        b.priority_score
            .cmp(&a.priority_score)
            .then(a.timestamp.cmp(&b.timestamp))
    });
}

/// Moves the lowest-ranked occupant of `slot_index` into the next slot in
/// sequence. Fails if there is no next slot, the next slot is full, or the
/// slot has no occupants. Exactly one hop; never cascades further.
pub(crate) fn bump_lowest_to_next(doctor: &mut Doctor, slot_index: usize) -> bool {
    if slot_index + 1 >= doctor.slots.len() {
        return false;
    }
    if doctor.slots[slot_index + 1].is_full() {
        return false;
    }
    let Some(bumped) = doctor.slots[slot_index].current_tokens.pop() else {
        return false;
    };
    assign_to_slot(doctor, slot_index + 1, bumped);
    true
}
