use tracing::info;

use super::error::EngineError;
use super::types::{Doctor, SlotStatus};

/// Upper bound on a single reported delay: 5 hours.
pub const MAX_DELAY_MINUTES: u32 = 300;

/// Shifts the target slot and every slot after it by `delay_minutes`,
/// marking each one DELAYED. Earlier slots are untouched; occupants and
/// capacities are never altered. Repeated delays accumulate.
pub fn propagate_delay(
    doctor: &mut Doctor,
    slot_id: &str,
    delay_minutes: u32,
) -> Result<(), EngineError> {
    if delay_minutes > MAX_DELAY_MINUTES {
        return Err(EngineError::InvalidArgument(format!(
            "delay limit is {} minutes, got {}",
            MAX_DELAY_MINUTES, delay_minutes
        )));
    }

    let position = doctor
        .slot_position(slot_id)
        .ok_or_else(|| EngineError::NotFound(format!("slot '{}'", slot_id)))?;

    for slot in &mut doctor.slots[position..] {
        slot.start_time = slot.start_time.add_minutes(delay_minutes);
        slot.end_time = slot.end_time.add_minutes(delay_minutes);
        slot.status = SlotStatus::Delayed;
    }

    info!(
        doctor = %doctor.id,
        slot = %slot_id,
        minutes = delay_minutes,
        shifted = doctor.slots.len() - position,
        "delay propagated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ClockTime;
    use crate::engine::types::Slot;

    fn two_slot_doctor() -> Doctor {
        let mut doctor = Doctor::new("d1", "Dr. Jones", "Orthopedics");
        doctor.add_slot(Slot::new(
            "s1",
            ClockTime::parse("09:00").unwrap(),
            ClockTime::parse("10:00").unwrap(),
            3,
        ));
        doctor.add_slot(Slot::new(
            "s2",
            ClockTime::parse("10:00").unwrap(),
            ClockTime::parse("11:00").unwrap(),
            3,
        ));
        doctor
    }

    #[test]
    fn delay_shifts_target_and_later_slots() {
        let mut doctor = two_slot_doctor();
        propagate_delay(&mut doctor, "s1", 15).unwrap();

        assert_eq!(doctor.slots[0].start_time.to_string(), "09:15");
        assert_eq!(doctor.slots[0].end_time.to_string(), "10:15");
        assert_eq!(doctor.slots[1].start_time.to_string(), "10:15");
        assert_eq!(doctor.slots[1].end_time.to_string(), "11:15");
        assert_eq!(doctor.slots[0].status, SlotStatus::Delayed);
        assert_eq!(doctor.slots[1].status, SlotStatus::Delayed);
    }

    #[test]
    fn delay_leaves_earlier_slots_untouched() {
        let mut doctor = two_slot_doctor();
        propagate_delay(&mut doctor, "s2", 30).unwrap();

        assert_eq!(doctor.slots[0].start_time.to_string(), "09:00");
        assert_eq!(doctor.slots[0].status, SlotStatus::OnTime);
        assert_eq!(doctor.slots[1].start_time.to_string(), "10:30");
        assert_eq!(doctor.slots[1].status, SlotStatus::Delayed);
    }

    #[test]
    fn delays_accumulate_across_calls() {
        let mut doctor = two_slot_doctor();
        propagate_delay(&mut doctor, "s1", 10).unwrap();
        propagate_delay(&mut doctor, "s1", 20).unwrap();
        assert_eq!(doctor.slots[0].start_time.to_string(), "09:30");
        assert_eq!(doctor.slots[1].end_time.to_string(), "11:30");
    }

    #[test]
    fn delay_wraps_within_the_day() {
        let mut doctor = Doctor::new("d1", "Dr. Night", "ER");
        doctor.add_slot(Slot::new(
            "n1",
            ClockTime::parse("23:30").unwrap(),
            ClockTime::parse("23:59").unwrap(),
            1,
        ));
        propagate_delay(&mut doctor, "n1", 45).unwrap();
        assert_eq!(doctor.slots[0].start_time.to_string(), "00:15");
        assert_eq!(doctor.slots[0].end_time.to_string(), "00:44");
    }

    #[test]
    fn delay_above_ceiling_is_invalid() {
        let mut doctor = two_slot_doctor();
        let err = propagate_delay(&mut doctor, "s1", 301).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        // Nothing changed
        assert_eq!(doctor.slots[0].start_time.to_string(), "09:00");
    }

    #[test]
    fn delay_on_unknown_slot_is_not_found() {
        let mut doctor = two_slot_doctor();
        let err = propagate_delay(&mut doctor, "nope", 10).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn delay_never_touches_occupants() {
        use crate::engine::admission::admit;
        use crate::engine::types::{Source, Token};

        let mut doctor = two_slot_doctor();
        admit(&mut doctor, Token::new("Alice", Source::Online, 1));
        propagate_delay(&mut doctor, "s1", 300).unwrap();
        assert_eq!(doctor.slots[0].current_tokens.len(), 1);
        assert_eq!(doctor.slots[0].hard_limit, 3);
    }
}
