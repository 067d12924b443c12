use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::ClockTime;

/// Origin category of a booking request. Determines the priority weight used
/// for within-slot ranking and displacement. Unknown categories are carried
/// through verbatim and weigh 0 rather than being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Online,
    Walkin,
    Paid,
    Priority,
    Emergency,
    Other(String),
}

impl Source {
    /// Fixed priority weight table; not configurable at runtime.
    pub fn priority_weight(&self) -> u32 {
        match self {
            Source::Emergency => 100,
            Source::Priority | Source::Paid => 50,
            Source::Walkin | Source::Online => 10,
            Source::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Source::Online => "ONLINE",
            Source::Walkin => "WALKIN",
            Source::Paid => "PAID",
            Source::Priority => "PRIORITY",
            Source::Emergency => "EMERGENCY",
            Source::Other(s) => s,
        }
    }
}

impl From<String> for Source {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ONLINE" => Source::Online,
            "WALKIN" => Source::Walkin,
            "PAID" => Source::Paid,
            "PRIORITY" => Source::Priority,
            "EMERGENCY" => Source::Emergency,
            _ => Source::Other(raw),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.as_str().to_string()
    }
}

/// Whether a slot still runs at its published time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    #[default]
    OnTime,
    Delayed,
}

/// One patient's claim on a slot. Immutable after creation except for the
/// assigned-slot back-reference, which the admission engine sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub patient_name: String,
    pub source: Source,
    pub priority_score: u32,
    /// Monotonic creation sequence number, used only for tie-breaking.
    pub timestamp: u64,
    pub assigned_slot_id: Option<String>,
}

impl Token {
    pub fn new(patient_name: &str, source: Source, timestamp: u64) -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(char::from)
            .collect();
        let priority_score = source.priority_weight();
        Token {
            id,
            patient_name: patient_name.to_string(),
            source,
            priority_score,
            timestamp,
            assigned_slot_id: None,
        }
    }
}

/// A fixed-capacity time window in a doctor's daily schedule. Occupants are
/// kept sorted by (priority descending, timestamp ascending); the list
/// position is the displayed rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub hard_limit: usize,
    #[serde(default)]
    pub current_tokens: Vec<Token>,
    #[serde(default)]
    pub status: SlotStatus,
}

impl Slot {
    pub fn new(id: &str, start_time: ClockTime, end_time: ClockTime, hard_limit: usize) -> Self {
        Slot {
            id: id.to_string(),
            start_time,
            end_time,
            hard_limit,
            current_tokens: Vec::new(),
            status: SlotStatus::OnTime,
        }
    }

    /// Full under the normal admission policy. Emergency overflow may push
    /// occupancy past the hard limit, in which case this stays true.
    pub fn is_full(&self) -> bool {
        self.current_tokens.len() >= self.hard_limit
    }

    /// The last-ranked occupant, i.e. lowest priority, latest arrival.
    pub fn lowest_ranked(&self) -> Option<&Token> {
        self.current_tokens.last()
    }
}

/// A schedulable doctor owning an ordered sequence of slots. Slot order is
/// semantically significant: it defines "earlier" and "later" for overflow
/// and displacement. Slots are appended at setup and never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Doctor {
    pub fn new(id: &str, name: &str, specialty: &str) -> Self {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            slots: Vec::new(),
        }
    }

    pub fn add_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn slot_position(&self, slot_id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id == slot_id)
    }
}

/// Result of a booking request. `success: false` is a normal outcome of a
/// fully booked schedule, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingOutcome {
    pub fn admitted(token: Token) -> Self {
        let slot_id = token.assigned_slot_id.clone();
        BookingOutcome {
            success: true,
            token: Some(token),
            slot_id,
            message: None,
        }
    }

    pub fn rejected(message: &str) -> Self {
        BookingOutcome {
            success: false,
            token: None,
            slot_id: None,
            message: Some(message.to_string()),
        }
    }
}
