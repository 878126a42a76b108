//! Pet-scoped event models (vaccination, walk and feeding logs, and similar).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a pet-scoped event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Vet,
    Walk,
    Grooming,
    Training,
    Other,
}

/// An entry in a pet's private log. Only the owning user can touch it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Row id assigned by the store
    pub id: i64,
    /// Pet the event belongs to
    pub pet_id: i64,
    /// Event kind
    pub event_type: EventType,
    /// When the event happens, UTC
    pub date: DateTime<Utc>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Input for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial update for an event; `None` fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub event_type: Option<EventType>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Event {
    /// Apply a partial update.
    pub fn apply(&mut self, update: EventUpdate) {
        if let Some(event_type) = update.event_type {
            self.event_type = event_type;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut event = Event {
            id: 1,
            pet_id: 2,
            event_type: EventType::Walk,
            date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            notes: Some("morning walk".into()),
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: "2026-01-01T00:00:00+00:00".into(),
        };
        event.apply(EventUpdate {
            event_type: Some(EventType::Grooming),
            ..Default::default()
        });
        assert_eq!(event.event_type, EventType::Grooming);
        assert_eq!(event.notes, Some("morning walk".into()));
    }
}
