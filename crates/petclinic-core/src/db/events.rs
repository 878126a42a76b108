//! Pet event database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Event, EventType, NewEvent};

impl Database {
    /// Insert an event for a pet and return it with its assigned id.
    pub fn insert_event(&self, pet_id: i64, event: &NewEvent) -> DbResult<Event> {
        self.conn.execute(
            r#"
            INSERT INTO events (pet_id, event_type, date_ts, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                pet_id,
                event_type_to_string(&event.event_type),
                event.date.timestamp(),
                event.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_event(id)?
            .ok_or_else(|| DbError::NotFound(format!("event {}", id)))
    }

    /// Get an event by id.
    pub fn get_event(&self, id: i64) -> DbResult<Option<Event>> {
        self.conn
            .query_row(
                r#"
                SELECT id, pet_id, event_type, date_ts, notes, created_at, updated_at
                FROM events
                WHERE id = ?
                "#,
                [id],
                map_event_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all events of a pet, earliest first.
    pub fn list_events_for_pet(&self, pet_id: i64) -> DbResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, event_type, date_ts, notes, created_at, updated_at
            FROM events
            WHERE pet_id = ?
            ORDER BY date_ts ASC, id ASC
            "#,
        )?;

        let rows = stmt.query_map([pet_id], map_event_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.try_into()?);
        }
        Ok(events)
    }

    /// Update an existing event.
    pub fn update_event(&self, event: &Event) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE events SET
                event_type = ?2,
                date_ts = ?3,
                notes = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                event.id,
                event_type_to_string(&event.event_type),
                event.date.timestamp(),
                event.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an event.
    pub fn delete_event(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM events WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        event_type: row.get(2)?,
        date_ts: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Intermediate row struct for database mapping.
struct EventRow {
    id: i64,
    pet_id: i64,
    event_type: String,
    date_ts: i64,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let date = chrono::DateTime::from_timestamp(row.date_ts, 0)
            .ok_or_else(|| DbError::Constraint(format!("Bad event timestamp: {}", row.date_ts)))?;

        Ok(Event {
            id: row.id,
            pet_id: row.pet_id,
            event_type: string_to_event_type(&row.event_type)?,
            date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn event_type_to_string(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::Vet => "VET",
        EventType::Walk => "WALK",
        EventType::Grooming => "GROOMING",
        EventType::Training => "TRAINING",
        EventType::Other => "OTHER",
    }
}

fn string_to_event_type(s: &str) -> Result<EventType, DbError> {
    match s {
        "VET" => Ok(EventType::Vet),
        "WALK" => Ok(EventType::Walk),
        "GROOMING" => Ok(EventType::Grooming),
        "TRAINING" => Ok(EventType::Training),
        "OTHER" => Ok(EventType::Other),
        _ => Err(DbError::Constraint(format!("Unknown event type: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventUpdate, NewPet, UserRole};
    use chrono::{TimeZone, Utc};

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner = db.insert_user("Ana", "ana@x.test", UserRole::User).unwrap();
        let pet = db
            .insert_pet(
                owner.id,
                &NewPet {
                    name: "Max".into(),
                    breed: "Beagle".into(),
                    species: None,
                    age: None,
                },
            )
            .unwrap();
        (db, pet.id)
    }

    fn make_event(day: u32) -> NewEvent {
        NewEvent {
            event_type: EventType::Walk,
            date: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let (db, pet_id) = setup();
        let event = db.insert_event(pet_id, &make_event(1)).unwrap();

        let retrieved = db.get_event(event.id).unwrap().unwrap();
        assert_eq!(retrieved.event_type, EventType::Walk);
        assert_eq!(retrieved.pet_id, pet_id);
    }

    #[test]
    fn test_list_ordered_by_date() {
        let (db, pet_id) = setup();
        db.insert_event(pet_id, &make_event(3)).unwrap();
        db.insert_event(pet_id, &make_event(1)).unwrap();
        db.insert_event(pet_id, &make_event(2)).unwrap();

        let events = db.list_events_for_pet(pet_id).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_update_and_delete() {
        let (db, pet_id) = setup();
        let mut event = db.insert_event(pet_id, &make_event(1)).unwrap();

        event.apply(EventUpdate {
            event_type: Some(EventType::Vet),
            notes: Some("vaccination".into()),
            ..Default::default()
        });
        assert!(db.update_event(&event).unwrap());

        let reloaded = db.get_event(event.id).unwrap().unwrap();
        assert_eq!(reloaded.event_type, EventType::Vet);
        assert_eq!(reloaded.notes, Some("vaccination".into()));

        assert!(db.delete_event(event.id).unwrap());
        assert!(db.get_event(event.id).unwrap().is_none());
    }
}
