//! Appointment database operations.
//!
//! Booking is a single check-then-insert unit inside an immediate
//! transaction, so two handles racing for the same veterinarian's slot cannot
//! both commit.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};

/// SQL names of the statuses that hold a veterinarian's slot.
const ACTIVE_STATUSES: &str = "'SCHEDULED', 'CONFIRMED', 'IN_PROGRESS'";

impl Database {
    /// Atomically check the veterinarian's availability and insert the
    /// appointment. Returns [`DbError::Conflict`] when an active appointment
    /// overlaps the proposed `[start, end)` slot; nothing is written in that
    /// case.
    pub fn book_appointment(&mut self, new: &NewAppointment) -> DbResult<Appointment> {
        let start_ts = new.start.timestamp();
        let end_ts = new.end().timestamp();

        let tx = self.immediate_transaction()?;

        if let Some(existing_id) =
            find_conflicting(&tx, new.veterinarian_id, start_ts, end_ts, None)?
        {
            return Err(DbError::Conflict(format!(
                "veterinarian {} already booked by appointment {}",
                new.veterinarian_id, existing_id
            )));
        }

        tx.execute(
            r#"
            INSERT INTO appointments (
                pet_id, veterinarian_id, start_ts, end_ts,
                duration_minutes, reason, notes, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'SCHEDULED')
            "#,
            params![
                new.pet_id,
                new.veterinarian_id,
                start_ts,
                end_ts,
                new.duration_minutes,
                new.reason,
                new.notes,
            ],
        )?;
        let id = tx.last_insert_rowid();

        let appointment = get_appointment_row(&tx, id)?
            .ok_or_else(|| DbError::NotFound(format!("appointment {}", id)))?;
        tx.commit()?;
        Ok(appointment)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        get_appointment_row(&self.conn, id)
    }

    /// Find one active appointment of the veterinarian overlapping
    /// `[start_ts, end_ts)`, skipping `exclude_id` when given. Returns its id.
    pub fn find_conflicting_appointment(
        &self,
        veterinarian_id: i64,
        start_ts: i64,
        end_ts: i64,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<i64>> {
        find_conflicting(&self.conn, veterinarian_id, start_ts, end_ts, exclude_id)
    }

    /// Compare-and-set the status of an appointment. Returns `false` when the
    /// row is gone or its status no longer equals `from` (a concurrent update
    /// won).
    pub fn set_appointment_status(
        &self,
        id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments
            SET status = ?3, updated_at = datetime('now')
            WHERE id = ?1 AND status = ?2
            "#,
            params![id, status_to_string(&from), status_to_string(&to)],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// List all appointments, newest slot first.
    pub fn list_appointments(&self, limit: i64, offset: i64) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, veterinarian_id, start_ts, end_ts,
                   duration_minutes, reason, notes, status, created_at, updated_at
            FROM appointments
            ORDER BY start_ts DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;
        let rows = stmt.query_map(params![limit, offset], map_appointment_row)?;
        collect_rows(rows)
    }

    /// Total number of appointments.
    pub fn count_appointments(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// List appointments for pets owned by a user, newest slot first.
    pub fn list_appointments_for_owner(
        &self,
        owner_id: i64,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.id, a.pet_id, a.veterinarian_id, a.start_ts, a.end_ts,
                   a.duration_minutes, a.reason, a.notes, a.status, a.created_at, a.updated_at
            FROM appointments a
            JOIN pets p ON p.id = a.pet_id
            WHERE p.user_id = ?1
            ORDER BY a.start_ts DESC, a.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(params![owner_id, limit, offset], map_appointment_row)?;
        collect_rows(rows)
    }

    /// Total appointments for pets owned by a user.
    pub fn count_appointments_for_owner(&self, owner_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                r#"
                SELECT COUNT(*)
                FROM appointments a
                JOIN pets p ON p.id = a.pet_id
                WHERE p.user_id = ?
                "#,
                [owner_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// List appointments assigned to a veterinarian, newest slot first.
    pub fn list_appointments_for_veterinarian(
        &self,
        veterinarian_id: i64,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, veterinarian_id, start_ts, end_ts,
                   duration_minutes, reason, notes, status, created_at, updated_at
            FROM appointments
            WHERE veterinarian_id = ?1
            ORDER BY start_ts DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(
            params![veterinarian_id, limit, offset],
            map_appointment_row,
        )?;
        collect_rows(rows)
    }

    /// Total appointments assigned to a veterinarian.
    pub fn count_appointments_for_veterinarian(&self, veterinarian_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM appointments WHERE veterinarian_id = ?",
                [veterinarian_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

/// Half-open interval overlap against active appointments only. Touching
/// endpoints (`existing.end == start_ts`) do not conflict.
fn find_conflicting(
    conn: &Connection,
    veterinarian_id: i64,
    start_ts: i64,
    end_ts: i64,
    exclude_id: Option<i64>,
) -> DbResult<Option<i64>> {
    conn.query_row(
        &format!(
            r#"
            SELECT id FROM appointments
            WHERE veterinarian_id = ?1
              AND status IN ({ACTIVE_STATUSES})
              AND start_ts < ?3
              AND ?2 < end_ts
              AND (?4 IS NULL OR id <> ?4)
            LIMIT 1
            "#
        ),
        params![veterinarian_id, start_ts, end_ts, exclude_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn get_appointment_row(conn: &Connection, id: i64) -> DbResult<Option<Appointment>> {
    conn.query_row(
        r#"
        SELECT id, pet_id, veterinarian_id, start_ts, end_ts,
               duration_minutes, reason, notes, status, created_at, updated_at
        FROM appointments
        WHERE id = ?
        "#,
        [id],
        map_appointment_row,
    )
    .optional()?
    .map(|row| row.try_into())
    .transpose()
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<AppointmentRow>>,
) -> DbResult<Vec<Appointment>> {
    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row?.try_into()?);
    }
    Ok(appointments)
}

fn map_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        veterinarian_id: row.get(2)?,
        start_ts: row.get(3)?,
        duration_minutes: row.get(5)?,
        reason: row.get(6)?,
        notes: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Intermediate row struct for database mapping. `end_ts` is derived, so it
/// is not read back.
struct AppointmentRow {
    id: i64,
    pet_id: i64,
    veterinarian_id: i64,
    start_ts: i64,
    duration_minutes: i64,
    reason: String,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let start = chrono::DateTime::from_timestamp(row.start_ts, 0)
            .ok_or_else(|| DbError::Constraint(format!("Bad start timestamp: {}", row.start_ts)))?;

        Ok(Appointment {
            id: row.id,
            pet_id: row.pet_id,
            veterinarian_id: row.veterinarian_id,
            start,
            duration_minutes: row.duration_minutes,
            reason: row.reason,
            notes: row.notes,
            status: string_to_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn status_to_string(status: &AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "SCHEDULED",
        AppointmentStatus::Confirmed => "CONFIRMED",
        AppointmentStatus::InProgress => "IN_PROGRESS",
        AppointmentStatus::Completed => "COMPLETED",
        AppointmentStatus::Cancelled => "CANCELLED",
    }
}

fn string_to_status(s: &str) -> Result<AppointmentStatus, DbError> {
    match s {
        "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
        "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
        "IN_PROGRESS" => Ok(AppointmentStatus::InProgress),
        "COMPLETED" => Ok(AppointmentStatus::Completed),
        "CANCELLED" => Ok(AppointmentStatus::Cancelled),
        _ => Err(DbError::Constraint(format!(
            "Unknown appointment status: {}",
            s
        ))),
    }
}
