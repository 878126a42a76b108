//! Medical record database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{MedicalRecord, NewMedicalRecord};

impl Database {
    /// Insert a medical record authored by `veterinarian_id` and return it
    /// with its assigned id.
    pub fn insert_medical_record(
        &self,
        veterinarian_id: i64,
        record: &NewMedicalRecord,
    ) -> DbResult<MedicalRecord> {
        let attachments_json = serde_json::to_string(&record.attachments)?;

        self.conn.execute(
            r#"
            INSERT INTO medical_records (
                pet_id, veterinarian_id, diagnosis, treatment,
                medications, notes, attachments
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.pet_id,
                veterinarian_id,
                record.diagnosis,
                record.treatment,
                record.medications,
                record.notes,
                attachments_json,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_medical_record(id)?
            .ok_or_else(|| DbError::NotFound(format!("medical record {}", id)))
    }

    /// Get a medical record by id.
    pub fn get_medical_record(&self, id: i64) -> DbResult<Option<MedicalRecord>> {
        self.conn
            .query_row(
                r#"
                SELECT id, pet_id, veterinarian_id, diagnosis, treatment,
                       medications, notes, attachments, created_at, updated_at
                FROM medical_records
                WHERE id = ?
                "#,
                [id],
                map_record_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Update the mutable fields of a record. Authorship columns stay as they
    /// are.
    pub fn update_medical_record(&self, record: &MedicalRecord) -> DbResult<bool> {
        let attachments_json = serde_json::to_string(&record.attachments)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE medical_records SET
                diagnosis = ?2,
                treatment = ?3,
                medications = ?4,
                notes = ?5,
                attachments = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.diagnosis,
                record.treatment,
                record.medications,
                record.notes,
                attachments_json,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a medical record.
    pub fn delete_medical_record(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medical_records WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// List all records, newest first.
    pub fn list_medical_records(&self, limit: i64, offset: i64) -> DbResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, veterinarian_id, diagnosis, treatment,
                   medications, notes, attachments, created_at, updated_at
            FROM medical_records
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;
        let rows = stmt.query_map(params![limit, offset], map_record_row)?;
        collect_rows(rows)
    }

    /// Total number of records.
    pub fn count_medical_records(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM medical_records", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// List records for one pet, newest first.
    pub fn list_medical_records_for_pet(
        &self,
        pet_id: i64,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, veterinarian_id, diagnosis, treatment,
                   medications, notes, attachments, created_at, updated_at
            FROM medical_records
            WHERE pet_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(params![pet_id, limit, offset], map_record_row)?;
        collect_rows(rows)
    }

    /// Total records for one pet.
    pub fn count_medical_records_for_pet(&self, pet_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM medical_records WHERE pet_id = ?",
                [pet_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    /// List records authored by one veterinarian, newest first.
    pub fn list_medical_records_for_veterinarian(
        &self,
        veterinarian_id: i64,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, veterinarian_id, diagnosis, treatment,
                   medications, notes, attachments, created_at, updated_at
            FROM medical_records
            WHERE veterinarian_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(params![veterinarian_id, limit, offset], map_record_row)?;
        collect_rows(rows)
    }

    /// Total records authored by one veterinarian.
    pub fn count_medical_records_for_veterinarian(&self, veterinarian_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM medical_records WHERE veterinarian_id = ?",
                [veterinarian_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<RecordRow>>,
) -> DbResult<Vec<MedicalRecord>> {
    let mut records = Vec::new();
    for row in rows {
        records.push(row?.try_into()?);
    }
    Ok(records)
}

fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        veterinarian_id: row.get(2)?,
        diagnosis: row.get(3)?,
        treatment: row.get(4)?,
        medications: row.get(5)?,
        notes: row.get(6)?,
        attachments: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Intermediate row struct for database mapping.
struct RecordRow {
    id: i64,
    pet_id: i64,
    veterinarian_id: i64,
    diagnosis: String,
    treatment: String,
    medications: Option<String>,
    notes: Option<String>,
    attachments: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RecordRow> for MedicalRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let attachments: Vec<String> = serde_json::from_str(&row.attachments)?;

        Ok(MedicalRecord {
            id: row.id,
            pet_id: row.pet_id,
            veterinarian_id: row.veterinarian_id,
            diagnosis: row.diagnosis,
            treatment: row.treatment,
            medications: row.medications,
            notes: row.notes,
            attachments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
