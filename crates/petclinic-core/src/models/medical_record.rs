//! Medical record models.

use serde::{Deserialize, Serialize};

/// A medical record authored by a veterinarian for a pet.
///
/// Authorship is immutable: `veterinarian_id` is set at creation and never
/// reassigned, even when an admin edits the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    /// Row id assigned by the store
    pub id: i64,
    /// Pet the record belongs to
    pub pet_id: i64,
    /// Authoring veterinarian
    pub veterinarian_id: i64,
    /// Diagnosis text
    pub diagnosis: String,
    /// Prescribed treatment
    pub treatment: String,
    /// Medication summary
    pub medications: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Attachment references (paths or URLs)
    pub attachments: Vec<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Input for creating a medical record. The author is always the calling
/// principal, so it carries no veterinarian id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub pet_id: i64,
    pub diagnosis: String,
    pub treatment: String,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
}

/// Partial update for a medical record; `None` fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalRecordUpdate {
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub attachments: Option<Vec<String>>,
}

impl MedicalRecord {
    /// Apply a partial update, leaving authorship untouched.
    pub fn apply(&mut self, update: MedicalRecordUpdate) {
        if let Some(diagnosis) = update.diagnosis {
            self.diagnosis = diagnosis;
        }
        if let Some(treatment) = update.treatment {
            self.treatment = treatment;
        }
        if let Some(medications) = update.medications {
            self.medications = Some(medications);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(attachments) = update.attachments {
            self.attachments = attachments;
        }
    }
}
