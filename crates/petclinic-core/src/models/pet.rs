//! Pet models.

use serde::{Deserialize, Serialize};

/// A pet with exactly one owning user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Row id assigned by the store
    pub id: i64,
    /// Owning user; never null after creation
    pub user_id: i64,
    /// Pet name
    pub name: String,
    /// Breed
    pub breed: String,
    /// Species (e.g., "dog", "cat")
    pub species: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Input for registering a new pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub species: Option<String>,
    pub age: Option<i64>,
}
