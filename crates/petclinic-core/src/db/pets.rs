//! Pet database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{NewPet, Pet};

impl Database {
    /// Insert a pet for an owner and return it with its assigned id.
    pub fn insert_pet(&self, owner_id: i64, pet: &NewPet) -> DbResult<Pet> {
        self.conn.execute(
            r#"
            INSERT INTO pets (user_id, name, breed, species, age)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![owner_id, pet.name, pet.breed, pet.species, pet.age],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_pet(id)?
            .ok_or_else(|| DbError::NotFound(format!("pet {}", id)))
    }

    /// Get a pet by id.
    pub fn get_pet(&self, id: i64) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                r#"
                SELECT id, user_id, name, breed, species, age, created_at, updated_at
                FROM pets
                WHERE id = ?
                "#,
                [id],
                map_pet_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all pets belonging to an owner, newest first.
    pub fn list_pets_for_owner(&self, owner_id: i64) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, name, breed, species, age, created_at, updated_at
            FROM pets
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([owner_id], map_pet_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_pet_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        breed: row.get(3)?,
        species: row.get(4)?,
        age: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner = db
            .insert_user("Ana", "ana@x.test", UserRole::User)
            .unwrap();
        (db, owner.id)
    }

    fn make_pet(name: &str) -> NewPet {
        NewPet {
            name: name.into(),
            breed: "Beagle".into(),
            species: Some("dog".into()),
            age: Some(4),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let (db, owner_id) = setup_db();

        let pet = db.insert_pet(owner_id, &make_pet("Max")).unwrap();
        let retrieved = db.get_pet(pet.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Max");
        assert_eq!(retrieved.user_id, owner_id);
        assert_eq!(retrieved.species, Some("dog".into()));
    }

    #[test]
    fn test_list_for_owner() {
        let (db, owner_id) = setup_db();
        let other = db
            .insert_user("Bob", "bob@x.test", UserRole::User)
            .unwrap();

        db.insert_pet(owner_id, &make_pet("Max")).unwrap();
        db.insert_pet(owner_id, &make_pet("Luna")).unwrap();
        db.insert_pet(other.id, &make_pet("Rex")).unwrap();

        let pets = db.list_pets_for_owner(owner_id).unwrap();
        assert_eq!(pets.len(), 2);
        assert!(pets.iter().all(|p| p.user_id == owner_id));
    }

    #[test]
    fn test_pet_requires_existing_owner() {
        let db = Database::open_in_memory().unwrap();
        let result = db.insert_pet(42, &make_pet("Ghost"));
        assert!(result.is_err());
    }
}
