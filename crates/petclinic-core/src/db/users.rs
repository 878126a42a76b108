//! User directory database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{User, UserRole};

impl Database {
    /// Insert a user and return it with its assigned id.
    pub fn insert_user(&self, name: &str, email: &str, role: UserRole) -> DbResult<User> {
        self.conn.execute(
            "INSERT INTO users (name, email, role) VALUES (?1, ?2, ?3)",
            params![name, email, role_to_string(&role)],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| DbError::NotFound(format!("user {}", id)))
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, email, role, created_at, updated_at
                FROM users
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        role: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Look up just the role of a user.
    pub fn get_user_role(&self, id: i64) -> DbResult<Option<UserRole>> {
        let role: Option<String> = self
            .conn
            .query_row("SELECT role FROM users WHERE id = ?", [id], |row| {
                row.get(0)
            })
            .optional()?;
        role.map(|s| string_to_role(&s)).transpose()
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: string_to_role(&row.role)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn role_to_string(role: &UserRole) -> &'static str {
    match role {
        UserRole::User => "USER",
        UserRole::Admin => "ADMIN",
        UserRole::Veterinarian => "VETERINARIAN",
        UserRole::Moderator => "MODERATOR",
    }
}

pub(crate) fn string_to_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "USER" => Ok(UserRole::User),
        "ADMIN" => Ok(UserRole::Admin),
        "VETERINARIAN" => Ok(UserRole::Veterinarian),
        "MODERATOR" => Ok(UserRole::Moderator),
        _ => Err(DbError::Constraint(format!("Unknown user role: {}", s))),
    }
}
