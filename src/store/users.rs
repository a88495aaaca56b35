// User registry and per-user favorite artists

use rusqlite::{Connection, OptionalExtension};

use super::Database;
use crate::error::{ApiError, Result};
use crate::models::users::{Artist, User};

/// Repository over the `users` and `user_artists` tables
#[derive(Clone, Debug)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn find_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        find_user(&conn, id)
    }

    /// Insert every name or none of them
    pub fn create_users(&self, names: &[String]) -> Result<()> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) || name_taken(&tx, name)? {
                return Err(ApiError::Conflict(format!("User {} already exists", name)));
            }
        }

        {
            let mut insert = tx.prepare("INSERT INTO users (name) VALUES (?1)")?;
            for name in names {
                insert.execute([name])?;
            }
        }

        tx.commit()?;
        tracing::info!("Created {} user(s)", names.len());
        Ok(())
    }

    pub fn rename_user(&self, id: i64, name: &str) -> Result<User> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;

        require_user(&tx, id)?;
        if name_taken(&tx, name)? {
            return Err(ApiError::Conflict(format!("User {} already exists", name)));
        }

        tx.execute(
            "UPDATE users SET name = ?1 WHERE id = ?2",
            rusqlite::params![name, id],
        )?;
        let user = require_user(&tx, id)?;
        tx.commit()?;

        Ok(user)
    }

    /// Delete a user; their artists go with them (ON DELETE CASCADE)
    pub fn delete_user(&self, id: i64) -> Result<()> {
        let conn = self.db.connect()?;
        require_user(&conn, id)?;
        conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(())
    }

    pub fn list_artists(&self, user_id: i64) -> Result<Vec<Artist>> {
        let conn = self.db.connect()?;
        require_user(&conn, user_id)?;
        artists_of(&conn, user_id)
    }

    /// Add a favorite artist and return the user's updated list
    pub fn add_artist(&self, user_id: i64, name: &str) -> Result<Vec<Artist>> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;

        require_user(&tx, user_id)?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM user_artists WHERE user_id = ?1 AND name = ?2",
                rusqlite::params![user_id, name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(ApiError::Conflict("Artist already exists".to_string()));
        }

        tx.execute(
            "INSERT INTO user_artists (user_id, name) VALUES (?1, ?2)",
            rusqlite::params![user_id, name],
        )?;
        let artists = artists_of(&tx, user_id)?;
        tx.commit()?;

        Ok(artists)
    }

    /// Remove one of the user's artists and return the remaining list
    pub fn delete_artist(&self, user_id: i64, artist_id: i64) -> Result<Vec<Artist>> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;

        require_user(&tx, user_id)?;
        let deleted = tx.execute(
            "DELETE FROM user_artists WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![artist_id, user_id],
        )?;
        if deleted == 0 {
            return Err(ApiError::NotFound("Artist not found".to_string()));
        }

        let artists = artists_of(&tx, user_id)?;
        tx.commit()?;

        Ok(artists)
    }
}

// `Transaction` derefs to `Connection`, so these helpers serve both.

fn find_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row("SELECT id, name FROM users WHERE id = ?1", [id], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()?;
    Ok(user)
}

fn require_user(conn: &Connection, id: i64) -> Result<User> {
    find_user(conn, id)?.ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn name_taken(conn: &Connection, name: &str) -> Result<bool> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(existing.is_some())
}

fn artists_of(conn: &Connection, user_id: i64) -> Result<Vec<Artist>> {
    let mut stmt =
        conn.prepare("SELECT id, name FROM user_artists WHERE user_id = ?1 ORDER BY id")?;
    let artists = stmt
        .query_map([user_id], |row| {
            Ok(Artist {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(artists)
}
