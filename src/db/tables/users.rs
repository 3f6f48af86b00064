//! User account database operations

use chrono::Utc;
use rusqlite::Result as SqliteResult;

use super::super::Database;
use crate::models::{Role, User};

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let role_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::from_str(&role_str).unwrap_or_default(),
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

impl Database {
    /// Create a new account with the default `user` role.
    /// The email column is UNIQUE; a duplicate insert returns a constraint error.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> SqliteResult<User> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (name, email, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                name,
                email,
                password_hash,
                Role::User.as_str(),
                created_at.to_rfc3339()
            ],
        )?;

        let id = conn.last_insert_rowid();

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            created_at,
        })
    }

    /// Look up an account by exact (case-sensitive) email
    pub fn get_user_by_email(&self, email: &str) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = ?1",
        )?;

        let user = stmt.query_row([email], row_to_user).ok();
        Ok(user)
    }

    pub fn get_user(&self, id: i64) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at FROM users WHERE id = ?1",
        )?;

        let user = stmt.query_row([id], row_to_user).ok();
        Ok(user)
    }

    /// List all accounts (admin dashboard)
    pub fn list_users(&self) -> SqliteResult<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at FROM users ORDER BY id ASC",
        )?;

        let users = stmt
            .query_map([], row_to_user)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(users)
    }

    /// Promote an account to admin. Used by tests and operator tooling.
    pub fn set_user_role(&self, id: i64, role: Role) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE users SET role = ?1 WHERE id = ?2",
            rusqlite::params![role.as_str(), id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("test.db");
        Database::new(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_create_and_fetch_user() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let user = db.create_user("Alice", "alice@example.com", "hash").unwrap();
        assert_eq!(user.role, Role::User);

        let fetched = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.name, "Alice");

        let by_id = db.get_user(user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user("Alice", "alice@example.com", "hash").unwrap();
        assert!(db.create_user("Alice2", "alice@example.com", "hash2").is_err());
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user("Alice", "alice@example.com", "hash").unwrap();
        assert!(db.get_user_by_email("Alice@Example.com").unwrap().is_none());
    }

    #[test]
    fn test_set_user_role() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let user = db.create_user("Root", "root@example.com", "hash").unwrap();
        assert!(db.set_user_role(user.id, Role::Admin).unwrap());
        let fetched = db.get_user(user.id).unwrap().unwrap();
        assert!(fetched.role.is_admin());
    }
}
