//! Note document operations
//!
//! Edits are two separate writes against the same row: `push_version`
//! appends the pre-edit snapshot to the JSON version list, then
//! `update_note_fields` overwrites the live fields. Last write wins.

use rusqlite::Result as SqliteResult;

use super::super::Database;
use crate::models::note::now_stamp;
use crate::models::{Note, NoteVersion};

const NOTE_COLUMNS: &str =
    "id, title, content, tags, image, favorite, owner_id, owner_name, created_at, versions, order_index";

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    let tags_json: String = row.get(3)?;
    let versions_json: String = row.get(9)?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        image: row.get(4)?,
        favorite: row.get(5)?,
        owner_id: row.get(6)?,
        owner_name: row.get(7)?,
        created_at: row.get(8)?,
        versions: serde_json::from_str(&versions_json).unwrap_or_default(),
        order_index: row.get(10)?,
    })
}

impl Database {
    /// Create a note with favorite=false and an empty version list
    pub fn create_note(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
        image: Option<&str>,
        owner_id: i64,
        owner_name: &str,
    ) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let created_at = now_stamp();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT INTO notes (title, content, tags, image, favorite, owner_id, owner_name, created_at, versions)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, '[]')",
            rusqlite::params![title, content, tags_json, image, owner_id, owner_name, created_at],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_vec(),
            image: image.map(|s| s.to_string()),
            favorite: false,
            owner_id,
            owner_name: owner_name.to_string(),
            created_at,
            versions: Vec::new(),
            order_index: None,
        })
    }

    pub fn get_note(&self, id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"))?;

        let note = stmt.query_row([id], row_to_note).ok();
        Ok(note)
    }

    /// Append a snapshot to the version list.
    /// `'$[#]'` appends in place, so existing entries are never rewritten.
    pub fn push_version(&self, id: i64, version: &NoteVersion) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let snapshot = serde_json::to_string(version).unwrap_or_else(|_| "{}".to_string());

        let rows = conn.execute(
            "UPDATE notes SET versions = json_insert(versions, '$[#]', json(?1)) WHERE id = ?2",
            rusqlite::params![snapshot, id],
        )?;
        Ok(rows > 0)
    }

    /// Overwrite the live fields of a note. Owner, creation timestamp, and
    /// the version list are untouched.
    pub fn update_note_fields(
        &self,
        id: i64,
        title: &str,
        content: &str,
        tags: &[String],
        image: Option<&str>,
    ) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());

        let rows = conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, tags = ?3, image = ?4 WHERE id = ?5",
            rusqlite::params![title, content, tags_json, image, id],
        )?;
        Ok(rows > 0)
    }

    /// Hard delete; no tombstone
    pub fn delete_note(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn set_favorite(&self, id: i64, favorite: bool) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE notes SET favorite = ?1 WHERE id = ?2",
            rusqlite::params![favorite, id],
        )?;
        Ok(rows > 0)
    }

    /// Write a manual ordering position. With `owner_id` set the write is
    /// scoped to that owner's notes; admins pass `None` and may reorder any.
    pub fn set_order_index(&self, id: i64, index: i64, owner_id: Option<i64>) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows = match owner_id {
            Some(owner) => conn.execute(
                "UPDATE notes SET order_index = ?1 WHERE id = ?2 AND owner_id = ?3",
                rusqlite::params![index, id, owner],
            )?,
            None => conn.execute(
                "UPDATE notes SET order_index = ?1 WHERE id = ?2",
                rusqlite::params![index, id],
            )?,
        };
        Ok(rows > 0)
    }

    /// Dashboard filter. All conditions AND together; results come back in
    /// store order (no sort by order_index at read time).
    pub fn filter_notes(
        &self,
        owner_id: Option<i64>,
        title_query: Option<&str>,
        tag: Option<&str>,
        favorites_only: bool,
    ) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {NOTE_COLUMNS} FROM notes");
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(owner) = owner_id {
            params.push(Box::new(owner));
            conditions.push(format!("owner_id = ?{}", params.len()));
        }
        if let Some(q) = title_query {
            params.push(Box::new(format!("%{}%", q)));
            conditions.push(format!("title LIKE ?{}", params.len()));
        }
        if let Some(t) = tag {
            params.push(Box::new(t.to_string()));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(notes.tags) WHERE json_each.value = ?{})",
                params.len()
            ));
        }
        if favorites_only {
            conditions.push("favorite = 1".to_string());
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let notes = stmt
            .query_map(params_ref.as_slice(), row_to_note)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }

    /// Every note in the store (admin dashboard)
    pub fn list_all_notes(&self) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id ASC"))?;

        let notes = stmt
            .query_map([], row_to_note)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::parse_tag_list;
    use tempfile::tempdir;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("test.db");
        Database::new(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_create_note_parses_and_stores_tags() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let tags = parse_tag_list("work, urgent");
        let note = db.create_note("A", "x", &tags, None, 1, "Alice").unwrap();

        let stored = db.get_note(note.id).unwrap().unwrap();
        assert_eq!(stored.tags, vec!["work", "urgent"]);
        assert!(!stored.favorite);
        assert!(stored.versions.is_empty());
        assert_eq!(stored.owner_id, 1);
        assert_eq!(stored.owner_name, "Alice");
    }

    #[test]
    fn test_edit_appends_one_version_per_edit() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let tags = parse_tag_list("work, urgent");
        let note = db.create_note("A", "x", &tags, None, 1, "Alice").unwrap();

        // First edit: snapshot, then overwrite
        let before = db.get_note(note.id).unwrap().unwrap();
        db.push_version(note.id, &before.snapshot()).unwrap();
        db.update_note_fields(note.id, "B", "y", &[], None).unwrap();

        let after = db.get_note(note.id).unwrap().unwrap();
        assert_eq!(after.title, "B");
        assert_eq!(after.content, "y");
        assert_eq!(after.versions.len(), 1);
        assert_eq!(after.versions[0].title, "A");
        assert_eq!(after.versions[0].content, "x");
        assert_eq!(after.versions[0].tags, vec!["work", "urgent"]);

        // Second edit appends without disturbing the first snapshot
        let before = db.get_note(note.id).unwrap().unwrap();
        db.push_version(note.id, &before.snapshot()).unwrap();
        db.update_note_fields(note.id, "C", "z", &[], None).unwrap();

        let after = db.get_note(note.id).unwrap().unwrap();
        assert_eq!(after.versions.len(), 2);
        assert_eq!(after.versions[0].title, "A");
        assert_eq!(after.versions[1].title, "B");
    }

    #[test]
    fn test_delete_makes_note_unfindable() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let note = db.create_note("A", "x", &[], None, 1, "Alice").unwrap();
        assert!(db.delete_note(note.id).unwrap());
        assert!(db.get_note(note.id).unwrap().is_none());
        assert!(!db.delete_note(note.id).unwrap());
    }

    #[test]
    fn test_filter_by_tag_is_exact_match() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        db.create_note("A", "x", &["work".to_string()], None, 1, "Alice").unwrap();
        db.create_note("B", "y", &["workout".to_string()], None, 1, "Alice").unwrap();

        let hits = db.filter_notes(Some(1), None, Some("work"), false).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "A");
    }

    #[test]
    fn test_filter_combines_with_and() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let a = db.create_note("Meeting notes", "x", &["work".to_string()], None, 1, "Alice").unwrap();
        db.create_note("Meeting notes", "y", &["work".to_string()], None, 1, "Alice").unwrap();
        db.create_note("Groceries", "z", &["home".to_string()], None, 1, "Alice").unwrap();
        db.set_favorite(a.id, true).unwrap();

        let hits = db.filter_notes(Some(1), Some("meeting"), Some("work"), true).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a.id);
    }

    #[test]
    fn test_filter_scopes_to_owner() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        db.create_note("Mine", "x", &[], None, 1, "Alice").unwrap();
        db.create_note("Theirs", "y", &[], None, 2, "Bob").unwrap();

        let hits = db.filter_notes(Some(1), None, None, false).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Mine");

        // Admin view: no owner scope
        let all = db.filter_notes(None, None, None, false).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_title_search_is_case_insensitive_substring() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        db.create_note("Quarterly Report", "x", &[], None, 1, "Alice").unwrap();
        db.create_note("Shopping list", "y", &[], None, 1, "Alice").unwrap();

        let hits = db.filter_notes(Some(1), Some("report"), None, false).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Quarterly Report");
    }

    #[test]
    fn test_set_order_index_respects_owner_scope() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let mine = db.create_note("Mine", "x", &[], None, 1, "Alice").unwrap();
        let theirs = db.create_note("Theirs", "y", &[], None, 2, "Bob").unwrap();

        assert!(db.set_order_index(mine.id, 0, Some(1)).unwrap());
        assert!(!db.set_order_index(theirs.id, 1, Some(1)).unwrap());
        assert_eq!(db.get_note(theirs.id).unwrap().unwrap().order_index, None);

        // Admin scope reaches any note
        assert!(db.set_order_index(theirs.id, 1, None).unwrap());
        assert_eq!(db.get_note(theirs.id).unwrap().unwrap().order_index, Some(1));
    }

    #[test]
    fn test_toggle_favorite_roundtrip() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let note = db.create_note("A", "x", &[], None, 1, "Alice").unwrap();
        db.set_favorite(note.id, true).unwrap();
        assert!(db.get_note(note.id).unwrap().unwrap().favorite);

        let favs = db.filter_notes(Some(1), None, None, true).unwrap();
        assert_eq!(favs.len(), 1);

        db.set_favorite(note.id, false).unwrap();
        let favs = db.filter_notes(Some(1), None, None, true).unwrap();
        assert!(favs.is_empty());
    }

    #[test]
    fn test_image_kept_unless_replaced() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let note = db.create_note("A", "x", &[], Some("photo.png"), 1, "Alice").unwrap();

        // Edit keeping the old filename
        db.update_note_fields(note.id, "B", "y", &[], Some("photo.png")).unwrap();
        assert_eq!(db.get_note(note.id).unwrap().unwrap().image.as_deref(), Some("photo.png"));

        // Edit replacing it
        db.update_note_fields(note.id, "C", "z", &[], Some("new.png")).unwrap();
        assert_eq!(db.get_note(note.id).unwrap().unwrap().image.as_deref(), Some("new.png"));
    }
}
