use serde::{Deserialize, Serialize};

use super::User;

/// Immutable snapshot of a note's state, captured before each edit.
/// Ordered by append sequence; never reordered or rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteVersion {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub updated_at: String,
}

/// A user-owned markdown document with tags, optional image attachment,
/// favorite flag, and append-only version history.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub favorite: bool,
    pub owner_id: i64,
    pub owner_name: String,
    pub created_at: String,
    pub versions: Vec<NoteVersion>,
    pub order_index: Option<i64>,
}

impl Note {
    /// Owner-or-admin gate shared by view, edit, delete, history, and export
    pub fn accessible_by(&self, user: &User) -> bool {
        user.role.is_admin() || self.owner_id == user.id
    }

    /// Snapshot of the current state, stamped for the version list
    pub fn snapshot(&self) -> NoteVersion {
        NoteVersion {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags.clone(),
            updated_at: now_stamp(),
        }
    }
}

/// Split a comma-separated tag field into trimmed, non-empty tags
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Timestamp format used for note creation and version entries
pub fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M").to_string()
}
