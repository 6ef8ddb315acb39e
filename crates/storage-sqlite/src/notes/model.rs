//! Database model for research notes.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use marketlens_core::errors::{DatabaseError, Error, Result};
use marketlens_core::notes::Note;
use serde::{Deserialize, Serialize};

/// Database model for one note row. Timestamps are stored as RFC3339 text.
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::notes)]
#[serde(rename_all = "camelCase")]
pub struct NoteDB {
    pub id: String,
    pub symbol: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "invalid {field} timestamp: {e}"
            )))
        })
}

impl NoteDB {
    pub fn from_domain(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            symbol: note.symbol.clone(),
            content: note.content.clone(),
            created_at: note.created_at.to_rfc3339(),
            updated_at: note.updated_at.to_rfc3339(),
        }
    }

    pub fn into_domain(self) -> Result<Note> {
        Ok(Note {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            id: self.id,
            symbol: self.symbol,
            content: self.content,
        })
    }
}
