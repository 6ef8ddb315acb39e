use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::model::NoteDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::notes::dsl::*;
use marketlens_core::errors::{DatabaseError, Error, Result};
use marketlens_core::notes::{Note, NoteRepositoryTrait};

pub struct NoteRepository {
    pool: Arc<DbPool>,
}

impl NoteRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepositoryTrait for NoteRepository {
    fn load_notes_for_symbol(&self, symbol_value: &str) -> Result<Vec<Note>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notes
            .filter(symbol.eq(symbol_value))
            .order(created_at.desc())
            .load::<NoteDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(NoteDB::into_domain).collect()
    }

    async fn insert_note(&self, note: Note) -> Result<Note> {
        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(notes)
            .values(&NoteDB::from_domain(&note))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(note)
    }

    async fn update_note(
        &self,
        note_id: String,
        new_content: String,
        new_updated_at: DateTime<Utc>,
    ) -> Result<Note> {
        let mut conn = get_connection(&self.pool)?;
        let changed = diesel::update(notes.filter(id.eq(&note_id)))
            .set((
                content.eq(new_content),
                updated_at.eq(new_updated_at.to_rfc3339()),
            ))
            .execute(&mut conn)
            .map_err(StorageError::from)?;

        if changed == 0 {
            return Err(Error::Database(DatabaseError::NotFound(note_id)));
        }

        let row = notes
            .filter(id.eq(&note_id))
            .first::<NoteDB>(&mut conn)
            .map_err(StorageError::from)?;
        row.into_domain()
    }

    async fn delete_note(&self, note_id: String) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let deleted = diesel::delete(notes.filter(id.eq(&note_id)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(deleted)
    }
}
