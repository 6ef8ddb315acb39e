use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::notes::notes_model::{NewNote, Note, NoteUpdate};
use crate::notes::notes_traits::{NoteRepositoryTrait, NoteServiceTrait};

/// Service for managing per-symbol research notes.
pub struct NoteService {
    repository: Arc<dyn NoteRepositoryTrait>,
}

impl NoteService {
    pub fn new(repository: Arc<dyn NoteRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("note content must not be empty".to_string()).into(),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl NoteServiceTrait for NoteService {
    fn get_notes(&self, symbol: &str) -> Result<Vec<Note>> {
        self.repository
            .load_notes_for_symbol(&symbol.trim().to_uppercase())
    }

    async fn create_note(&self, new_note: NewNote) -> Result<Note> {
        let symbol = new_note.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::InvalidInput("symbol must not be empty".to_string()).into());
        }
        Self::validate_content(&new_note.content)?;

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            symbol,
            content: new_note.content,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert_note(note).await
    }

    async fn update_note(&self, note_id: String, update: NoteUpdate) -> Result<Note> {
        Self::validate_content(&update.content)?;
        self.repository
            .update_note(note_id, update.content, Utc::now())
            .await
    }

    async fn delete_note(&self, note_id: String) -> Result<usize> {
        self.repository.delete_note(note_id).await
    }
}
