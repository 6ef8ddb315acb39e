use crate::errors::Result;
use crate::notes::notes_model::{NewNote, Note, NoteUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for note repository operations
#[async_trait]
pub trait NoteRepositoryTrait: Send + Sync {
    fn load_notes_for_symbol(&self, symbol: &str) -> Result<Vec<Note>>;
    async fn insert_note(&self, note: Note) -> Result<Note>;
    async fn update_note(
        &self,
        note_id: String,
        content: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Note>;
    async fn delete_note(&self, note_id: String) -> Result<usize>;
}

/// Trait for note service operations
#[async_trait]
pub trait NoteServiceTrait: Send + Sync {
    fn get_notes(&self, symbol: &str) -> Result<Vec<Note>>;
    async fn create_note(&self, new_note: NewNote) -> Result<Note>;
    async fn update_note(&self, note_id: String, update: NoteUpdate) -> Result<Note>;
    async fn delete_note(&self, note_id: String) -> Result<usize>;
}
