mod model;
mod repository;

pub use model::NoteDB;
pub use repository::NoteRepository;
