pub mod digest;
pub mod export;
pub mod handlers;
pub mod models;
pub mod naming;

pub use export::ExportedNote;
pub use models::Note;
