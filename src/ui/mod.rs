//! Client side of the upload/review flow.

pub mod client;
pub mod local;
pub mod session;

pub use client::NotesClient;
pub use local::transcribe_local_files;
pub use session::{Phase, ReviewSession, SelectionSource};
