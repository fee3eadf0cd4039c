pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod ui;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, ScribeConfig};

pub use core::{batch::BatchTranscriber, gemini::GeminiTranscriber};
pub use domain::model::{ImageUpload, Note};
pub use ui::{NotesClient, ReviewSession};
pub use utils::error::{Result, ScribeError};
