pub mod cli;
pub mod toml_config;

pub use toml_config::ScribeConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "note-scribe")]
#[command(about = "Turn photos of handwritten notes into editable text")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the batch transcription HTTP endpoint
    Serve(ServeArgs),
    /// Send local images to a running server and print the notes
    Transcribe(TranscribeArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Address to listen on, overrides server.bind")]
    pub bind: Option<String>,

    #[arg(long, help = "Model name, overrides model.model")]
    pub model: Option<String>,
}

#[cfg(feature = "cli")]
impl ServeArgs {
    /// Config file first, then flags, then the credential from the environment.
    pub fn resolve(&self) -> Result<ScribeConfig> {
        let mut config = match &self.config {
            Some(path) => ScribeConfig::from_file(path)?,
            None => ScribeConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }

        Ok(config.with_env_credential())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct TranscribeArgs {
    #[arg(required = true, num_args = 1.., help = "Image files to transcribe")]
    pub files: Vec<String>,

    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub server: String,

    #[arg(long, help = "Write the combined notes to this file instead of stdout")]
    pub output: Option<String>,
}

#[cfg(feature = "cli")]
impl Validate for TranscribeArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_url("server", &self.server)?;
        for file in &self.files {
            validation::validate_path("files", file)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
