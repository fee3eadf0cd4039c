use chrono::Utc;
use clap::Parser;
use note_scribe::config::{Command, ServeArgs, TranscribeArgs};
use note_scribe::domain::ports::Storage;
use note_scribe::ui::transcribe_local_files;
use note_scribe::utils::error::ErrorSeverity;
use note_scribe::utils::{logger, validation::Validate};
use note_scribe::{CliConfig, LocalStorage, NotesClient};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting note-scribe");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match config.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Transcribe(args) => run_transcribe(args).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ note-scribe failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run_serve(args: ServeArgs) -> note_scribe::Result<()> {
    let config = args.resolve()?;
    config.validate()?;
    note_scribe::server::serve(&config).await
}

async fn run_transcribe(args: TranscribeArgs) -> note_scribe::Result<()> {
    args.validate()?;

    let storage = LocalStorage::new(".".to_string());
    let client = NotesClient::new(&args.server);
    let mut session = transcribe_local_files(&storage, &args.files, &client).await?;

    for index in 0..session.notes().len() {
        tracing::info!(
            "📄 {} -> {}",
            session.source_label(index),
            session.notes()[index].title
        );
    }

    let text = session.copy_all(Utc::now());
    match &args.output {
        Some(output) => {
            storage.write_file(output, text.as_bytes()).await?;
            println!("✅ {} note(s) written to {}", session.notes().len(), output);
        }
        None => println!("{}", text),
    }

    Ok(())
}
