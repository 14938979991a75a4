mod cli;
mod error;
mod paths;
mod repl;

use std::fs;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use shelf_lib::CollectionController;
use shelf_lib::ShelfClient;
use shelf_lib::api::CollectionService;
use shelf_lib::session::SessionStore;
use shelf_lib::session::SqliteBackend;
use shelf_lib::view::StartPath;
use simplelog::Config;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::error::CliError;
use crate::repl::Repl;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to a file so they never interleave with the interactive output.
fn init_logging(cli: &Cli) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        eprintln!("warning: no cache directory, logging disabled");
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(cli.verbosity.log_level_filter(), Config::default(), file) {
                eprintln!("warning: failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("warning: cannot create {}: {}", path.display(), e),
    }
}

async fn open_session(cli: &Cli) -> Result<SessionStore, CliError> {
    if cli.memory_session {
        return Ok(SessionStore::in_memory());
    }
    let Some(path) = cli.session_db.clone().or_else(paths::session_db) else {
        log::warn!("no data directory; session will not be saved");
        return Ok(SessionStore::in_memory());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    log::info!("session database: {}", path.display());
    Ok(SessionStore::new(SqliteBackend::open(&path).await?))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.view_config();
    let service: Arc<dyn CollectionService> = Arc::new(
        ShelfClient::builder()
            .url(cli.url.clone())
            .timeout(Duration::from_secs(cli.timeout))
            .build(),
    );
    let session = open_session(&cli).await?;
    if cli.forget_session {
        session.clear().await?;
        log::info!("saved session discarded");
    }
    let controller = CollectionController::new(service, session, config.clone());

    println!("connecting to {}", cli.url);
    match controller.start().await? {
        StartPath::Restored => println!("restored previous session"),
        StartPath::Fresh => println!("loaded first page"),
    }

    Repl::new(&controller, config).run().await
}
