// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod output;
pub mod sink;
pub mod transcript;
pub mod types;
pub mod usage;

use chrono::Local;
use tracing::{debug, error};

use crate::cli::CliArgs;
use crate::clock::SystemClock;
use crate::config::{Environment, Settings, load_optional};
use crate::engine::{Session, Terminal};
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::output::{create_output_file, select_directory};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings file + environment + CLI
/// - output directory selection and log file creation
/// - the supervised session
///
/// Returns the status logrun should exit with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let env = Environment::from_process();
    let file = load_optional(args.config.as_deref(), &env)?;
    let settings = Settings::resolve(&args, &file)?;
    debug!(?settings, "resolved settings");

    let fs = RealFileSystem;
    let dir = select_directory(&fs, settings.dir.as_deref(), &env);
    let output = create_output_file(&fs, &dir, Local::now().date_naive())?;

    let log = sink::shared(output.writer);
    let session = Session::new(
        settings,
        SystemClock,
        Terminal::stdio(),
        log.clone(),
        output.path.clone(),
    );

    match session.run().await {
        Ok(disposition) => Ok(disposition.exit_code()),
        Err(err) => {
            error!(error = %err, log = %output.path.display(), "supervision failed");
            // Leave the partial transcript readable, with the reason at the end.
            let mut log = log.borrow_mut();
            let _ = writeln!(log, "ERROR: {err}");
            let _ = log.flush();
            Err(err)
        }
    }
}
