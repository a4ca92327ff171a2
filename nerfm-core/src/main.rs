//! src/main.rs
//! Interactive file browser shell with numbered references and annotations

use std::{
    io::{self, IsTerminal},
    panic::PanicHookInfo,
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use nerfm_core::{Config, LoggerBuilder, Session, controller::Shell};

/// Browse a directory tree by entry number, with copy/cut/paste and notes
#[derive(Parser, Debug)]
#[command(name = "nerfm", version)]
#[command(about = "Numbered-entry file browser with persistent annotations")]
struct Cli {
    /// Directory to start in; the session cannot go above it
    #[arg(long)]
    root: Option<PathBuf>,

    /// Annotation side-file (JSON)
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Configuration file path (overrides the default location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config_created = !config_path.exists();
    let mut config = Config::load_from(&config_path).context("Failed to load configuration")?;

    if let Some(root) = cli.root {
        config.root_dir = Some(root);
    }
    if let Some(annotations) = cli.annotations {
        config.annotation_file = annotations;
    }

    let mut logger = LoggerBuilder::new().with_config(config.logging.clone());
    if let Some(level) = &cli.log_level {
        logger = logger.with_level(level);
    }
    let _guard = logger.build().context("Failed to initialize logging")?;

    setup_panic_handler();

    if config_created {
        info!(path = %config_path.display(), "No config file found, wrote the defaults");
    } else {
        info!(path = %config_path.display(), "Configuration loaded");
    }

    let root = config
        .resolve_root()
        .context("Failed to resolve the session root")?;

    let stdout = io::stdout();
    let colored = stdout.is_terminal();
    let mut session = Session::from_config(&config, root).with_color(colored);

    let mut shell = Shell::new(io::stdin().lock(), stdout.lock());
    shell.run(&mut session).context("Terminal I/O failed")?;

    info!("Application exited cleanly");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
