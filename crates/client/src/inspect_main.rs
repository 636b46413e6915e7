use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use inf_common::config::{default_config_path, load_config, InspectConfig};
use inf_common::process::ProcessRunner;

#[derive(Parser)]
#[command(
    name = "inf",
    about = "Show size, permissions, type and kind-specific metadata for a file"
)]
struct Args {
    /// File to inspect
    #[arg(value_name = "PATH", allow_hyphen_values = true)]
    path: Option<PathBuf>,

    /// Path to config file (default: ~/.config/inf/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() -> Result<()> {
    inf_common::logging::init("warn");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // invocation errors exit 1, like a missing path
            let _ = e.print();
            process::exit(1);
        }
    };

    if args.version {
        println!("inf {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(path) = args.path else {
        eprintln!("{}", Args::command().render_usage());
        process::exit(1);
    };

    let config = resolve_config(args.config.as_deref())?;
    if let Err(e) = inf_common::logging::set_ignore_patterns(&config.log.ignore) {
        tracing::warn!("invalid log ignore pattern: {e}");
    }

    let runner = ProcessRunner::new(config.capture.max_output_bytes);
    let report = inf_extract_dispatch::inspect(&path, &config.tools, &runner);

    let mut stdout = std::io::stdout().lock();
    report.render(&mut stdout).context("writing report")?;
    stdout.flush().context("writing report")?;
    Ok(())
}

/// An explicit `--config` must load; the default location is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<InspectConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let Some(path) = default_config_path().filter(|p| p.is_file()) else {
        return Ok(InspectConfig::default());
    };
    match load_config(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("ignoring config: {e:#}");
            Ok(InspectConfig::default())
        }
    }
}
