use std::path::Path;
use std::process;

use inf_common::config::ToolsConfig;
use inf_common::process::ProcessRunner;
use inf_common::report::Report;

fn main() {
    inf_common::logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: inf-extract-archive <file-path>");
        eprintln!();
        eprintln!("Reports the file count and total uncompressed size");
        eprintln!("of an archive, as listed by `7z l`.");
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let mut report = Report::new();
    if let Err(e) = inf_extract_archive::extract(
        path,
        &ToolsConfig::default(),
        &ProcessRunner::default(),
        &mut report,
    ) {
        tracing::warn!("{e:#}");
    }
    print!("{report}");
}
