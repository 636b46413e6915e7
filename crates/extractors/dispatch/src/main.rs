use std::path::Path;
use std::process;

use inf_common::config::ToolsConfig;
use inf_common::process::ProcessRunner;
use inf_common::report::Report;

fn main() {
    inf_common::logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: inf-extract-dispatch <file-path>");
        eprintln!();
        eprintln!("Classifies the file with `file -b` and runs only the");
        eprintln!("matching extractor (text, image, video, document, archive).");
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let cfg = ToolsConfig::default();
    let runner = ProcessRunner::default();

    let kind = match inf_extract_dispatch::type_description(path, &cfg, &runner) {
        Ok(description) => inf_extract_dispatch::classify(&description),
        Err(e) => {
            tracing::warn!("{e:#}");
            inf_extract_dispatch::Kind::Unknown
        }
    };
    eprintln!("kind: {kind}");

    let mut report = Report::new();
    inf_extract_dispatch::dispatch(kind, path, &cfg, &runner, &mut report);
    print!("{report}");
}
