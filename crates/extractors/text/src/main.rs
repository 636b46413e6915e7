use std::path::Path;
use std::process;

use inf_common::report::Report;

fn main() {
    inf_common::logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: inf-extract-text <file-path>");
        eprintln!();
        eprintln!("Counts lines, words and characters of a text file.");
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let mut report = Report::new();
    if let Err(e) = inf_extract_text::extract(path, &mut report) {
        tracing::warn!("{e:#}");
    }
    print!("{report}");
}
