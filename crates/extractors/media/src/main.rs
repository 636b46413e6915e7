use std::path::Path;
use std::process;

use inf_common::config::ToolsConfig;
use inf_common::process::ProcessRunner;
use inf_common::report::Report;

fn main() {
    inf_common::logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || !matches!(args[1].as_str(), "image" | "video") {
        eprintln!("Usage: inf-extract-media <image|video> <file-path>");
        eprintln!();
        eprintln!("Reports image dimensions and color space (identify)");
        eprintln!("or video duration (ffprobe).");
        process::exit(1);
    }

    let path = Path::new(&args[2]);
    let cfg = ToolsConfig::default();
    let runner = ProcessRunner::default();
    let mut report = Report::new();

    let result = if args[1] == "image" {
        inf_extract_media::extract_image(path, &cfg, &runner, &mut report)
    } else {
        inf_extract_media::extract_video(path, &cfg, &runner, &mut report)
    };
    if let Err(e) = result {
        tracing::warn!("{e:#}");
    }
    print!("{report}");
}
