pub mod attrs;
pub mod kind;
pub mod mime;

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Context;
use inf_common::config::ToolsConfig;
use inf_common::process::Runner;
use inf_common::report::Report;
use tracing::{debug, warn};

pub use attrs::{basic_attributes, format_size};
pub use kind::{classify, Kind, KIND_RULES};
pub use mime::mime_type;

/// Build the full report for one path.
///
/// Runs, in order: filesystem attributes, MIME detection, the type
/// description, and at most one kind extractor.  Every step is best-effort;
/// a failure only leaves its fields out of the report.
pub fn inspect(path: &Path, cfg: &ToolsConfig, runner: &dyn Runner) -> Report {
    let mut report = Report::new();

    basic_attributes(path, &mut report);

    if let Some(mime) = mime_type(path) {
        report.add("MIME type", mime);
    }

    match type_description(path, cfg, runner) {
        Ok(description) => {
            report.add("File type", strip_line_terminator(&description));
            let kind = classify(&description);
            debug!("{} classified as {kind}", path.display());
            dispatch(kind, path, cfg, runner, &mut report);
        }
        Err(e) => warn!("{e:#}"),
    }

    report
}

/// Free-form type description from `file -b`.
pub fn type_description(
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
) -> anyhow::Result<String> {
    runner
        .run(&cfg.file, &[OsStr::new("-b"), path.as_os_str()])
        .with_context(|| format!("describing {}", path.display()))
}

/// Run the single extractor for `kind`.  `Kind::Unknown` runs nothing.
pub fn dispatch(
    kind: Kind,
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
    report: &mut Report,
) {
    let result = match kind {
        Kind::Text => inf_extract_text::extract(path, report),
        Kind::Image => inf_extract_media::extract_image(path, cfg, runner, report),
        Kind::Video => inf_extract_media::extract_video(path, cfg, runner, report),
        Kind::Document => inf_extract_pdf::extract(path, cfg, runner, report),
        Kind::Archive => inf_extract_archive::extract(path, cfg, runner, report),
        Kind::Unknown => return,
    };
    if let Err(e) = result {
        warn!("{kind} extraction failed for {}: {e:#}", path.display());
    }
}

/// Drop one trailing `\n` (or `\r\n`); interior newlines are kept.
fn strip_line_terminator(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers by program name; unknown programs fail to "start".
    #[derive(Default)]
    struct FakeTools {
        outputs: HashMap<&'static str, &'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTools {
        fn with(mut self, program: &'static str, output: &'static str) -> Self {
            self.outputs.insert(program, output);
            self
        }
    }

    impl Runner for FakeTools {
        fn run(&self, program: &str, _args: &[&OsStr]) -> anyhow::Result<String> {
            self.calls.borrow_mut().push(program.to_string());
            self.outputs
                .get(program)
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow::anyhow!("failed to start {program}"))
        }
    }

    fn keys(report: &Report) -> Vec<&str> {
        report.entries().iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn text_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "a b\nc\n").unwrap();

        let tools = FakeTools::default().with("file", "ASCII text\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);

        assert_eq!(
            keys(&report),
            [
                "Size",
                "Last modified",
                "Permissions",
                "MIME type",
                "File type",
                "Lines",
                "Words",
                "Characters"
            ]
        );
        assert_eq!(report.get("Size"), Some("6.00 B"));
        assert_eq!(report.get("MIME type"), Some("text/plain"));
        assert_eq!(report.get("File type"), Some("ASCII text"));
        assert_eq!(report.get("Lines"), Some("2"));
        assert_eq!(report.get("Words"), Some("3"));
        assert_eq!(report.get("Characters"), Some("6"));
        assert_eq!(*tools.calls.borrow(), ["file"]);
    }

    #[test]
    fn archive_goes_to_archive_extractor_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        std::fs::write(&path, b"PK\x03\x04rest").unwrap();

        let tools = FakeTools::default()
            .with("file", "Zip archive data, at least v2.0 to extract\n")
            .with("7z", "   5000   1900  2 files, 1 folders\n1 file, 1234 bytes\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);

        assert_eq!(report.get("Files in archive"), Some("2"));
        assert_eq!(report.get("Total uncompressed size"), Some("1234 bytes"));
        assert_eq!(*tools.calls.borrow(), ["file", "7z"]);
    }

    #[test]
    fn pdf_entries_follow_file_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();

        let tools = FakeTools::default()
            .with("file", "PDF document, version 1.4\n")
            .with("pdfinfo", "Title:   My Doc\nPages:  3\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);

        assert_eq!(report.get("MIME type"), Some("application/pdf"));
        let k = keys(&report);
        assert_eq!(&k[k.len() - 3..], ["File type", "Title", "Pages"]);
        assert_eq!(report.get("Title"), Some("My Doc"));
    }

    #[test]
    fn configured_tool_names_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"....ftypisom").unwrap();

        let cfg = ToolsConfig {
            file: "file5".into(),
            ffprobe: "/opt/ffmpeg/bin/ffprobe".into(),
            ..ToolsConfig::default()
        };
        let tools = FakeTools::default()
            .with("file5", "ISO Media, MP4 v2 [ISO 14496-14]\n")
            .with("/opt/ffmpeg/bin/ffprobe", "61.500000\n");
        let report = inspect(&path, &cfg, &tools);

        assert_eq!(report.get("Duration"), Some("00:01:01.500"));
    }

    #[test]
    fn unknown_kind_runs_no_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog");
        std::fs::write(&path, [0x7f, b'E', b'L', b'F', 2, 1, 1, 0]).unwrap();

        let tools = FakeTools::default().with("file", "ELF 64-bit LSB executable\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);

        assert_eq!(keys(&report).last(), Some(&"File type"));
        assert_eq!(*tools.calls.borrow(), ["file"]);
    }

    #[test]
    fn missing_file_tool_keeps_basic_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let report = inspect(&path, &ToolsConfig::default(), &FakeTools::default());
        assert_eq!(
            keys(&report),
            ["Size", "Last modified", "Permissions", "MIME type"]
        );
    }

    #[test]
    fn failing_extractor_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.mkv");
        std::fs::write(&path, b"\x1a\x45\xdf\xa3").unwrap();

        // ffprobe missing: Duration is left out, everything before it stays
        let tools = FakeTools::default().with("file", "Matroska video data\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);
        assert_eq!(report.get("File type"), Some("Matroska video data"));
        assert_eq!(report.get("Duration"), None);
    }

    #[test]
    fn text_kind_on_unreadable_path_adds_nothing() {
        let tools = FakeTools::default();
        let mut report = Report::new();
        dispatch(
            Kind::Text,
            Path::new("/nonexistent/inf/notes.txt"),
            &ToolsConfig::default(),
            &tools,
            &mut report,
        );
        assert!(report.is_empty());
    }

    #[test]
    fn nonexistent_path_yields_empty_report() {
        let report = inspect(
            Path::new("/nonexistent/inf/missing"),
            &ToolsConfig::default(),
            &FakeTools::default(),
        );
        assert!(report.is_empty());
        assert!(report.to_string().starts_with("File Information\n"));
    }

    #[test]
    fn multi_line_description_kept_as_one_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd");
        std::fs::write(&path, "x").unwrap();

        let tools = FakeTools::default().with("file", "data\n- with a second line\n");
        let report = inspect(&path, &ToolsConfig::default(), &tools);
        assert_eq!(report.get("File type"), Some("data\n- with a second line"));
    }

    #[test]
    fn line_terminator_stripping() {
        assert_eq!(strip_line_terminator("ASCII text\n"), "ASCII text");
        assert_eq!(strip_line_terminator("ASCII text\r\n"), "ASCII text");
        assert_eq!(strip_line_terminator("ASCII text"), "ASCII text");
        assert_eq!(strip_line_terminator("a\n\n"), "a\n");
    }
}
