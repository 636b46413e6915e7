use std::ffi::OsStr;
use std::path::Path;

use anyhow::Context;
use inf_common::config::ToolsConfig;
use inf_common::process::Runner;
use inf_common::report::Report;
use tracing::debug;

/// Totals read from the summary lines of an archive listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: u64,
    pub total_bytes: u64,
}

/// List the archive with `7z l` and record its file count and total
/// uncompressed size.
///
/// Both fields are always recorded once the listing ran, falling back to 0
/// when the summary lines are missing (for example when the listing was cut
/// off at the capture ceiling).
pub fn extract(
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
    report: &mut Report,
) -> anyhow::Result<()> {
    let output = runner
        .run(&cfg.archive, &[OsStr::new("l"), path.as_os_str()])
        .with_context(|| format!("listing archive {}", path.display()))?;

    let summary = parse_listing(&output);
    debug!("{}: {:?}", path.display(), summary);

    report.add("Files in archive", summary.files.to_string());
    report.add("Total uncompressed size", format!("{} bytes", summary.total_bytes));
    Ok(())
}

/// Scan a listing for the `N files,` and `N bytes` summary lines.
///
/// A line mentioning `files,` is only used for the file count.  Later
/// matches overwrite earlier ones; a matching line without a number in front
/// of the keyword leaves the previous value alone.
pub fn parse_listing(text: &str) -> ArchiveSummary {
    let mut summary = ArchiveSummary::default();
    for line in text.lines() {
        if line.contains("files,") {
            if let Some(n) = number_before(line, "files,") {
                summary.files = n;
            }
        } else if line.contains("bytes") {
            if let Some(n) = number_before(line, "bytes") {
                summary.total_bytes = n;
            }
        }
    }
    summary
}

/// The integer token immediately preceding the first `keyword` in `line`.
fn number_before(line: &str, keyword: &str) -> Option<u64> {
    let idx = line.find(keyword)?;
    line[..idx].split_whitespace().next_back()?.parse().ok()
}
