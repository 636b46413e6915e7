use std::path::Path;

use anyhow::Context;
use inf_common::config::ToolsConfig;
use inf_common::process::Runner;
use inf_common::report::{Entry, Report};

/// Record every `Key: Value` line that `pdfinfo` prints for the document.
///
/// Keys are added in the order `pdfinfo` emits them and are not
/// deduplicated.
///
/// # Returns
/// An error only when `pdfinfo` could not be started; unparseable lines are
/// skipped silently.
pub fn extract(
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
    report: &mut Report,
) -> anyhow::Result<()> {
    let output = runner
        .run(&cfg.pdfinfo, &[path.as_os_str()])
        .with_context(|| format!("reading document info of {}", path.display()))?;
    report.extend(parse_info(&output));
    Ok(())
}

/// Split `Key: Value` lines into entries.
///
/// The key is everything before the first colon.  The value is the text
/// after it, up to the next colon if there is one, with leading spaces
/// removed, so `CreationDate: Mon Jan  1 10:30:00 2024` keeps only
/// `Mon Jan  1 10`.  Lines with an empty key or value are dropped.
pub fn parse_info(text: &str) -> Vec<Entry> {
    text.lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let value = rest.split(':').next().unwrap_or("").trim_start_matches(' ');
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some(Entry::new(key, value))
        })
        .collect()
}
