use std::ffi::OsStr;
use std::path::Path;

use anyhow::Context;
use inf_common::config::ToolsConfig;
use inf_common::process::Runner;
use inf_common::report::Report;
use tracing::warn;

// ============================================================================
// IMAGE EXTRACTION
// ============================================================================

/// `identify -format` queries and the report key each one fills.
const IMAGE_QUERIES: &[(&str, &str)] = &[("%wx%h", "Dimensions"), ("%r", "Color space")];

/// Query image dimensions and color space with ImageMagick's `identify`.
///
/// Each query is independent: a failed run is logged and skipped, and a
/// successful run is recorded verbatim, even when it printed nothing.
pub fn extract_image(
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
    report: &mut Report,
) -> anyhow::Result<()> {
    for (format, key) in IMAGE_QUERIES {
        let args = [OsStr::new("-format"), OsStr::new(format), path.as_os_str()];
        match runner.run(&cfg.identify, &args) {
            Ok(output) => report.add(*key, output),
            Err(e) => warn!("{key} unavailable for {}: {e:#}", path.display()),
        }
    }
    Ok(())
}

// ============================================================================
// VIDEO EXTRACTION
// ============================================================================

/// Probe the container duration with `ffprobe` and record it as `HH:MM:SS.mmm`.
///
/// Output that does not start with a number counts as zero seconds.
pub fn extract_video(
    path: &Path,
    cfg: &ToolsConfig,
    runner: &dyn Runner,
    report: &mut Report,
) -> anyhow::Result<()> {
    let args = [
        OsStr::new("-v"),
        OsStr::new("error"),
        OsStr::new("-show_entries"),
        OsStr::new("format=duration"),
        OsStr::new("-of"),
        OsStr::new("default=noprint_wrappers=1:nokey=1"),
        path.as_os_str(),
    ];
    let output = runner
        .run(&cfg.ffprobe, &args)
        .with_context(|| format!("probing duration of {}", path.display()))?;

    report.add("Duration", format_duration(parse_seconds(&output)));
    Ok(())
}

/// Parse the longest leading decimal number in `text`, or 0.
///
/// Leading whitespace is skipped; an optional sign, digits, an optional
/// fractional part and an optional exponent are accepted.
pub fn parse_seconds(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Format seconds as zero-padded `HH:MM:SS.mmm`, truncating sub-millisecond
/// precision.  Negative and non-finite inputs are treated as zero.
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
    let whole = seconds.trunc() as u64;
    let millis = ((seconds - seconds.trunc()) * 1000.0) as u64;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}
