use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use inf_common::report::Report;
use tracing::warn;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Record Size, Last modified and Permissions straight from the filesystem.
///
/// A path that cannot be stat'ed contributes nothing.
pub fn basic_attributes(path: &Path, report: &mut Report) {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!("cannot stat {}: {e}", path.display());
            return;
        }
    };

    report.add("Size", format_size(meta.len()));
    match meta.modified() {
        Ok(mtime) => report.add("Last modified", format_mtime(mtime)),
        Err(e) => warn!("no modification time for {}: {e}", path.display()),
    }
    report.add("Permissions", format_permissions(&meta));
}

/// Human-readable size on a binary scale, two decimals, capped at TB.
pub fn format_size(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", SIZE_UNITS[unit])
}

/// Local time in the classic `ctime` layout, e.g. `Wed Jun 30 21:49:08 1993`.
pub fn format_mtime(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime)
        .format("%a %b %e %H:%M:%S %Y")
        .to_string()
}

/// Ten-character `ls -l` style string: `d` or `-`, then owner, group and
/// other `rwx` triplets.
pub fn format_permissions(meta: &Metadata) -> String {
    format_mode(meta.is_dir(), mode_bits(meta))
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

fn format_mode(is_dir: bool, mode: u32) -> String {
    let bit = |mask: u32, c: char| if mode & mask != 0 { c } else { '-' };
    [
        if is_dir { 'd' } else { '-' },
        bit(0o400, 'r'),
        bit(0o200, 'w'),
        bit(0o100, 'x'),
        bit(0o040, 'r'),
        bit(0o020, 'w'),
        bit(0o010, 'x'),
        bit(0o004, 'r'),
        bit(0o002, 'w'),
        bit(0o001, 'x'),
    ]
    .iter()
    .collect()
}
