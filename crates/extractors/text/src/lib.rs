use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use inf_common::report::Report;

/// Line, word and character totals for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCounts {
    /// Number of `\n` bytes.
    pub lines: u64,
    /// Maximal runs of bytes other than space, tab and newline.
    pub words: u64,
    /// Total bytes read, terminators included.
    pub chars: u64,
}

/// Count lines, words and characters of a text file and add them to `report`.
///
/// Nothing is added unless the whole file was read: an open or read error
/// is returned to the caller and no partial counts are recorded.
pub fn extract(path: &Path, report: &mut Report) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let counts = count(file).with_context(|| format!("reading {}", path.display()))?;

    report.add("Lines", counts.lines.to_string());
    report.add("Words", counts.words.to_string());
    report.add("Characters", counts.chars.to_string());
    Ok(())
}

/// Single streaming pass over `reader`.
pub fn count<R: Read>(mut reader: R) -> io::Result<TextCounts> {
    let mut counts = TextCounts::default();
    let mut in_word = false;
    let mut buf = [0u8; 8192];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        for &b in &buf[..n] {
            if b == b'\n' {
                counts.lines += 1;
            }
            if matches!(b, b' ' | b'\n' | b'\t') {
                in_word = false;
            } else if !in_word {
                in_word = true;
                counts.words += 1;
            }
        }
        counts.chars += n as u64;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_simple_text() {
        let counts = count(Cursor::new("a b\nc\n")).unwrap();
        assert_eq!(
            counts,
            TextCounts {
                lines: 2,
                words: 3,
                chars: 6
            }
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(count(Cursor::new("")).unwrap(), TextCounts::default());
    }

    #[test]
    fn missing_trailing_newline_is_not_a_line() {
        let counts = count(Cursor::new("one two")).unwrap();
        assert_eq!(counts.lines, 0);
        assert_eq!(counts.words, 2);
        assert_eq!(counts.chars, 7);
    }

    #[test]
    fn tabs_and_runs_of_whitespace() {
        let counts = count(Cursor::new("\t\talpha \t beta\n\n  gamma")).unwrap();
        assert_eq!(counts.words, 3);
        assert_eq!(counts.lines, 2);
    }

    #[test]
    fn carriage_return_is_part_of_a_word() {
        // Only space, tab and newline separate words.
        let counts = count(Cursor::new("a\r\nb\r\n")).unwrap();
        assert_eq!(counts.words, 2);
        assert_eq!(counts.chars, 6);
    }

    #[test]
    fn word_spanning_buffer_boundary_counts_once() {
        let mut text = " ".repeat(8190);
        text.push_str("abcdef\n");
        let counts = count(Cursor::new(text)).unwrap();
        assert_eq!(counts.words, 1);
        assert_eq!(counts.chars, 8197);
    }

    #[test]
    fn multibyte_chars_count_as_bytes() {
        let counts = count(Cursor::new("héllo\n")).unwrap();
        assert_eq!(counts.chars, 7);
        assert_eq!(counts.words, 1);
    }

    #[test]
    fn extract_adds_three_entries() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, b"a b\nc\n").unwrap();

        let mut report = Report::new();
        extract(tmp.path(), &mut report).unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.get("Lines"), Some("2"));
        assert_eq!(report.get("Words"), Some("3"));
        assert_eq!(report.get("Characters"), Some("6"));
    }

    #[test]
    fn extract_is_repeatable() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, b"one\ntwo three\n").unwrap();

        let mut first = Report::new();
        let mut second = Report::new();
        extract(tmp.path(), &mut first).unwrap();
        extract(tmp.path(), &mut second).unwrap();
        assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn unreadable_file_adds_nothing() {
        let mut report = Report::new();
        let err = extract(Path::new("/nonexistent/inf/file.txt"), &mut report).unwrap_err();
        assert!(report.is_empty());
        assert!(err.to_string().contains("/nonexistent/inf/file.txt"));
    }
}
