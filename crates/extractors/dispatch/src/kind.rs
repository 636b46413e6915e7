use std::fmt;

/// Coarse file category, decided once per file from its type description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Image,
    Video,
    Document,
    Archive,
    Unknown,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Image => "image",
            Kind::Video => "video",
            Kind::Document => "document",
            Kind::Archive => "archive",
            Kind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive substrings checked against a `file -b` description, in
/// priority order.  The first rule that matches decides the kind.
pub const KIND_RULES: &[(&str, Kind)] = &[
    ("text", Kind::Text),
    ("ASCII", Kind::Text),
    ("image", Kind::Image),
    ("video", Kind::Video),
    ("MP4", Kind::Video),
    ("PDF", Kind::Document),
    ("archive", Kind::Archive),
    ("compressed", Kind::Archive),
];

/// Map a type description to a [`Kind`] using [`KIND_RULES`].
pub fn classify(description: &str) -> Kind {
    KIND_RULES
        .iter()
        .find(|(needle, _)| description.contains(needle))
        .map(|&(_, kind)| kind)
        .unwrap_or(Kind::Unknown)
}
