/// On-disk encoding of a property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Xml,
    Binary,
}

impl FixtureFormat {
    const BINARY_MAGIC: &'static [u8] = b"bplist00";

    /// Detect the encoding from the first bytes of a file.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(Self::BINARY_MAGIC) {
            FixtureFormat::Binary
        } else {
            FixtureFormat::Xml
        }
    }
}

impl std::fmt::Display for FixtureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureFormat::Xml => write!(f, "xml"),
            FixtureFormat::Binary => write!(f, "binary"),
        }
    }
}

/// A loaded fixture file: its encoding and recording entries.
///
/// Entries are kept as raw `plist::Value`s so anything the tool does not
/// understand (non-dictionary entries, dates, data blobs) survives a save.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDocument {
    pub format: FixtureFormat,
    pub recordings: Vec<plist::Value>,
}

impl FixtureDocument {
    /// Mutable access to every entry that is a dictionary.
    pub fn recording_entries_mut(&mut self) -> impl Iterator<Item = &mut plist::Dictionary> {
        self.recordings
            .iter_mut()
            .filter_map(plist::Value::as_dictionary_mut)
    }
}
