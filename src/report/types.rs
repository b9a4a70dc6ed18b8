/// Counters collected over one run of the tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Bundles that held at least one fixture
    pub bundles: usize,
    /// Fixture files loaded
    pub fixtures: usize,
    /// Recording entries visited
    pub recordings: usize,
    /// Request URLs whose stored value changed
    pub rewritten_urls: usize,
    /// Fixture files written back to disk
    pub fixtures_written: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bundles, {} fixtures, {} recordings, {} URLs rewritten, {} fixtures written",
            self.bundles, self.fixtures, self.recordings, self.rewritten_urls, self.fixtures_written
        )
    }
}
