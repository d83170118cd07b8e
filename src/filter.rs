/// A substring filter applied to raw entry content
#[derive(Clone, Debug, Default)]
pub struct ActiveFilter {
    /// The pattern as typed
    pub pattern: String,
    /// Lowercased pattern used for matching
    needle: String,
}

impl ActiveFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let needle = pattern.to_lowercase();
        Self { pattern, needle }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Case-insensitive substring match; an empty filter matches everything
    pub fn matches(&self, line: &str) -> bool {
        self.needle.is_empty() || line.to_lowercase().contains(&self.needle)
    }

    pub fn push(&mut self, c: char) {
        self.pattern.push(c);
        self.needle = self.pattern.to_lowercase();
    }

    /// Remove the last character, returns false when already empty
    pub fn pop(&mut self) -> bool {
        let removed = self.pattern.pop().is_some();
        if removed {
            self.needle = self.pattern.to_lowercase();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.pattern.clear();
        self.needle.clear();
    }
}
