//! Duplicate-key disambiguation policies

/// Decides whether an instruction may add a table key that an earlier instruction
/// already claimed.
pub trait DisambiguationPolicy {
    fn allows_duplicate(&self, heading: &str) -> bool;
}

/// Allows duplicates when the heading carries one of a fixed set of qualifiers.
///
/// The vendor docs split some mnemonics over several files whose headings differ only
/// by an operand-form qualifier, e.g. `ADD (immediate)` and `ADD (register)`.
#[derive(Debug, Clone)]
pub struct HeadingSuffixPolicy {
    qualifiers: Vec<String>,
}

impl HeadingSuffixPolicy {
    pub fn new<I, S>(qualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            qualifiers: qualifiers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for HeadingSuffixPolicy {
    fn default() -> Self {
        Self::new(["(immediate)", "(register)"])
    }
}

impl DisambiguationPolicy for HeadingSuffixPolicy {
    fn allows_duplicate(&self, heading: &str) -> bool {
        self.qualifiers.iter().any(|q| heading.contains(q.as_str()))
    }
}

/// Never allows duplicates: the first instruction in source order always wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWins;

impl DisambiguationPolicy for FirstWins {
    fn allows_duplicate(&self, _heading: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_qualifiers() {
        let policy = HeadingSuffixPolicy::default();
        assert!(policy.allows_duplicate("ADD (immediate)"));
        assert!(policy.allows_duplicate("ADD (register)"));
        assert!(!policy.allows_duplicate("ADD (extended register)"));
        assert!(!policy.allows_duplicate("ADDS"));
        assert!(!policy.allows_duplicate("ADD (shifted)"));
    }

    #[test]
    fn test_first_wins_rejects_everything() {
        assert!(!FirstWins.allows_duplicate("ADD (immediate)"));
    }
}
