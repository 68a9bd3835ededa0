//! Mnemonic expansion
//!
//! Instruction titles in the vendor XML use a handful of template tokens standing for
//! a family of concrete mnemonics: `B.cond`, `FRINT<r>`, `FLDM*X`. Each template is
//! described by a [`Grammar`]: a pattern with three capture groups (literal prefix,
//! placeholder, literal suffix) and the variants the placeholder stands for.
//!
//! The grammar table is closed and hand-curated. A token that matches no grammar is
//! passed through unchanged, even when it still contains template syntax such as
//! `<r>`, so such a token ends up in the generated table verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Removes parenthesized qualifiers and `--` comments from a title attribute.
///
/// Every match is removed, including bare whitespace runs, so `"ADD, ADDS (immediate)"`
/// becomes `"ADD,ADDS"`.
static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(\(.*\))?\s*(--.*)?").expect("title suffix pattern"));

/// Matches leftover template syntax after expansion.
static TEMPLATE_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>|\*").expect("template"));

const CONDITION_CODES: &[&str] = &[
    "EQ", "NE", "CS", "CC", "MI", "PL", "VS", "VC", "HI", "LS", "GE", "LT", "GT", "LE", "AL",
];

// "A" is listed twice in the vendor tables; the variant set collapses it.
const ROUNDING_MODES: &[&str] = &["N", "A", "M", "P", "A", "I", "X"];

const FLDM_ADDRESSING: &[&str] = &["DB", "IA"];

/// A single template grammar: a pattern and the variants substituted for its placeholder.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: &'static str,
    pattern: Regex,
    variants: BTreeSet<&'static str>,
}

impl Grammar {
    /// Build a grammar. `pattern` must define exactly three capture groups.
    fn new(name: &'static str, pattern: &str, variants: &[&'static str]) -> Self {
        let pattern = Regex::new(pattern).expect("grammar patterns are static");
        debug_assert_eq!(pattern.captures_len(), 4, "grammar '{name}' needs 3 groups");
        Self {
            name,
            pattern,
            variants: variants.iter().copied().collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn variants(&self) -> &BTreeSet<&'static str> {
        &self.variants
    }

    /// Concrete mnemonics for `token`, or `None` if the grammar does not match.
    fn expand(&self, token: &str) -> Option<impl Iterator<Item = String> + '_> {
        let captures = self.pattern.captures(token)?;
        let prefix = captures.get(1).map_or("", |m| m.as_str()).to_string();
        let suffix = captures.get(3).map_or("", |m| m.as_str()).to_string();
        Some(
            self.variants
                .iter()
                .map(move |variant| format!("{prefix}{variant}{suffix}")),
        )
    }
}

/// Expands raw title tokens into concrete mnemonic sets.
#[derive(Debug, Clone)]
pub struct MnemonicExpander {
    grammars: Vec<Grammar>,
}

impl MnemonicExpander {
    /// An expander with no grammars: every token passes through.
    #[cfg(test)]
    fn empty() -> Self {
        Self {
            grammars: Vec::new(),
        }
    }

    /// The fixed grammar table for the ARM documentation (A32 and A64).
    pub fn standard() -> Self {
        Self {
            grammars: vec![
                Grammar::new("fldm-addressing", r"^(FLDM)(\*)(X)", FLDM_ADDRESSING),
                Grammar::new(
                    "condition-code",
                    r"^([A-Z][A-Z0-9]*\.?)(cond|<cc>)()",
                    CONDITION_CODES,
                ),
                Grammar::new("rounding-mode", r"^(FRINT)(<r>)()", ROUNDING_MODES),
            ],
        }
    }

    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }

    /// Expand a single raw token.
    ///
    /// The result always contains `token` itself, plus every variant of every grammar
    /// that matches it.
    pub fn expand(&self, token: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        names.insert(token.to_string());

        let mut matched = false;
        for grammar in &self.grammars {
            if let Some(expanded) = grammar.expand(token) {
                matched = true;
                names.extend(expanded);
                tracing::trace!(token, grammar = grammar.name(), "expanded template token");
            }
        }

        // Unmatched templates are kept as literal names.
        if !matched && TEMPLATE_SYNTAX.is_match(token) {
            tracing::debug!(token, "template syntax left unexpanded");
        }

        names
    }

    /// Expand every comma-separated name of an `instructionsection` title attribute.
    pub fn expand_title(&self, title: &str) -> BTreeSet<String> {
        let stripped = TITLE_SUFFIX.replace_all(title, "");
        stripped
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .flat_map(|name| self.expand(name))
            .collect()
    }
}

impl Default for MnemonicExpander {
    fn default() -> Self {
        Self::standard()
    }
}
