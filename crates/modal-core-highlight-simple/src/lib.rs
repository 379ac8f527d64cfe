//! `modal-core-highlight-simple` - data-driven regex highlighting for
//! `modal-core`.
//!
//! A reference implementation of the kernel's read-only [`HighlightProvider`]
//! interface for lightweight formats (JSON, INI and the like) where a tree
//! parser or LSP integration would be overkill. A grammar is a flat table of
//! [`RuleSpec`] entries; each line is scanned independently and every rule
//! match becomes a character-column [`HighlightToken`].

use modal_core::{HighlightProvider, HighlightToken, StyleId};
use regex::Regex;

/// Style ids emitted by the built-in grammars. Hosts map these to theme
/// colors; the values carry no meaning beyond identity.
pub mod styles {
    use modal_core::StyleId;

    /// String literals.
    pub const STRING: StyleId = 1;
    /// Numeric literals.
    pub const NUMBER: StyleId = 2;
    /// Word-like literals (`true`, `false`, `null`).
    pub const KEYWORD: StyleId = 3;
    /// INI `[section]` names.
    pub const SECTION: StyleId = 4;
    /// INI keys.
    pub const KEY: StyleId = 5;
    /// Comments.
    pub const COMMENT: StyleId = 6;
}

/// One row of a grammar table: a pattern, the capture group to highlight,
/// and the style to emit.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// The regex source.
    pub pattern: &'static str,
    /// Capture group to highlight; 0 highlights the whole match.
    pub capture: usize,
    /// Style id for the resulting tokens.
    pub style: StyleId,
}

const JSON_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r#""(?:[^"\\]|\\.)*""#,
        capture: 0,
        style: styles::STRING,
    },
    RuleSpec {
        pattern: r"-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?",
        capture: 0,
        style: styles::NUMBER,
    },
    RuleSpec {
        pattern: r"\b(?:true|false|null)\b",
        capture: 0,
        style: styles::KEYWORD,
    },
];

const INI_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"^\s*\[([^\]]*)\]",
        capture: 1,
        style: styles::SECTION,
    },
    RuleSpec {
        pattern: r"^\s*([\w.-]+)\s*[=:]",
        capture: 1,
        style: styles::KEY,
    },
    RuleSpec {
        pattern: r"^\s*[#;].*",
        capture: 0,
        style: styles::COMMENT,
    },
];

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    capture: usize,
    style: StyleId,
}

/// A compiled grammar table.
///
/// Not a parser: rules are independent and fire wherever they match, which is
/// plenty for configuration formats. Attach one to an editor with
/// [`set_highlight_provider`](modal_core::Editor::set_highlight_provider).
#[derive(Debug, Clone)]
pub struct SimpleGrammar {
    rules: Vec<CompiledRule>,
}

impl SimpleGrammar {
    /// Compile a grammar from a rule table.
    pub fn from_rules(specs: &[RuleSpec]) -> Result<Self, regex::Error> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            rules.push(CompiledRule {
                regex: Regex::new(spec.pattern)?,
                capture: spec.capture,
                style: spec.style,
            });
        }
        Ok(Self { rules })
    }

    /// The built-in JSON grammar (strings, numbers, keywords).
    pub fn json() -> Self {
        Self::from_rules(JSON_RULES).expect("built-in rule table compiles")
    }

    /// The built-in INI grammar (sections, keys, comments).
    pub fn ini() -> Self {
        Self::from_rules(INI_RULES).expect("built-in rule table compiles")
    }

    /// Number of rules in the table.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Scan one line with every rule, in table order. Rules whose requested
    /// capture group did not participate in a match, and zero-width matches,
    /// emit nothing.
    pub fn tokens_for_line(&self, text: &str) -> Vec<HighlightToken> {
        let mut tokens = Vec::new();
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let group = match caps.get(rule.capture) {
                    Some(group) if group.start() < group.end() => group,
                    _ => continue,
                };
                tokens.push(HighlightToken {
                    start_col: char_col(text, group.start()),
                    end_col: char_col(text, group.end()),
                    style_id: rule.style,
                });
            }
        }
        tokens
    }
}

impl HighlightProvider for SimpleGrammar {
    fn highlight_tokens_for_line(&self, _line: usize, text: &str) -> Vec<HighlightToken> {
        self.tokens_for_line(text)
    }
}

/// Character column of a byte offset within a single line.
fn char_col(text: &str, byte: usize) -> usize {
    text.char_indices().take_while(|(b, _)| *b < byte).count()
}
