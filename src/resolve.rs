use crate::catalog::FieldCatalog;

/// Line-ending convention Tableau uses inside formula attributes.
const LINE_BREAK: &str = "\r\n";

/// Prefix marking a formula line as a comment.
const COMMENT_PREFIX: &str = "//";

/// The comment and body halves of a raw formula, each joined with single
/// trailing spaces per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFormula {
    /// Concatenated `//`-prefixed lines.
    pub comment: String,
    /// Concatenated formula content lines.
    pub body: String,
}

/// Separates leading comment lines from formula content.
///
/// Each line is appended to its class followed by a single space, preserving
/// relative order within a class but not the interleaving, so
/// `"// note\r\n1+1"` splits into comment `"// note "` and body `"1+1 "`.
pub fn split_formula(raw: &str) -> SplitFormula {
    let mut split = SplitFormula::default();
    for line in raw.split(LINE_BREAK) {
        let class = if line.starts_with(COMMENT_PREFIX) {
            &mut split.comment
        } else {
            &mut split.body
        };
        class.push_str(line);
        class.push(' ');
    }
    split
}

/// Rewrites formula content by substituting every internal identifier
/// occurrence with its bracketed display caption.
///
/// The catalog iterates longest identifiers first, so an identifier embedded
/// in another can never be partially replaced and the result is independent
/// of catalog insertion order.
pub fn resolve_formula(body: &str, catalog: &FieldCatalog) -> String {
    let mut resolved = body.to_string();
    for (identifier, caption) in catalog.entries() {
        if resolved.contains(identifier) {
            resolved = resolved.replace(identifier, caption);
        }
    }
    resolved
}
