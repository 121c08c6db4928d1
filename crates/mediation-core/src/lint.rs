//! Lint diagnostics for decoded pages.
//!
//! Reports tagging issues without modifying the page. Results are meant for
//! the edit panel that lists fillable nodes.

use crate::model::{ContentKind, GENERATED_TAG_PREFIX, Page};
use std::collections::BTreeMap;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake; should be fixed.
    Warning,
    /// Worth knowing, often intentional.
    Info,
}

/// A single lint diagnostic for a fillable tag.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The tag this diagnostic refers to.
    pub tag: String,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "generated-tag", "shared-tag").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over the page and return diagnostics.
#[must_use]
pub fn lint_page(page: &Page) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_generated_tags(page, &mut diags);
    lint_shared_tags(page, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// Warn on Text nodes that rely on a generated `TextComposable_N` tag. Such
/// tags shift whenever a Text node is inserted above them, orphaning the
/// stored content.
fn lint_generated_tags(page: &Page, diags: &mut Vec<LintDiagnostic>) {
    for node in page.fillable_nodes() {
        if node.content_kind() == ContentKind::PlainText && is_generated_tag(node.tag()) {
            diags.push(LintDiagnostic {
                tag: node.tag().to_string(),
                message: format!(
                    "Text tag `{}` is generated; give it an explicit `tag` to keep its content stable.",
                    node.tag()
                ),
                severity: LintSeverity::Warning,
                rule: "generated-tag",
            });
        }
    }
}

/// Check if a tag matches the generated `TextComposable_N` pattern.
pub fn is_generated_tag(tag: &str) -> bool {
    tag.strip_prefix(GENERATED_TAG_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Report tags bound by more than one node. Those nodes alias one content
/// entry, so editing one edits them all.
fn lint_shared_tags(page: &Page, diags: &mut Vec<LintDiagnostic>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in page.fillable_nodes() {
        *counts.entry(node.tag()).or_default() += 1;
    }

    for (tag, count) in counts {
        if count > 1 {
            diags.push(LintDiagnostic {
                tag: tag.to_string(),
                message: format!("Tag `{tag}` is shared by {count} nodes; they display the same content."),
                severity: LintSeverity::Info,
                rule: "shared-tag",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_page;

    #[test]
    fn lint_generated_tags() {
        let input = "root: !Column\n  child:\n    - !Text\n      text: anonymous\n    - !Text\n      tag: title\n";
        let page = decode_page(input).expect("decode failed");
        let diags = lint_page(&page);
        assert_eq!(diags.len(), 1, "only the untagged Text is flagged: {diags:?}");
        assert_eq!(diags[0].rule, "generated-tag");
        assert_eq!(diags[0].tag, "TextComposable_0");
        assert_eq!(diags[0].severity, LintSeverity::Warning);
    }

    #[test]
    fn lint_shared_tags() {
        let input = "root: !Column\n  child:\n    - !Text\n      tag: hero\n    - !Image\n      tag: hero\n    - !Image\n      tag: logo\n";
        let page = decode_page(input).expect("decode failed");
        let diags = lint_page(&page);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "shared-tag");
        assert_eq!(diags[0].tag, "hero");
        assert!(diags[0].message.contains("2 nodes"));
        assert_eq!(diags[0].severity, LintSeverity::Info);
    }

    #[test]
    fn generated_tag_pattern() {
        assert!(is_generated_tag("TextComposable_0"));
        assert!(is_generated_tag("TextComposable_42"));
        assert!(!is_generated_tag("TextComposable_"));
        assert!(!is_generated_tag("TextComposable_title"));
        assert!(!is_generated_tag("headline"));
    }

    #[test]
    fn lint_clean_page_no_diags() {
        let input = "root: !Box\n  child:\n    - !RichText\n      tag: body\n";
        let page = decode_page(input).expect("decode failed");
        assert!(lint_page(&page).is_empty());
    }
}
