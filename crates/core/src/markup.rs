//! Markup rewriting between persisted and editable rich text.

use std::collections::BTreeMap;

/// Rewrites embedded macro/tag syntax in rich text.
///
/// The persisted form and the editor form of a macro differ; an
/// implementation translates between them. Rewrites must be synchronous
/// and free of side effects.
pub trait MarkupRewriter: Send + Sync {
    /// Rewrite persisted text into the form the editor understands.
    fn normalize_for_editing(&self, text: &str, substitutions: &BTreeMap<String, String>)
        -> String;

    /// Rewrite editor-authored text into the persisted form.
    fn normalize_for_persistence(&self, text: &str) -> String;
}

/// Leaves text untouched in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRewriter;

impl MarkupRewriter for PassthroughRewriter {
    fn normalize_for_editing(
        &self,
        text: &str,
        _substitutions: &BTreeMap<String, String>,
    ) -> String {
        text.to_string()
    }

    fn normalize_for_persistence(&self, text: &str) -> String {
        text.to_string()
    }
}
