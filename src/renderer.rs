//! Placeholder substitution for template contents and path names.
use crate::context::TemplateContext;
use regex::{Captures, Regex};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Token values for substitution
    ///
    /// # Returns
    /// * `String` - Rendered template string
    fn render(&self, template: &str, context: &TemplateContext) -> String;
}

/// Replaces `{{token}}` placeholders with context values.
///
/// Only identifier tokens are recognized; whitespace inside the braces is
/// allowed. Anything else in double braces, and any token missing from the
/// context, is copied through untouched.
pub struct TokenRenderer {
    pattern: Regex,
}

impl TokenRenderer {
    pub fn new() -> Self {
        let pattern = Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap();
        Self { pattern }
    }
}

impl Default for TokenRenderer {
    fn default() -> Self {
        TokenRenderer::new()
    }
}

impl TemplateRenderer for TokenRenderer {
    fn render(&self, template: &str, context: &TemplateContext) -> String {
        self.pattern
            .replace_all(template, |caps: &Captures| match context.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
