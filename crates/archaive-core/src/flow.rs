use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::schema::OutputSchema;

/// A prompt template with `{{field}}` placeholders
///
/// Rendering is pure substitution: no conditionals, no loops. Placeholders
/// with no supplied value render as empty strings, which is how unset
/// optional flow fields behave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute each `{{field}}` with its supplied value
    pub fn render(&self, fields: &[(&str, String)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let name = after[..end].trim();
                    if let Some((_, value)) = fields.iter().find(|(f, _)| *f == name) {
                        out.push_str(value);
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    // Unterminated placeholder: emit literally
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Typed input to a flow
///
/// Each flow declares its input as a struct implementing this trait; the
/// runner validates before any model call is made and renders the prompt
/// from the named fields.
pub trait FlowInput {
    /// Check required fields, minimum lengths, and optionality rules.
    /// Returns every failing field, not just the first.
    fn validate(&self) -> Result<(), Vec<FieldError>>;

    /// Field name/value pairs available to the prompt template.
    /// Unset optional fields yield empty strings.
    fn prompt_fields(&self) -> Vec<(&'static str, String)>;
}

/// Validation helper: required string with a minimum length
///
/// Length is counted in characters, not bytes, so multi-byte input is
/// measured the way a user would count it.
pub fn check_min_len(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(FieldError::new(field, message));
    }
}

/// Immutable specification of a flow, defined once at process start
#[derive(Debug, Clone)]
pub struct FlowSpec {
    /// Flow name (e.g. "query_response")
    pub name: &'static str,

    /// One-line description
    pub description: &'static str,

    /// Prompt template rendered from validated input
    pub prompt: PromptTemplate,

    /// Shape the model response must conform to
    pub output_schema: OutputSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_fields() {
        let template = PromptTemplate::new("Project: {{project}}\nGoals: {{goals}}");
        let rendered = template.render(&[
            ("project", "A payments API".to_string()),
            ("goals", "global coverage".to_string()),
        ]);
        assert_eq!(rendered, "Project: A payments API\nGoals: global coverage");
    }

    #[test]
    fn test_render_unset_field_is_empty() {
        let template = PromptTemplate::new("Docs: {{architecture_documentation}}.");
        assert_eq!(template.render(&[]), "Docs: .");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let template = PromptTemplate::new("{{name}} and {{name}}");
        let rendered = template.render(&[("name", "Stripe".to_string())]);
        assert_eq!(rendered, "Stripe and Stripe");
    }

    #[test]
    fn test_render_unterminated_placeholder_left_verbatim() {
        let template = PromptTemplate::new("broken {{name");
        assert_eq!(template.render(&[]), "broken {{name");
    }

    #[test]
    fn test_check_min_len() {
        let mut errors = Vec::new();
        check_min_len(&mut errors, "query", "hi", 3, "too short");
        check_min_len(&mut errors, "summary", "long enough text", 10, "too short");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "query");
    }

    #[test]
    fn test_check_min_len_counts_characters_not_bytes() {
        let mut errors = Vec::new();
        // Two accented characters are four UTF-8 bytes but still too short
        check_min_len(&mut errors, "target_investor", "éé", 3, "too short");
        assert_eq!(errors.len(), 1);

        let mut errors = Vec::new();
        check_min_len(&mut errors, "target_investor", "ééé", 3, "too short");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_min_len_trims_whitespace() {
        let mut errors = Vec::new();
        check_min_len(&mut errors, "query", "   ", 1, "must not be empty");
        assert_eq!(errors.len(), 1);
    }
}
