//! Handlebars template rendering for prompt text.

use docent_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Render a Handlebars template with variables.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// Render a template whose only variable is `input`.
pub fn render_input(template: &str, input: &str) -> AppResult<String> {
    let mut variables = HashMap::new();
    variables.insert("input".to_string(), input.to_string());
    render_template(template, &variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("input".to_string(), "Hello, world!".to_string());

        let result = render_template("Question: {{input}}", &vars);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_input() {
        let rendered = render_input("Generate search query for: {{input}}", "what is rust?");
        assert_eq!(rendered.unwrap(), "Generate search query for: what is rust?");
    }

    #[test]
    fn test_render_no_escaping() {
        let rendered = render_input("{{input}}", "<<a>> & [b]").unwrap();
        assert_eq!(rendered, "<<a>> & [b]");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        let result = render_template("Question: {{missing}}", &vars);
        // Handlebars renders missing variables as empty string
        assert!(result.is_ok());
    }
}
