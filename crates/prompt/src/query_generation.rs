//! Search-query generation prompt.
//!
//! Builds the message sequence that asks the model to turn the user's
//! question into a search query for the document index. Pure function of
//! the input; no I/O.

use crate::template::render_input;
use docent_core::AppResult;
use docent_llm::ChatMessage;

const SYSTEM_MESSAGE: &str = "\
Below is a history of the conversation so far, and a new question asked by the user that needs to be answered by searching in a knowledge base.
You have access to a search index with 100's of documents.
Generate a search query based on the conversation and the new question.
Do not include cited source filenames and document names e.g info.txt or doc.pdf in the search query terms.
Do not include any text inside [] or <<>> in the search query terms.
Do not include any special characters like '+'.
If the question is not in English, translate the question to English before generating the search query.
If you cannot generate a search query, return just the number 0.";

const USER_TEMPLATE: &str = "Generate search query for: {{input}}";

/// Few-shot (input, output) exchanges demonstrating the task.
const EXAMPLES: &[(&str, &str)] = &[
    ("What are my health plans?", "Show available health plans"),
    ("does my plan cover cardio?", "Health plan cardio coverage"),
];

/// Build the query-generation message sequence for a user question.
pub fn build_messages(input: &str) -> AppResult<Vec<ChatMessage>> {
    tracing::debug!("Building query generation prompt");

    let mut messages = Vec::with_capacity(EXAMPLES.len() * 2 + 2);

    messages.push(ChatMessage::system(SYSTEM_MESSAGE));

    for (example_input, example_output) in EXAMPLES {
        messages.push(ChatMessage::user(render_input(USER_TEMPLATE, example_input)?));
        messages.push(ChatMessage::assistant(*example_output));
    }

    messages.push(ChatMessage::user(render_input(USER_TEMPLATE, input)?));

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_llm::Role;

    #[test]
    fn test_message_shape() {
        let messages = build_messages("What is transformers library?").unwrap();

        // system + 2 few-shot exchanges + final user turn
        assert_eq!(messages.len(), 2 + EXAMPLES.len() * 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);

        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(
            last.content,
            "Generate search query for: What is transformers library?"
        );
    }

    #[test]
    fn test_few_shots_use_template() {
        let messages = build_messages("q").unwrap();
        assert_eq!(
            messages[1].content,
            "Generate search query for: What are my health plans?"
        );
        assert_eq!(messages[2].content, "Show available health plans");
    }

    #[test]
    fn test_system_rules_present() {
        let messages = build_messages("q").unwrap();
        let system = &messages[0].content;
        assert!(system.contains("return just the number 0"));
        assert!(system.contains("translate the question to English"));
        assert!(system.contains("[] or <<>>"));
    }
}
