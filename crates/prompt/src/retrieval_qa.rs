//! Grounded-answer (retrieval QA) prompt.
//!
//! Builds the message sequence that asks the model to answer the user's
//! question from the retrieved sources, citing each fact with bracketed
//! source-name markers and appending three `<<...>>` follow-up questions.
//! Pure function of (question, history, documents); no retrieval, no model
//! calls.

use docent_core::AppResult;
use docent_llm::ChatMessage;
use docent_retrieval::Document;

const SYSTEM_PROMPT: &str = "\
Assistant helps the company employees with their questions, By using companies knowledge base. Be brief in your answers.
Answer ONLY with the facts listed in the list of sources below. If there isn't enough information below, say you don't know. Do not generate answers that don't use the sources below. If asking a clarifying question to the user would help, ask the question.
For tabular information return it as an html table. Do not return markdown format. If the question is not in English, answer in the language used in the question.
Each source has a name followed by colon and the actual information, always include the source name for each fact you use in the response. Use square brackets to reference the source, e.g. [info1.txt]. Don't combine sources, list each source separately, e.g. [info1.txt][info2.pdf].
";

const FOLLOW_UP_QUESTIONS_PROMPT: &str = "\
Generate three very brief follow-up questions that the user would likely ask next regarding the answer to the question and retrieved documents form the knowledgebase.
Use double angle brackets to reference the questions, e.g. <<Can you give me a code example?>>.
Try not to repeat questions that have already been asked.
Only generate questions and do not generate any text before or after the questions, such as 'Next Questions'
Here is an example of follow-up questions:
Answer to the question.
<<Can you give me a code example?>>, <<What is the difference between X and Y?>>, <<What is the best way to do Z?>>.
";

const EXAMPLE_INPUT: &str = "What can you tell me about the transformers library?";

const EXAMPLE_OUTPUT: &str = "\
The Transformers library is an opinionated library built for machine learning researchers, practitioners, and engineers. \
It provides state-of-the-art models for natural language processing, computer vision, and audio and speech processing tasks. \
The library is designed to be easy and fast to use, with minimal user-facing abstractions. \
It supports PyTorch, TensorFlow, and JAX frameworks and allows for framework interoperability. \
The library also provides APIs for quickly using models for inference and for training or fine-tuning models. \
[data/transformers_docs_full/philosophy.md][data/transformers_docs_full/index.md][data/transformers_docs_full/task_summary.md]
<<What are some examples of tasks that can be performed using the Transformers library?>>\
<<Can I use the Transformers library with different deep learning frameworks?>>\
<<How can I fine-tune a pretrained model using the Transformers library?>>";

/// Build the grounded-answer message sequence.
///
/// The final user turn is the question alone, or the question followed by a
/// `Sources:` block listing each retrieved document when any were found.
pub fn build_messages(
    input: &str,
    history: &[ChatMessage],
    documents: &[Document],
) -> AppResult<Vec<ChatMessage>> {
    tracing::debug!(
        "Building retrieval QA prompt ({} documents, {} history turns)",
        documents.len(),
        history.len()
    );

    let sources = format_documents(documents);

    // Format input into prompt by including sources
    let question = if documents.is_empty() {
        input.to_string()
    } else {
        format!("{}\nSources:\n{}", input, sources)
    };

    let mut messages = Vec::with_capacity(history.len() + 4);

    messages.push(ChatMessage::system(format!(
        "{}\n{}",
        SYSTEM_PROMPT, FOLLOW_UP_QUESTIONS_PROMPT
    )));
    messages.push(ChatMessage::user(EXAMPLE_INPUT));
    messages.push(ChatMessage::assistant(EXAMPLE_OUTPUT));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));

    Ok(messages)
}

/// Format retrieved documents into the `Sources:` block, one per line, in
/// retrieval order.
fn format_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(format_document)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single document as `source_id: content`, with newlines inside
/// the chunk text collapsed away.
fn format_document(document: &Document) -> String {
    let content = document.text.replace('\n', "");
    format!("{}: {}", document.source_id, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_llm::Role;

    #[test]
    fn test_message_shape_without_documents() {
        let messages = build_messages("What is transformers library?", &[], &[]).unwrap();

        // system + example exchange + final user turn
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "What is transformers library?");
    }

    #[test]
    fn test_sources_block() {
        let documents = vec![
            Document::new("philosophy.md", "Line one\nline two"),
            Document::new("index.md", "Second chunk"),
        ];

        let messages = build_messages("What is it?", &[], &documents).unwrap();
        let question = &messages.last().unwrap().content;

        assert!(question.starts_with("What is it?\nSources:\n"));
        // Newlines inside chunk text are collapsed, one document per line
        assert!(question.contains("philosophy.md: Line oneline two\n"));
        assert!(question.ends_with("index.md: Second chunk"));
    }

    #[test]
    fn test_history_passes_through_verbatim() {
        let history = vec![
            ChatMessage::user("earlier question"),
            ChatMessage::assistant("earlier answer"),
        ];

        let messages = build_messages("follow up", &history, &[]).unwrap();

        assert_eq!(messages.len(), 6);
        assert_eq!(messages[3].content, "earlier question");
        assert_eq!(messages[4].content, "earlier answer");
        assert_eq!(messages[5].content, "follow up");
    }

    #[test]
    fn test_system_combines_answer_and_follow_up_rules() {
        let messages = build_messages("q", &[], &[]).unwrap();
        let system = &messages[0].content;

        assert!(system.contains("Answer ONLY with the facts"));
        assert!(system.contains("Use square brackets to reference the source"));
        assert!(system.contains("Generate three very brief follow-up questions"));
        assert!(system.contains("double angle brackets"));
    }

    #[test]
    fn test_example_demonstrates_markup() {
        let messages = build_messages("q", &[], &[]).unwrap();
        let example = &messages[2].content;

        assert!(example.contains("[data/transformers_docs_full/philosophy.md]"));
        assert!(example.contains("<<How can I fine-tune a pretrained model using the Transformers library?>>"));
    }
}
