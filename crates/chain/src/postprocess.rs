//! Post-processing of model-generated answer text.
//!
//! Four independent, deterministic string operations over a raw reply:
//! extracting and stripping `<<...>>` follow-up questions, and extracting
//! and renumbering `[...]` citation markers. Malformed markup is never an
//! error — it simply yields empty results and untouched text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Follow-up questions are delimited with double angle brackets, e.g.
/// `<<Can you give me a code example?>>`.
static FOLLOW_UP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<([^>]+)>>").expect("valid follow-up pattern"));

/// Citations are bracketed source names, e.g. `[info1.txt]`.
static CITATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid citation pattern"));

/// Extract follow-up questions from the response text, in order of
/// appearance.
pub fn extract_follow_ups(response: &str) -> Vec<String> {
    FOLLOW_UP_PATTERN
        .captures_iter(response)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Remove follow-up question markup from the response text and trim the
/// surrounding whitespace.
pub fn strip_follow_ups(response: &str) -> String {
    FOLLOW_UP_PATTERN
        .replace_all(response, "")
        .trim()
        .to_string()
}

/// Extract citation references from the response text, in order of
/// appearance. Duplicates are kept.
pub fn extract_citations(response: &str) -> Vec<String> {
    CITATION_PATTERN
        .captures_iter(response)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Replace citation references with ordered numerical references.
///
/// Every literal occurrence of `[key]` becomes `[i+1]` where `i` is the
/// key's position in `citations`. Replacement is literal-substring based,
/// not pattern based, so a key that is a substring of another key's
/// bracketed form can over-match (e.g. `[doc1]` inside `[doc10]`). This
/// matches the store's established numbering behavior and is kept as-is.
pub fn replace_citations(response: &str, citations: &[String]) -> String {
    let mut result = response.to_string();

    for (i, citation) in citations.iter().enumerate() {
        result = result.replace(&format!("[{}]", citation), &format!("[{}]", i + 1));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLLOW_UP_QUESTIONS: [&str; 3] = [
        "What are some examples of tasks that can be performed using the Transformers library?",
        "Can I use the Transformers library with different deep learning frameworks?",
        "How can I fine-tune a pretrained model using the Transformers library?",
    ];

    #[test]
    fn test_extract_and_strip_follow_ups() {
        let text = format!(
            "Follow ups:\n{}",
            FOLLOW_UP_QUESTIONS
                .iter()
                .map(|q| format!("<<{}>>", q))
                .collect::<Vec<_>>()
                .join("\n")
        );

        let follow_ups = extract_follow_ups(&text);
        assert_eq!(follow_ups, FOLLOW_UP_QUESTIONS);

        let stripped = strip_follow_ups(&text);
        assert_eq!(stripped, "Follow ups:");
    }

    #[test]
    fn test_strip_leaves_no_residue() {
        let text = "Answer <<one>> middle <<two>> end";
        let stripped = strip_follow_ups(&text);
        assert!(!stripped.contains("<<"));
        assert!(!stripped.contains(">>"));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let texts = [
            "plain text",
            "text with <<a follow up>> inside",
            "  <<only>>  ",
            "",
        ];

        for text in texts {
            let once = strip_follow_ups(text);
            let twice = strip_follow_ups(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_extract_and_replace_citations() {
        let text = "Hello world[citation1]! [citation2]";

        let citations = extract_citations(text);
        assert_eq!(citations, vec!["citation1", "citation2"]);

        let replaced = replace_citations(text, &citations);
        assert_eq!(replaced, "Hello world[1]! [2]");
    }

    #[test]
    fn test_extract_citations_keeps_duplicates() {
        let text = "[a.md] then [b.md] then [a.md] again";
        let citations = extract_citations(text);
        assert_eq!(citations, vec!["a.md", "b.md", "a.md"]);
    }

    #[test]
    fn test_replace_unknown_keys_left_untouched() {
        let text = "Known[a.md] and unknown[b.md]";
        let replaced = replace_citations(text, &["a.md".to_string()]);
        assert_eq!(replaced, "Known[1] and unknown[b.md]");
    }

    #[test]
    fn test_replace_renumbers_all_occurrences_of_a_key() {
        let text = "[a.md] twice [a.md]";
        let replaced = replace_citations(text, &["a.md".to_string()]);
        assert_eq!(replaced, "[1] twice [1]");
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        assert!(extract_follow_ups("").is_empty());
        assert!(extract_citations("").is_empty());
        assert_eq!(strip_follow_ups(""), "");
        assert_eq!(replace_citations("", &[]), "");
    }

    #[test]
    fn test_unbalanced_markup_is_not_an_error() {
        let text = "stray << and lonely ] and [unclosed";
        assert!(extract_follow_ups(text).is_empty());
        assert!(extract_citations(text).is_empty());
        assert_eq!(strip_follow_ups(text), text);
    }
}
