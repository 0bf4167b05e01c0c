//! Ask command handler.
//!
//! Runs a single question through the assistant chain and prints the
//! grounded answer with its citations and follow-up questions.

use crate::setup;
use clap::Args;
use docent_chain::ChainRequest;
use docent_core::{config::AppConfig, AppResult};
use std::io::Write;
use std::path::PathBuf;

/// Ask a single question against the document corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Enable streaming (default: true)
    #[arg(long, default_value = "true")]
    pub stream: bool,

    /// Disable streaming
    #[arg(long, conflicts_with = "stream")]
    pub no_stream: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .get_question()
            .ok_or_else(|| docent_core::AppError::Config("No question provided".to_string()))?;

        let chain = setup::build_chain(config)?;

        let mut request = ChainRequest::new(&question);

        // Stream raw fragments to stdout as the answer generates
        if self.is_streaming() && !self.json {
            request = request.with_sink(Box::new(|fragment: &str| {
                print!("{}", fragment);
                std::io::stdout().flush().ok();
            }));
        }

        let response = chain.run(request).await?;

        if self.json {
            let output = serde_json::json!({
                "query": response.query,
                "answer": response.reply.formatted_content,
                "content": response.reply.content,
                "citations": response
                    .citations
                    .iter()
                    .map(|doc| doc.source_id.clone())
                    .collect::<Vec<_>>(),
                "followUps": response.follow_ups,
                "model": response.raw_response.model,
                "usage": {
                    "promptTokens": response.raw_response.usage.prompt_tokens,
                    "completionTokens": response.raw_response.usage.completion_tokens,
                    "totalTokens": response.raw_response.usage.total_tokens
                }
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| docent_core::AppError::Serialization(e.to_string()))?;
            println!("{}", json);

            return Ok(());
        }

        if self.is_streaming() {
            // Raw reply already streamed; separate it from the sections below
            println!();
        } else {
            println!("{}", response.reply.formatted_content);
        }

        super::print_reply_sections(&response.reply);

        Ok(())
    }

    /// Get the question text from the positional argument or file.
    fn get_question(&self) -> Option<String> {
        self.question.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
                    .map(|contents| contents.trim().to_string())
            })
        })
    }

    /// Check if streaming is enabled.
    fn is_streaming(&self) -> bool {
        !self.no_stream && self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(question: Option<&str>) -> AskCommand {
        AskCommand {
            question: question.map(str::to_string),
            file: None,
            stream: true,
            no_stream: false,
            json: false,
        }
    }

    #[test]
    fn test_get_question_positional() {
        let cmd = command(Some("What is transformers library?"));
        assert_eq!(
            cmd.get_question().as_deref(),
            Some("What is transformers library?")
        );
    }

    #[test]
    fn test_get_question_missing() {
        let cmd = command(None);
        assert!(cmd.get_question().is_none());
    }

    #[test]
    fn test_is_streaming() {
        let mut cmd = command(Some("q"));
        assert!(cmd.is_streaming());

        cmd.no_stream = true;
        assert!(!cmd.is_streaming());
    }
}
