//! Chat command handler.
//!
//! Interactive REPL session. The conversation history lives here, on the
//! caller side of the chain: each turn re-supplies the full history and
//! appends the user question and the assistant reply afterwards.

use crate::setup;
use clap::Args;
use docent_chain::{ChainRequest, Message};
use docent_core::{config::AppConfig, AppResult};
use std::io::{BufRead, Write};

/// Interactive chat session with conversation history
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Disable streaming output
    #[arg(long)]
    pub no_stream: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session");

        let chain = setup::build_chain(config)?;
        let mut history: Vec<Message> = Vec::new();

        println!("How may I help you? (exit to quit)");

        let stdin = std::io::stdin();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF ends the session
                break;
            }

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question == "exit" || question == "quit" {
                break;
            }

            let mut request =
                ChainRequest::new(question).with_history(history.clone());

            if !self.no_stream {
                request = request.with_sink(Box::new(|fragment: &str| {
                    print!("{}", fragment);
                    std::io::stdout().flush().ok();
                }));
            }

            // A failed turn is surfaced and the session continues; the user
            // can retry by asking again
            let response = match chain.run(request).await {
                Ok(response) => response,
                Err(e) => {
                    eprintln!("error: {}", e);
                    continue;
                }
            };

            if self.no_stream {
                println!("{}", response.reply.formatted_content);
            } else {
                println!();
            }

            super::print_reply_sections(&response.reply);

            history.push(Message::user(question));
            history.push(Message::Assistant(response.reply));
        }

        tracing::info!("Chat session ended after {} turns", history.len() / 2);

        Ok(())
    }
}
