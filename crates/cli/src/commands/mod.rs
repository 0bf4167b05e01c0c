//! Command handlers for the Docent CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;

use docent_chain::AssistantReply;

/// Print the citation and follow-up sections of an assistant reply.
pub(crate) fn print_reply_sections(reply: &AssistantReply) {
    if !reply.citations.is_empty() {
        println!();
        println!("References:");
        for (i, citation) in reply.citations.iter().enumerate() {
            println!("  [{}] {}", i + 1, citation.source_id);
        }
    }

    if !reply.follow_ups.is_empty() {
        println!();
        println!("Follow-up questions:");
        for follow_up in &reply.follow_ups {
            println!("  - {}", follow_up);
        }
    }
}
