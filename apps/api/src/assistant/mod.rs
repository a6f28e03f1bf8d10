//! Language assistant: word lookups and follow-up conversations, served either
//! by Gemini directly or by the chat provider chain.

pub mod chain;
pub mod followup;
pub mod handlers;
pub mod lookup;
pub mod prompts;
