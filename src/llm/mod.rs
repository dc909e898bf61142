//! Chat collaborator for free-form questions about a resume

pub mod chat;
pub mod client;
pub mod prompts;

pub use chat::ResumeChat;
pub use client::{ChatClient, ChatCompletion, ChatMessage};
