//! Generator boundary: LLM client, prompts, validation, offline fallback

pub mod client;
pub mod context;
pub mod generator;
pub mod offline;
