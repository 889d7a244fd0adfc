pub mod client;
pub mod prompts;

pub use client::{GeminiClient, GeminiConfig};
pub use prompts::{ENGINE_LIST, ScanPrompt, TOTAL_VENDORS};
