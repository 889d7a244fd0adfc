pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod llm;
pub mod parser;
pub mod providers;
pub mod scanner;
pub mod ui;
pub mod utils;
