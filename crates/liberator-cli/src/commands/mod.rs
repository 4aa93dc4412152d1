pub mod clear;
pub mod config;
pub mod import;
pub mod import_ui;
pub mod prompts;
