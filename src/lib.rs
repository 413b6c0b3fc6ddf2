pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod format;
pub mod models;
pub mod parse;
pub mod summary;
pub mod tui;
