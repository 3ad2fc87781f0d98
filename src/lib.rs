pub mod commands;
pub mod config;
pub mod grades;
pub mod sheets;
pub mod ui;
