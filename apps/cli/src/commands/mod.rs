//! CLI 子命令

pub mod config;

pub use config::ConfigCommand;
