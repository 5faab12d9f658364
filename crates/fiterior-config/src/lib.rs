//! Configuration management for fiterior
//!
//! This crate provides hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. Supports TOML configuration files with
//! `[transform]`, `[progress]` and `[defaults]` sections.

mod config;

pub use config::*;
