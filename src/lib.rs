//! Connection Processor Library
//!
//! A Rust library for normalizing tables of structural steel connections into
//! a consistent JSON dataset.
//!
//! This library provides tools for:
//! - Resolving unreliable table headers (case, Cyrillic look-alikes, lost
//!   Greek coefficient labels) onto a canonical schema
//! - Reading tab- and comma-separated tables with locale-tolerant number parsing
//! - Resolving profile designations against a reference lookup with tiered
//!   fallbacks and patching their geometry (H, B, s, t)
//! - Rewriting duplicate `CONNECTION_CODE` values to fresh `<prefix>-<number>`
//!   codes with an audit trail
//! - Merging per-table JSON files and exporting sorted value lists

pub mod config;
pub mod constants;
mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod exports;
        pub mod header_resolver;
        pub mod normalization;
        pub mod profile_lookup;
        pub mod record_processor;
        pub mod table_reader;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ConnectionRecord, Geometry, RenameEntry};
pub use config::Config;
pub use error::{Error, Result};
