//! Command handler implementations for fieldhist CLI
//!
//! This module organizes command handlers into logical groups:
//! - `basic`: History commands (add, list, remove, tags, suggest)
//! - `config`: Configuration, statistics and clearing
//! - `demo`: Interactive terminal field

mod basic;
mod config;
mod demo;

pub use basic::*;
pub use config::*;
pub use demo::*;
