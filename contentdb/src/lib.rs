//! contentdb library
//!
//! Content records stored in SQLite, rendered through a choice of text
//! filters, with a table of contents extracted from the result.

pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod services;
pub mod toc;

pub use error::{ContentError, Result};
