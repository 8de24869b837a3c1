#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Per-session conversation turns.
//!
//! # Key Features
//! - One model call per turn over the full session history
//! - Append-only merge of each reply into the stored state
//! - Pluggable checkpoint storage, with an in-memory default
//! - Failed turns leave stored history untouched

mod checkpointer;
mod error;
mod graph;
mod node;

pub use checkpointer::InMemoryCheckpointer;
pub use error::ConversationError;
pub use graph::{ChatGraph, GraphConfig};
pub use node::chat_step;
