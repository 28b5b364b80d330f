//! Threadcast - split long text into numbered post threads
//!
//! This library measures text with the weighted length rules of
//! character-limited microblogging platforms, splits it into a thread of
//! numbered posts that each fit the limit, and schedules the thread for
//! publication through pluggable storage and scheduling backends.

pub mod config;
pub mod error;
pub mod logging;
pub mod media;
pub mod preview;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod thread;
pub mod timezone;
pub mod types;
pub mod weight;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ThreadcastError};
pub use preview::{preview, ThreadPreview};
pub use thread::{split_thread, split_thread_detailed, ThreadSplit};
pub use types::{Post, PostStatus};
pub use weight::weighted_length;
