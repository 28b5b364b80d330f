//! Core types for Threadcast

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single post, usually one member of a thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub scheduled_at: Option<i64>,
    pub status: PostStatus,
    /// Present when the post belongs to a multi-post thread
    pub thread: Option<ThreadInfo>,
    /// Handle of the scheduled publish run, if any
    pub run_handle: Option<RunHandle>,
    pub error_message: Option<String>,
}

impl Post {
    pub fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            created_at: chrono::Utc::now().timestamp(),
            scheduled_at: None,
            status: PostStatus::Pending,
            thread: None,
            run_handle: None,
            error_message: None,
        }
    }

    /// Create a post as member `position` of a thread of `total` posts
    pub fn in_thread(content: String, thread_id: &str, position: usize, total: usize) -> Self {
        Self {
            thread: Some(ThreadInfo {
                thread_id: thread_id.to_string(),
                position,
                total,
            }),
            ..Self::new(content)
        }
    }

    /// Apply a status update in place
    pub fn apply(&mut self, update: &StatusUpdate) {
        self.status = update.status.clone();
        if update.scheduled_at.is_some() {
            self.scheduled_at = update.scheduled_at;
        }
        if update.run_handle.is_some() {
            self.run_handle = update.run_handle.clone();
        }
        if update.error_message.is_some() {
            self.error_message = update.error_message.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PostStatus {
    Draft,
    Scheduled,
    Pending,
    Posted,
    Failed,
    Cancelled,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Pending => write!(f, "pending"),
            Self::Posted => write!(f, "posted"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Position of a post within its thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadInfo {
    pub thread_id: String,
    /// 1-based
    pub position: usize,
    pub total: usize,
}

/// Fields changed by a store status update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: PostStatus,
    pub scheduled_at: Option<i64>,
    pub run_handle: Option<RunHandle>,
    pub error_message: Option<String>,
}

impl StatusUpdate {
    pub fn status(status: PostStatus) -> Self {
        Self {
            status,
            scheduled_at: None,
            run_handle: None,
            error_message: None,
        }
    }

    pub fn scheduled(scheduled_at: i64, run_handle: RunHandle) -> Self {
        Self {
            status: PostStatus::Scheduled,
            scheduled_at: Some(scheduled_at),
            run_handle: Some(run_handle),
            error_message: None,
        }
    }
}

/// Payload handed to the scheduler: publish these posts, in order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishJob {
    pub thread_id: String,
    pub post_ids: Vec<String>,
}

/// Opaque identifier of a scheduled run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RunHandle(pub String);

impl std::fmt::Display for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
