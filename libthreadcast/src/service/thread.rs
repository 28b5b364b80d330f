//! Thread creation, scheduling and cancellation
//!
//! Splits content into a thread, stores every post, and hands one publish
//! job for the whole thread to the scheduler.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::events::{Event, EventBus};
use crate::error::{Result, ThreadcastError};
use crate::preview::{preview, ThreadPreview};
use crate::scheduler::{delay_until, parse_schedule, Scheduler};
use crate::store::PostStore;
use crate::thread::split_thread_detailed;
use crate::timezone::ZoneConverter;
use crate::types::{Post, PostStatus, PublishJob, RunHandle, StatusUpdate};
use crate::Config;

/// When a thread should be published
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleRequest {
    /// As soon as the scheduler picks it up
    Now,
    /// A relative or natural-language time, e.g. "30m" or "tomorrow"
    After(String),
    /// A wall-clock time; `zone` falls back to `schedule.timezone`
    Local {
        date: String,
        time: String,
        zone: Option<String>,
    },
}

/// Request to create a thread
#[derive(Debug, Clone)]
pub struct ThreadRequest {
    pub content: String,
    /// Per-post budget; `thread.max_length` when `None`
    pub max_length: Option<usize>,
    pub schedule: ScheduleRequest,
    /// Store the posts as drafts without scheduling
    pub draft: bool,
}

impl ThreadRequest {
    /// Publish `content` now at the configured budget
    pub fn now(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            max_length: None,
            schedule: ScheduleRequest::Now,
            draft: false,
        }
    }
}

/// Result of creating a thread
#[derive(Debug, Clone)]
pub struct ThreadResponse {
    pub thread_id: String,
    /// Stored post IDs in thread order
    pub post_ids: Vec<String>,
    pub preview: ThreadPreview,
    /// Posts the content needed before the thread cap was applied
    pub uncapped_count: usize,
    /// `None` for drafts
    pub run_handle: Option<RunHandle>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ThreadService {
    store: Arc<dyn PostStore>,
    scheduler: Arc<dyn Scheduler>,
    zones: Arc<dyn ZoneConverter>,
    config: Arc<Config>,
    event_bus: EventBus,
}

impl ThreadService {
    pub fn new(
        store: Arc<dyn PostStore>,
        scheduler: Arc<dyn Scheduler>,
        zones: Arc<dyn ZoneConverter>,
        config: Arc<Config>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            scheduler,
            zones,
            config,
            event_bus,
        }
    }

    /// Split, store and schedule a thread
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for empty content or a zero budget
    /// - schedule and time-zone errors for an unparseable schedule; nothing
    ///   is stored in that case
    /// - store and scheduler errors as reported by the collaborator. If
    ///   scheduling fails the stored posts are marked `Failed`.
    pub async fn create(&self, request: ThreadRequest) -> Result<ThreadResponse> {
        if request.content.trim().is_empty() {
            return Err(ThreadcastError::InvalidInput(
                "Content cannot be empty or whitespace-only".to_string(),
            ));
        }

        let max_length = request.max_length.unwrap_or(self.config.thread.max_length);
        if max_length == 0 {
            return Err(ThreadcastError::InvalidInput(
                "Maximum post length must be greater than zero".to_string(),
            ));
        }

        let publish_at = self.resolve_schedule(&request.schedule)?;

        let split = split_thread_detailed(&request.content, max_length);
        let thread_id = uuid::Uuid::new_v4().to_string();
        let total = split.posts.len();

        let mut post_ids = Vec::with_capacity(total);
        for (i, content) in split.posts.iter().enumerate() {
            let mut post = Post::in_thread(content.clone(), &thread_id, i + 1, total);
            if request.draft {
                post.status = PostStatus::Draft;
            }
            post_ids.push(self.store.insert(&post).await?);
        }

        self.event_bus.emit(Event::ThreadCreated {
            thread_id: thread_id.clone(),
            post_count: total,
            uncapped_count: split.uncapped_count,
        });

        let mut response = ThreadResponse {
            thread_id: thread_id.clone(),
            post_ids: post_ids.clone(),
            preview: preview(&split.posts),
            uncapped_count: split.uncapped_count,
            run_handle: None,
            scheduled_at: None,
        };

        if request.draft {
            info!(thread_id = %thread_id, posts = total, "Saved thread as draft");
            return Ok(response);
        }

        let now = Utc::now();
        let scheduled_at = publish_at.unwrap_or(now);
        let delay = publish_at.map(|at| delay_until(at, now));

        let job = PublishJob {
            thread_id: thread_id.clone(),
            post_ids: post_ids.clone(),
        };
        let handle = match self.scheduler.schedule(&job, delay).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(thread_id = %thread_id, error = %e, "Failed to schedule thread");
                self.mark_failed(&post_ids, &e.to_string()).await;
                return Err(e);
            }
        };

        let update = StatusUpdate::scheduled(scheduled_at.timestamp(), handle.clone());
        for id in &post_ids {
            self.store.update_status(id, &update).await?;
        }

        self.event_bus.emit(Event::ThreadScheduled {
            thread_id: thread_id.clone(),
            run_handle: handle.to_string(),
            scheduled_at: scheduled_at.timestamp(),
        });
        info!(
            thread_id = %thread_id,
            posts = total,
            run = %handle,
            scheduled_at = %scheduled_at,
            "Scheduled thread"
        );

        response.run_handle = Some(handle);
        response.scheduled_at = Some(scheduled_at);
        Ok(response)
    }

    /// Cancel a scheduled post
    ///
    /// See [`ThreadService::cancel_thread`].
    pub async fn cancel(&self, post_id: &str) -> Result<usize> {
        self.cancel_thread(&[post_id.to_string()]).await
    }

    /// Cancel the publish runs of `post_ids` and mark those posts `Cancelled`
    ///
    /// Each distinct run is cancelled once. Posts already posted, failed or
    /// cancelled are left as they are, so repeating a cancel is harmless.
    /// Returns how many posts changed to `Cancelled`.
    ///
    /// The stored status decides what is still cancellable, not the run. The
    /// job runner executing a [`PublishJob`] records each post as `Posted`
    /// or `Failed` as it goes; a post it has not reached yet is still
    /// cancelled, even if the run itself has already finished.
    ///
    /// # Errors
    ///
    /// `NotFound` if any post does not exist; nothing is cancelled then.
    pub async fn cancel_thread(&self, post_ids: &[String]) -> Result<usize> {
        let mut posts = Vec::with_capacity(post_ids.len());
        for id in post_ids {
            let post = self
                .store
                .get_by_id(id)
                .await?
                .ok_or_else(|| ThreadcastError::NotFound(format!("post {}", id)))?;
            posts.push(post);
        }

        let mut cancelled_runs: Vec<RunHandle> = Vec::new();
        let mut cancelled = 0;

        for post in posts {
            if !matches!(
                post.status,
                PostStatus::Scheduled | PostStatus::Pending | PostStatus::Draft
            ) {
                continue;
            }

            if let Some(handle) = &post.run_handle {
                if !cancelled_runs.contains(handle) {
                    self.scheduler.cancel(handle).await?;
                    cancelled_runs.push(handle.clone());
                }
            }

            self.store
                .update_status(&post.id, &StatusUpdate::status(PostStatus::Cancelled))
                .await?;
            cancelled += 1;

            let thread_id = post
                .thread
                .as_ref()
                .map(|t| t.thread_id.clone())
                .unwrap_or_default();
            info!(thread_id = %thread_id, post_id = %post.id, "Cancelled post");
            self.event_bus.emit(Event::ThreadCancelled {
                thread_id,
                post_id: post.id,
            });
        }

        Ok(cancelled)
    }

    /// Split `content` and render it without storing anything
    pub fn preview(&self, content: &str, max_length: Option<usize>) -> ThreadPreview {
        let max_length = max_length.unwrap_or(self.config.thread.max_length);
        let split = split_thread_detailed(content, max_length);
        preview(&split.posts)
    }

    /// Absolute publish time, or `None` to publish immediately
    fn resolve_schedule(&self, schedule: &ScheduleRequest) -> Result<Option<DateTime<Utc>>> {
        match schedule {
            ScheduleRequest::Now => Ok(None),
            ScheduleRequest::After(input) => parse_schedule(input).map(Some),
            ScheduleRequest::Local { date, time, zone } => {
                let zone = zone.as_deref().unwrap_or(&self.config.schedule.timezone);
                Ok(Some(self.zones.to_utc(date, time, zone)?))
            }
        }
    }

    async fn mark_failed(&self, post_ids: &[String], reason: &str) {
        let update = StatusUpdate {
            status: PostStatus::Failed,
            scheduled_at: None,
            run_handle: None,
            error_message: Some(reason.to_string()),
        };
        for id in post_ids {
            if let Err(e) = self.store.update_status(id, &update).await {
                warn!(post_id = %id, error = %e, "Failed to record scheduling failure");
            }
        }
    }
}
