//! Post storage
//!
//! Persistence lives outside this crate. The service layer only needs to
//! insert posts, update their status and look them up by ID, so that is all
//! [`PostStore`] asks of an implementation. [`MemoryStore`] is available for
//! all builds so integration tests and embedders can run without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, StoreError};
use crate::types::{Post, StatusUpdate};

const POISONED: &str = "store lock poisoned";

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post, returning its ID
    async fn insert(&self, post: &Post) -> Result<String>;

    /// Update the lifecycle fields of an existing post
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Update` if no post has this ID.
    async fn update_status(&self, id: &str, update: &StatusUpdate) -> Result<()>;

    /// Fetch a post, or `None` if it does not exist
    async fn get_by_id(&self, id: &str) -> Result<Option<Post>>;
}

/// In-memory store backed by a shared map
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Posts>>,
}

#[derive(Default)]
struct Posts {
    by_id: HashMap<String, Post>,
    /// IDs in insertion order
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts
    pub fn len(&self) -> usize {
        self.inner.lock().map(|posts| posts.order.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored post in insertion order
    pub fn all(&self) -> Vec<Post> {
        self.inner
            .lock()
            .map(|posts| {
                posts
                    .order
                    .iter()
                    .filter_map(|id| posts.by_id.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert(&self, post: &Post) -> Result<String> {
        let mut posts = self.inner.lock().map_err(|_| StoreError::Insert(POISONED.to_string()))?;
        if posts.by_id.contains_key(&post.id) {
            return Err(StoreError::Insert(format!("duplicate post id {}", post.id)).into());
        }
        posts.by_id.insert(post.id.clone(), post.clone());
        posts.order.push(post.id.clone());
        Ok(post.id.clone())
    }

    async fn update_status(&self, id: &str, update: &StatusUpdate) -> Result<()> {
        let mut posts = self.inner.lock().map_err(|_| StoreError::Update(POISONED.to_string()))?;
        let post = posts
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::Update(format!("no post with id {}", id)))?;
        post.apply(update);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Post>> {
        let posts = self.inner.lock().map_err(|_| StoreError::Lookup(POISONED.to_string()))?;
        Ok(posts.by_id.get(id).cloned())
    }
}
