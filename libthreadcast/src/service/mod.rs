//! Service layer for Threadcast
//!
//! `ThreadcastService` is the entry point for applications. It owns the
//! shared configuration and event bus and hands out the sub-services:
//!
//! - `ThreadService`: split, store, schedule and cancel threads
//! - `ValidationService`: check content before threading it
//! - `EventBus`: lifecycle event distribution
//!
//! Storage, dispatch and time-zone lookup are supplied by the caller through
//! the [`PostStore`], [`Scheduler`] and [`ZoneConverter`] traits.
//!
//! # Example
//!
//! ```no_run
//! use libthreadcast::service::thread::ThreadRequest;
//! use libthreadcast::service::ThreadcastService;
//! use libthreadcast::Config;
//!
//! # async fn example() -> libthreadcast::Result<()> {
//! let service = ThreadcastService::in_memory(Config::load()?);
//!
//! let response = service
//!     .thread()
//!     .create(ThreadRequest::now("First thought.\n\nSecond thought."))
//!     .await?;
//! println!("{}", response.preview.text);
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod thread;
pub mod validation;

use self::events::EventBus;
use self::thread::ThreadService;
use self::validation::ValidationService;
use crate::scheduler::{ManualScheduler, Scheduler};
use crate::store::{MemoryStore, PostStore};
use crate::timezone::{OffsetZones, ZoneConverter};
use crate::Config;
use std::sync::Arc;

const EVENT_CAPACITY: usize = 100;

/// Main service facade
///
/// Sub-services share one `Arc<Config>` and one event bus.
pub struct ThreadcastService {
    config: Arc<Config>,
    thread: ThreadService,
    validation: ValidationService,
    event_bus: EventBus,
}

impl ThreadcastService {
    pub fn new(
        config: Config,
        store: Arc<dyn PostStore>,
        scheduler: Arc<dyn Scheduler>,
        zones: Arc<dyn ZoneConverter>,
    ) -> Self {
        let config = Arc::new(config);
        let event_bus = EventBus::new(EVENT_CAPACITY);

        let thread = ThreadService::new(
            store,
            scheduler,
            zones,
            Arc::clone(&config),
            event_bus.clone(),
        );
        let validation = ValidationService::new(Arc::clone(&config));

        Self {
            config,
            thread,
            validation,
            event_bus,
        }
    }

    /// Service backed by [`MemoryStore`], [`ManualScheduler`] and a UTC-only
    /// zone table, for dry runs and tests
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(ManualScheduler::new()),
            Arc::new(OffsetZones::utc()),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn thread(&self) -> &ThreadService {
        &self.thread
    }

    pub fn validation(&self) -> &ValidationService {
        &self.validation
    }

    /// Subscribe to service events
    ///
    /// Multiple subscribers are supported; each sees every event emitted
    /// after it subscribed.
    pub fn subscribe(&self) -> events::EventReceiver {
        self.event_bus.subscribe()
    }
}
