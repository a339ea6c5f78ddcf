//! The library that underlies the Cloudy clients.
//!
//! Cloudy clients (the CLI, desktop shells) rely on this library for
//! authentication, file operations, transfer queues, and keeping a fresh
//! local picture of what is on the server without hammering it.
//!
//! - Most clients / integrators will be interested in the functions attached
//!   to the [Cloudy] struct. See the [service] module for evolving this
//!   functionality.
//! - The [model] module contains the specification of our data structures and
//!   contracts between components.
//! - The [io] module contains interactions with the network.

#[macro_use]
extern crate tracing;

pub mod io;
pub mod model;
pub mod service;
pub mod subscribers;

#[derive(Clone)]
pub struct Cloudy {
    pub config: Config,
    pub session: SessionStore,
    pub client: Network,
    pub events: EventSubs,
    pub caches: Caches,
    pub idle: IdleWatcher,
    pub store: StoreHandle,
}

impl Cloudy {
    #[instrument(level = "info", skip_all, err(Debug))]
    pub async fn init(config: Config) -> CloudResult<Self> {
        fs::create_dir_all(&config.writeable_path)?;
        logging::init(&config)?;

        let session = SessionStore::restore(&config);
        let client = Network::new(&config.api_url);
        let events = EventSubs::default();
        let caches = Caches::default();
        let idle = IdleWatcher::default();
        let store = StoreHandle::default();

        let result = Self { config, session, client, events, caches, idle, store };

        if result.config.background_work {
            result.setup_store();
            result.setup_idle_watch();
        }

        Ok(result)
    }
}

pub fn get_code_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub static DEFAULT_API_LOCATION: &str = "https://api.cloudy.rs";

use std::fs;

use io::network::Network;
use model::config::Config;
pub use model::errors::{CloudErrKind, CloudResult};
use service::cache::Caches;
use service::events::EventSubs;
use service::idle::IdleWatcher;
use service::logging;
use service::session::SessionStore;
use subscribers::store::StoreHandle;
pub use uuid::Uuid;
