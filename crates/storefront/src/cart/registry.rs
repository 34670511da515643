//! Per-browser cart stores.
//!
//! The storefront serves many browsers, each with its own cart. One
//! [`CartRegistry`] is built at startup and injected through `AppState`;
//! handlers ask it for the cart belonging to the requesting browser.
//!
//! Each cart sits behind an async mutex, so operations on one browser's cart
//! run one at a time and its snapshot writes land in order. Live carts are
//! cached; a cart evicted from the cache is rehydrated from its slot the next
//! time the browser shows up.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::notify::{Notification, Notifier, ToastQueue};
use super::storage::{CartStorage, FileStorage, MemoryStorage};
use super::CartStore;

/// Idle time after which a live cart is dropped from the cache.
const CART_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Identity of a browser, kept in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowserId(Uuid);

impl BrowserId {
    /// A fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A browser's cart store plus the toasts it has raised but not yet shown.
#[derive(Debug)]
pub struct BrowserCart {
    store: CartStore,
    toasts: Arc<ToastQueue>,
}

impl BrowserCart {
    /// Open the cart over `storage`, routing notifications to a toast queue.
    pub fn open(storage: Arc<dyn CartStorage>) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let notifier: Arc<dyn Notifier> = Arc::clone(&toasts) as Arc<dyn Notifier>;
        Self {
            store: CartStore::open(storage, notifier),
            toasts,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    /// Drain the toasts raised since the last call.
    pub fn take_toasts(&self) -> Vec<Notification> {
        self.toasts.drain()
    }
}

/// Where browser cart slots live.
#[derive(Debug, Clone)]
enum SlotBackend {
    /// `<data_dir>/carts/<browser_id>/cart.json`
    Files(PathBuf),
    /// Process memory; carts vanish on eviction or restart.
    Memory,
}

/// Hands out the cart for each browser.
#[derive(Clone)]
pub struct CartRegistry {
    carts: Cache<BrowserId, Arc<Mutex<BrowserCart>>>,
    backend: SlotBackend,
}

impl fmt::Debug for CartRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartRegistry")
            .field("backend", &self.backend)
            .field("live_carts", &self.carts.entry_count())
            .finish()
    }
}

impl CartRegistry {
    /// Registry persisting each browser's cart under `data_dir`.
    #[must_use]
    pub fn file_backed(data_dir: impl Into<PathBuf>, capacity: u64) -> Self {
        Self::with_backend(SlotBackend::Files(data_dir.into()), capacity)
    }

    /// Registry keeping carts in memory only.
    #[must_use]
    pub fn in_memory(capacity: u64) -> Self {
        Self::with_backend(SlotBackend::Memory, capacity)
    }

    fn with_backend(backend: SlotBackend, capacity: u64) -> Self {
        let carts = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(CART_IDLE_TIMEOUT)
            .build();
        Self { carts, backend }
    }

    /// The cart for `browser`, opening it from its slot on first use.
    pub async fn cart(&self, browser: BrowserId) -> Arc<Mutex<BrowserCart>> {
        self.carts
            .get_with(browser, async {
                tracing::debug!(%browser, "opening browser cart");
                Arc::new(Mutex::new(BrowserCart::open(self.slot_for(browser))))
            })
            .await
    }

    fn slot_for(&self, browser: BrowserId) -> Arc<dyn CartStorage> {
        match &self.backend {
            SlotBackend::Files(data_dir) => Arc::new(FileStorage::in_dir(
                data_dir.join("carts").join(browser.to_string()),
            )),
            SlotBackend::Memory => Arc::new(MemoryStorage::new()),
        }
    }
}
