//! Language registry: current language selection and change broadcast.
//!
//! The registry owns the language catalog and the index of the current language,
//! and notifies every registered [`LanguageChangeListener`] when the selection
//! changes. It is single-threaded: handles are `Rc<LanguageRegistry>` and
//! listeners are held as `Weak` references, so the registry never keeps a
//! dropped text binding alive or updates it.
//!
//! The preferred setup is explicit: build the registry once at startup with
//! [`LanguageRegistry::new`] and pass the handle around. [`LanguageRegistry::instance`]
//! provides a thread-local accessor for hosts that want a lazily created one.

use crate::config::Config;
use crate::i18n::{LanguageCatalog, LocalizationError, LocalizationMetrics};
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};

/// Receives the new language index whenever the selection changes.
pub trait LanguageChangeListener {
    /// Apply the language at `index`.
    ///
    /// An error is logged by the registry and does not stop the broadcast.
    fn on_language_changed(&self, index: usize) -> Result<(), LocalizationError>;

    /// Called after the catalog was replaced, before any resulting language change.
    fn on_catalog_changed(&self, _catalog: &LanguageCatalog) {}
}

/// Receives the catalog when option lists need to be (re)populated.
pub trait CatalogChangeListener {
    fn on_catalog_changed(&self, catalog: &LanguageCatalog);
}

/// Outcome of one language broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Index that was broadcast
    pub language: usize,

    /// Subscribers that applied the language
    pub delivered: usize,

    /// Subscribers that returned an error or panicked
    pub failed: usize,

    /// Dropped subscribers removed during this broadcast
    pub pruned: usize,
}

/// Current-language state and the subscriber set.
pub struct LanguageRegistry {
    catalog: RefCell<LanguageCatalog>,
    current_language: Cell<usize>,
    /// Insertion ordered, one entry per listener.
    subscribers: RefCell<Vec<Weak<dyn LanguageChangeListener>>>,
    catalog_listeners: RefCell<Vec<Weak<dyn CatalogChangeListener>>>,
    broadcasting: Cell<bool>,
    initialization_complete: Cell<bool>,
}

thread_local! {
    static INSTANCE: OnceCell<Rc<LanguageRegistry>> = const { OnceCell::new() };
}

impl LanguageRegistry {
    /// Create a registry for `catalog` with the first language selected.
    pub fn new(catalog: LanguageCatalog) -> Rc<Self> {
        debug!(
            "Creating language registry with {} languages",
            catalog.amount_of_languages()
        );
        Rc::new(Self {
            catalog: RefCell::new(catalog),
            current_language: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
            catalog_listeners: RefCell::new(Vec::new()),
            broadcasting: Cell::new(false),
            initialization_complete: Cell::new(false),
        })
    }

    /// Get this thread's registry, creating it from the environment on first call.
    ///
    /// The catalog is read through [`Config::from_env`]. A registry set earlier with
    /// [`LanguageRegistry::install`] is returned as is.
    pub fn instance() -> Result<Rc<Self>, LocalizationError> {
        if let Some(registry) = INSTANCE.with(|cell| cell.get().cloned()) {
            return Ok(registry);
        }

        let catalog = Config::from_env()
            .and_then(|config| config.catalog())
            .map_err(|e| LocalizationError::Configuration(format!("{:#}", e)))?;
        let registry = Self::new(catalog);
        Self::install(Rc::clone(&registry));
        Ok(registry)
    }

    /// Make `registry` this thread's instance.
    ///
    /// # Returns
    /// `false` if an instance already existed (it is kept).
    pub fn install(registry: Rc<Self>) -> bool {
        INSTANCE.with(|cell| cell.set(registry).is_ok())
    }

    // ==================== Selection ====================

    /// Select the language at `index` and notify all subscribers in
    /// registration order.
    ///
    /// A rejected call leaves the current language and every display untouched.
    ///
    /// # Returns
    /// * `Err(LocalizationError::IndexOutOfRange)` if `index` is not in the catalog
    /// * `Err(LocalizationError::Reentrant)` if called from inside a broadcast
    pub fn set_language(&self, index: usize) -> Result<BroadcastReport, LocalizationError> {
        if self.broadcasting.get() {
            warn!(
                "Rejected language change to {} requested during a broadcast",
                index
            );
            LocalizationMetrics::global().record_rejected_selection();
            return Err(LocalizationError::Reentrant);
        }

        let count = self.catalog.borrow().amount_of_languages();
        if index >= count {
            error!(
                "Rejected language change: index {} is out of range (catalog has {} languages)",
                index, count
            );
            LocalizationMetrics::global().record_rejected_selection();
            return Err(LocalizationError::IndexOutOfRange { index, count });
        }

        self.current_language.set(index);
        Ok(self.broadcast(index))
    }

    pub fn current_language(&self) -> usize {
        self.current_language.get()
    }

    /// Display label of the current language.
    pub fn current_language_name(&self) -> String {
        let catalog = self.catalog.borrow();
        catalog
            .name(self.current_language.get())
            .unwrap_or_default()
            .to_string()
    }

    /// Snapshot of the catalog.
    pub fn catalog(&self) -> LanguageCatalog {
        self.catalog.borrow().clone()
    }

    pub fn language_options(&self) -> Vec<String> {
        self.catalog.borrow().language_options().to_vec()
    }

    fn broadcast(&self, index: usize) -> BroadcastReport {
        let metrics = LocalizationMetrics::global();
        metrics.record_broadcast();

        // Snapshot: listeners registered during the loop are reached next time.
        let (listeners, pruned) = self.live_subscribers();
        let mut report = BroadcastReport {
            language: index,
            pruned,
            ..BroadcastReport::default()
        };

        debug!("Broadcasting language {} to {} subscribers", index, listeners.len());

        self.broadcasting.set(true);
        for (position, listener) in listeners.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_language_changed(index))) {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    metrics.record_subscriber_update();
                }
                Ok(Err(e)) => {
                    report.failed += 1;
                    metrics.record_subscriber_failure();
                    warn!(
                        "✗ Subscriber {} failed to apply language {}: {}",
                        position, index, e
                    );
                }
                Err(_) => {
                    report.failed += 1;
                    metrics.record_subscriber_failure();
                    error!(
                        "✗ Subscriber {} panicked while applying language {}",
                        position, index
                    );
                }
            }
        }
        self.broadcasting.set(false);

        info!(
            "Language changed to {}: {} updated, {} failed, {} pruned",
            index, report.delivered, report.failed, report.pruned
        );
        report
    }

    /// Upgrade live subscribers and drop dead ones. Returns the number dropped.
    fn live_subscribers(&self) -> (Vec<Rc<dyn LanguageChangeListener>>, usize) {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|weak| weak.strong_count() > 0);
        let pruned = before - subscribers.len();

        let live = subscribers.iter().filter_map(Weak::upgrade).collect();
        (live, pruned)
    }

    // ==================== Subscribers ====================

    /// Add `listener` to the broadcast list.
    ///
    /// Registering an already registered listener is ignored. The registry keeps
    /// only a weak reference.
    ///
    /// # Returns
    /// `true` if the listener was added.
    pub fn register<L: LanguageChangeListener + 'static>(&self, listener: &Rc<L>) -> bool {
        if self.is_registered(&**listener) {
            debug!("Listener already registered, ignoring");
            return false;
        }

        let weak = Rc::downgrade(listener);
        let weak: Weak<dyn LanguageChangeListener> = weak;
        self.subscribers.borrow_mut().push(weak);
        true
    }

    /// Remove `listener` from the broadcast list.
    ///
    /// # Returns
    /// `true` if it was registered.
    pub fn unregister<L: LanguageChangeListener + ?Sized>(&self, listener: &L) -> bool {
        let key = address_of(listener);
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|weak| weak.as_ptr() as *const () != key);
        before != subscribers.len()
    }

    pub fn is_registered<L: LanguageChangeListener + ?Sized>(&self, listener: &L) -> bool {
        let key = address_of(listener);
        self.subscribers
            .borrow()
            .iter()
            .any(|weak| weak.as_ptr() as *const () == key)
    }

    /// Number of registered listeners that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    // ==================== Catalog ====================

    /// Whether the first setup pass (option lists populated) has run.
    ///
    /// Reconciliation and validation of bound strings wait for this flag.
    pub fn initialization_complete(&self) -> bool {
        self.initialization_complete.get()
    }

    /// Publish the catalog to all catalog listeners and raise the
    /// initialization flag. Later calls do nothing.
    pub fn complete_initialization(&self) {
        if self.initialization_complete.get() {
            return;
        }

        let catalog = self.catalog();
        let notified = self.notify_catalog_listeners(&catalog);
        self.initialization_complete.set(true);
        info!(
            "Localization initialized: {} languages, {} option lists populated",
            catalog.amount_of_languages(),
            notified
        );
    }

    /// Subscribe to catalog changes.
    ///
    /// After initialization completed, `listener` is populated right away.
    pub fn subscribe_catalog<L: CatalogChangeListener + 'static>(&self, listener: &Rc<L>) -> bool {
        let key = Rc::as_ptr(listener) as *const ();
        {
            let mut listeners = self.catalog_listeners.borrow_mut();
            if listeners
                .iter()
                .any(|weak| weak.as_ptr() as *const () == key)
            {
                return false;
            }
            let weak = Rc::downgrade(listener);
            let weak: Weak<dyn CatalogChangeListener> = weak;
            listeners.push(weak);
        }

        if self.initialization_complete.get() {
            listener.on_catalog_changed(&self.catalog());
        }
        true
    }

    /// Replace the catalog.
    ///
    /// Every subscriber gets [`LanguageChangeListener::on_catalog_changed`], then
    /// the current language is broadcast so displays pick up reconciled text. If
    /// the current language no longer exists it moves to the last language first.
    /// Catalog listeners are then notified once.
    ///
    /// # Returns
    /// * `Ok(false)` if `catalog` equals the current one (nobody is notified)
    /// * `Err(LocalizationError::Reentrant)` if called from inside a broadcast
    pub fn set_catalog(&self, catalog: LanguageCatalog) -> Result<bool, LocalizationError> {
        if self.broadcasting.get() {
            warn!("Rejected catalog change requested during a broadcast");
            return Err(LocalizationError::Reentrant);
        }
        if *self.catalog.borrow() == catalog {
            debug!("Catalog unchanged, skipping notification");
            return Ok(false);
        }

        *self.catalog.borrow_mut() = catalog.clone();

        let (listeners, _) = self.live_subscribers();
        for listener in &listeners {
            if panic::catch_unwind(AssertUnwindSafe(|| listener.on_catalog_changed(&catalog)))
                .is_err()
            {
                error!("✗ Subscriber panicked while reconciling the new catalog");
            }
        }

        let count = catalog.amount_of_languages();
        let mut current = self.current_language.get();
        if current >= count {
            let clamped = count - 1;
            warn!(
                "Current language {} removed from catalog, switching to {}",
                current, clamped
            );
            self.current_language.set(clamped);
            current = clamped;
        }
        self.broadcast(current);

        let notified = self.notify_catalog_listeners(&catalog);
        info!(
            "Catalog changed to {} languages, {} option lists refreshed",
            count, notified
        );
        Ok(true)
    }

    fn notify_catalog_listeners(&self, catalog: &LanguageCatalog) -> usize {
        let listeners: Vec<Rc<dyn CatalogChangeListener>> = {
            let mut listeners = self.catalog_listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        let mut notified = 0;
        for (position, listener) in listeners.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_catalog_changed(catalog))) {
                Ok(()) => notified += 1,
                Err(_) => error!("✗ Catalog listener {} panicked while refreshing", position),
            }
        }
        notified
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("catalog", &self.catalog.borrow())
            .field("current_language", &self.current_language.get())
            .field("subscriber_count", &self.subscriber_count())
            .field("initialization_complete", &self.initialization_complete.get())
            .finish()
    }
}

fn address_of<T: ?Sized>(value: &T) -> *const () {
    value as *const T as *const ()
}
