use std::sync::{Arc, Mutex};

use forgeboard_core::classifier::Classifier;
use forgeboard_core::store::Store;

/// Shared application state passed to all route handlers.
///
/// The store is one SQLite connection behind a mutex; handlers take the
/// lock inside `spawn_blocking` so a slow query never parks the async
/// runtime. The classifier is the injected capability the insight pipeline
/// runs against.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(store: Store, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            classifier,
        }
    }
}
