use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use forgeboard_core::classifier::GeminiClassifier;
use forgeboard_core::store::Store;
use forgeboard_server::AppState;

/// Open the store, wire up the classifier, and serve the API.
///
/// An empty API key is allowed: the classifier call will fail and every
/// analysis persists the fallback persona, which keeps local development
/// working without credentials.
pub fn run(
    db: &Path,
    port: u16,
    classifier_url: &str,
    api_key: &str,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    if api_key.is_empty() {
        tracing::warn!("no classifier API key set; analyses will use the fallback persona");
    }

    let store = Store::open(db)?;
    let classifier = GeminiClassifier::new(
        classifier_url,
        api_key,
        Duration::from_secs(timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("failed to build classifier client: {e}"))?;

    let state = AppState::new(store, Arc::new(classifier));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(forgeboard_server::serve(state, port))
}
