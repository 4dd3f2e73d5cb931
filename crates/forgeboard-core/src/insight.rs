//! Insight classification pipeline.
//!
//! Four stages, strictly ordered: build a bounded prompt from developer
//! stats, invoke the external classifier, defensively parse its raw text,
//! and append an insight row. The classifier is untrusted and
//! non-deterministic; the pipeline's whole purpose is to turn that
//! unreliability into a total function. Failure absorption happens at
//! exactly one point — between parse and persist — so the "never fails"
//! contract is structural: [`classify_developer`] cannot return an error,
//! and [`analyze_and_persist`] propagates only missing-user and store
//! failures.

use chrono::Utc;
use serde::Deserialize;

use crate::classifier::Classifier;
use crate::error::{ForgeError, Result};
use crate::store::Store;
use crate::types::{Insight, Persona};

/// Feedback line persisted whenever the classifier call or parse fails.
pub const FALLBACK_FEEDBACK: &str = "Keep coding!";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Last-month activity profile handed to the classifier.
#[derive(Debug, Clone)]
pub struct DeveloperStats {
    pub role: String,
    pub prs: i64,
    pub reviews: i64,
    pub fixes: i64,
    pub lead_time: Option<f64>,
}

/// Activity type tags the stats gatherer counts.
const PR_TAG: &str = "PR_MERGE";
const REVIEW_TAG: &str = "REVIEW";
const FIX_TAG: &str = "BUG_FIX";

/// Source the stats server-side from the user's records.
pub fn gather_stats(store: &Store, user_id: i64) -> Result<DeveloperStats> {
    store.with_snapshot(|store| {
        let user = store
            .user(user_id)?
            .ok_or(ForgeError::UserNotFound(user_id))?;
        Ok(DeveloperStats {
            role: format!("{} ({})", user.department, user.role),
            prs: store.activity_count(user_id, PR_TAG)?,
            reviews: store.activity_count(user_id, REVIEW_TAG)?,
            fixes: store.activity_count(user_id, FIX_TAG)?,
            lead_time: store.dora_of(user_id)?.map(|d| d.lead_time),
        })
    })
}

// ---------------------------------------------------------------------------
// Stage 1: prompt construction
// ---------------------------------------------------------------------------

/// Fixed-shape request: pick exactly one persona from the closed set and
/// give one sentence of feedback, answered as a JSON object.
pub fn build_prompt(stats: &DeveloperStats) -> String {
    let mut prompt = String::from(
        "Analyze this software engineer based on their last month's stats:\n",
    );
    prompt.push_str(&format!("- Role: {}\n", stats.role));
    prompt.push_str(&format!("- Pull Requests Merged: {}\n", stats.prs));
    prompt.push_str(&format!("- Code Reviews Given: {}\n", stats.reviews));
    prompt.push_str(&format!("- Bug Fixes: {}\n", stats.fixes));
    if let Some(lead_time) = stats.lead_time {
        prompt.push_str(&format!("- DORA Lead Time: {lead_time} hours\n"));
    }
    prompt.push_str(
        "\nTask 1: Classify them into one 'Gamer Persona': 'The Architect' \
         (High quality, slow), 'The Speedster' (Fast, high volume), 'The \
         Guardian' (High reviews), or 'The Rookie' (Learning).\n\
         Task 2: Give 1 sentence of motivational gamified feedback.\n\n\
         Return JSON format: { \"persona\": \"\", \"feedback\": \"\" }\n",
    );
    prompt
}

// ---------------------------------------------------------------------------
// Stage 3: defensive parse
// ---------------------------------------------------------------------------

/// A well-typed classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaFeedback {
    pub persona: Persona,
    pub feedback: String,
}

/// Tagged outcome of decoding the classifier's raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Ok(PersonaFeedback),
    Malformed(String),
}

#[derive(Deserialize)]
struct RawReply {
    persona: String,
    feedback: String,
}

/// Decode raw classifier output, stripping incidental code-fence wrapping
/// first. Anything that is not an object with string `persona` and
/// `feedback` keys is `Malformed`. A well-formed reply whose persona label
/// falls outside the closed set keeps its feedback with persona `Unknown`.
pub fn parse_response(raw: &str) -> Parsed {
    let cleaned = raw.replace("```json", "").replace("```", "");
    match serde_json::from_str::<RawReply>(cleaned.trim()) {
        Ok(reply) => Parsed::Ok(PersonaFeedback {
            persona: Persona::parse_label(&reply.persona),
            feedback: reply.feedback,
        }),
        Err(_) => Parsed::Malformed(raw.to_string()),
    }
}

fn fallback() -> PersonaFeedback {
    PersonaFeedback {
        persona: Persona::Unknown,
        feedback: FALLBACK_FEEDBACK.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Stages 2+3: invoke with guaranteed fallback
// ---------------------------------------------------------------------------

/// Run stages 1–3. Total: every classifier failure or malformed reply is
/// absorbed here and substituted with the fallback pair.
pub fn classify_developer(classifier: &dyn Classifier, stats: &DeveloperStats) -> PersonaFeedback {
    let prompt = build_prompt(stats);
    let raw = match classifier.classify(&prompt) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "classifier call failed, using fallback persona");
            return fallback();
        }
    };
    match parse_response(&raw) {
        Parsed::Ok(result) => result,
        Parsed::Malformed(raw) => {
            tracing::warn!(raw_len = raw.len(), "malformed classifier reply, using fallback persona");
            fallback()
        }
    }
}

// ---------------------------------------------------------------------------
// Stage 4: persistence
// ---------------------------------------------------------------------------

/// Full pipeline for one user: gather stats, classify (with fallback), and
/// unconditionally append the insight row. Returns the persisted insight.
pub fn analyze_and_persist(
    store: &Store,
    classifier: &dyn Classifier,
    user_id: i64,
) -> Result<Insight> {
    let stats = gather_stats(store, user_id)?;
    let result = classify_developer(classifier, &stats);
    store.insert_insight(user_id, result.persona, &result.feedback, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
