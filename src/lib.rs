use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, limiter, spam, utils};

use limiter::rate_limiter::{FixedWindowLimiter, RateLimitPolicy};
use repositories::{sqlx_repo::SqlxSubmissionRepo, submission::SubmissionStore};
use spam::classifier::SpamClassifier;
use use_cases::intake::IntakeHandler;

pub type DynSubmissionStore = Arc<dyn SubmissionStore>;
pub type AppIntakeHandler = IntakeHandler<DynSubmissionStore>;

pub struct AppState {
    pub intake_handler: AppIntakeHandler,
    pub classifier: SpamClassifier,
    pub limiter: FixedWindowLimiter,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let classifier = match &config.spam_patterns_path {
            Some(path) => SpamClassifier::from_file(path).unwrap_or_else(|e| {
                tracing::error!(
                    "Failed to load spam patterns from {}: {}. Falling back to defaults.",
                    path,
                    e
                );
                SpamClassifier::with_default_patterns()
            }),
            None => SpamClassifier::with_default_patterns(),
        };

        let store: DynSubmissionStore = Arc::new(SqlxSubmissionRepo::new(pool));

        Self::with_store(
            store,
            classifier,
            FixedWindowLimiter::new(config.rate_limit_entry_ttl()),
            config.rate_limit_policy(),
            config.trust_x_forwarded_for,
        )
    }

    /// Assemble state over any store implementation; the test harness uses
    /// this with an in-memory store.
    pub fn with_store(
        store: DynSubmissionStore,
        classifier: SpamClassifier,
        limiter: FixedWindowLimiter,
        policy: RateLimitPolicy,
        trust_x_forwarded_for: bool,
    ) -> Self {
        let intake_handler =
            IntakeHandler::new(store, limiter.clone(), classifier.clone(), policy);

        AppState {
            intake_handler,
            classifier,
            limiter,
            trust_x_forwarded_for,
        }
    }
}
