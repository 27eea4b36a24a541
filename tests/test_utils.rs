use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use contact_intake::{
    entities::submission::{NewSubmission, Submission},
    errors::AppError,
    limiter::rate_limiter::{FixedWindowLimiter, RateLimitPolicy},
    repositories::submission::SubmissionStore,
    spam::classifier::SpamClassifier,
    AppState,
};

/// In-memory stand-in for the Postgres store. `fail_next_create` simulates
/// a transient storage outage for retry tests.
#[derive(Default)]
pub struct MemoryStore {
    submissions: Mutex<Vec<Submission>>,
    fail_next_create: AtomicBool,
}

impl MemoryStore {
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.submissions.lock().len()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::StorageFailure("simulated outage".into()));
        }

        let submission = Submission {
            id: Uuid::new_v4(),
            profile_id: new.profile_id.clone(),
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.submissions.lock().push(submission.clone());
        Ok(submission)
    }

    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError> {
        self.submissions
            .lock()
            .iter()
            .find(|s| s.id == *id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))
    }

    async fn list_submissions_for_profile(&self, profile_id: &str) -> Result<Vec<Submission>, AppError> {
        let mut submissions: Vec<Submission> = self
            .submissions
            .lock()
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    async fn count_submissions_for_profile(&self, profile_id: &str) -> Result<i64, AppError> {
        Ok(self
            .submissions
            .lock()
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .count() as i64)
    }

    async fn mark_submission_read(&self, id: &Uuid) -> Result<(), AppError> {
        let mut submissions = self.submissions.lock();
        match submissions.iter_mut().find(|s| s.id == *id) {
            Some(s) => {
                s.is_read = true;
                Ok(())
            }
            None => Err(AppError::NotFound("Submission not found".into())),
        }
    }

    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError> {
        let mut submissions = self.submissions.lock();
        let before = submissions.len();
        submissions.retain(|s| s.id != *id);
        if submissions.len() == before {
            Err(AppError::NotFound("Submission not found".into()))
        } else {
            Ok(())
        }
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// App state over a `MemoryStore`, trusting X-Forwarded-For so tests can
/// pick their rate-limit identity per request.
pub fn test_state(store: Arc<MemoryStore>, max_requests: u32) -> AppState {
    AppState::with_store(
        store,
        SpamClassifier::with_default_patterns(),
        FixedWindowLimiter::new(Duration::from_secs(3600)),
        RateLimitPolicy {
            max_requests,
            window: Duration::from_secs(60),
        },
        true,
    )
}
