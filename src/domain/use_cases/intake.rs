use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::submission::{
        NewSubmission, Submission, SubmissionListResponse, SubmissionRequest,
    },
    errors::AppError,
    limiter::rate_limiter::{FixedWindowLimiter, QuotaSnapshot, RateLimitPolicy},
    repositories::submission::SubmissionStore,
    spam::classifier::SpamClassifier,
    utils::valid_uuid::valid_uuid,
};

/// Returned to the HTTP layer on acceptance: the store-generated id plus
/// the quota numbers for the response headers.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub quota: QuotaSnapshot,
}

/// Orchestrates one submission through rate limiting, validation, spam
/// screening, and the store. Each call is an independent unit of work; the
/// limiter's keyed counters are the only state shared across requests.
pub struct IntakeHandler<R>
where
    R: SubmissionStore,
{
    pub submission_store: R,
    limiter: FixedWindowLimiter,
    classifier: SpamClassifier,
    policy: RateLimitPolicy,
}

impl<R> IntakeHandler<R>
where
    R: SubmissionStore,
{
    pub fn new(
        submission_store: R,
        limiter: FixedWindowLimiter,
        classifier: SpamClassifier,
        policy: RateLimitPolicy,
    ) -> Self {
        IntakeHandler {
            submission_store,
            limiter,
            classifier,
            policy,
        }
    }

    /// Run the full intake pipeline for one request. Any failed stage
    /// short-circuits with a typed rejection; spam content is discarded,
    /// never stored.
    pub async fn submit(
        &self,
        identity: &str,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, AppError> {
        let quota = self
            .limiter
            .check(identity, self.policy.max_requests, self.policy.window)?;

        request.validate()?;

        let verdict = self.classifier.classify(&request);
        if verdict.is_spam {
            tracing::info!(
                identity,
                pattern = verdict.matched_pattern.as_deref().unwrap_or(""),
                "Submission rejected as spam"
            );
            return Err(AppError::SpamDetected);
        }

        let new_submission = NewSubmission::from(request);
        let submission = self.submission_store.create_submission(&new_submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            profile_id = %submission.profile_id,
            "Submission accepted"
        );

        Ok(SubmissionReceipt {
            submission_id: submission.id,
            quota,
        })
    }

    /// Retrieves one submission by its ID
    pub async fn get_submission(&self, id: &str) -> Result<Submission, AppError> {
        let valid_id = valid_uuid(id)?;

        self.submission_store.get_submission_by_id(&valid_id).await
    }

    /// Lists all submissions received for a profile, newest first
    pub async fn list_submissions(&self, profile_id: &str) -> Result<SubmissionListResponse, AppError> {
        let submissions = self
            .submission_store
            .list_submissions_for_profile(profile_id)
            .await?;
        let total = self
            .submission_store
            .count_submissions_for_profile(profile_id)
            .await?;

        Ok(SubmissionListResponse { submissions, total })
    }

    /// Marks a submission as read
    pub async fn mark_submission_read(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        self.submission_store.mark_submission_read(&valid_id).await
    }

    /// Deletes a submission by its ID
    pub async fn delete_submission(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        self.submission_store.delete_submission(&valid_id).await
    }
}
