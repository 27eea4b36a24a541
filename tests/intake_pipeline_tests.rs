use std::time::Duration;

use chrono::Utc;
use mockall::mock;
use uuid::Uuid;

use contact_intake::{
    entities::submission::{NewSubmission, Submission, SubmissionRequest},
    errors::AppError,
    limiter::rate_limiter::{FixedWindowLimiter, RateLimitPolicy},
    repositories::submission::SubmissionStore,
    spam::classifier::SpamClassifier,
    use_cases::intake::IntakeHandler,
};

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl SubmissionStore for Store {
        async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError>;
        async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError>;
        async fn list_submissions_for_profile(&self, profile_id: &str) -> Result<Vec<Submission>, AppError>;
        async fn count_submissions_for_profile(&self, profile_id: &str) -> Result<i64, AppError>;
        async fn mark_submission_read(&self, id: &Uuid) -> Result<(), AppError>;
        async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError>;
        async fn check_connection(&self) -> Result<(), AppError>;
    }
}

fn persisted(new: &NewSubmission) -> Submission {
    Submission {
        id: Uuid::new_v4(),
        profile_id: new.profile_id.clone(),
        name: new.name.clone(),
        email: new.email.clone(),
        message: new.message.clone(),
        is_read: false,
        created_at: Utc::now(),
    }
}

fn handler(store: MockStore, max_requests: u32) -> IntakeHandler<MockStore> {
    IntakeHandler::new(
        store,
        FixedWindowLimiter::new(Duration::from_secs(3600)),
        SpamClassifier::with_default_patterns(),
        RateLimitPolicy {
            max_requests,
            window: Duration::from_secs(60),
        },
    )
}

fn request(name: &str, email: &str, message: &str) -> SubmissionRequest {
    SubmissionRequest {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        profile_id: "p1".to_string(),
    }
}

#[tokio::test]
async fn accepts_up_to_quota_then_rejects() {
    let mut store = MockStore::new();
    store
        .expect_create_submission()
        .times(3)
        .returning(|new| Ok(persisted(new)));

    let handler = handler(store, 3);

    for expected_remaining in (0..3).rev() {
        let receipt = handler
            .submit("1.2.3.4", request("Al", "a@b.com", "Hello, interested in hiring you!"))
            .await
            .unwrap();
        assert_eq!(receipt.quota.remaining, expected_remaining);
    }

    let err = handler
        .submit("1.2.3.4", request("Al", "a@b.com", "Hello, interested in hiring you!"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RateLimited { limit: 3, .. }));
}

#[tokio::test]
async fn identities_are_rate_limited_separately() {
    let mut store = MockStore::new();
    store
        .expect_create_submission()
        .times(2)
        .returning(|new| Ok(persisted(new)));

    let handler = handler(store, 1);

    handler
        .submit("1.1.1.1", request("Al", "a@b.com", "Hello, interested in hiring you!"))
        .await
        .unwrap();
    assert!(matches!(
        handler
            .submit("1.1.1.1", request("Al", "a@b.com", "Hello, interested in hiring you!"))
            .await,
        Err(AppError::RateLimited { .. })
    ));

    // A different caller still has quota.
    handler
        .submit("2.2.2.2", request("Al", "a@b.com", "Hello, interested in hiring you!"))
        .await
        .unwrap();
}

#[tokio::test]
async fn invalid_input_never_reaches_the_store() {
    let mut store = MockStore::new();
    store.expect_create_submission().times(0);

    let handler = handler(store, 3);

    let err = handler
        .submit("1.2.3.4", request("Al", "not-an-email", "Hello there, love your work"))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationError(errors) => {
            assert!(errors.iter().any(|e| e.field == "email"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_reports_every_failing_field() {
    let mut store = MockStore::new();
    store.expect_create_submission().times(0);

    let handler = handler(store, 3);

    let err = handler
        .submit(
            "1.2.3.4",
            SubmissionRequest {
                name: "A".to_string(),
                email: "a@b".to_string(),
                message: "short".to_string(),
                profile_id: "".to_string(),
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::ValidationError(errors) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            for field in ["name", "email", "message", "profile_id"] {
                assert!(fields.contains(&field), "missing error for {field}");
            }
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn spam_is_rejected_and_discarded() {
    let mut store = MockStore::new();
    store.expect_create_submission().times(0);

    let handler = handler(store, 3);

    let err = handler
        .submit("1.2.3.4", request("Al", "a@b.com", "You won the LOTTERY, claim now"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SpamDetected));
}

#[tokio::test]
async fn store_failure_is_transient_and_safe_to_retry() {
    let mut store = MockStore::new();
    store
        .expect_create_submission()
        .times(1)
        .returning(|_| Err(AppError::StorageFailure("connection reset".into())));
    store
        .expect_create_submission()
        .times(1)
        .returning(|new| Ok(persisted(new)));

    let handler = handler(store, 3);
    let req = || request("Al", "a@b.com", "Hello, interested in hiring you!");

    let err = handler.submit("1.2.3.4", req()).await.unwrap_err();
    assert!(matches!(err, AppError::StorageFailure(_)));

    // The failed attempt left no record behind, so a fresh attempt is a
    // plain create, not a duplicate.
    let receipt = handler.submit("1.2.3.4", req()).await.unwrap();
    assert_eq!(receipt.quota.remaining, 1);
}
