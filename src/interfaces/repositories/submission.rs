use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::submission::{NewSubmission, Submission},
    errors::AppError,
    repositories::sqlx_repo::SqlxSubmissionRepo,
};

/// Durable home of accepted submissions. `create_submission` is the only
/// operation the intake pipeline itself depends on and must be atomic: it
/// either persists the full record with a generated id or fails leaving
/// nothing behind. The remaining operations back the management surface.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError>;
    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError>;
    async fn list_submissions_for_profile(&self, profile_id: &str) -> Result<Vec<Submission>, AppError>;
    async fn count_submissions_for_profile(&self, profile_id: &str) -> Result<i64, AppError>;
    async fn mark_submission_read(&self, id: &Uuid) -> Result<(), AppError>;
    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<S: SubmissionStore + ?Sized> SubmissionStore for Arc<S> {
    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        (**self).create_submission(new).await
    }

    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError> {
        (**self).get_submission_by_id(id).await
    }

    async fn list_submissions_for_profile(&self, profile_id: &str) -> Result<Vec<Submission>, AppError> {
        (**self).list_submissions_for_profile(profile_id).await
    }

    async fn count_submissions_for_profile(&self, profile_id: &str) -> Result<i64, AppError> {
        (**self).count_submissions_for_profile(profile_id).await
    }

    async fn mark_submission_read(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).mark_submission_read(id).await
    }

    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_submission(id).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

impl SqlxSubmissionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSubmissionRepo { pool }
    }
}

#[async_trait]
impl SubmissionStore for SqlxSubmissionRepo {
    async fn create_submission(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        // Single INSERT .. RETURNING: the write is all-or-nothing.
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO contact_submissions (profile_id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, profile_id, name, email, message, is_read, created_at
            "#,
        )
        .bind(&new.profile_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, profile_id, name, email, message, is_read, created_at
            FROM contact_submissions WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;

        Ok(submission)
    }

    async fn list_submissions_for_profile(&self, profile_id: &str) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, profile_id, name, email, message, is_read, created_at
            FROM contact_submissions
            WHERE profile_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn count_submissions_for_profile(&self, profile_id: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM contact_submissions WHERE profile_id = $1"#)
                .bind(profile_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn mark_submission_read(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"UPDATE contact_submissions SET is_read = TRUE WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Submission not found".into()))
        } else {
            Ok(())
        }
    }

    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM contact_submissions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(AppError::NotFound("Submission not found".into()))
        } else {
            Ok(())
        }
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
