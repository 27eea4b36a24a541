use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Matches `local@domain.tld`. The built-in `email` validator accepts
/// dotless domains, which the contact form client rejects, so the server
/// uses the same pattern the client does.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Inbound contact payload. All rules are evaluated together so the caller
/// gets every field error in one round trip.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(regex(path = *EMAIL_RE, message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 10, max = 5000, message = "Message must be between 10 and 5000 characters"))]
    pub message: String,

    #[validate(length(min = 1, message = "Profile id is required"))]
    pub profile_id: String,
}

/// Normalized insert value handed to the store. The referenced profile is
/// owned elsewhere; no existence check happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub profile_id: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl From<SubmissionRequest> for NewSubmission {
    fn from(req: SubmissionRequest) -> Self {
        NewSubmission {
            profile_id: req.profile_id.trim().to_string(),
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            message: req.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub profile_id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    pub submission_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<Submission>,
    pub total: i64,
}
