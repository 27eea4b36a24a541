pub mod sqlx_repo;
pub mod submission;
