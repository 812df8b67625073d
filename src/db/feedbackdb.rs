// db/feedbackdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::{feedbackmodel::Feedback, usermodel::UserType};

#[async_trait]
pub trait FeedbackExt: Send + Sync {
    async fn save_feedback(
        &self,
        submitter_id: Uuid,
        user_type: UserType,
        rating: i32,
        comments: String,
    ) -> Result<Feedback, sqlx::Error>;

    async fn get_feedback(&self) -> Result<Vec<Feedback>, sqlx::Error>;
}

#[async_trait]
impl FeedbackExt for DBClient {
    async fn save_feedback(
        &self,
        submitter_id: Uuid,
        user_type: UserType,
        rating: i32,
        comments: String,
    ) -> Result<Feedback, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (feedback_id, submitter_id, user_type, rating, comments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING feedback_id, submitter_id, user_type, rating, comments, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(submitter_id)
        .bind(user_type)
        .bind(rating)
        .bind(comments)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_feedback(&self) -> Result<Vec<Feedback>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            SELECT feedback_id, submitter_id, user_type, rating, comments, created_at
            FROM feedback
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
