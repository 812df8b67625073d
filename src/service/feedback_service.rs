// service/feedback_service.rs
use std::sync::Arc;

use crate::{
    db::Store,
    dtos::feedbackdtos::FeedbackDto,
    models::{feedbackmodel::Feedback, usermodel::Principal},
    service::error::ServiceError,
};

#[derive(Clone)]
pub struct FeedbackService {
    db_client: Arc<dyn Store>,
}

impl FeedbackService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    pub async fn submit(&self, principal: Principal, body: FeedbackDto) -> Result<Feedback, ServiceError> {
        if !(1..=5).contains(&body.rating) {
            return Err(ServiceError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let feedback = self
            .db_client
            .save_feedback(principal.id, principal.user_type, body.rating, body.comments)
            .await?;

        tracing::info!(
            "Feedback {} submitted by {} {}",
            feedback.feedback_id,
            principal.user_type,
            principal.id
        );
        Ok(feedback)
    }
}
