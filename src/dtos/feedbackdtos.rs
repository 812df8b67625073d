use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Comments must not exceed 2000 characters"))]
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_one_to_five() {
        for rating in [1, 5] {
            let body = FeedbackDto { rating, comments: "ok".into() };
            assert!(body.validate().is_ok());
        }
        for rating in [0, 6, -1] {
            let body = FeedbackDto { rating, comments: "ok".into() };
            assert!(body.validate().is_err());
        }
    }
}
