use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingDto {
    pub worker_id: Uuid,
    #[validate(length(min = 1, message = "Work type is required"))]
    pub work_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingQueryDto {
    pub booking_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingIdDto {
    pub booking_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBillDto {
    pub booking_id: Uuid,
    pub total_bill: BigDecimal,
}
