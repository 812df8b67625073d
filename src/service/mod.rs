pub mod booking_service;
pub mod error;
pub mod feedback_service;
pub mod identity_service;
pub mod notification;
pub mod profile_service;
pub mod vetting_service;
