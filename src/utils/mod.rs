pub mod otp_generator;
pub mod password;
pub mod token;
pub mod upload;
