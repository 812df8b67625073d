pub mod bookingmodel;
pub mod feedbackmodel;
pub mod otpmodel;
pub mod usermodel;
pub mod workermodel;
