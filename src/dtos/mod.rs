pub mod admindtos;
pub mod bookingdtos;
pub mod feedbackdtos;
pub mod userdtos;
pub mod workerdtos;
