// utils/otp_generator.rs
use rand::Rng;

/// Four digit code in 1000..=9999.
pub fn generate_otp() -> i32 {
    let mut rng = rand::rng();
    rng.random_range(1000..=9999)
}
