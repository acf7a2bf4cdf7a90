//! OTP code generation

use rand::rngs::OsRng;
use rand::Rng;

/// Number of digits in a generated code.
pub const OTP_LENGTH: usize = 6;

/// Generate a 6-digit numeric OTP code.
///
/// Codes are drawn uniformly from all 10^6 combinations using the OS
/// CSPRNG, keeping them unguessable within the 5-minute validity window.
/// Leading zeros are preserved ("004213" is a valid code).
pub fn generate_code() -> String {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", n, width = OTP_LENGTH)
}
