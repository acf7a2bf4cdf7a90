//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.
//! Each takes its input plus `&ServerDeps` and returns a typed AuthError
//! on failure.

mod google_login;
mod request_otp;
mod verify_otp;

pub use google_login::{google_login, GoogleLogin};
pub use request_otp::{request_otp, RequestOtp, OTP_TTL_MINUTES};
pub use verify_otp::{verify_otp, AuthSession, UserProfile, VerifyOtp};
