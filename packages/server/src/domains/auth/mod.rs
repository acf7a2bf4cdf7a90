//! Auth domain - email OTP and Google sign-in
//!
//! Responsibilities:
//! - Email OTP challenge lifecycle (issue, store, verify, lazy expiry)
//! - Google ID-token sign-in
//! - Session JWT issuance
//!
//! The flows are driven by the actions in `actions/`; external
//! collaborators (mail delivery, token verification, user storage) are
//! reached through the kernel traits.

pub mod actions;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod store;

pub use jwt::{Claims, JwtService};
pub use store::{Challenge, OtpStore};
