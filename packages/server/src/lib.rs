// Notes App - Auth Core
//
// This crate provides the authentication backend for the notes application:
// email OTP challenges, Google sign-in, and session token issuance.
// Note storage itself lives in a separate service that consumes the
// session tokens minted here.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
