//!
//! Common cryptographic operations
//!

mod sign;
mod verify;

pub mod parse;
pub mod pkcs12;

pub use self::sign::{SigningKey, sign};
pub use self::verify::{VerifyError, verify};
