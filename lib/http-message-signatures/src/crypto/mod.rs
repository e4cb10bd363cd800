//!
//! Common cryptographic operations
//!

mod key;
mod sign;
mod verify;

pub mod parse;

pub use self::key::{PrivateKey, PublicKey};
pub use self::sign::{sign, SigningKey};
pub use self::verify::verify;
