//! Account password hashing.
//!
//! Account passwords are opaque credentials: the ledger only stores their
//! Argon2id hash and can answer whether a candidate matches.

mod password;

pub use password::{PasswordError, hash_password, validate_password, verify_password};
