//! Cryptographic operations: Argon2id password hashing and HMAC-signed
//! access tokens (RustCrypto ecosystem).

pub mod password;
pub mod token;
