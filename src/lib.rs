//! Textbook RSA over arbitrary-precision integers.
//!
//! Prime generation (trial division or Miller-Rabin), key derivation through
//! Carmichael's totient and the extended Euclidean algorithm, and single-block
//! encryption by modular exponentiation. No padding, no serialization, no
//! side-channel hardening: this is for learning, not for protecting data.

pub mod rsa;
pub mod ui;
pub mod util;

pub use rsa::{RsaError, RsaKeyPair, RsaPrivateKey, RsaPublicKey, RsaResult};
pub use util::{CancelFlag, GeneratorConfig};
