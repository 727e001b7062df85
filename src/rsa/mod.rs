// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod primality;
pub mod prime;
pub mod random;

pub use bigint::{extended_euclidean, gcd, integer_sqrt, lcm, mod_pow, BezoutCoefficients};
pub use decrypt::{decrypt, decrypt_to_u64};
pub use encrypt::{encrypt, encrypt_u64};
pub use error::{RsaError, RsaResult};
pub use keygen::{derive_keypair, generate_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use primality::{MillerRabin, Primality, PrimalityTest, TrialDivision};
pub use prime::{generate_prime, generate_prime_pair};
pub use random::{random_bits, random_in_range, random_prime_candidate};
