//! This module contains cryptographic constants that are used throughout the codebase.

use hex_literal::hex;

// Group Constants
/// Order of G1, G2 and GT on BLS12-381, big-endian.
pub const BLS12_381_ORDER: [u8; 32] =
    hex!("73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001");

// Hash-to-curve Constants
/// Default domain separator for hashing passwords into G1.
pub const PYTHIA_G1_DOMAIN: &str = "PYTHIA-V1-BLS12381G1_XMD:SHA-256_SSWU_RO_";
/// Default domain separator for hashing tweaks into G2.
pub const PYTHIA_G2_DOMAIN: &str = "PYTHIA-V1-BLS12381G2_XMD:SHA-256_SSWU_RO_";

// Proof Constants
/// HMAC key of the Fiat-Shamir challenge hash, NUL terminator included.
pub const PYTHIA_CHALLENGE_TAG: &[u8; 31] = b"TAG_RELIC_HASH_ZMESSAGE_HASH_Z\0";
/// Number of challenge digest bytes kept before reduction.
pub const CHALLENGE_LEN: usize = 32;

// Randomness Constants
/// Bytes drawn from the RNG per sampled scalar, reduced modulo the group order.
pub const WIDE_SCALAR_LEN: usize = 64;
/// Upper bound on resampling the blinding factor.
pub const MAX_BLINDING_ATTEMPTS: usize = 16;

// Codec Constants
/// Sign byte plus a full-width magnitude.
pub const SCALAR_BUF_SIZE: usize = 33;
/// Compressed G1 point.
pub const G1_BUF_SIZE: usize = 48;
/// Compressed G2 point.
pub const G2_BUF_SIZE: usize = 96;
/// Torus-compressed GT element (six Fp limbs).
pub const GT_BUF_SIZE: usize = 288;
