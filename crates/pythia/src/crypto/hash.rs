use elliptic_curve::Field;
use hkdf::hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use super::constants::{CHALLENGE_LEN, PYTHIA_CHALLENGE_TAG};
use super::secret::SecretScalar;
use crate::errors::{PythiaError, Result};
use crate::{ElementG1, ElementG2, Scalar};

type HmacSha512 = Hmac<Sha512>;

/// Interprets `bytes` as a big-endian integer and reduces it modulo the
/// group order.
/// Bytes are accumulated into 64-bit limbs, one field multiply per limb.
pub fn scalar_from_be_bytes_mod_order(bytes: &[u8]) -> Scalar {
    let mut res = Scalar::ZERO;

    let mut count = 0usize;
    let mut remainder = 0u64;
    for byte in bytes {
        remainder = (remainder << 8) + u64::from(*byte);
        count += 1;
        if count == 8 {
            res = res.shl(64) + Scalar::from(remainder);
            remainder = 0;
            count = 0;
        }
    }
    if count > 0 {
        res = res.shl(count * 8) + Scalar::from(remainder);
    }
    res
}

/// H1: maps a password onto G1.
pub fn hash_to_g1(msg: &[u8], domain: &[u8]) -> ElementG1 {
    ElementG1::hash_to_curve(msg, domain, &[])
}

/// H2: maps a tweak onto G2.
pub fn hash_to_g2(msg: &[u8], domain: &[u8]) -> ElementG2 {
    ElementG2::hash_to_curve(msg, domain, &[])
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)
        .map_err(|_| PythiaError::arithmetic("hmac rejected the key length"))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Derives the transformation private key
/// `kw = HMAC-SHA-512(pythia_secret, scope_secret || key_id) mod n`.
pub fn derive_transformation_key(
    transformation_key_id: &[u8],
    pythia_secret: &[u8],
    pythia_scope_secret: &[u8],
) -> Result<SecretScalar> {
    let mac = hmac_sha512(pythia_secret, &[pythia_scope_secret, transformation_key_id])?;
    Ok(SecretScalar::new(scalar_from_be_bytes_mod_order(&mac[..])))
}

/// Fiat-Shamir challenge over the concatenation of `parts`.
/// Only the first 256 bits of the HMAC are kept before reduction.
pub fn hash_to_scalar(parts: &[&[u8]]) -> Result<Scalar> {
    let mac = hmac_sha512(PYTHIA_CHALLENGE_TAG, parts)?;
    Ok(scalar_from_be_bytes_mod_order(&mac[..CHALLENGE_LEN]))
}
