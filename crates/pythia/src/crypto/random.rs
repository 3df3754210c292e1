use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use super::constants::WIDE_SCALAR_LEN;
use super::hash::scalar_from_be_bytes_mod_order;
use super::secret::SecretScalar;
use crate::errors::Result;

/// Samples a scalar uniformly from `[0, n)`.
///
/// Draws 512 bits and reduces them, so the bias is below 2^-256. Unlike
/// `Field::random`, an RNG failure is reported instead of panicking.
pub fn random_scalar(rng: &mut impl CryptoRngCore) -> Result<SecretScalar> {
    let mut wide = Zeroizing::new([0u8; WIDE_SCALAR_LEN]);
    rng.try_fill_bytes(&mut wide[..])?;
    Ok(SecretScalar::new(scalar_from_be_bytes_mod_order(&wide[..])))
}
