use elliptic_curve::Field;
use rand_core::CryptoRngCore;

use super::{BlindedPassword, Blinding, BlindingSecret};
use crate::context::PythiaContext;
use crate::crypto::constants::MAX_BLINDING_ATTEMPTS;
use crate::crypto::random::random_scalar;
use crate::crypto::secret::SecretScalar;
use crate::errors::{PythiaError, Result};

impl PythiaContext {
    /// Hides `password` behind a random factor `r`.
    ///
    /// Returns `H1(password) * r` together with `r^-1 mod n1`. `r` is
    /// resampled while it has no inverse; since n1 is prime that only happens
    /// for `r = 0`, so the bound on attempts is never reached by a working
    /// RNG.
    pub fn blind(&self, password: &[u8], rng: &mut impl CryptoRngCore) -> Result<Blinding> {
        if password.is_empty() {
            return Err(PythiaError::InvalidBufferSize {
                expected: 1,
                actual: 0,
            });
        }

        for attempt in 1..=MAX_BLINDING_ATTEMPTS {
            let r = random_scalar(rng)?;
            let Some(r_inv) = r.expose().invert().into_option() else {
                tracing::warn!(attempt, "blinding factor is not invertible, resampling");
                continue;
            };
            let r_inv = SecretScalar::new(r_inv);

            let blinded_password = BlindedPassword(self.hash_password(password) * r.expose());
            tracing::debug!(password_len = password.len(), "blinded password");
            return Ok(Blinding {
                blinded_password,
                blinding_secret: BlindingSecret(r_inv),
            });
        }

        Err(PythiaError::arithmetic(format!(
            "no invertible blinding factor after {MAX_BLINDING_ATTEMPTS} attempts"
        )))
    }
}
