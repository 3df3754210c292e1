use blstrs::{G1Affine, G2Affine};
use elliptic_curve::{Field, Group};

use super::{
    BlindedPassword, BlindingSecret, DeblindedPassword, ServerSecrets, Transformation,
    TransformedPassword, TransformedTweak,
};
use crate::context::PythiaContext;
use crate::errors::{PythiaError, Result};

impl PythiaContext {
    /// Evaluates the PRF on a blinded password.
    ///
    /// Derives `kw` from `secrets`, hashes `tweak` into G2 and returns
    /// `e(blinded_password * kw, H2(tweak))` along with `kw` and `H2(tweak)`.
    /// The output is a deterministic function of the inputs.
    #[doc(alias = "eval")]
    pub fn transform(
        &self,
        blinded_password: &BlindedPassword,
        tweak: &[u8],
        secrets: &ServerSecrets,
    ) -> Result<Transformation> {
        if bool::from(blinded_password.0.is_identity()) {
            return Err(PythiaError::arithmetic("blinded password is the identity"));
        }
        let private_key = secrets.transformation_key()?;
        if bool::from(private_key.expose().is_zero()) {
            return Err(PythiaError::arithmetic("transformation key is zero"));
        }

        let transformed_tweak = TransformedTweak(self.hash_tweak(tweak));
        let scaled = G1Affine::from(blinded_password.0 * private_key.expose());
        let transformed_password = TransformedPassword(blstrs::pairing(
            &scaled,
            &G2Affine::from(transformed_tweak.0),
        ));

        tracing::debug!(
            key_id = %String::from_utf8_lossy(&secrets.transformation_key_id),
            tweak_len = tweak.len(),
            "transformed password"
        );
        Ok(Transformation {
            transformed_password,
            private_key,
            transformed_tweak,
        })
    }

    /// Removes the blinding: `transformed_password ^ blinding_secret`.
    pub fn deblind(
        &self,
        transformed_password: &TransformedPassword,
        blinding_secret: &BlindingSecret,
    ) -> Result<DeblindedPassword> {
        if bool::from(transformed_password.0.is_identity()) {
            return Err(PythiaError::arithmetic("transformed password is the identity"));
        }
        if bool::from(blinding_secret.expose().is_zero()) {
            return Err(PythiaError::arithmetic("blinding secret is zero"));
        }
        tracing::debug!("deblinded password");
        Ok(DeblindedPassword(
            transformed_password.0 * blinding_secret.expose(),
        ))
    }
}
