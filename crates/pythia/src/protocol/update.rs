use elliptic_curve::Field;

use super::{
    DeblindedPassword, PasswordUpdate, ServerSecrets, TransformationPublicKey, UpdateToken,
};
use crate::context::PythiaContext;
use crate::crypto::secret::SecretScalar;
use crate::errors::{PythiaError, Result};

impl PythiaContext {
    /// Derives the token that migrates deblinded passwords from the `old`
    /// secrets to the `new` ones, together with the new public key.
    ///
    /// `delta = kw_new * kw_old^-1 mod n2`
    #[doc(alias = "get_delta")]
    #[doc(alias = "get_password_update_token")]
    pub fn rotate(&self, old: &ServerSecrets, new: &ServerSecrets) -> Result<PasswordUpdate> {
        let old_key = old.transformation_key()?;
        let new_key = new.transformation_key()?;

        let old_inverse = old_key
            .expose()
            .invert()
            .into_option()
            .map(SecretScalar::new)
            .ok_or_else(|| PythiaError::arithmetic("old transformation key is not invertible"))?;
        let delta = new_key.expose() * old_inverse.expose();
        if bool::from(delta.is_zero()) {
            return Err(PythiaError::arithmetic("new transformation key is zero"));
        }

        tracing::debug!(
            old_key_id = %String::from_utf8_lossy(&old.transformation_key_id),
            new_key_id = %String::from_utf8_lossy(&new.transformation_key_id),
            "derived password update token"
        );
        Ok(PasswordUpdate {
            update_token: UpdateToken(delta),
            updated_public_key: TransformationPublicKey(self.g1() * new_key.expose()),
        })
    }

    /// Moves a deblinded password to the key the token was derived for:
    /// `deblinded_password ^ delta`.
    #[doc(alias = "update")]
    #[doc(alias = "update_deblinded_with_token")]
    pub fn apply_update(
        &self,
        deblinded_password: &DeblindedPassword,
        update_token: &UpdateToken,
    ) -> Result<DeblindedPassword> {
        if bool::from(update_token.0.is_zero()) {
            return Err(PythiaError::arithmetic("update token is zero"));
        }
        tracing::debug!("applied password update token");
        Ok(DeblindedPassword(deblinded_password.0 * update_token.0))
    }
}
