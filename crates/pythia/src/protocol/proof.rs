use blstrs::{G1Affine, G2Affine};
use elliptic_curve::{Field, Group};
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;

use super::{
    BlindedPassword, Proof, TransformationPrivateKey, TransformationPublicKey,
    TransformedPassword, TransformedTweak,
};
use crate::codec::PythiaEncode;
use crate::context::PythiaContext;
use crate::crypto::hash::hash_to_scalar;
use crate::crypto::random::random_scalar;
use crate::crypto::secret::SecretScalar;
use crate::errors::{PythiaError, Result};
use crate::{ElementG1, ElementGt, Scalar};

/// The public statement: `public_key = g1^kw` and `transformed_password = beta^kw`
/// for the same `kw`, where `beta = e(blinded password, transformed tweak)`.
struct Statement<'a> {
    context: &'a PythiaContext,
    public_key: ElementG1,
    beta: ElementGt,
    transformed_password: ElementGt,
}

impl Statement<'_> {
    fn new<'a>(
        context: &'a PythiaContext,
        blinded_password: &BlindedPassword,
        transformed_tweak: &TransformedTweak,
        public_key: ElementG1,
        transformed_password: &TransformedPassword,
    ) -> Statement<'a> {
        let beta = blstrs::pairing(
            &G1Affine::from(blinded_password.0),
            &G2Affine::from(transformed_tweak.0),
        );
        Statement {
            context,
            public_key,
            beta,
            transformed_password: transformed_password.0,
        }
    }

    /// The homomorphism the proof is about.
    fn phi(&self, x: Scalar) -> (ElementG1, ElementGt) {
        (self.context.g1() * x, self.beta * x)
    }

    /// `H(g1 || P || beta || Y || T1 || T2)`
    fn challenge(&self, t1: &ElementG1, t2: &ElementGt) -> Result<Scalar> {
        let g1 = self.context.g1().to_bytes()?;
        let public_key = self.public_key.to_bytes()?;
        let beta = self.beta.to_bytes()?;
        let transformed_password = self.transformed_password.to_bytes()?;
        let t1 = t1.to_bytes()?;
        let t2 = t2.to_bytes()?;
        hash_to_scalar(&[
            g1.as_slice(),
            public_key.as_slice(),
            beta.as_slice(),
            transformed_password.as_slice(),
            t1.as_slice(),
            t2.as_slice(),
        ])
    }
}

impl PythiaContext {
    /// Proves that `transformed_password` was computed with the key behind the
    /// returned public key, without revealing the key.
    pub fn prove(
        &self,
        transformed_password: &TransformedPassword,
        blinded_password: &BlindedPassword,
        transformed_tweak: &TransformedTweak,
        private_key: &TransformationPrivateKey,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Proof> {
        let kw = private_key.expose();
        if bool::from(kw.is_zero()) {
            return Err(PythiaError::arithmetic("transformation key is zero"));
        }
        if bool::from(blinded_password.0.is_identity()) {
            return Err(PythiaError::arithmetic("blinded password is the identity"));
        }

        let public_key = self.g1() * kw;
        let statement = Statement::new(
            self,
            blinded_password,
            transformed_tweak,
            public_key,
            transformed_password,
        );

        let v: SecretScalar = random_scalar(rng)?;
        let (t1, t2) = statement.phi(v.expose());
        let c = statement.challenge(&t1, &t2)?;
        let u = v.expose() - c * kw;

        tracing::debug!("proved transformation");
        Ok(Proof {
            public_key: TransformationPublicKey(public_key),
            c,
            u,
        })
    }

    /// Checks a transformation proof against the raw `tweak`.
    ///
    /// A proof that does not hold yields `Ok(false)`.
    pub fn verify(
        &self,
        transformed_password: &TransformedPassword,
        blinded_password: &BlindedPassword,
        tweak: &[u8],
        proof: &Proof,
    ) -> Result<bool> {
        if bool::from(blinded_password.0.is_identity() | proof.public_key.0.is_identity()) {
            tracing::debug!(verified = false, "degenerate proof statement");
            return Ok(false);
        }

        let transformed_tweak = TransformedTweak(self.hash_tweak(tweak));
        let statement = Statement::new(
            self,
            blinded_password,
            &transformed_tweak,
            proof.public_key.0,
            transformed_password,
        );

        let (g1_u, beta_u) = statement.phi(proof.u);
        let t1 = g1_u + statement.public_key * proof.c;
        let t2 = beta_u + statement.transformed_password * proof.c;
        let c = statement.challenge(&t1, &t2)?;

        let verified = bool::from(c.ct_eq(&proof.c));
        tracing::debug!(verified, "verified transformation proof");
        Ok(verified)
    }
}
