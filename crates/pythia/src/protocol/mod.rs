//! The Pythia protocol engine.
//!
//! Every operation is a method on [`PythiaContext`](crate::PythiaContext) and
//! depends on nothing but its arguments and the context's generators.

mod blind;
mod proof;
mod transform;
mod update;

use std::fmt;

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::codec::impl_codec_newtype;
use crate::crypto::hash::derive_transformation_key;
use crate::crypto::secret::SecretScalar;
use crate::errors::Result;
use crate::{ElementG1, ElementG2, ElementGt, Scalar};

/// `H1(password) * r`, sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct BlindedPassword(ElementG1);

impl BlindedPassword {
    pub fn element(&self) -> ElementG1 {
        self.0
    }
}

/// `r^-1 mod n1`, kept by the client to remove the blinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindingSecret(SecretScalar);

impl BlindingSecret {
    pub fn new(scalar: Scalar) -> Self {
        Self(SecretScalar::new(scalar))
    }

    pub fn expose(&self) -> Scalar {
        self.0.expose()
    }
}

/// The server's PRF key `kw`, an exponent modulo n2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationPrivateKey(SecretScalar);

impl TransformationPrivateKey {
    pub fn new(scalar: Scalar) -> Self {
        Self(SecretScalar::new(scalar))
    }

    pub fn expose(&self) -> Scalar {
        self.0.expose()
    }
}

/// `g1 * kw`
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct TransformationPublicKey(ElementG1);

impl TransformationPublicKey {
    pub fn element(&self) -> ElementG1 {
        self.0
    }
}

/// `H2(tweak)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct TransformedTweak(ElementG2);

impl TransformedTweak {
    pub fn element(&self) -> ElementG2 {
        self.0
    }
}

/// `e(blinded password, transformed tweak)^kw`
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct TransformedPassword(ElementGt);

impl TransformedPassword {
    pub fn element(&self) -> ElementGt {
        self.0
    }
}

/// The hardened password, `e(H1(password), H2(tweak))^kw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct DeblindedPassword(ElementGt);

impl DeblindedPassword {
    pub fn element(&self) -> ElementGt {
        self.0
    }
}

/// `kw_new / kw_old mod n2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct UpdateToken(Scalar);

impl UpdateToken {
    pub fn scalar(&self) -> Scalar {
        self.0
    }
}

impl_codec_newtype!(BlindedPassword, ElementG1, |v: &BlindedPassword| v.0, BlindedPassword);
impl_codec_newtype!(
    BlindingSecret,
    Scalar,
    |v: &BlindingSecret| v.expose(),
    BlindingSecret::new
);
impl_codec_newtype!(
    TransformationPrivateKey,
    Scalar,
    |v: &TransformationPrivateKey| v.expose(),
    TransformationPrivateKey::new
);
impl_codec_newtype!(
    TransformationPublicKey,
    ElementG1,
    |v: &TransformationPublicKey| v.0,
    TransformationPublicKey
);
impl_codec_newtype!(TransformedTweak, ElementG2, |v: &TransformedTweak| v.0, TransformedTweak);
impl_codec_newtype!(
    TransformedPassword,
    ElementGt,
    |v: &TransformedPassword| v.0,
    TransformedPassword
);
impl_codec_newtype!(
    DeblindedPassword,
    ElementGt,
    |v: &DeblindedPassword| v.0,
    DeblindedPassword
);
impl_codec_newtype!(UpdateToken, Scalar, |v: &UpdateToken| v.0, UpdateToken);

/// Output of [`PythiaContext::blind`](crate::PythiaContext::blind).
#[derive(Debug, Clone)]
pub struct Blinding {
    pub blinded_password: BlindedPassword,
    pub blinding_secret: BlindingSecret,
}

/// Output of [`PythiaContext::transform`](crate::PythiaContext::transform).
#[derive(Debug, Clone)]
pub struct Transformation {
    pub transformed_password: TransformedPassword,
    pub private_key: TransformationPrivateKey,
    pub transformed_tweak: TransformedTweak,
}

/// Chaum-Pedersen proof that `public_key` and the transformed password share
/// the same discrete logarithm `kw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub public_key: TransformationPublicKey,
    #[serde(with = "crate::codec::hex_serde")]
    pub c: Scalar,
    #[serde(with = "crate::codec::hex_serde")]
    pub u: Scalar,
}

/// Output of [`PythiaContext::rotate`](crate::PythiaContext::rotate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub update_token: UpdateToken,
    pub updated_public_key: TransformationPublicKey,
}

/// The server-side material a transformation key is derived from.
#[derive(Clone)]
pub struct ServerSecrets {
    pub transformation_key_id: Vec<u8>,
    pub pythia_secret: Zeroizing<Vec<u8>>,
    pub pythia_scope_secret: Zeroizing<Vec<u8>>,
}

impl ServerSecrets {
    pub fn new(
        transformation_key_id: impl Into<Vec<u8>>,
        pythia_secret: impl Into<Vec<u8>>,
        pythia_scope_secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            transformation_key_id: transformation_key_id.into(),
            pythia_secret: Zeroizing::new(pythia_secret.into()),
            pythia_scope_secret: Zeroizing::new(pythia_scope_secret.into()),
        }
    }

    /// `kw = HMAC-SHA-512(pythia_secret, scope_secret || key_id) mod n2`
    pub fn transformation_key(&self) -> Result<TransformationPrivateKey> {
        let kw = derive_transformation_key(
            &self.transformation_key_id,
            &self.pythia_secret,
            &self.pythia_scope_secret,
        )?;
        Ok(TransformationPrivateKey(kw))
    }
}

impl fmt::Debug for ServerSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSecrets")
            .field(
                "transformation_key_id",
                &String::from_utf8_lossy(&self.transformation_key_id),
            )
            .finish_non_exhaustive()
    }
}
