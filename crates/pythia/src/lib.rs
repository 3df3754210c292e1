//! Pythia: a verifiable, partially-oblivious PRF over the BLS12-381 pairing.
//!
//! A client blinds a password into G1, the server evaluates the PRF under a
//! key derived from its secrets and a public tweak, and proves in zero
//! knowledge that it used the key matching its published G1 public key. The
//! client removes the blinding to obtain a hardened GT value that is
//! independent of the blinding factor.
//!
//! The server can later rotate its secrets and publish an update token that
//! migrates every stored hardened value to the new key without access to the
//! passwords.
//!
//! All operations are methods on an immutable [`PythiaContext`]. A
//! process-wide context can be installed through [`Lifecycle`].

pub mod codec;
pub mod context;
pub mod crypto;
pub mod errors;
pub mod messages;
pub mod protocol;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use codec::{PythiaDecode, PythiaEncode, ScalarEncoding, Sign};
pub use context::{CurveKind, Lifecycle, PythiaConfig, PythiaContext};
pub use crypto::secret::SecretScalar;
pub use errors::{PythiaError, Result};
pub use messages::{TransformRequest, TransformResponse};
pub use protocol::{
    Blinding, BlindedPassword, BlindingSecret, DeblindedPassword, PasswordUpdate, Proof,
    ServerSecrets, Transformation, TransformationPrivateKey, TransformationPublicKey,
    TransformedPassword, TransformedTweak, UpdateToken,
};

pub type ElementG1 = blstrs::G1Projective;
pub type ElementG2 = blstrs::G2Projective;
pub type ElementGt = blstrs::Gt;
pub type Scalar = blstrs::Scalar;
