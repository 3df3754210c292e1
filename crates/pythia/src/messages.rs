//! Messages exchanged between a client and a Pythia server.
//!
//! Algebraic values serialize as hex strings of their codec encoding, raw
//! byte strings as plain hex.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::context::PythiaContext;
use crate::errors::Result;
use crate::protocol::{BlindedPassword, Proof, ServerSecrets, TransformedPassword};

/// Client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub blinded_password: BlindedPassword,
    #[serde(with = "hex::serde")]
    pub transformation_key_id: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub tweak: Vec<u8>,
}

/// Server to client. The client already knows the tweak it needs for
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed_password: TransformedPassword,
    pub proof: Proof,
}

impl PythiaContext {
    /// Server side of one round: transforms the request and proves the result.
    ///
    /// The key id in `request` must name `secrets`; callers holding several
    /// keys pick the matching secrets before calling.
    pub fn respond(
        &self,
        request: &TransformRequest,
        secrets: &ServerSecrets,
        rng: &mut impl CryptoRngCore,
    ) -> Result<TransformResponse> {
        let transformation = self.transform(&request.blinded_password, &request.tweak, secrets)?;
        let proof = self.prove(
            &transformation.transformed_password,
            &request.blinded_password,
            &transformation.transformed_tweak,
            &transformation.private_key,
            rng,
        )?;
        Ok(TransformResponse {
            transformed_password: transformation.transformed_password,
            proof,
        })
    }
}

impl TransformResponse {
    /// Client side check of a response to `request`.
    pub fn verify(&self, context: &PythiaContext, request: &TransformRequest) -> Result<bool> {
        context.verify(
            &self.transformed_password,
            &request.blinded_password,
            &request.tweak,
            &self.proof,
        )
    }
}
