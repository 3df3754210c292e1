#![allow(clippy::unwrap_used, dead_code)]

use rand_core::CryptoRngCore;

use pythia::{DeblindedPassword, PythiaConfig, PythiaContext, ServerSecrets};

pub const PASSWORD: &[u8] = b"password";
pub const TWEAK: &[u8] = b"alice";

pub fn context() -> PythiaContext {
    PythiaContext::new(&PythiaConfig::default()).unwrap()
}

pub fn server_secrets() -> ServerSecrets {
    ServerSecrets::new("virgil.com", "master secret", "server secret")
}

pub fn rotated_secrets() -> ServerSecrets {
    ServerSecrets::new("virgil.com", "secret master", "server secret")
}

/// Runs blind, transform and deblind for one password.
pub fn harden(
    context: &PythiaContext,
    password: &[u8],
    tweak: &[u8],
    secrets: &ServerSecrets,
    rng: &mut impl CryptoRngCore,
) -> DeblindedPassword {
    let blinding = context.blind(password, rng).unwrap();
    let transformation = context
        .transform(&blinding.blinded_password, tweak, secrets)
        .unwrap();
    context
        .deblind(
            &transformation.transformed_password,
            &blinding.blinding_secret,
        )
        .unwrap()
}
