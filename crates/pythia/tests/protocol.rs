mod common;

use elliptic_curve::Field;
use rand_core::{OsRng, RngCore, SeedableRng};
use rstest::rstest;

use common::{context, harden, server_secrets, PASSWORD, TWEAK};
use pythia::codec::{PythiaDecode, PythiaEncode};
use pythia::test_utils::MockCryptoRng;
use pythia::{BlindedPassword, Proof, Scalar, TransformationPublicKey, TransformedPassword};

#[test]
fn test_deblinded_password_is_independent_of_blinding() {
    let context = context();
    let secrets = server_secrets();
    let mut rng = OsRng;

    let expected = harden(&context, PASSWORD, TWEAK, &secrets, &mut rng);
    for _ in 0..10 {
        let blinding = context.blind(PASSWORD, &mut rng).unwrap();
        let transformation = context
            .transform(&blinding.blinded_password, TWEAK, &secrets)
            .unwrap();
        let deblinded = context
            .deblind(
                &transformation.transformed_password,
                &blinding.blinding_secret,
            )
            .unwrap();
        assert_eq!(deblinded, expected);
    }
}

#[test]
fn test_deblinded_password_encoding_is_stable() {
    let context = context();
    let secrets = server_secrets();
    let first = harden(
        &context,
        PASSWORD,
        TWEAK,
        &secrets,
        &mut MockCryptoRng::seed_from_u64(1),
    );
    let second = harden(
        &context,
        PASSWORD,
        TWEAK,
        &secrets,
        &mut MockCryptoRng::seed_from_u64(2),
    );

    let bytes = first.to_bytes().unwrap();
    assert_eq!(bytes.len(), 288);
    assert_eq!(bytes, second.to_bytes().unwrap());
    assert_eq!(pythia::DeblindedPassword::from_bytes(&bytes).unwrap(), first);
}

#[test]
fn test_different_passwords_harden_differently() {
    let context = context();
    let secrets = server_secrets();
    let mut rng = MockCryptoRng::seed_from_u64(3);
    assert_ne!(
        harden(&context, b"password", TWEAK, &secrets, &mut rng),
        harden(&context, b"passwore", TWEAK, &secrets, &mut rng)
    );
}

#[test]
fn test_blinding_secret_inverts_factor() {
    let context = context();
    let mut rng = MockCryptoRng::seed_from_u64(4);
    let hashed = context.hash_password(PASSWORD);
    for _ in 0..20 {
        let blinding = context.blind(PASSWORD, &mut rng).unwrap();
        let secret = blinding.blinding_secret.expose();
        assert!(!bool::from(secret.is_zero()));
        // blinded = H1(m) * r, so r = secret^-1 must satisfy r * secret = 1
        let r = secret.invert().unwrap();
        assert_eq!(r * secret, Scalar::ONE);
        assert_eq!(hashed * r, blinding.blinded_password.element());
    }
}

struct Round {
    context: pythia::PythiaContext,
    blinded_password: BlindedPassword,
    transformed_password: TransformedPassword,
    proof: Proof,
}

fn round(seed: u64) -> Round {
    let context = context();
    let mut rng = MockCryptoRng::seed_from_u64(seed);
    let blinding = context.blind(PASSWORD, &mut rng).unwrap();
    let transformation = context
        .transform(&blinding.blinded_password, TWEAK, &server_secrets())
        .unwrap();
    let proof = context
        .prove(
            &transformation.transformed_password,
            &blinding.blinded_password,
            &transformation.transformed_tweak,
            &transformation.private_key,
            &mut rng,
        )
        .unwrap();
    Round {
        context,
        blinded_password: blinding.blinded_password,
        transformed_password: transformation.transformed_password,
        proof,
    }
}

impl Round {
    fn verify(&self, tweak: &[u8], proof: &Proof) -> bool {
        self.context
            .verify(
                &self.transformed_password,
                &self.blinded_password,
                tweak,
                proof,
            )
            .unwrap()
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
fn test_proof_is_complete(#[case] seed: u64) {
    let round = round(seed);
    assert!(round.verify(TWEAK, &round.proof));
}

fn flip_bit(bytes: &mut [u8], bit: usize) {
    bytes[bit / 8] ^= 1 << (bit % 8);
}

#[test]
fn test_tampered_challenge_is_rejected() {
    let round = round(5);
    let encoded = round.proof.c.to_bytes().unwrap();
    for bit in 8..encoded.len() * 8 {
        let mut bytes = encoded.clone();
        flip_bit(&mut bytes, bit);
        let tampered = Proof {
            c: Scalar::from_bytes(&bytes).unwrap(),
            ..round.proof
        };
        assert!(!round.verify(TWEAK, &tampered), "bit {bit}");
    }
}

#[test]
fn test_tampered_response_is_rejected() {
    let round = round(6);
    let encoded = round.proof.u.to_bytes().unwrap();
    for bit in 8..encoded.len() * 8 {
        let mut bytes = encoded.clone();
        flip_bit(&mut bytes, bit);
        let tampered = Proof {
            u: Scalar::from_bytes(&bytes).unwrap(),
            ..round.proof
        };
        assert!(!round.verify(TWEAK, &tampered), "bit {bit}");
    }
}

#[test]
fn test_tampered_public_key_is_rejected() {
    let round = round(7);
    let encoded = round.proof.public_key.to_bytes().unwrap();
    let mut rng = MockCryptoRng::seed_from_u64(7);
    for _ in 0..32 {
        let mut bytes = encoded.clone();
        // the first byte carries the compression flags
        let bit = 8 + (rng.next_u32() as usize) % (bytes.len() * 8 - 8);
        flip_bit(&mut bytes, bit);
        // most flips leave the curve; those that do not must fail verification
        if let Ok(public_key) = TransformationPublicKey::from_bytes(&bytes) {
            let tampered = Proof {
                public_key,
                ..round.proof
            };
            assert!(!round.verify(TWEAK, &tampered));
        }
    }
}

#[test]
fn test_tampered_tweak_is_rejected() {
    let round = round(8);
    for bit in 0..TWEAK.len() * 8 {
        let mut tweak = TWEAK.to_vec();
        flip_bit(&mut tweak, bit);
        assert!(!round.verify(&tweak, &round.proof), "bit {bit}");
    }
}
