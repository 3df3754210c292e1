//! Canonical byte encodings of scalars, points and GT elements.
//!
//! Scalars are written as a sign byte followed by a minimal big-endian
//! magnitude. G1 and G2 points use their compressed form, GT elements their
//! torus-compressed form. Every encoding has a fixed maximum capacity and
//! decoders reject buffers that do not fit it.

use std::io::Cursor;

use blstrs::Compress;
use elliptic_curve::Group;

use crate::crypto::constants::{G1_BUF_SIZE, G2_BUF_SIZE, GT_BUF_SIZE, SCALAR_BUF_SIZE};
use crate::crypto::hash::scalar_from_be_bytes_mod_order;
use crate::errors::{PythiaError, Result};
use crate::{ElementG1, ElementG2, ElementGt, Scalar};

pub trait PythiaEncode {
    /// Exact number of bytes `encode_into` writes.
    fn encoded_len(&self) -> usize;

    /// Writes the encoding to the front of `buf` and returns its length.
    fn encode_into(&self, buf: &mut [u8]) -> Result<usize>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.encoded_len()];
        let written = self.encode_into(&mut buf)?;
        buf.truncate(written);
        Ok(buf)
    }
}

pub trait PythiaDecode: Sized {
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

fn check_capacity(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(PythiaError::InvalidBufferSize {
            expected: needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn check_exact(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(PythiaError::InvalidBufferSize {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Leading byte of a scalar encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Sign {
    Positive = 0x00,
    Negative = 0x01,
}

impl TryFrom<u8> for Sign {
    type Error = PythiaError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Positive),
            0x01 => Ok(Self::Negative),
            other => Err(PythiaError::MalformedScalarEncoding(other)),
        }
    }
}

impl From<Sign> for u8 {
    fn from(sign: Sign) -> Self {
        sign as u8
    }
}

/// A parsed scalar encoding, before reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarEncoding {
    pub sign: Sign,
    /// Big-endian, at most `SCALAR_BUF_SIZE - 1` bytes, never empty.
    pub magnitude: Vec<u8>,
}

impl ScalarEncoding {
    /// The canonical encoding of a reduced scalar: positive, leading zero
    /// bytes stripped, zero written as a single `0x00`.
    pub fn from_scalar(scalar: &Scalar) -> Self {
        let bytes = scalar.to_bytes_be();
        let first = bytes
            .iter()
            .position(|byte| *byte != 0)
            .unwrap_or(bytes.len() - 1);
        Self {
            sign: Sign::Positive,
            magnitude: bytes[first..].to_vec(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let Some((&sign, magnitude)) = bytes.split_first() else {
            return Err(PythiaError::InvalidBufferSize {
                expected: 2,
                actual: 0,
            });
        };
        if bytes.len() > SCALAR_BUF_SIZE {
            return Err(PythiaError::InvalidBufferSize {
                expected: SCALAR_BUF_SIZE,
                actual: bytes.len(),
            });
        }
        let sign = Sign::try_from(sign)?;
        if magnitude.is_empty() {
            return Err(PythiaError::InvalidBufferSize {
                expected: 2,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            sign,
            magnitude: magnitude.to_vec(),
        })
    }

    /// Reduces the signed magnitude modulo the group order. A negative value
    /// `-m` maps to `n - (m mod n)`.
    pub fn reduce(&self) -> Scalar {
        let value = scalar_from_be_bytes_mod_order(&self.magnitude);
        match self.sign {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + self.magnitude.len()
    }

    pub fn write(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.encoded_len();
        check_capacity(buf, len)?;
        buf[0] = self.sign.into();
        buf[1..len].copy_from_slice(&self.magnitude);
        Ok(len)
    }
}

impl PythiaEncode for Scalar {
    fn encoded_len(&self) -> usize {
        ScalarEncoding::from_scalar(self).encoded_len()
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        ScalarEncoding::from_scalar(self).write(buf)
    }
}

impl PythiaDecode for Scalar {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(ScalarEncoding::parse(bytes)?.reduce())
    }
}

impl PythiaEncode for ElementG1 {
    fn encoded_len(&self) -> usize {
        G1_BUF_SIZE
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        check_capacity(buf, G1_BUF_SIZE)?;
        buf[..G1_BUF_SIZE].copy_from_slice(&self.to_compressed());
        Ok(G1_BUF_SIZE)
    }
}

impl PythiaDecode for ElementG1 {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_exact(bytes, G1_BUF_SIZE)?;
        let mut buf = [0u8; G1_BUF_SIZE];
        buf.copy_from_slice(bytes);
        ElementG1::from_compressed(&buf)
            .into_option()
            .ok_or(PythiaError::MalformedElement)
    }
}

impl PythiaEncode for ElementG2 {
    fn encoded_len(&self) -> usize {
        G2_BUF_SIZE
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        check_capacity(buf, G2_BUF_SIZE)?;
        buf[..G2_BUF_SIZE].copy_from_slice(&self.to_compressed());
        Ok(G2_BUF_SIZE)
    }
}

impl PythiaDecode for ElementG2 {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_exact(bytes, G2_BUF_SIZE)?;
        let mut buf = [0u8; G2_BUF_SIZE];
        buf.copy_from_slice(bytes);
        ElementG2::from_compressed(&buf)
            .into_option()
            .ok_or(PythiaError::MalformedElement)
    }
}

// The torus compression cannot represent the identity, so it is written as
// all zeros, which is never a valid compressed element.
impl PythiaEncode for ElementGt {
    fn encoded_len(&self) -> usize {
        GT_BUF_SIZE
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        check_capacity(buf, GT_BUF_SIZE)?;
        let out = &mut buf[..GT_BUF_SIZE];
        if bool::from(self.is_identity()) {
            out.fill(0);
            return Ok(GT_BUF_SIZE);
        }
        self.write_compressed(&mut *out)
            .map_err(|err| PythiaError::arithmetic(format!("GT compression failed: {err}")))?;
        Ok(GT_BUF_SIZE)
    }
}

impl PythiaDecode for ElementGt {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_exact(bytes, GT_BUF_SIZE)?;
        if bytes.iter().all(|byte| *byte == 0) {
            return Ok(ElementGt::identity());
        }
        ElementGt::read_compressed(Cursor::new(bytes)).map_err(|_| PythiaError::MalformedElement)
    }
}

/// Implements the codec and hex serde for a single-field wrapper whose inner
/// value is reached through `$get` and rebuilt through `$make`.
macro_rules! impl_codec_newtype {
    ($name:ty, $inner:ty, $get:expr, $make:expr) => {
        impl $crate::codec::PythiaEncode for $name {
            fn encoded_len(&self) -> usize {
                $crate::codec::PythiaEncode::encoded_len(&$get(self))
            }

            fn encode_into(&self, buf: &mut [u8]) -> $crate::errors::Result<usize> {
                $crate::codec::PythiaEncode::encode_into(&$get(self), buf)
            }
        }

        impl $crate::codec::PythiaDecode for $name {
            fn from_bytes(bytes: &[u8]) -> $crate::errors::Result<Self> {
                <$inner as $crate::codec::PythiaDecode>::from_bytes(bytes).map($make)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                $crate::codec::hex_serde::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                $crate::codec::hex_serde::deserialize(deserializer)
            }
        }
    };
}

pub(crate) use impl_codec_newtype;

/// Serde adapter writing a codec value as a hex string of its encoding.
///
/// Use with `#[serde(with = "pythia::codec::hex_serde")]`.
pub mod hex_serde {
    use serde::Deserialize;

    use super::{PythiaDecode, PythiaEncode};

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: PythiaEncode,
    {
        let bytes = value.to_bytes().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: PythiaDecode,
    {
        let hex_str = String::deserialize(deserializer)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        T::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use elliptic_curve::Field;
    use hex_literal::hex;
    use rand_core::SeedableRng;
    use rstest::rstest;

    use super::*;
    use crate::crypto::constants::BLS12_381_ORDER;
    use crate::test_utils::MockCryptoRng;

    #[rstest]
    #[case::zero(Scalar::ZERO, &hex!("0000"))]
    #[case::one(Scalar::ONE, &hex!("0001"))]
    #[case::two_bytes(Scalar::from(0x0102u64), &hex!("000102"))]
    #[case::minus_one(
        -Scalar::ONE,
        &hex!("0073eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000000")
    )]
    fn test_scalar_encoding(#[case] scalar: Scalar, #[case] expected: &[u8]) {
        assert_eq!(scalar.encoded_len(), expected.len());
        assert_eq!(scalar.to_bytes().unwrap(), expected);
        assert_eq!(Scalar::from_bytes(expected).unwrap(), scalar);
    }

    #[rstest]
    #[case::negative_one(&hex!("0101"), -Scalar::ONE)]
    #[case::negative_zero(&hex!("0100"), Scalar::ZERO)]
    #[case::padded(&hex!("0000000005"), Scalar::from(5u64))]
    #[case::order(&[&[0u8][..], &BLS12_381_ORDER[..]].concat(), Scalar::ZERO)]
    #[case::negative_order(&[&[1u8][..], &BLS12_381_ORDER[..]].concat(), Scalar::ZERO)]
    fn test_scalar_decoding_reduces(#[case] bytes: &[u8], #[case] expected: Scalar) {
        assert_eq!(Scalar::from_bytes(bytes).unwrap(), expected);
    }

    #[rstest]
    #[case::bad_sign(&hex!("0201"), PythiaError::MalformedScalarEncoding(0x02))]
    #[case::high_sign(&hex!("ff01"), PythiaError::MalformedScalarEncoding(0xff))]
    #[case::empty(&[], PythiaError::InvalidBufferSize { expected: 2, actual: 0 })]
    #[case::sign_only(&hex!("00"), PythiaError::InvalidBufferSize { expected: 2, actual: 1 })]
    #[case::too_long(&[0u8; 34], PythiaError::InvalidBufferSize { expected: 33, actual: 34 })]
    fn test_scalar_decoding_rejects(#[case] bytes: &[u8], #[case] expected: PythiaError) {
        assert_eq!(Scalar::from_bytes(bytes).unwrap_err(), expected);
    }

    #[test]
    fn test_encode_into_reports_length_and_capacity() {
        let scalar = Scalar::from(0xabcdu64);
        let mut buf = [0xffu8; SCALAR_BUF_SIZE];
        assert_eq!(scalar.encode_into(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &hex!("00abcd"));

        let mut small = [0u8; 2];
        assert_eq!(
            scalar.encode_into(&mut small).unwrap_err(),
            PythiaError::InvalidBufferSize {
                expected: 3,
                actual: 2
            }
        );

        let mut small = [0u8; G1_BUF_SIZE - 1];
        assert!(matches!(
            ElementG1::generator().encode_into(&mut small),
            Err(PythiaError::InvalidBufferSize { .. })
        ));
    }

    #[test]
    fn test_points_round_trip() {
        let mut rng = MockCryptoRng::seed_from_u64(42);
        let g1 = ElementG1::generator() * Scalar::random(&mut rng);
        let g2 = ElementG2::generator() * Scalar::random(&mut rng);
        let gt = ElementGt::generator() * Scalar::random(&mut rng);

        let bytes = g1.to_bytes().unwrap();
        assert_eq!(bytes.len(), G1_BUF_SIZE);
        assert_eq!(ElementG1::from_bytes(&bytes).unwrap(), g1);

        let bytes = g2.to_bytes().unwrap();
        assert_eq!(bytes.len(), G2_BUF_SIZE);
        assert_eq!(ElementG2::from_bytes(&bytes).unwrap(), g2);

        let bytes = gt.to_bytes().unwrap();
        assert_eq!(bytes.len(), GT_BUF_SIZE);
        assert_eq!(ElementGt::from_bytes(&bytes).unwrap(), gt);
    }

    #[test]
    fn test_gt_identity_is_all_zeros() {
        let bytes = ElementGt::identity().to_bytes().unwrap();
        assert_eq!(bytes, vec![0u8; GT_BUF_SIZE]);
        assert_eq!(ElementGt::from_bytes(&bytes).unwrap(), ElementGt::identity());
    }

    #[rstest]
    #[case::g1_short(G1_BUF_SIZE - 1)]
    #[case::g1_long(G1_BUF_SIZE + 1)]
    fn test_g1_rejects_wrong_size(#[case] len: usize) {
        assert_eq!(
            ElementG1::from_bytes(&vec![0u8; len]).unwrap_err(),
            PythiaError::InvalidBufferSize {
                expected: G1_BUF_SIZE,
                actual: len
            }
        );
    }

    #[rstest]
    #[case::g2_short(G2_BUF_SIZE - 1)]
    #[case::g2_long(G2_BUF_SIZE + 1)]
    fn test_g2_rejects_wrong_size(#[case] len: usize) {
        assert!(matches!(
            ElementG2::from_bytes(&vec![0u8; len]),
            Err(PythiaError::InvalidBufferSize { .. })
        ));
    }

    #[rstest]
    #[case::gt_short(GT_BUF_SIZE - 1)]
    #[case::gt_long(GT_BUF_SIZE + 1)]
    fn test_gt_rejects_wrong_size(#[case] len: usize) {
        assert!(matches!(
            ElementGt::from_bytes(&vec![0u8; len]),
            Err(PythiaError::InvalidBufferSize { .. })
        ));
    }

    #[test]
    fn test_points_reject_garbage() {
        assert_eq!(
            ElementG1::from_bytes(&[0xffu8; G1_BUF_SIZE]).unwrap_err(),
            PythiaError::MalformedElement
        );
        assert_eq!(
            ElementG2::from_bytes(&[0xffu8; G2_BUF_SIZE]).unwrap_err(),
            PythiaError::MalformedElement
        );
        assert_eq!(
            ElementGt::from_bytes(&[0xffu8; GT_BUF_SIZE]).unwrap_err(),
            PythiaError::MalformedElement
        );
    }

    #[test]
    fn test_hex_serde_adapter() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Wrapper {
            #[serde(with = "hex_serde")]
            value: Scalar,
        }

        let original = Wrapper {
            value: Scalar::from(0x0102u64),
        };
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#"{"value":"000102"}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), original);

        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"0202"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"zz"}"#).is_err());
    }
}
