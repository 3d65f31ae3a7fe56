use crate::{
    Codec,
    fields::{CodecFieldElement, FieldElement, NttFieldElement, PrimeFieldElement},
};
use anyhow::{Context, anyhow};
use bls12_381::Scalar;
use ff::Field;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize, de::Error as _};
use std::{
    cmp::Ordering,
    fmt::{self, Debug},
    io::{self, Read},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use subtle::ConstantTimeEq;

/// The scalar field of the BLS12-381 elliptic curve, which is the field EIP-4844 blobs are
/// defined over.
///
/// Field elements are serialized as 32 big-endian bytes, which is how they are laid out in a blob
/// ([EIP-4844][1]).
///
/// [1]: https://eips.ethereum.org/EIPS/eip-4844#helpers
// Arithmetic is delegated to `bls12_381::Scalar`, which keeps its Montgomery form value strictly
// less than the modulus. Equality relies on that invariant.
#[derive(Clone, Copy)]
pub struct FieldBls12_381Scalar(Scalar);

impl FieldBls12_381Scalar {
    /// Bytes of the prime modulus, in big endian order.
    ///
    /// p = 52435875175126190479447740508185965837690552500527637822603658699938581184513
    pub const MODULUS_BYTES: [u8; 32] = [
        0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8,
        0x05, 0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00,
        0x00, 0x01,
    ];

    /// Bytes of the EIP-4844 evaluation domain generator, in big endian order. This element has
    /// multiplicative order 4096.
    ///
    /// z = 39033254847818212395286706435128746857159659164139250548781411570340225835782
    const BLOB_DOMAIN_GENERATOR_BYTES: [u8; 32] = [
        0x56, 0x4c, 0x0a, 0x11, 0xa0, 0xf7, 0x04, 0xf4, 0xfc, 0x3e, 0x8a, 0xcf, 0xe0, 0xf8, 0x24,
        0x5f, 0x0a, 0xd1, 0x34, 0x7b, 0x37, 0x8f, 0xbf, 0x96, 0xe2, 0x06, 0xda, 0x11, 0xa5, 0xd3,
        0x63, 0x06,
    ];

    /// Serialize this element as 32 big-endian bytes.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut bytes = self.0.to_bytes();
        bytes.reverse();
        bytes
    }
}

impl FieldElement for FieldBls12_381Scalar {
    const ZERO: Self = Self(<Scalar as Field>::ZERO);
    const ONE: Self = Self(<Scalar as Field>::ONE);

    fn from_u128(value: u128) -> Self {
        Self(Scalar::from_raw([value as u64, (value >> 64) as u64, 0, 0]))
    }

    fn square(&self) -> Self {
        Self(self.0.square())
    }
}

impl CodecFieldElement for FieldBls12_381Scalar {
    const NUM_BITS: u32 = 255;
}

impl PrimeFieldElement for FieldBls12_381Scalar {
    fn modulus() -> BigUint {
        BigUint::from_bytes_be(&Self::MODULUS_BYTES)
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0.to_bytes())
    }

    fn from_biguint(value: &BigUint) -> Self {
        let reduced = value % Self::modulus();
        let mut limbs = [0u64; 4];
        for (limb, digit) in limbs.iter_mut().zip(reduced.iter_u64_digits()) {
            *limb = digit;
        }
        Self(Scalar::from_raw(limbs))
    }
}

impl NttFieldElement for FieldBls12_381Scalar {
    // The field's multiplicative group has a subgroup of order 2^32, but blobs only use the
    // subgroup of order 4096 generated by the EIP-4844 parameter.
    const LOG_MAX_DOMAIN_SIZE: u32 = 12;

    fn max_domain_generator() -> Self {
        // Unwrap safety: this constant is a valid field element.
        Self::try_from(&Self::BLOB_DOMAIN_GENERATOR_BYTES)
            .expect("blob domain generator is less than the modulus")
    }
}

impl Debug for FieldBls12_381Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldBls12_381Scalar(0x{})",
            hex::encode(self.to_bytes_be())
        )
    }
}

impl Default for FieldBls12_381Scalar {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConstantTimeEq for FieldBls12_381Scalar {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for FieldBls12_381Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldBls12_381Scalar {}

impl From<u64> for FieldBls12_381Scalar {
    fn from(value: u64) -> Self {
        Self(Scalar::from(value))
    }
}

impl TryFrom<&[u8; 32]> for FieldBls12_381Scalar {
    type Error = anyhow::Error;

    fn try_from(value: &[u8; 32]) -> Result<Self, Self::Error> {
        if value.iter().cmp(Self::MODULUS_BYTES.iter()) != Ordering::Less {
            return Err(anyhow!(
                "serialized FieldBls12_381Scalar element is not less than the modulus"
            ));
        }
        let mut little_endian = *value;
        little_endian.reverse();
        Option::<Scalar>::from(Scalar::from_bytes(&little_endian))
            .map(Self)
            .ok_or_else(|| anyhow!("serialized FieldBls12_381Scalar element is not canonical"))
    }
}

impl TryFrom<&[u8]> for FieldBls12_381Scalar {
    type Error = anyhow::Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let array_reference =
            <&[u8; 32]>::try_from(value).context("failed to decode FieldBls12_381Scalar")?;
        Self::try_from(array_reference)
    }
}

impl Codec for FieldBls12_381Scalar {
    fn decode(bytes: &mut io::Cursor<&[u8]>) -> Result<Self, anyhow::Error> {
        let mut buffer = [0u8; 32];
        bytes
            .read_exact(&mut buffer)
            .context("failed to read FieldBls12_381Scalar element")?;
        Self::try_from(&buffer)
    }

    fn encode(&self, bytes: &mut Vec<u8>) -> Result<(), anyhow::Error> {
        bytes.extend_from_slice(&self.to_bytes_be());
        Ok(())
    }
}

impl Serialize for FieldBls12_381Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.to_bytes_be()))
    }
}

impl<'de> Deserialize<'de> for FieldBls12_381Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).and_then(|string| {
            let digits = string.strip_prefix("0x").unwrap_or(&string);
            Self::try_from(hex::decode(digits).map_err(D::Error::custom)?.as_slice())
                .map_err(D::Error::custom)
        })
    }
}

impl Add<&Self> for FieldBls12_381Scalar {
    type Output = Self;

    fn add(self, rhs: &Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<Self> for FieldBls12_381Scalar {
    type Output = Self;

    #[allow(clippy::op_ref)]
    fn add(self, rhs: Self) -> Self::Output {
        self + &rhs
    }
}

impl AddAssign for FieldBls12_381Scalar {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub<&Self> for FieldBls12_381Scalar {
    type Output = Self;

    fn sub(self, rhs: &Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<Self> for FieldBls12_381Scalar {
    type Output = Self;

    #[allow(clippy::op_ref)]
    fn sub(self, rhs: Self) -> Self::Output {
        self - &rhs
    }
}

impl SubAssign for FieldBls12_381Scalar {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<&Self> for FieldBls12_381Scalar {
    type Output = Self;

    fn mul(self, rhs: &Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<Self> for FieldBls12_381Scalar {
    type Output = Self;

    #[allow(clippy::op_ref)]
    fn mul(self, rhs: Self) -> Self::Output {
        self * &rhs
    }
}

impl MulAssign for FieldBls12_381Scalar {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl Neg for FieldBls12_381Scalar {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
