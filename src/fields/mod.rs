//! Finite field arithmetic.
use crate::{Codec, error::RecoveryError};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::RngCore;
use std::{
    fmt::Debug,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConstantTimeEq};

/// An element of a finite field.
pub trait FieldElement:
    Debug
    + Clone
    + Copy
    + ConstantTimeEq
    + PartialEq
    + Eq
    + Default
    + From<u64>
    + Add<Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + SubAssign
    + Mul<Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + MulAssign
    + Neg<Output = Self>
{
    /// The additive identity of the field.
    const ZERO: Self;
    /// The multiplicative identity of the field.
    const ONE: Self;

    /// Project an integer into the field.
    fn from_u128(value: u128) -> Self;

    /// Test whether this element is zero.
    fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Square a field element.
    fn square(&self) -> Self;

    /// Raise a field element to some power.
    fn pow(&self, mut exponent: BigUint) -> Self {
        // Modular exponentiation from Schneier's _Applied Cryptography_, via Wikipedia
        // https://en.wikipedia.org/wiki/Modular_exponentiation#Pseudocode
        let mut out = Self::ONE;
        let mut base = *self;

        while exponent > BigUint::ZERO {
            if exponent.is_odd() {
                out *= base;
            }
            exponent >>= 1;
            base = base.square();
        }

        out
    }
}

/// An element of a finite field with a defined serialization format.
pub trait CodecFieldElement:
    FieldElement + for<'a> TryFrom<&'a [u8], Error = anyhow::Error> + Codec
{
    /// Number of bits needed to represent a field element.
    const NUM_BITS: u32;

    /// Number of bytes needed to represent a field element.
    fn num_bytes() -> usize {
        (Self::NUM_BITS as usize).div_ceil(8)
    }

    /// Generate a field element by rejection sampling.
    fn sample() -> Self {
        Self::sample_from_source(|num_bytes| {
            let mut bytes = vec![0; num_bytes];
            rand::rng().fill_bytes(&mut bytes);

            bytes
        })
    }

    /// Generate a field element by rejection sampling, sampling random bytes from the provided
    /// source.
    fn sample_from_source<F>(source: F) -> Self
    where
        F: FnMut(usize) -> Vec<u8>,
    {
        Self::sample_counting_rejections(source).0
    }

    /// Generate a field element by rejection sampling and return how many rejections were observed.
    fn sample_counting_rejections<F>(mut source: F) -> (Self, usize)
    where
        F: FnMut(usize) -> Vec<u8>,
    {
        let mut rejections = 0;
        let field_element = loop {
            // Encodings are big-endian, so any excess bits sit at the top of the first byte.
            let num_sampled_bytes = Self::num_bytes();
            let mut sampled_bytes = source(num_sampled_bytes);
            let excess_bits = num_sampled_bytes * 8 - Self::NUM_BITS as usize;
            if excess_bits != 0 {
                sampled_bytes[0] &= (1 << (8 - excess_bits)) - 1;
            }
            // FE::try_from rejects if the value is still too big after masking.
            if let Ok(fe) = Self::try_from(sampled_bytes.as_slice()) {
                break fe;
            }
            rejections += 1;
        };

        (field_element, rejections)
    }
}

/// Elements of a prime field, which support division by any nonzero element.
pub trait PrimeFieldElement: CodecFieldElement {
    /// The prime modulus of the field.
    fn modulus() -> BigUint;

    /// The canonical integer representative of this element, in `[0, p)`.
    fn to_biguint(&self) -> BigUint;

    /// Project an arbitrary integer into the field, reducing it modulo `p`.
    fn from_biguint(value: &BigUint) -> Self;

    /// The multiplicative inverse of this value.
    ///
    /// Zero has no inverse. Fermat's little theorem would happily map it to zero, so it is rejected
    /// explicitly.
    fn mul_inv(&self) -> Result<Self, RecoveryError> {
        if bool::from(self.is_zero()) {
            return Err(RecoveryError::DivisionByZero);
        }
        Ok(mul_inv_field_order(self, Self::modulus()))
    }

    /// Divide this value by `rhs`.
    fn div(&self, rhs: &Self) -> Result<Self, RecoveryError> {
        Ok(*self * rhs.mul_inv()?)
    }
}

/// Compute the multiplicative inverse of base, using the provided order of the field.
fn mul_inv_field_order<FE: FieldElement>(base: &FE, field_order: BigUint) -> FE {
    // The multiplicative group of any finite field is a group with order one less than the field
    // order. Let n = |F*| = |F| - 1.
    //
    // Every element of the group has an order that divides the group's order, by Lagrange's
    // theorem. That is, |g| | n. Thus, we can write |g| * a = n, for some integer a.
    //
    // Let h = g ^ (n - 1). We can rewrite this as follows.
    //
    // h = g ^ (|g| * a - 1)
    // h = g ^ (|g| * (a - 1) + |g| - 1)
    // h = g ^ (|g| * (a - 1)) * g ^ (|g| - 1)
    // h = (g ^ |g|) ^ (a - 1) * g ^ (|g| - 1)
    // h = e ^ (a - 1) * g ^ (|g| - 1)
    // h = g ^ (|g| - 1)
    //
    // This element h is the inverse of g, because h * g = g ^ (|g| - 1) * g = g ^ |g| = e.
    //
    // Therefore, we can compute inverses by exponentiating elements, g ^ -1 = g ^ (|F| - 2).
    base.pow(field_order - (BigUint::one() + BigUint::one()))
}

pub mod fieldbls12_381_scalar;
pub mod ntt;

pub use ntt::NttFieldElement;
