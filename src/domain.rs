//! Evaluation domains: the roots of unity a polynomial is evaluated at, in bit-reversed order.
use crate::{
    error::RecoveryError,
    fields::{FieldElement, NttFieldElement, PrimeFieldElement},
};
use num_bigint::BigUint;

/// Returns the base two logarithm of `length`, or an error if it is zero or not a power of two.
pub fn log2_exact(length: usize) -> Result<u32, RecoveryError> {
    if !length.is_power_of_two() {
        return Err(RecoveryError::NotPowerOfTwo { length });
    }
    Ok(length.ilog2())
}

/// Reverses the low `log_size` bits of `index`.
///
/// `index` must be less than `2^log_size`.
pub fn bit_reverse(index: usize, log_size: u32) -> usize {
    if log_size == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS - log_size)
}

/// Computes `size` evaluation points from `generator`, a root of unity of order `size`.
///
/// Element `i` is `generator^bitrev(i)`, where the bit reversal is over `log2(size)` bits. For
/// EIP-4844 blobs, `generator` is the blob domain generator and `size` is 4096, so element 1 is
/// `generator^2048`.
pub fn evaluation_points<FE: FieldElement>(
    generator: FE,
    size: usize,
) -> Result<Vec<FE>, RecoveryError> {
    let log_size = log2_exact(size)?;
    Ok((0..size)
        .map(|index| generator.pow(BigUint::from(bit_reverse(index, log_size))))
        .collect())
}

/// A multiplicative subgroup of order `2^log_size`, along with its elements in bit-reversed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationDomain<FE> {
    log_size: u32,
    generator: FE,
    points: Vec<FE>,
}

impl<FE: PrimeFieldElement> EvaluationDomain<FE> {
    /// Constructs the domain of the given size generated by `generator`.
    ///
    /// The generator is expected to have order exactly `size`. That is not checked, but a
    /// generator of smaller order produces repeated points, and the transforms over such a domain
    /// are meaningless.
    pub fn with_generator(generator: FE, size: usize) -> Result<Self, RecoveryError> {
        Ok(Self {
            log_size: log2_exact(size)?,
            generator,
            points: evaluation_points(generator, size)?,
        })
    }

    /// Number of points in the domain.
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Base two logarithm of the number of points in the domain.
    pub fn log_size(&self) -> u32 {
        self.log_size
    }

    /// The root of unity generating the domain.
    pub fn generator(&self) -> FE {
        self.generator
    }

    /// The elements of the domain, in bit-reversed order.
    pub fn points(&self) -> &[FE] {
        &self.points
    }

    /// Power-of-two roots of unity consistent with this domain. Element `i` is a root of unity of
    /// order `2^i`, and the last element is the domain's generator.
    pub fn roots_of_unity(&self) -> Vec<FE> {
        let mut roots = Vec::with_capacity(self.log_size as usize + 1);
        let mut root = self.generator;
        roots.push(root);
        for _ in 0..self.log_size {
            root = root.square();
            roots.push(root);
        }
        roots.reverse();
        roots
    }

    /// The multiplicative inverses of [`Self::roots_of_unity`], in the same order.
    pub fn inverse_roots_of_unity(&self) -> Result<Vec<FE>, RecoveryError> {
        self.roots_of_unity()
            .iter()
            .map(PrimeFieldElement::mul_inv)
            .collect()
    }
}

impl<FE: NttFieldElement> EvaluationDomain<FE> {
    /// Constructs the domain of the given size, using the field's canonical root of unity of that
    /// order.
    pub fn new(size: usize) -> Result<Self, RecoveryError> {
        let generator = FE::root_of_unity(log2_exact(size)?)?;
        Self::with_generator(generator, size)
    }
}
