use crate::{
    domain::log2_exact,
    error::RecoveryError,
    fields::PrimeFieldElement,
};

/// Represents an element of an NTT-friendly field.
///
/// Fields implementing this trait must have a subgroup under multiplication with an order that has
/// many factors of two. For background on the NTT, see <https://eprint.iacr.org/2024/585>.
pub trait NttFieldElement: PrimeFieldElement {
    /// Base two logarithm of the order of [`NttFieldElement::max_domain_generator`].
    const LOG_MAX_DOMAIN_SIZE: u32;

    /// A generator of the subgroup of the multiplicative group with order
    /// 2^[`NttFieldElement::LOG_MAX_DOMAIN_SIZE`].
    fn max_domain_generator() -> Self;

    /// A generator of the subgroup of the multiplicative group with order 2^`log_size`.
    ///
    /// This is derived from [`NttFieldElement::max_domain_generator`] by repeated squaring, so the
    /// roots of unity of every order are consistent with each other: the root of order 2^(i-1) is
    /// the square of the root of order 2^i.
    fn root_of_unity(log_size: u32) -> Result<Self, RecoveryError> {
        if log_size > Self::LOG_MAX_DOMAIN_SIZE {
            return Err(RecoveryError::DomainTooLarge {
                log_size,
                max: Self::LOG_MAX_DOMAIN_SIZE,
            });
        }
        let mut root = Self::max_domain_generator();
        for _ in log_size..Self::LOG_MAX_DOMAIN_SIZE {
            root = root.square();
        }
        Ok(root)
    }

    /// Computes the Number Theoretic Transform of a sequence of polynomial coefficients. The
    /// result is returned in-place in bit-reversed order, so that element `k` is the polynomial
    /// evaluated at `omega^bitrev(k)`.
    ///
    /// The `omegas` argument must be a list of power-of-two roots of unity, such that element i is
    /// the 2^i-th root of unity. It should start with 1 itself, and contain at least enough values
    /// to include the `values.len()`-th root of unity. Note that for each element in the array, its
    /// predecessor is its square.
    fn ntt_bit_reversed(values: &mut [Self], omegas: &[Self]) -> Result<(), RecoveryError> {
        let log_n = checked_log_size(values.len(), omegas.len())?;
        if values.len() == 1 {
            return Ok(());
        }

        // Evaluate the NTT with the decimation-in-frequency radix-2 FFT algorithm.
        let mut stride = 1 << (log_n - 1);
        for omega in omegas[1..=log_n].iter().rev() {
            // The i=0 iteration of the below loop is unrolled separately to save some multiplications.
            let mut j = 0;
            while j < values.len() {
                (values[j], values[j + stride]) = (
                    values[j] + values[j + stride],
                    (values[j] - values[j + stride]),
                );

                j += stride * 2;
            }

            let mut omega_power = *omega;
            for i in 1..stride {
                let mut j = i;
                while j < values.len() {
                    (values[j], values[j + stride]) = (
                        values[j] + values[j + stride],
                        (values[j] - values[j + stride]) * omega_power,
                    );

                    j += stride * 2;
                }
                omega_power *= *omega;
            }

            stride /= 2;
        }

        Ok(())
    }

    /// Computes the inverse Number Theoretic Transform of a sequence. The input must be in
    /// bit-reversed order. The result is returned in-place in the natural order.
    ///
    /// The `omega_inverses` argument must be the multiplicative inverses of the roots of unity that
    /// would be passed to [`NttFieldElement::ntt_bit_reversed`], in the same order.
    ///
    /// Unlike the unscaled butterfly network, this multiplies the output by `1 / values.len()`, so
    /// it computes exactly the same thing as [`crate::ifft::ifft`] does over the matching domain.
    fn inverse_ntt_bit_reversed(
        values: &mut [Self],
        omega_inverses: &[Self],
    ) -> Result<(), RecoveryError> {
        let log_n = checked_log_size(values.len(), omega_inverses.len())?;
        if values.len() == 1 {
            return Ok(());
        }

        let mut stride = 1;
        for omega_inv in omega_inverses[1..=log_n].iter() {
            // The i=0 iteration of the below loop is unrolled separately to save some multiplications.
            let mut j = 0;
            while j < values.len() {
                (values[j], values[j + stride]) = (
                    values[j] + values[j + stride],
                    values[j] - values[j + stride],
                );

                j += stride * 2;
            }

            let mut omega_power = *omega_inv;
            for i in 1..stride {
                let mut j = i;
                while j < values.len() {
                    let product = values[j + stride] * omega_power;
                    (values[j], values[j + stride]) = (values[j] + product, values[j] - product);

                    j += stride * 2;
                }
                omega_power *= *omega_inv;
            }

            stride *= 2;
        }

        let size_inv = Self::from(values.len() as u64).mul_inv()?;
        for value in values.iter_mut() {
            *value *= size_inv;
        }

        Ok(())
    }
}

/// Checks that `length` is a power of two and that enough roots of unity were provided for it,
/// returning the base two logarithm of the length.
fn checked_log_size(length: usize, num_roots: usize) -> Result<usize, RecoveryError> {
    // Unwrap safety: usize should be at least as large as u32 anywhere we run.
    let log_n = usize::try_from(log2_exact(length)?).expect("u32 too big for usize?");
    if num_roots <= log_n {
        return Err(RecoveryError::TooFewRootsOfUnity {
            log_size: log_n as u32,
            provided: num_roots,
        });
    }
    Ok(log_n)
}
