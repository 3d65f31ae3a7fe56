//! Recursive radix-2 transforms between evaluation form and coefficient form.
//!
//! Values are given at evaluation points in bit-reversed order: the points are
//! `points[i] = g^bitrev(i)` for a root of unity `g`, so `points[2i + 1] == -points[2i]`. A
//! polynomial `f(X) = E(X^2) + X * O(X^2)` then satisfies
//!
//! ```text
//! E(x^2) = (f(x) + f(-x)) / 2
//! O(x^2) = (f(x) - f(-x)) / (2x)
//! ```
//!
//! for `x = points[2i]`, and the squared points `x^2` are again a bit-reversed domain of half the
//! size. Recursing on both halves and interleaving the results recovers the coefficients.
use crate::{
    domain::log2_exact,
    error::RecoveryError,
    fields::{FieldElement, PrimeFieldElement},
};
use anyhow::Context;

/// The evaluation point used by a pair of values at some level of the recursion.
#[derive(Clone, Copy)]
struct Twiddle<FE> {
    /// The point `x` shared (up to sign) by the pair.
    point: FE,
    /// `1 / (2x)`, or zero if inverses were not requested.
    double_point_inverse: FE,
}

/// The evaluation points used at each level of the recursion.
///
/// Level 0 holds the even-indexed points of the input domain, and level `d + 1` holds the squares
/// of the even-indexed entries of level `d`. Level `d` has `n / 2^(d + 1)` entries.
struct PointTree<FE> {
    levels: Vec<Vec<Twiddle<FE>>>,
}

impl<FE: PrimeFieldElement> PointTree<FE> {
    /// Build the tree without computing inverses, for the forward transform.
    fn new(points: &[FE]) -> Self {
        let mut levels = Vec::new();
        let mut domain = points.to_vec();
        while domain.len() > 1 {
            let level = domain
                .iter()
                .step_by(2)
                .map(|point| Twiddle {
                    point: *point,
                    double_point_inverse: FE::ZERO,
                })
                .collect::<Vec<_>>();
            domain = level.iter().map(|twiddle| twiddle.point.square()).collect();
            levels.push(level);
        }
        Self { levels }
    }

    /// Build the tree, along with the inverse of twice each point, for the inverse transform.
    fn with_inverses(points: &[FE]) -> Result<Self, anyhow::Error> {
        let mut tree = Self::new(points);
        let two = FE::from(2);
        for (depth, level) in tree.levels.iter_mut().enumerate() {
            for (index, twiddle) in level.iter_mut().enumerate() {
                twiddle.double_point_inverse =
                    (two * twiddle.point).mul_inv().with_context(|| {
                        format!("evaluation point {index} at recursion depth {depth} is zero")
                    })?;
            }
        }
        Ok(tree)
    }
}

/// Checks that `values` and `points` have the same power-of-two length.
fn check_lengths<FE>(values: &[FE], points: &[FE]) -> Result<(), RecoveryError> {
    if values.len() != points.len() {
        return Err(RecoveryError::LengthMismatch {
            values: values.len(),
            points: points.len(),
        });
    }
    log2_exact(values.len())?;
    Ok(())
}

/// Precomputed state for repeated transforms over one domain.
///
/// Building a plan inverts twice every point the inverse transform divides by. Transforms run
/// through the plan skip that work, so a domain that is used many times should get a plan once.
pub struct TransformPlan<FE> {
    size: usize,
    tree: PointTree<FE>,
    half: FE,
}

impl<FE: PrimeFieldElement> TransformPlan<FE> {
    /// Prepares transforms over `points`, which must be a power-of-two sized domain of roots of
    /// unity in bit-reversed order.
    pub fn new(points: &[FE]) -> Result<Self, anyhow::Error> {
        log2_exact(points.len()).context("invalid transform domain")?;
        Ok(Self {
            size: points.len(),
            tree: PointTree::with_inverses(points)?,
            half: FE::from(2).mul_inv()?,
        })
    }

    /// Number of points in the domain.
    pub fn size(&self) -> usize {
        self.size
    }

    fn check_length(&self, length: usize) -> Result<(), RecoveryError> {
        if length != self.size {
            return Err(RecoveryError::LengthMismatch {
                values: length,
                points: self.size,
            });
        }
        Ok(())
    }

    /// Same as [`ifft`] over this plan's points.
    pub fn ifft(&self, values: &[FE]) -> Result<Vec<FE>, anyhow::Error> {
        self.check_length(values.len()).context("invalid inverse FFT input")?;
        Ok(ifft_recursive(values.to_vec(), &self.tree, 0, self.half))
    }

    /// Same as [`fft`] over this plan's points.
    pub fn fft(&self, coefficients: &[FE]) -> Result<Vec<FE>, anyhow::Error> {
        self.check_length(coefficients.len()).context("invalid FFT input")?;
        Ok(fft_recursive(coefficients.to_vec(), &self.tree, 0))
    }
}

/// Computes the inverse FFT: given the values of a polynomial at `points`, returns its
/// coefficients in natural order.
///
/// `points` must be a domain of roots of unity in bit-reversed order, such as
/// [`crate::domain::EvaluationDomain::points`]. Both slices must have the same power-of-two
/// length. A length-one input is returned unchanged, whatever the point.
pub fn ifft<FE: PrimeFieldElement>(values: &[FE], points: &[FE]) -> Result<Vec<FE>, anyhow::Error> {
    check_lengths(values, points).context("invalid inverse FFT input")?;
    TransformPlan::new(points)?.ifft(values)
}

fn ifft_recursive<FE: FieldElement>(
    values: Vec<FE>,
    tree: &PointTree<FE>,
    depth: usize,
    half: FE,
) -> Vec<FE> {
    if values.len() == 1 {
        return values;
    }

    let half_length = values.len() / 2;
    let mut evens = Vec::with_capacity(half_length);
    let mut odds = Vec::with_capacity(half_length);
    for (pair, twiddle) in values.chunks_exact(2).zip(&tree.levels[depth]) {
        let (a, b) = (pair[0], pair[1]);
        evens.push((a + b) * half);
        odds.push((a - b) * twiddle.double_point_inverse);
    }

    let evens = ifft_recursive(evens, tree, depth + 1, half);
    let odds = ifft_recursive(odds, tree, depth + 1, half);

    evens
        .into_iter()
        .zip(odds)
        .flat_map(|(even, odd)| [even, odd])
        .collect()
}

/// Computes the forward FFT: given the coefficients of a polynomial in natural order, returns its
/// values at `points`. This is the inverse of [`ifft`].
pub fn fft<FE: PrimeFieldElement>(
    coefficients: &[FE],
    points: &[FE],
) -> Result<Vec<FE>, anyhow::Error> {
    check_lengths(coefficients, points).context("invalid FFT input")?;
    let tree = PointTree::new(points);

    Ok(fft_recursive(coefficients.to_vec(), &tree, 0))
}

fn fft_recursive<FE: FieldElement>(
    coefficients: Vec<FE>,
    tree: &PointTree<FE>,
    depth: usize,
) -> Vec<FE> {
    if coefficients.len() == 1 {
        return coefficients;
    }

    let (evens, odds): (Vec<FE>, Vec<FE>) = coefficients
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .unzip();
    let evens = fft_recursive(evens, tree, depth + 1);
    let odds = fft_recursive(odds, tree, depth + 1);

    let mut values = Vec::with_capacity(coefficients.len());
    for ((even, odd), twiddle) in evens.into_iter().zip(odds).zip(&tree.levels[depth]) {
        let product = twiddle.point * odd;
        values.push(even + product);
        values.push(even - product);
    }
    values
}
