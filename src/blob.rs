//! EIP-4844 blobs, and recovery of the polynomial a blob commits to.
//!
//! A blob is 4096 elements of the BLS12-381 scalar field, each serialized as 32 big-endian bytes.
//! Element `i` is the value of some polynomial of degree less than 4096 at the `i`-th point of
//! the blob evaluation domain, in bit-reversed order. See [EIP-4844][1].
//!
//! [1]: https://eips.ethereum.org/EIPS/eip-4844
use crate::{
    Codec,
    domain::EvaluationDomain,
    error::RecoveryError,
    fields::fieldbls12_381_scalar::FieldBls12_381Scalar,
    ifft::TransformPlan,
};
use anyhow::Context;
use std::{fmt, fs, io::Cursor, path::Path, sync::LazyLock};
use tracing::debug;

/// Number of field elements in a blob.
pub const BLOB_LEN: usize = 4096;

/// Number of bytes in the encoding of a field element.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// Number of bytes in the encoding of a blob.
pub const BYTES_PER_BLOB: usize = BLOB_LEN * BYTES_PER_FIELD_ELEMENT;

/// Number of hex digits in the encoding of a blob, not counting any `0x` prefix.
pub const HEX_CHARS_PER_BLOB: usize = 2 * BYTES_PER_BLOB;

static BLOB_DOMAIN: LazyLock<EvaluationDomain<FieldBls12_381Scalar>> = LazyLock::new(|| {
    // Unwrap safety: BLOB_LEN is a power of two, and the field has roots of unity of that order.
    EvaluationDomain::new(BLOB_LEN).expect("blob evaluation domain is supported")
});

static BLOB_TRANSFORM: LazyLock<TransformPlan<FieldBls12_381Scalar>> = LazyLock::new(|| {
    // Unwrap safety: the blob domain has a power-of-two size and consists of roots of unity, none
    // of which is zero.
    TransformPlan::new(BLOB_DOMAIN.points()).expect("blob evaluation domain has no zero points")
});

/// The evaluation domain blobs are defined over: the 4096th roots of unity in bit-reversed order.
pub fn blob_domain() -> &'static EvaluationDomain<FieldBls12_381Scalar> {
    &BLOB_DOMAIN
}

/// Transforms over [`blob_domain`], prepared on first use and shared by every blob.
pub fn blob_transform() -> &'static TransformPlan<FieldBls12_381Scalar> {
    &BLOB_TRANSFORM
}

/// The evaluation form of a polynomial of degree less than [`BLOB_LEN`].
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    elements: Vec<FieldBls12_381Scalar>,
}

impl Blob {
    /// Parse a blob from its hex encoding.
    ///
    /// Surrounding whitespace and a leading `0x` or `0X` are ignored. Digits may be in either case.
    /// Character offsets in errors count from the first digit after any prefix.
    pub fn from_hex(data: &str) -> Result<Self, anyhow::Error> {
        let trimmed = data.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        // Offsets count characters, not UTF-8 bytes.
        let mut length = 0;
        for (offset, character) in digits.chars().enumerate() {
            if !character.is_ascii_hexdigit() {
                return Err(RecoveryError::InvalidHexCharacter {
                    character,
                    offset,
                    element: offset / (2 * BYTES_PER_FIELD_ELEMENT),
                }
                .into());
            }
            length += 1;
        }
        if length != HEX_CHARS_PER_BLOB {
            return Err(RecoveryError::HexLength {
                expected: HEX_CHARS_PER_BLOB,
                actual: length,
            }
            .into());
        }

        let bytes = hex::decode(digits).context("failed to decode blob hex")?;

        Self::from_bytes(&bytes)
    }

    /// Parse a blob from its [`BYTES_PER_BLOB`] byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, anyhow::Error> {
        if bytes.len() != BYTES_PER_BLOB {
            return Err(RecoveryError::BlobLength {
                expected: BYTES_PER_BLOB,
                actual: bytes.len(),
            }
            .into());
        }

        let elements = bytes
            .chunks_exact(BYTES_PER_FIELD_ELEMENT)
            .enumerate()
            .map(|(index, chunk)| {
                FieldBls12_381Scalar::try_from(chunk)
                    .map_err(|_| RecoveryError::NonCanonicalElement { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(elements = elements.len(), "parsed blob");

        Ok(Self { elements })
    }

    /// Read a hex encoded blob from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read blob file {}", path.display()))?;
        Self::from_hex(&data).with_context(|| format!("failed to parse blob file {}", path.display()))
    }

    /// Evaluate a polynomial over the blob domain.
    ///
    /// `coefficients` must hold exactly [`BLOB_LEN`] coefficients, lowest degree first.
    pub fn from_coefficients(coefficients: &[FieldBls12_381Scalar]) -> Result<Self, anyhow::Error> {
        let elements = blob_transform()
            .fft(coefficients)
            .context("failed to evaluate blob polynomial")?;
        Ok(Self { elements })
    }

    /// The field elements of the blob, in order.
    pub fn elements(&self) -> &[FieldBls12_381Scalar] {
        &self.elements
    }

    /// Encode the blob as [`HEX_CHARS_PER_BLOB`] lowercase hex digits, without a prefix.
    pub fn to_hex(&self) -> String {
        let mut encoded = String::with_capacity(HEX_CHARS_PER_BLOB);
        for element in &self.elements {
            encoded.push_str(&hex::encode(element.to_bytes_be()));
        }
        encoded
    }

    /// Recover the coefficients of the polynomial this blob holds the evaluations of, lowest
    /// degree first.
    pub fn recover(&self) -> Result<Vec<FieldBls12_381Scalar>, anyhow::Error> {
        let transform = blob_transform();
        debug!(size = transform.size(), "recovering blob polynomial");
        let coefficients = transform
            .ifft(&self.elements)
            .context("failed to recover blob polynomial")?;
        debug!("recovered blob polynomial");
        Ok(coefficients)
    }
}

/// Recover the coefficients of the polynomial `blob` holds the evaluations of.
pub fn recover(blob: &Blob) -> Result<Vec<FieldBls12_381Scalar>, anyhow::Error> {
    blob.recover()
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("first_element", &self.elements.first())
            .field("len", &self.elements.len())
            .finish_non_exhaustive()
    }
}

impl Codec for Blob {
    fn decode(bytes: &mut Cursor<&[u8]>) -> Result<Self, anyhow::Error> {
        let elements = FieldBls12_381Scalar::decode_fixed_array(bytes, BLOB_LEN)
            .context("failed to decode blob")?;
        Ok(Self { elements })
    }

    fn encode(&self, bytes: &mut Vec<u8>) -> Result<(), anyhow::Error> {
        FieldBls12_381Scalar::encode_fixed_array(&self.elements, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fields::{FieldElement, PrimeFieldElement},
        ifft::{fft, ifft},
    };
    use num_bigint::BigUint;
    use wasm_bindgen_test::wasm_bindgen_test;

    type FE = FieldBls12_381Scalar;

    const CUBIC_BLOB: &str = include_str!("../test-vectors/blob/cubic_blob.txt");

    /// Coefficients of the polynomial in `test-vectors/blob/cubic_blob.txt`.
    fn cubic_coefficients() -> Vec<FE> {
        (1..=BLOB_LEN as u64).map(|i| FE::from(i * i * i + 5)).collect()
    }

    fn constant_blob_hex(value: u64) -> String {
        format!("{value:064x}").repeat(BLOB_LEN)
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn recover_cubic_blob() {
        let blob = Blob::from_hex(CUBIC_BLOB).unwrap();
        assert_eq!(blob.elements().len(), BLOB_LEN);
        assert_eq!(blob.recover().unwrap(), cubic_coefficients());
        assert_eq!(recover(&blob).unwrap(), cubic_coefficients());

        // Element 0 is the value at 1, which is the sum of the coefficients.
        let sum = cubic_coefficients()
            .into_iter()
            .fold(FE::ZERO, |sum, coefficient| sum + coefficient);
        assert_eq!(blob.elements()[0], sum);
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn shared_transform_matches_free_functions() {
        let blob = Blob::from_hex(CUBIC_BLOB).unwrap();
        let points = blob_domain().points();
        assert_eq!(blob_transform().size(), BLOB_LEN);
        assert!(std::ptr::eq(blob_transform(), blob_transform()));

        let coefficients = blob.recover().unwrap();
        assert_eq!(coefficients, ifft(blob.elements(), points).unwrap());
        assert_eq!(fft(&coefficients, points).unwrap(), blob.elements());
        // Recovering again reuses the shared transform and gives the same result.
        assert_eq!(blob.recover().unwrap(), coefficients);
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn encode_cubic_blob() {
        let blob = Blob::from_coefficients(&cubic_coefficients()).unwrap();
        assert_eq!(blob.to_hex(), CUBIC_BLOB.trim());
        assert_eq!(blob, Blob::from_hex(CUBIC_BLOB).unwrap());
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn recover_constant_blob() {
        for value in [0, 1, 7] {
            let blob = Blob::from_hex(&constant_blob_hex(value)).unwrap();
            let coefficients = blob.recover().unwrap();
            assert_eq!(coefficients[0], FE::from(value));
            assert!(coefficients[1..].iter().all(|c| *c == FE::ZERO));
        }
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn recover_largest_element() {
        // Every element is p - 1, the largest canonical value.
        let max_element = FE::from_biguint(&(FE::modulus() - BigUint::from(1u8)));
        let hex = hex::encode(max_element.to_bytes_be()).repeat(BLOB_LEN);
        let coefficients = Blob::from_hex(&hex).unwrap().recover().unwrap();
        assert_eq!(coefficients[0], -FE::ONE);
        assert!(coefficients[1..].iter().all(|c| *c == FE::ZERO));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn hex_formatting_is_ignored() {
        let blob = Blob::from_hex(CUBIC_BLOB).unwrap();
        let digits = CUBIC_BLOB.trim();
        for variant in [
            format!("0x{digits}"),
            format!("  \n{digits}\r\n\t"),
            digits.to_uppercase(),
            format!("0x{}\n", digits.to_uppercase()),
            format!("0X{digits}"),
        ] {
            assert_eq!(Blob::from_hex(&variant).unwrap(), blob);
        }

        // Parsing is idempotent.
        assert_eq!(Blob::from_hex(&blob.to_hex()).unwrap(), blob);
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn reject_wrong_hex_length() {
        for (data, actual) in [
            (String::new(), 0),
            ("0x".to_string(), 0),
            ("00".repeat(BYTES_PER_BLOB - 1), HEX_CHARS_PER_BLOB - 2),
            (format!("{}0", constant_blob_hex(1)), HEX_CHARS_PER_BLOB + 1),
        ] {
            let error = Blob::from_hex(&data).unwrap_err();
            assert_eq!(
                error.downcast_ref::<RecoveryError>(),
                Some(&RecoveryError::HexLength {
                    expected: HEX_CHARS_PER_BLOB,
                    actual
                })
            );
        }
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn reject_invalid_hex_character() {
        let mut data = constant_blob_hex(3);
        data.replace_range(70..71, "g");
        let error = Blob::from_hex(&data).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::InvalidHexCharacter {
                character: 'g',
                offset: 70,
                element: 1
            })
        );

        // Interior whitespace is not trimmed.
        let mut data = constant_blob_hex(3);
        data.replace_range(128..129, " ");
        let error = Blob::from_hex(&data).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::InvalidHexCharacter {
                character: ' ',
                offset: 128,
                element: 2
            })
        );

        // Multibyte characters are reported whole, at their character offset.
        let mut data = format!("0x{}", constant_blob_hex(3));
        data.replace_range(2 + 200..2 + 201, "é");
        let error = Blob::from_hex(&data).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::InvalidHexCharacter {
                character: 'é',
                offset: 200,
                element: 3
            })
        );

        // A second prefix is not stripped.
        let error = Blob::from_hex(&format!("0x0x{}", &constant_blob_hex(3)[2..])).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::InvalidHexCharacter {
                character: 'x',
                offset: 1,
                element: 0
            })
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn reject_non_canonical_element() {
        let mut data = constant_blob_hex(3);
        data.replace_range(5 * 64..6 * 64, &hex::encode(FE::MODULUS_BYTES));
        let error = Blob::from_hex(&data).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::NonCanonicalElement { index: 5 })
        );

        let mut data = constant_blob_hex(3);
        data.replace_range(HEX_CHARS_PER_BLOB - 64.., &"f".repeat(64));
        let error = Blob::from_hex(&data).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::NonCanonicalElement {
                index: BLOB_LEN - 1
            })
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn reject_wrong_byte_length() {
        for length in [0, 32, BYTES_PER_BLOB - 1, BYTES_PER_BLOB + 32] {
            let error = Blob::from_bytes(&vec![0; length]).unwrap_err();
            assert_eq!(
                error.downcast_ref::<RecoveryError>(),
                Some(&RecoveryError::BlobLength {
                    expected: BYTES_PER_BLOB,
                    actual: length
                })
            );
        }
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn reject_wrong_coefficient_count() {
        let error = Blob::from_coefficients(&[FE::ONE; 16]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<RecoveryError>(),
            Some(&RecoveryError::LengthMismatch {
                values: 16,
                points: BLOB_LEN
            })
        );
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn codec() {
        let blob = Blob::from_hex(CUBIC_BLOB).unwrap();
        let encoded = blob.get_encoded().unwrap();
        assert_eq!(encoded.len(), BYTES_PER_BLOB);
        assert_eq!(hex::encode(&encoded), blob.to_hex());
        assert_eq!(Blob::from_bytes(&encoded).unwrap(), blob);
        blob.roundtrip();

        // Decoding a truncated encoding fails.
        assert!(Blob::decode(&mut Cursor::new(&encoded[..BYTES_PER_BLOB - 1])).is_err());
    }

    #[test]
    fn from_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/test-vectors/blob/cubic_blob.txt");
        let blob = Blob::from_file(path).unwrap();
        assert_eq!(blob, Blob::from_hex(CUBIC_BLOB).unwrap());

        let missing = concat!(env!("CARGO_MANIFEST_DIR"), "/test-vectors/blob/missing.txt");
        let error = Blob::from_file(missing).unwrap_err();
        assert!(format!("{error:#}").contains("missing.txt"));
    }

    #[wasm_bindgen_test(unsupported = test)]
    fn debug_is_short() {
        let blob = Blob::from_hex(&constant_blob_hex(1)).unwrap();
        let debug = format!("{blob:?}");
        assert!(debug.starts_with("Blob {"));
        assert!(debug.contains("len: 4096"));
        assert!(debug.len() < 200);
    }
}
