//! Recovery of the polynomial behind an EIP-4844 blob.
//!
//! A blob holds the values of a polynomial of degree less than 4096 at the 4096th roots of unity of
//! the BLS12-381 scalar field, in bit-reversed order. [`blob::Blob::recover`] runs an inverse FFT
//! over that domain to get the polynomial's coefficients back.
//!
//! The building blocks are public too: [`fields`] for the field arithmetic, [`domain`] for
//! evaluation domains, and [`ifft`] for the transforms over arbitrary power-of-two domains.
use std::io::Cursor;

pub mod blob;
pub mod domain;
pub mod error;
pub mod fields;
pub mod ifft;
#[cfg(target_arch = "wasm32")]
pub mod js_api;

/// Describes how to encode and decode an object from a byte sequence.
///
/// Adapted from [prio::codec](https://docs.rs/prio/0.17.0/prio/codec/index.html).
pub trait Codec: Sized + PartialEq + Eq + std::fmt::Debug {
    /// Decode an instance of this type from the front of a byte buffer, advancing the cursor past
    /// it.
    fn decode(bytes: &mut Cursor<&[u8]>) -> Result<Self, anyhow::Error>;

    /// Decode a fixed length array of items.
    fn decode_fixed_array(
        bytes: &mut Cursor<&[u8]>,
        count: usize,
    ) -> Result<Vec<Self>, anyhow::Error> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let item = Self::decode(bytes)?;
            items.push(item);
        }

        Ok(items)
    }

    /// Get the encoded form of this object, allocating a vector to hold it.
    fn get_encoded(&self) -> Result<Vec<u8>, anyhow::Error> {
        let mut encoded = Vec::new();
        self.encode(&mut encoded)?;
        Ok(encoded)
    }

    /// Append the encoded form of this object to the end of `bytes`, growing the vector as needed.
    fn encode(&self, bytes: &mut Vec<u8>) -> Result<(), anyhow::Error>;

    /// Encode a fixed length array of items.
    fn encode_fixed_array(items: &[Self], bytes: &mut Vec<u8>) -> Result<(), anyhow::Error> {
        for item in items {
            item.encode(bytes)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn roundtrip(&self) {
        let encoded = self.get_encoded().unwrap();

        let decoded = Self::decode(&mut Cursor::new(&encoded)).unwrap();

        assert_eq!(*self, decoded)
    }
}
