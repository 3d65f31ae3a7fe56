#![no_main]

use blob_recovery::{Codec, blob::Blob};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| fuzz(data));

fn fuzz(data: &[u8]) {
    let from_bytes = Blob::from_bytes(data);
    let mut cursor = Cursor::new(data);
    let decoded = Blob::decode(&mut cursor);
    if let Ok(blob) = from_bytes {
        assert_eq!(decoded.unwrap(), blob);
        assert_eq!(blob.get_encoded().unwrap(), data);
    }
}
