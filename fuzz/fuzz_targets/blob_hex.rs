#![no_main]

use blob_recovery::blob::Blob;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| fuzz(data));

fn fuzz(data: &[u8]) {
    let Ok(data) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(blob) = Blob::from_hex(data) {
        // Anything that parses is a valid blob, so recovery and re-encoding must succeed.
        let coefficients = blob.recover().unwrap();
        assert_eq!(Blob::from_coefficients(&coefficients).unwrap(), blob);
        assert_eq!(Blob::from_hex(&blob.to_hex()).unwrap(), blob);
    }
}
