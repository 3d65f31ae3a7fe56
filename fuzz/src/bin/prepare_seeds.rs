use std::{fs, path::Path};

fn main() {
    let base_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let blob_hex = fs::read_to_string(base_dir.join("../test-vectors/blob/cubic_blob.txt")).unwrap();

    // Use a valid blob as a seed for the hex parsing fuzzer, with and without a prefix.
    fs::create_dir_all(base_dir.join("corpus/blob_hex")).unwrap();
    fs::write(base_dir.join("corpus/blob_hex/seed_cubic"), &blob_hex).unwrap();
    fs::write(
        base_dir.join("corpus/blob_hex/seed_cubic_prefixed"),
        format!("0x{}", blob_hex.trim()),
    )
    .unwrap();

    // The same blob, decoded, seeds the byte parsing fuzzer.
    fs::create_dir_all(base_dir.join("corpus/blob_bytes")).unwrap();
    let blob_bytes = hex::decode(blob_hex.trim()).unwrap();
    fs::write(base_dir.join("corpus/blob_bytes/seed_cubic"), blob_bytes).unwrap();
}
