use crate::blob::Blob;
use anyhow::Context;
use wasm_bindgen::{JsError, prelude::wasm_bindgen};

/// Recover the polynomial behind a blob.
///
/// @param {string} data - The blob, as 262144 hex digits with an optional `0x` prefix.
/// @returns {string} The 4096 coefficients, lowest degree first, as a JSON array of hex strings.
#[wasm_bindgen(skip_jsdoc)]
pub fn blob_recover(data: &str) -> Result<String, JsError> {
    recover_to_json(data).map_err(convert_error)
}

fn recover_to_json(data: &str) -> Result<String, anyhow::Error> {
    let coefficients = Blob::from_hex(data)?.recover()?;
    serde_json::to_string(&coefficients).context("failed to serialize coefficients")
}

fn convert_error(error: anyhow::Error) -> JsError {
    let message = format!("{error:#}");
    JsError::new(&message)
}
