//! Fuzz target: JSON deserialization of `GenerationForm`.
//!
//! Arbitrary bytes fed through the schema parser and validator must never
//! panic; parse and validation errors are expected.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rodin_core::GenerationForm;

fuzz_target!(|data: &[u8]| {
    if let Ok(form) = serde_json::from_slice::<GenerationForm>(data) {
        let _ = form.validate();
    }
});
