//! Fuzz target: multipart text fields into `GenerationForm`.
//!
//! Splits the input into `name=value` lines and feeds them to
//! `GenerationForm::from_fields`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rodin_core::GenerationForm;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let fields = text.lines().filter_map(|line| line.split_once('='));
    if let Ok(form) = GenerationForm::from_fields(fields, usize::from(data.first().copied().unwrap_or(0) % 3)) {
        let _ = form.validate();
    }
});
