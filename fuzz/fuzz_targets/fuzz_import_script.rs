//! Fuzz target: import script rendering with an arbitrary model URL.
//!
//! The URL must always be embedded as a single Python string literal.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rodin_bridge::{render_import_script, ScriptOptions};

fuzz_target!(|data: &[u8]| {
    let url = String::from_utf8_lossy(data).into_owned();
    let options = ScriptOptions { model_url: Some(url), ..ScriptOptions::default() };
    if let Ok(script) = render_import_script(&options) {
        let model_line = script.lines().find(|l| l.starts_with("MODEL_URL = "));
        assert!(model_line.is_some_and(|l| l.ends_with('"')), "URL literal broke the script");
    }
});
