//! Fuzz testing for the field sanitizer and payload validation.
//!
//! Feeds arbitrary bytes as JSON payloads through sanitization and the
//! name validators, checking that they:
//!
//! - Never panic on any input
//! - Preserve the allow-list subset property on every output
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! # Install cargo-fuzz (requires nightly)
//! cargo +nightly install cargo-fuzz
//!
//! # Run the sanitizer fuzz target
//! cargo +nightly fuzz run fuzz_sanitize
//!
//! # Run with a time limit (e.g., 60 seconds)
//! cargo +nightly fuzz run fuzz_sanitize -- -max_total_time=60
//! ```

#![no_main]

use client_registry::SchemaPolicy;
use client_registry::validation::{optional_name, require_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Interpret the bytes as a JSON document; only objects are
    // interesting, everything else is rejected by the extractor long
    // before sanitization.
    let Ok(serde_json::Value::Object(raw)) = serde_json::from_slice(data) else {
        return;
    };

    let policy = SchemaPolicy::client();
    let clean = policy.sanitize(&raw);

    // Invariant: sanitized keys are a subset of the allow-list, values
    // pass through unchanged.
    for (key, value) in &clean {
        assert!(policy.is_allowed(key));
        assert_eq!(raw.get(key), Some(value));
    }

    // Validation must classify, never panic.
    let _ = require_name(&clean);
    let _ = optional_name(&clean);
});
