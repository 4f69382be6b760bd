//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(config) = redactle_config::AppConfig::parse(s)
    {
        // Anything that parses must also validate.
        assert!(config.validate().is_ok());
    }
});
