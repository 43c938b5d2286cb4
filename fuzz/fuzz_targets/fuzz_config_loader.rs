#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use trainconf::config::{ConfigLoader, LoaderOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // No filesystem lookups for checkpoint directories
        let loader = ConfigLoader::new(LoaderOptions {
            verify_checkpoint_dir: false,
            ..LoaderOptions::default()
        });

        // Any outcome is fine as long as it does not panic
        if let Ok(result) = loader.load_str(yaml, Path::new("fuzz.yml")) {
            let _ = serde_yaml::to_string(result.config.as_ref());
        }
    }
});
