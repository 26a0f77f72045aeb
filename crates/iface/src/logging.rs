// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging initialization.

use crate::config::LoggingConfig;

/// Install an `env_logger` backend.
///
/// `RUST_LOG` takes precedence; otherwise `config.level` is the default
/// filter. Returns `false` if a logger was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let env = env_logger::Env::default().default_filter_or(config.level.to_ascii_lowercase());
    match env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
    {
        Ok(()) => true,
        Err(_) => {
            log::debug!("logger already initialized");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
