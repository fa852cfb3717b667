/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use serde::Deserialize;
use serde::Serialize;

use crate::filter::Filter;
use crate::reporter::OutputMode;

/// Settings for a trace session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Config {
    /// What each trace line shows.
    #[serde(default)]
    pub mode: OutputMode,

    /// Which syscalls are reported. Empty reports everything.
    #[serde(default)]
    pub filters: Vec<Filter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let config = Config {
            mode: OutputMode::Return,
            filters: vec!["!mmap".parse().unwrap()],
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            serde_json::from_str::<Config>(&json).unwrap(),
            config
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mode, OutputMode::Full);
        assert!(config.filters.is_empty());

        let config: Config = serde_json::from_str(r#"{"mode":"number"}"#).unwrap();
        assert_eq!(config.mode, OutputMode::Number);
    }
}
