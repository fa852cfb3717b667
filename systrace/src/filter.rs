/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use systrace_syscalls::Sysno;

/// One `--trace` expression.
#[derive(Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct Filter {
    /// Inverses the match.
    pub inverse: bool,

    /// The set of syscalls to match.
    pub syscalls: Vec<Sysno>,
}

impl std::str::FromStr for Filter {
    type Err = String;

    // Must parse this: [!]value1[,value2]...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (inverse, s) = match s.strip_prefix('!') {
            Some(s) => (true, s),
            None => (false, s),
        };

        let mut syscalls = Vec::new();

        for value in s.split(',') {
            if value.strip_prefix('%').is_some() {
                return Err("filtering sets of syscall is not yet supported".into());
            }

            let syscall: Sysno = value
                .parse()
                .map_err(|()| format!("invalid syscall name '{}'", value))?;

            syscalls.push(syscall);
        }

        Ok(Self { inverse, syscalls })
    }
}

/// The syscalls selected by a list of [`Filter`]s.
///
/// When every filter is an exclusion, everything not excluded is selected.
/// Otherwise only what is included is selected. Later filters override
/// earlier ones.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Selection {
    default: bool,
    overrides: HashMap<u64, bool>,
}

impl Selection {
    /// Builds the selection for `filters`.
    pub fn new(filters: &[Filter]) -> Self {
        let exclude_only = filters.iter().all(|f| f.inverse);

        let mut overrides = HashMap::new();
        for filter in filters {
            for syscall in &filter.syscalls {
                overrides.insert(syscall.id() as u64, !filter.inverse);
            }
        }

        Self {
            default: exclude_only,
            overrides,
        }
    }

    /// Selects every syscall.
    pub fn all() -> Self {
        Self::new(&[])
    }

    /// True if the syscall with this number should be reported. Numbers
    /// without a name follow the default.
    pub fn contains(&self, number: u64) -> bool {
        self.overrides.get(&number).copied().unwrap_or(self.default)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}
