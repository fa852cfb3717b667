/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use core::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A process ID (PID).
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize
)]
pub struct Pid(libc::pid_t);

impl Pid {
    /// Creates `Pid` from a raw `pid_t`.
    pub fn from_raw(pid: libc::pid_t) -> Self {
        Self(pid)
    }

    /// Returns the PID of the calling process.
    pub fn this() -> Self {
        nix::unistd::Pid::this().into()
    }

    /// Gets the raw `pid_t` from this `Pid`.
    pub fn as_raw(self) -> libc::pid_t {
        self.0
    }
}

impl From<nix::unistd::Pid> for Pid {
    fn from(pid: nix::unistd::Pid) -> Pid {
        Self(pid.as_raw())
    }
}

impl From<Pid> for nix::unistd::Pid {
    fn from(pid: Pid) -> nix::unistd::Pid {
        nix::unistd::Pid::from_raw(pid.as_raw())
    }
}

impl From<Pid> for libc::pid_t {
    fn from(pid: Pid) -> libc::pid_t {
        pid.as_raw()
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
