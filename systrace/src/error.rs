/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Error handling.

use systrace_process::ExitStatus;
use thiserror::Error;

use crate::machine::Phase;
use crate::snapshot::SnapshotError;

/// Anything that can end a trace session early.
#[derive(Error, Debug)]
pub enum Error {
    /// The target could not be started.
    #[error("failed to launch the target: {0}")]
    Launch(#[from] systrace_process::Error),

    /// The target terminated before reaching its initial stop.
    #[error("target {0} before tracing could begin")]
    LaunchExited(ExitStatus),

    /// A ptrace request or wait failed for a reason other than the tracee
    /// dying.
    #[error(transparent)]
    Protocol(#[from] systrace_ptrace::Error),

    /// The registers could not be read.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The state machine was fed an event its current phase does not accept.
    #[error("invalid transition: {event} while {phase}")]
    InvalidTransition {
        /// Phase the machine was in.
        phase: Phase,
        /// What happened.
        event: &'static str,
    },

    /// The trace output could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the errors that mean the target never started running the
    /// program it was asked to run.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::Launch(_) | Self::LaunchExited(_))
    }
}

impl From<systrace_ptrace::Errno> for Error {
    fn from(err: systrace_ptrace::Errno) -> Self {
        Self::Protocol(err.into())
    }
}

impl From<nix::errno::Errno> for Error {
    fn from(err: nix::errno::Errno) -> Self {
        Self::Protocol(err.into())
    }
}
