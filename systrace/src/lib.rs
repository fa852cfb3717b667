/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! A syscall tracer for a single process.
//!
//! The tracee is launched with [`launcher::launch`], which leaves it stopped
//! right before `execve`. A [`TraceSession`] then resumes it from one syscall
//! stop to the next, reading the registers at each stop and writing a line
//! per syscall:
//!
//! ```text
//! openat(0xffffff9c, 0x7f2c1a4b2e10, 0x80000, ...) = 0x3
//! exit_group(0x0) = ?
//! ```
//!
//! Arguments are never dereferenced. Every value is shown as the raw
//! register contents in hex.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg(target_os = "linux")]

mod config;
mod error;
mod filter;
pub mod launcher;
pub mod machine;
mod reporter;
mod session;
pub mod snapshot;
pub mod testing;

pub use systrace_process::Command;
pub use systrace_process::ExitStatus;
pub use systrace_syscalls::SyscallTable;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::filter::Filter;
pub use crate::filter::Selection;
pub use crate::reporter::OutputMode;
pub use crate::reporter::Reporter;
pub use crate::session::KillSwitch;
pub use crate::session::TraceSession;
pub use crate::session::TraceSummary;
