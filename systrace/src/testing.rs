/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Utilities for tracing a closure instead of a program, for tests.

use nix::unistd::fork;
use nix::unistd::ForkResult;
use systrace_ptrace::Running;
use systrace_ptrace::Stopped;
use systrace_syscalls::SyscallTable;

use crate::config::Config;
use crate::error::Error;
use crate::launcher::await_initial_stop;
use crate::session::TraceSession;
use crate::session::TraceSummary;

/// Runs `f` as a tracee in a forked child. Returns once the child is in its
/// initial stop with the trace options set. The child exits with whatever `f`
/// returns.
///
/// `f` runs in a forked copy of a possibly multi-threaded process, so it
/// should stick to raw syscalls.
pub fn spawn_fn<F>(f: F) -> Result<Stopped, Error>
where
    F: FnOnce() -> i32,
{
    match unsafe { fork() }? {
        ForkResult::Parent { child } => await_initial_stop(Running::new(child.into())),
        ForkResult::Child => {
            if systrace_ptrace::traceme_and_stop().is_err() {
                unsafe { libc::_exit(100) };
            }
            let code = f();
            unsafe { libc::_exit(code) }
        }
    }
}

/// Traces `f` to completion and returns the trace it produced.
pub fn trace_fn<F>(f: F, config: &Config) -> Result<(String, TraceSummary), Error>
where
    F: FnOnce() -> i32,
{
    let table = SyscallTable::x86_64();
    let stopped = spawn_fn(f)?;

    let mut out = Vec::new();
    let summary = TraceSession::new(stopped, &table, config, &mut out).run()?;

    Ok((String::from_utf8_lossy(&out).into_owned(), summary))
}
