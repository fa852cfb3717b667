/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Drives one tracee from its initial stop until it terminates.

use std::io::Write;

use serde::Serialize;
use systrace_process::Child;
use systrace_process::Command;
use systrace_process::ExitStatus;
use systrace_process::EXEC_FAILED;
use systrace_ptrace::Errno;
use systrace_ptrace::Event;
use systrace_ptrace::Pid;
use systrace_ptrace::Signal;
use systrace_ptrace::Stopped;
use systrace_ptrace::Wait;
use systrace_ptrace::Zombie;
use systrace_syscalls::SyscallTable;

use crate::config::Config;
use crate::error::Error;
use crate::filter::Selection;
use crate::launcher;
use crate::machine::Machine;
use crate::machine::Record;
use crate::reporter::Reporter;
use crate::snapshot;
use crate::snapshot::SnapshotError;
use crate::snapshot::Tracee;

/// How a finished session went.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct TraceSummary {
    /// How the tracee terminated.
    pub exit_status: ExitStatus,
    /// Number of syscall entries seen, reported or not.
    pub syscalls: u64,
}

/// Kills the tracee of a session from any thread.
#[derive(Debug, Copy, Clone)]
pub struct KillSwitch(Pid);

impl KillSwitch {
    /// Sends `SIGKILL` to the tracee. The session observes the termination on
    /// its next wait. Killing a tracee that is already gone is not an error.
    pub fn kill(&self) -> Result<(), Errno> {
        tracing::info!("killing tracee {}", self.0);
        match nix::sys::signal::kill(self.0.into(), Signal::SIGKILL) {
            Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(err) => Err(Errno::new(err as i32)),
        }
    }
}

/// Traces a single process.
///
/// All ptrace requests are made from the thread that calls
/// [`TraceSession::run`], which must be the thread that spawned the tracee.
#[derive(Debug)]
pub struct TraceSession<'t, W> {
    tracee: Stopped,
    child: Option<Child>,
    machine: Machine<'t>,
    reporter: Reporter<W>,
}

impl<'t, W: Write> TraceSession<'t, W> {
    /// Wraps a tracee sitting in its initial stop, with its trace options
    /// already set.
    pub fn new(tracee: Stopped, table: &'t SyscallTable, config: &Config, sink: W) -> Self {
        Self {
            tracee,
            child: None,
            machine: Machine::new(table),
            reporter: Reporter::new(sink, config.mode, Selection::new(&config.filters)),
        }
    }

    /// Launches `command` as a new tracee. Nothing is written to `sink` if
    /// this fails.
    pub fn spawn(
        command: &mut Command,
        table: &'t SyscallTable,
        config: &Config,
        sink: W,
    ) -> Result<Self, Error> {
        let (tracee, child) = launcher::launch(command)?;
        let mut session = Self::new(tracee, table, config, sink);
        session.child = Some(child);
        Ok(session)
    }

    /// The tracee's process ID.
    pub fn pid(&self) -> Pid {
        self.tracee.pid()
    }

    /// Returns a handle that can kill the tracee while [`TraceSession::run`]
    /// is blocked.
    pub fn kill_switch(&self) -> KillSwitch {
        KillSwitch(self.pid())
    }

    /// Runs the tracee to completion, reporting each syscall.
    ///
    /// If the tracee was spawned from a [`Command`] and never got to run the
    /// program, the error it sent back is returned instead of a summary.
    pub fn run(self) -> Result<TraceSummary, Error> {
        let Self {
            tracee,
            child,
            mut machine,
            mut reporter,
        } = self;

        let pid = tracee.pid();
        tracing::info!("tracing pid {}", pid);

        let mut stopped = tracee;
        let mut pending_signal: Option<Signal> = None;
        let mut syscalls = 0;

        let exit_status = loop {
            let running = match stopped.syscall(pending_signal.take()) {
                Ok(running) => running,
                Err(systrace_ptrace::Error::Died(zombie)) => break reap(zombie)?,
                Err(err) => return Err(err.into()),
            };

            match running.wait() {
                Ok(Wait::Exited(_, exit_status)) => break exit_status,
                Ok(Wait::Stopped(next, Event::Syscall)) => {
                    let snapshot = match snapshot::read(&Tracee::Stopped(&next)) {
                        Ok(snapshot) => snapshot,
                        Err(SnapshotError::ProcessGone(pid)) => {
                            break reap(Zombie::new_unchecked(pid))?;
                        }
                        Err(err) => return Err(err.into()),
                    };

                    let record = machine.on_syscall_stop(&snapshot)?;
                    if let Record::Entry { .. } = record {
                        syscalls += 1;
                    }
                    reporter.report(&record)?;
                    stopped = next;
                }
                Ok(Wait::Stopped(next, Event::Signal(sig))) => {
                    // Group-stops are not told apart from signal-delivery
                    // stops, so a stop signal is re-injected and the tracee
                    // keeps running instead of staying stopped.
                    tracing::debug!("[{}] received {}", pid, sig);
                    pending_signal = Some(sig);
                    stopped = next;
                }
                Ok(Wait::Stopped(next, event)) => {
                    tracing::debug!("[{}] {:?}", pid, event);
                    stopped = next;
                }
                Err(systrace_ptrace::Error::Died(zombie)) => break reap(zombie)?,
                Err(err) => return Err(err.into()),
            }
        };

        if let Some(record) = machine.on_exit(exit_status)? {
            reporter.report(&record)?;
        }

        if exit_status == ExitStatus::Exited(EXEC_FAILED) {
            if let Some(mut child) = child {
                child.exec_result()?;
            }
        }

        tracing::info!("pid {} {} after {} syscalls", pid, exit_status, syscalls);
        Ok(TraceSummary {
            exit_status,
            syscalls,
        })
    }
}

/// Reaps a tracee after a ptrace request failed with `ESRCH`. The same errno
/// is returned for a process that is not traced by this thread, which is a
/// protocol error rather than a death.
fn reap(zombie: Zombie) -> Result<ExitStatus, Error> {
    let pid = zombie.pid();
    if !traced_by_this_thread(pid) {
        tracing::warn!("[{}] ESRCH from a process we do not trace", pid);
        return Err(Errno::ESRCH.into());
    }

    tracing::debug!("[{}] died while stopped, reaping", pid);
    Ok(zombie.reap()?)
}

/// Zombies keep their tracer until they are reaped, so this also holds for a
/// tracee that has just died.
fn traced_by_this_thread(pid: Pid) -> bool {
    procfs::process::Process::new(pid.as_raw())
        .and_then(|process| process.status())
        .is_ok_and(|status| status.tracerpid == nix::unistd::gettid().as_raw())
}
