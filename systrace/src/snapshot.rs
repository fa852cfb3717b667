/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Captures the syscall registers of a stopped tracee.

use systrace_ptrace::Errno;
use systrace_ptrace::Pid;
use systrace_ptrace::RegAccess;
use systrace_ptrace::Regs;
use systrace_ptrace::Running;
use systrace_ptrace::Stopped;
use systrace_syscalls::RegisterSnapshot;
use thiserror::Error;

/// The state of a tracee at the time a snapshot is requested.
#[derive(Debug)]
pub enum Tracee<'a> {
    /// In a ptrace stop. Registers can be read.
    Stopped(&'a Stopped),
    /// Executing. Its registers are not stable.
    Running(&'a Running),
    /// Already waited on.
    Exited(Pid),
}

impl Tracee<'_> {
    /// The tracee's process ID.
    pub fn pid(&self) -> Pid {
        match self {
            Self::Stopped(stopped) => stopped.pid(),
            Self::Running(running) => running.pid(),
            Self::Exited(pid) => *pid,
        }
    }
}

/// Why registers could not be captured.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SnapshotError {
    /// Registers can only be read while the tracee is stopped.
    #[error("process {0} is not stopped")]
    NotStopped(Pid),

    /// The tracee has exited, or died while we thought it was stopped.
    #[error("process {0} is gone")]
    ProcessGone(Pid),

    /// `PTRACE_GETREGSET` failed for any other reason.
    #[error("failed to read registers: {0}")]
    Ptrace(Errno),
}

/// Reads the registers that take part in the current syscall.
pub fn read(tracee: &Tracee) -> Result<RegisterSnapshot, SnapshotError> {
    let stopped = match tracee {
        Tracee::Stopped(stopped) => stopped,
        Tracee::Running(running) => return Err(SnapshotError::NotStopped(running.pid())),
        Tracee::Exited(pid) => return Err(SnapshotError::ProcessGone(*pid)),
    };

    let regs = stopped.getregs().map_err(|err| match err {
        systrace_ptrace::Error::Died(zombie) => SnapshotError::ProcessGone(zombie.pid()),
        systrace_ptrace::Error::Errno(errno) => SnapshotError::Ptrace(errno),
    })?;

    let snapshot = from_regs(&regs);
    tracing::trace!("[{}] {:?}", stopped.pid(), snapshot);
    Ok(snapshot)
}

/// Picks the syscall registers out of the full register set.
pub fn from_regs(regs: &Regs) -> RegisterSnapshot {
    RegisterSnapshot {
        syscall_number: regs.orig_syscall(),
        args: regs.args(),
        return_value: regs.ret(),
    }
}

#[cfg(test)]
mod tests {
    use systrace_ptrace::Event;
    use systrace_ptrace::Wait;

    use super::*;
    use crate::testing::spawn_fn;

    #[test]
    fn running_and_exited_are_rejected() {
        let pid = Pid::from_raw(1234);
        let running = Running::new(pid);
        assert_eq!(
            read(&Tracee::Running(&running)),
            Err(SnapshotError::NotStopped(pid))
        );
        assert_eq!(
            read(&Tracee::Exited(pid)),
            Err(SnapshotError::ProcessGone(pid))
        );
    }

    #[test]
    fn reads_syscall_registers() {
        let stopped = spawn_fn(|| {
            unsafe { libc::syscall(libc::SYS_getpid) };
            0
        })
        .unwrap();
        let pid = stopped.pid();

        let entry = match stopped.syscall(None).unwrap().wait().unwrap() {
            Wait::Stopped(stopped, Event::Syscall) => stopped,
            other => panic!("unexpected {}", other),
        };
        let snapshot = read(&Tracee::Stopped(&entry)).unwrap();
        assert_eq!(snapshot.syscall_number, libc::SYS_getpid as u64);

        let exit = match entry.syscall(None).unwrap().wait().unwrap() {
            Wait::Stopped(stopped, Event::Syscall) => stopped,
            other => panic!("unexpected {}", other),
        };
        let snapshot = read(&Tracee::Stopped(&exit)).unwrap();
        assert_eq!(snapshot.syscall_number, libc::SYS_getpid as u64);
        assert_eq!(snapshot.return_value, pid.as_raw() as u64);

        nix::sys::signal::kill(pid.into(), nix::sys::signal::Signal::SIGKILL).unwrap();
        assert_eq!(
            read(&Tracee::Stopped(&exit)),
            Err(SnapshotError::ProcessGone(pid))
        );

        systrace_ptrace::Zombie::new_unchecked(pid).reap().unwrap();
    }

    #[test]
    fn from_regs_picks_syscall_registers() {
        let mut regs: Regs = unsafe { core::mem::zeroed() };
        #[cfg(target_arch = "x86_64")]
        {
            regs.orig_rax = 257;
            regs.rax = 3;
            regs.rdi = 1;
            regs.rsi = 2;
            regs.rdx = 3;
            regs.r10 = 4;
            regs.r8 = 5;
            regs.r9 = 6;

            assert_eq!(
                from_regs(&regs),
                RegisterSnapshot {
                    syscall_number: 257,
                    args: [1, 2, 3, 4, 5, 6],
                    return_value: 3,
                }
            );
        }
        #[cfg(not(target_arch = "x86_64"))]
        let _ = from_regs(&regs);
    }
}
