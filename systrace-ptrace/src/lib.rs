/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg(target_os = "linux")]

//! A safe, blocking ptrace API. A tracee is either [`Running`] or [`Stopped`],
//! and ptrace requests can only be made through a [`Stopped`] tracee.
mod regs;
mod waitid;

use core::mem::MaybeUninit;
use std::fmt;

use nix::sys::ptrace;
// Re-exports so that nothing else needs to depend on `nix`.
pub use nix::sys::ptrace::Options;
pub use nix::sys::signal::Signal;
use nix::sys::wait::WaitPidFlag;
use nix::sys::wait::WaitStatus;
pub use syscalls::Errno;
use syscalls::Sysno;
pub use systrace_process::ExitStatus;
pub use systrace_process::Pid;
use thiserror::Error;

pub use crate::regs::*;
use crate::waitid::waitid;
use crate::waitid::IdType;

/// An error that occurred during tracing.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// A low-level errno.
    #[error(transparent)]
    Errno(#[from] Errno),

    /// The tracee died while we thought it was stopped. The zombie should be
    /// reaped.
    #[error("tracee {0} is a zombie")]
    Died(Zombie),
}

impl From<nix::errno::Errno> for Error {
    fn from(err: nix::errno::Errno) -> Self {
        Self::Errno(Errno::new(err as i32))
    }
}

/// Why a tracee stopped. Documentation is from `ptrace(2)`.
#[derive(Debug, Eq, PartialEq)]
pub enum Event {
    /// Stop before return from `execve(2)`. Carries the former thread ID.
    Exec(Pid),

    /// Group-stop, or the initial stop of a seized tracee.
    Stop,

    /// Syscall-entry-stop or syscall-exit-stop. Only reported like this when
    /// `PTRACE_O_TRACESYSGOOD` is set.
    Syscall,

    /// The tracee was stopped by delivery of a signal.
    Signal(Signal),

    /// A `PTRACE_EVENT_*` stop for an option we never enable.
    Other(i32),
}

impl Event {
    fn from_ptrace_event(task: &Stopped, event: i32) -> Result<Self, Error> {
        Ok(match event {
            libc::PTRACE_EVENT_EXEC => Self::Exec(Pid::from_raw(task.getevent()? as i32)),
            libc::PTRACE_EVENT_STOP => Self::Stop,
            other => Self::Other(other),
        })
    }
}

/// The result of a blocking wait. A tracee in this state is never running.
///
/// Neither `Clone` nor `Copy` is implemented, so a stopped tracee can only be
/// resumed once.
#[derive(Debug, Eq, PartialEq)]
pub enum Wait {
    /// The process is stopped and accepts ptrace requests.
    Stopped(Stopped, Event),

    /// The process has exited with an exit status.
    Exited(Pid, ExitStatus),
}

impl Wait {
    /// Returns the PID for this state.
    pub fn pid(&self) -> Pid {
        match self {
            Self::Stopped(stopped, _) => stopped.pid(),
            Self::Exited(pid, _) => *pid,
        }
    }
}

impl TryFrom<WaitStatus> for Wait {
    type Error = Error;

    fn try_from(wait_status: WaitStatus) -> Result<Self, Error> {
        Ok(match wait_status {
            WaitStatus::Exited(pid, code) => Self::Exited(pid.into(), ExitStatus::Exited(code)),
            WaitStatus::Signaled(pid, sig, coredump) => {
                Self::Exited(pid.into(), ExitStatus::Signaled(sig, coredump))
            }
            WaitStatus::Stopped(pid, sig) => Self::Stopped(Stopped(pid.into()), Event::Signal(sig)),
            WaitStatus::PtraceEvent(pid, _sig, event) => {
                let task = Stopped(pid.into());
                let event = Event::from_ptrace_event(&task, event)?;
                Self::Stopped(task, event)
            }
            WaitStatus::PtraceSyscall(pid) => Self::Stopped(Stopped(pid.into()), Event::Syscall),
            // Neither can happen without WCONTINUED or WNOHANG.
            WaitStatus::Continued(_) | WaitStatus::StillAlive => {
                return Err(Error::Errno(Errno::EINVAL));
            }
        })
    }
}

impl fmt::Display for Wait {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stopped(stopped, event) => {
                write!(f, "pid {} stopped ({:?})", stopped.pid(), event)
            }
            Self::Exited(pid, exit_status) => write!(f, "pid {} {}", pid, exit_status),
        }
    }
}

fn wait(pid: Pid) -> Result<WaitStatus, Errno> {
    loop {
        match waitid(
            IdType::Pid(pid.into()),
            WaitPidFlag::WEXITED | WaitPidFlag::WSTOPPED,
        ) {
            Err(Errno::EINTR) => continue,
            result => return result,
        }
    }
}

/// A process that is in a stopped state and allows ptrace operations to be
/// performed.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct Stopped(Pid);

impl Stopped {
    /// `ptrace(2)` fails with ESRCH when the tracee is not stopped, is not
    /// traced by the caller, or has died. The type system rules out the first
    /// two, so ESRCH means the tracee died while stopped. See "Death under
    /// ptrace" in `ptrace(2)`.
    fn map_err(&self, err: Errno) -> Error {
        if err == Errno::ESRCH {
            Error::Died(Zombie::new(self.0))
        } else {
            Error::Errno(err)
        }
    }

    fn map_nix_err(&self, err: nix::Error) -> Error {
        self.map_err(Errno::new(err as i32))
    }

    /// Creates a new stopped state without checking that the process really
    /// is stopped. Prefer arriving here through [`Running::wait`].
    pub fn new_unchecked(pid: Pid) -> Self {
        Stopped(pid)
    }

    /// Returns the process ID of the tracee.
    pub fn pid(&self) -> Pid {
        self.0
    }

    /// Sets the ptracer options.
    pub fn setoptions(&self, options: Options) -> Result<(), Error> {
        ptrace::setoptions(self.0.into(), options).map_err(|err| self.map_nix_err(err))
    }

    /// Gets the current state of the general purpose registers.
    pub fn getregs(&self) -> Result<Regs, Error> {
        let mut regs = MaybeUninit::<Regs>::uninit();

        let mut iov = libc::iovec {
            iov_base: regs.as_mut_ptr() as *mut libc::c_void,
            iov_len: core::mem::size_of::<Regs>(),
        };

        unsafe {
            syscalls::syscall!(
                Sysno::ptrace,
                // PTRACE_GETREGS isn't available on aarch64.
                libc::PTRACE_GETREGSET,
                self.0.as_raw(),
                libc::NT_PRSTATUS,
                &mut iov as *mut _
            )
        }
        .map_err(|err| self.map_err(err))?;

        debug_assert_eq!(iov.iov_len, core::mem::size_of::<Regs>());

        Ok(unsafe { regs.assume_init() })
    }

    /// Retrieves the message of the ptrace event that just happened.
    pub fn getevent(&self) -> Result<i64, Error> {
        ptrace::getevent(self.0.into()).map_err(|err| self.map_nix_err(err))
    }

    /// Resumes the process and transitions it back to a running state.
    pub fn resume<T: Into<Option<Signal>>>(self, sig: T) -> Result<Running, Error> {
        ptrace::cont(self.0.into(), sig).map_err(|err| self.map_nix_err(err))?;
        Ok(Running::new(self.0))
    }

    /// Like [`Stopped::resume`], but arranges for the tracee to be stopped at
    /// the next entry to or exit from a system call.
    pub fn syscall<T: Into<Option<Signal>>>(self, sig: T) -> Result<Running, Error> {
        ptrace::syscall(self.0.into(), sig).map_err(|err| self.map_nix_err(err))?;
        Ok(Running::new(self.0))
    }
}

/// A running tracee.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct Running(Pid);

impl Running {
    /// Creates a new running process. This is the entry point for a freshly
    /// spawned tracee.
    pub fn new(pid: Pid) -> Self {
        Running(pid)
    }

    /// Returns the pid of the running process.
    pub fn pid(&self) -> Pid {
        self.0
    }

    /// Blocks until a state change occurs. This transitions the process to
    /// either a stopped state or exited state, but never a running state.
    pub fn wait(self) -> Result<Wait, Error> {
        Wait::try_from(wait(self.0)?)
    }
}

/// A process that is no longer running, but hasn't yet fully exited. The only
/// thing a zombie can do is exit.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct Zombie(Running);

impl Zombie {
    fn new(pid: Pid) -> Self {
        Zombie(Running(pid))
    }

    /// Treats `pid` as a tracee that died while stopped, for when ESRCH was
    /// observed outside of this crate.
    pub fn new_unchecked(pid: Pid) -> Self {
        Self::new(pid)
    }

    /// Returns the PID of the zombie.
    pub fn pid(&self) -> Pid {
        self.0.pid()
    }

    /// Waits for the zombie to fully exit. Stops that still show up on the way
    /// out (see "BUGS" in `ptrace(2)`) are resumed.
    pub fn reap(self) -> Result<ExitStatus, Error> {
        let mut running = self.0;

        loop {
            running = match running.wait() {
                Ok(Wait::Exited(_pid, exit_status)) => return Ok(exit_status),
                Ok(Wait::Stopped(stopped, _event)) => match stopped.resume(None) {
                    Ok(running) => running,
                    Err(Error::Died(zombie)) => zombie.0,
                    Err(err) => return Err(err),
                },
                Err(Error::Died(zombie)) => zombie.0,
                Err(err) => return Err(err),
            };
        }
    }
}

impl fmt::Display for Zombie {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pid())
    }
}

/// Makes the calling process a tracee of its parent and stops it with
/// `SIGSTOP`. Meant to run in a freshly forked child right before `execve`.
///
/// The signal is sent with a plain `kill(2)`, so once the tracer resumes us,
/// the next syscall we make is the first one it sees.
pub fn traceme_and_stop() -> Result<(), Errno> {
    ptrace::traceme()
        .and_then(|()| {
            nix::sys::signal::kill(nix::unistd::Pid::this(), Signal::SIGSTOP)
        })
        .map_err(|e| Errno::new(e as i32))
}
