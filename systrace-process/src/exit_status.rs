/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use core::fmt;

use nix::sys::signal;
use nix::sys::signal::SigHandler;
use nix::sys::signal::SigSet;
use nix::sys::signal::SigmaskHow;
use nix::sys::signal::Signal;

/// How a process ended.
///
/// Easier to match against than `std::process::ExitStatus` and able to hand the
/// same status on to our own parent with [`ExitStatus::raise_or_exit`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum ExitStatus {
    /// Program exited with an exit code.
    Exited(i32),
    /// Program killed by signal, with or without a coredump.
    Signaled(Signal, bool),
}

impl ExitStatus {
    /// A successful exit status.
    pub const SUCCESS: Self = ExitStatus::Exited(0);

    /// Decodes a raw `waitpid` status.
    pub fn from_raw(status: i32) -> Self {
        if libc::WIFEXITED(status) {
            return ExitStatus::Exited(libc::WEXITSTATUS(status));
        }

        let signo = libc::WTERMSIG(status);
        match Signal::try_from(signo) {
            Ok(sig) => ExitStatus::Signaled(sig, libc::WCOREDUMP(status)),
            // Real-time signals have no `Signal` variant. Fall back to the
            // shell convention.
            Err(_) => ExitStatus::Exited(128 + signo),
        }
    }

    /// Encodes the exit status as a raw `waitpid` status.
    pub fn into_raw(self) -> i32 {
        match self {
            ExitStatus::Exited(code) => (code & 0xff) << 8,
            ExitStatus::Signaled(sig, true) => (sig as i32 | 0x80) & 0xff,
            ExitStatus::Signaled(sig, false) => sig as i32 & 0x7f,
        }
    }

    /// The terminating signal, if any.
    pub fn signal(&self) -> Option<Signal> {
        match self {
            ExitStatus::Exited(_) => None,
            ExitStatus::Signaled(sig, _) => Some(*sig),
        }
    }

    /// True only for a zero exit code.
    pub fn success(&self) -> bool {
        *self == Self::SUCCESS
    }

    /// The exit code, or `None` if the process was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Exited(code) => Some(*code),
            ExitStatus::Signaled(..) => None,
        }
    }

    /// Makes the current process end the same way the child did.
    pub fn raise_or_exit(self) -> ! {
        match self {
            ExitStatus::Signaled(sig, core_dump) => {
                if core_dump {
                    // Don't dump a second core for the same crash.
                    let limit = libc::rlimit {
                        rlim_cur: 0,
                        rlim_max: 0,
                    };
                    unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) };
                }

                let _ = unsafe { signal::signal(sig, SigHandler::SigDfl) };
                let _ = signal::raise(sig);

                let mut mask = SigSet::empty();
                mask.add(sig);
                let _ = signal::sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&mask), None);

                // The signal was not fatal.
                std::process::exit(sig as i32 + 128);
            }
            ExitStatus::Exited(code) => std::process::exit(code),
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exited with code {}", code),
            ExitStatus::Signaled(sig, true) => write!(f, "killed by {} (core dumped)", sig),
            ExitStatus::Signaled(sig, false) => write!(f, "killed by {}", sig),
        }
    }
}

impl serde::Serialize for ExitStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_i32(self.into_raw())
    }
}

impl<'de> serde::Deserialize<'de> for ExitStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(ExitStatus::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use nix::sys::wait::waitpid;
    use nix::sys::wait::WaitStatus;
    use nix::unistd::fork;
    use nix::unistd::ForkResult;

    use super::*;

    fn run_forked<F: FnOnce()>(f: F) -> ExitStatus {
        match unsafe { fork() }.unwrap() {
            ForkResult::Parent { child } => match waitpid(child, None).unwrap() {
                WaitStatus::Exited(_, code) => ExitStatus::Exited(code),
                WaitStatus::Signaled(_, sig, core) => ExitStatus::Signaled(sig, core),
                other => panic!("unexpected wait status: {:?}", other),
            },
            ForkResult::Child => {
                let limit = libc::rlimit {
                    rlim_cur: 0,
                    rlim_max: 0,
                };
                unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) };
                f();
                unsafe { libc::_exit(0) }
            }
        }
    }

    #[test]
    fn raw_round_trip() {
        assert_eq!(ExitStatus::Exited(1).into_raw(), 0x100);
        assert_eq!(ExitStatus::from_raw(0x100), ExitStatus::Exited(1));
        assert_eq!(
            ExitStatus::from_raw(0x84),
            ExitStatus::Signaled(Signal::SIGILL, true)
        );
        assert_eq!(
            ExitStatus::Signaled(Signal::SIGINT, false).into_raw(),
            Signal::SIGINT as i32
        );
    }

    #[test]
    fn accessors() {
        assert!(ExitStatus::SUCCESS.success());
        assert!(!ExitStatus::Exited(3).success());
        assert_eq!(ExitStatus::Exited(3).code(), Some(3));
        assert_eq!(ExitStatus::Signaled(Signal::SIGKILL, false).code(), None);
        assert_eq!(
            ExitStatus::Signaled(Signal::SIGKILL, false).signal(),
            Some(Signal::SIGKILL)
        );
        assert_eq!(ExitStatus::Exited(3).to_string(), "exited with code 3");
        assert_eq!(
            ExitStatus::Signaled(Signal::SIGKILL, false).to_string(),
            "killed by SIGKILL"
        );
    }

    #[test]
    fn propagate_exit() {
        assert_eq!(
            run_forked(|| ExitStatus::Exited(42).raise_or_exit()),
            ExitStatus::Exited(42)
        );
    }

    #[test]
    fn propagate_signal() {
        assert_eq!(
            run_forked(|| ExitStatus::Signaled(Signal::SIGALRM, false).raise_or_exit()),
            ExitStatus::Signaled(Signal::SIGALRM, false)
        );
    }
}
