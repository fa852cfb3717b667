/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! `waitid(2)` with the same result type as `nix`'s `waitpid`. Unlike
//! `waitpid`, the flags must say explicitly which state changes to wait for
//! (`WEXITED`, `WSTOPPED`, optionally `WNOHANG`).

use std::mem::MaybeUninit;

use nix::sys::signal::Signal;
use nix::sys::wait::WaitPidFlag;
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

use super::Errno;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdType {
    Pid(Pid),
}

fn si_status_signal(info: &libc::siginfo_t) -> Signal {
    let status = unsafe { info.si_status() };
    // PTRACE_SEIZE'd stops may carry a status of 0. Report SIGSTOP for those.
    Signal::try_from(status & 0xff).unwrap_or(Signal::SIGSTOP)
}

fn si_status_event(info: &libc::siginfo_t) -> i32 {
    (unsafe { info.si_status() }) >> 8
}

fn siginfo_to_waitstatus(si: &libc::siginfo_t) -> Result<WaitStatus, Errno> {
    let pid = Pid::from_raw(unsafe { si.si_pid() });
    let status = unsafe { si.si_status() };

    Ok(match si.si_code {
        libc::CLD_EXITED => WaitStatus::Exited(pid, status),
        libc::CLD_KILLED | libc::CLD_DUMPED => {
            let dumped = si.si_code == libc::CLD_DUMPED;
            match Signal::try_from(status) {
                Ok(sig) => WaitStatus::Signaled(pid, sig, dumped),
                // No `Signal` variant for real-time signals.
                Err(_) => WaitStatus::Exited(pid, 128 + status),
            }
        }
        libc::CLD_STOPPED => WaitStatus::Stopped(pid, si_status_signal(si)),
        libc::CLD_TRAPPED if status == 0x80 | Signal::SIGTRAP as i32 => {
            WaitStatus::PtraceSyscall(pid)
        }
        libc::CLD_TRAPPED => match si_status_event(si) {
            0 => WaitStatus::Stopped(pid, si_status_signal(si)),
            event => WaitStatus::PtraceEvent(pid, si_status_signal(si), event),
        },
        libc::CLD_CONTINUED => WaitStatus::Continued(pid),
        _ => return Err(Errno::EINVAL),
    })
}

/// Waits for a state change. Returns `WaitStatus::StillAlive` if `WNOHANG` was
/// given and nothing has changed yet.
pub fn waitid(id: IdType, flags: WaitPidFlag) -> Result<WaitStatus, Errno> {
    let mut siginfo = MaybeUninit::<libc::siginfo_t>::zeroed();

    let (id_type, id) = match id {
        IdType::Pid(pid) => (libc::P_PID, pid.as_raw() as libc::id_t),
    };

    Errno::result(unsafe { libc::waitid(id_type, id, siginfo.as_mut_ptr(), flags.bits()) })?;

    let siginfo = unsafe { siginfo.assume_init() };

    if unsafe { siginfo.si_pid() } == 0 {
        Ok(WaitStatus::StillAlive)
    } else {
        siginfo_to_waitstatus(&siginfo)
    }
}

#[cfg(test)]
mod tests {
    use nix::unistd::fork;
    use nix::unistd::ForkResult;

    use super::*;

    fn forked<F: FnOnce()>(f: F) -> Pid {
        match unsafe { fork() }.unwrap() {
            ForkResult::Parent { child } => child,
            ForkResult::Child => {
                f();
                unsafe { libc::_exit(0) }
            }
        }
    }

    #[test]
    fn exited_with_code() {
        let child = forked(|| unsafe {
            libc::syscall(libc::SYS_exit_group, 3);
        });
        assert_eq!(
            waitid(IdType::Pid(child), WaitPidFlag::WEXITED),
            Ok(WaitStatus::Exited(child, 3))
        );
    }

    #[test]
    fn killed_by_signal() {
        let child = forked(|| loop {
            std::thread::sleep(std::time::Duration::from_secs(1));
        });
        nix::sys::signal::kill(child, Signal::SIGKILL).unwrap();
        assert_eq!(
            waitid(IdType::Pid(child), WaitPidFlag::WEXITED),
            Ok(WaitStatus::Signaled(child, Signal::SIGKILL, false))
        );
    }

    #[test]
    fn still_alive_with_nohang() {
        let child = forked(|| std::thread::sleep(std::time::Duration::from_millis(200)));
        assert_eq!(
            waitid(
                IdType::Pid(child),
                WaitPidFlag::WEXITED | WaitPidFlag::WNOHANG
            ),
            Ok(WaitStatus::StillAlive)
        );
        assert_eq!(
            waitid(IdType::Pid(child), WaitPidFlag::WEXITED),
            Ok(WaitStatus::Exited(child, 0))
        );
    }

    #[test]
    fn stopped_child() {
        let child = forked(|| {
            let _ = nix::sys::signal::raise(Signal::SIGSTOP);
        });
        assert_eq!(
            waitid(IdType::Pid(child), WaitPidFlag::WSTOPPED),
            Ok(WaitStatus::Stopped(child, Signal::SIGSTOP))
        );
        nix::sys::signal::kill(child, Signal::SIGCONT).unwrap();
        assert_eq!(
            waitid(IdType::Pid(child), WaitPidFlag::WEXITED),
            Ok(WaitStatus::Exited(child, 0))
        );
    }
}
