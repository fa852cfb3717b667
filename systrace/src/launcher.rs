/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Starts a program under ptrace, stopped before its first instruction.

use systrace_process::Child;
use systrace_process::Command;
use systrace_ptrace::Event;
use systrace_ptrace::Options;
use systrace_ptrace::Running;
use systrace_ptrace::Signal;
use systrace_ptrace::Stopped;
use systrace_ptrace::Wait;

use crate::error::Error;

/// The ptrace options every tracee gets.
pub fn trace_options() -> Options {
    Options::PTRACE_O_TRACESYSGOOD | Options::PTRACE_O_TRACEEXEC | Options::PTRACE_O_EXITKILL
}

/// Forks a child that makes itself our tracee and stops with `SIGSTOP` right
/// before calling `execve`.
///
/// The stop comes after the command's own `pre_exec` callbacks, which are
/// left untouched, so the same command can be launched again.
///
/// The child is returned as [`Running`] since it may not have reached its
/// stop yet. The [`Child`] carries the pipe through which a failed `execve`
/// is reported.
pub fn spawn_traced(command: &mut Command) -> Result<(Running, Child), Error> {
    let child = unsafe { command.spawn_deferred_with(systrace_ptrace::traceme_and_stop) }?;
    tracing::info!(
        "spawned {:?} as pid {}",
        command.get_program(),
        child.id()
    );
    Ok((Running::new(child.id()), child))
}

/// Waits for the initial `SIGSTOP` of a freshly spawned tracee and sets the
/// trace options. Other signals that arrive first are delivered.
///
/// Returns [`Error::LaunchExited`] if the tracee terminates instead.
pub fn await_initial_stop(running: Running) -> Result<Stopped, Error> {
    let mut running = running;

    loop {
        match running.wait()? {
            Wait::Stopped(stopped, Event::Signal(Signal::SIGSTOP)) => {
                tracing::debug!("[{}] initial stop", stopped.pid());
                stopped.setoptions(trace_options())?;
                return Ok(stopped);
            }
            Wait::Stopped(stopped, Event::Signal(sig)) => {
                tracing::debug!("[{}] {} before the initial stop", stopped.pid(), sig);
                running = stopped.resume(sig)?;
            }
            Wait::Stopped(stopped, event) => {
                tracing::debug!("[{}] {:?} before the initial stop", stopped.pid(), event);
                running = stopped.resume(None)?;
            }
            Wait::Exited(pid, exit_status) => {
                tracing::debug!("[{}] {} before the initial stop", pid, exit_status);
                return Err(Error::LaunchExited(exit_status));
            }
        }
    }
}

/// Spawns `command` as a tracee and returns it in its initial stop.
///
/// A child that dies before stopping is reported as [`Error::Launch`] if it
/// managed to send back why, and as [`Error::LaunchExited`] otherwise.
pub fn launch(command: &mut Command) -> Result<(Stopped, Child), Error> {
    let (running, mut child) = spawn_traced(command)?;

    match await_initial_stop(running) {
        Ok(stopped) => Ok((stopped, child)),
        Err(Error::LaunchExited(exit_status)) => {
            child.exec_result()?;
            Err(Error::LaunchExited(exit_status))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use systrace_process::Context;
    use systrace_process::ExitStatus;
    use systrace_syscalls::Sysno;

    use super::*;
    use crate::snapshot;
    use crate::snapshot::Tracee;

    #[test]
    fn first_syscall_is_execve() {
        let (stopped, _child) = launch(&mut Command::new("true")).unwrap();
        let pid = stopped.pid();

        let entry = match stopped.syscall(None).unwrap().wait().unwrap() {
            Wait::Stopped(stopped, Event::Syscall) => stopped,
            other => panic!("unexpected {}", other),
        };
        let regs = snapshot::read(&Tracee::Stopped(&entry)).unwrap();
        assert_eq!(regs.syscall_number, Sysno::execve.id() as u64);

        let mut running = entry.resume(None).unwrap();
        let status = loop {
            running = match running.wait().unwrap() {
                Wait::Stopped(stopped, _) => stopped.resume(None).unwrap(),
                Wait::Exited(exited, status) => {
                    assert_eq!(exited, pid);
                    break status;
                }
            };
        };
        assert_eq!(status, ExitStatus::Exited(0));
    }

    #[test]
    fn missing_program_never_forks() {
        let err = launch(&mut Command::new("/iprobablydonotexist")).unwrap_err();
        match err {
            Error::Launch(err) => assert_eq!(err.context(), Context::FindProgram),
            other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn failing_pre_exec_is_a_launch_failure() {
        let mut command = Command::new("true");
        unsafe {
            command.pre_exec(|| Err(systrace_ptrace::Errno::EPERM));
        }
        // The command's hooks run before the one that stops the child, so
        // the child exits without ever becoming a tracee.
        match launch(&mut command).unwrap_err() {
            Error::Launch(err) => {
                assert_eq!(err.context(), Context::PreExec);
                assert_eq!(err.errno(), systrace_ptrace::Errno::EPERM);
            }
            other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn same_command_launches_twice() {
        let mut command = Command::new("true");
        for _ in 0..2 {
            let (stopped, mut child) = launch(&mut command).unwrap();
            let mut running = stopped.resume(None).unwrap();
            let status = loop {
                running = match running.wait().unwrap() {
                    Wait::Stopped(stopped, _) => stopped.resume(None).unwrap(),
                    Wait::Exited(_, status) => break status,
                };
            };
            assert_eq!(status, ExitStatus::Exited(0));
            assert_eq!(child.exec_result(), Ok(()));
        }
    }
}
