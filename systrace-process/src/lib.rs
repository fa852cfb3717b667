/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Launches a program as a child process whose `execve` can be deferred until
//! a tracer has taken control of it.
//!
//! Unlike `std::process::Command`, [`Command::spawn_deferred`] does not block
//! until the child has successfully called `execve`. This matters when one of
//! the [`Command::pre_exec`] callbacks stops the child (e.g., to wait for a
//! ptracer), since a blocking spawn would then deadlock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg(target_os = "linux")]

mod builder;
mod child;
mod env;
mod error;
mod exit_status;
mod fd;
mod pid;
mod spawn;
mod util;

use std::ffi::CString;

pub use child::Child;
pub use error::Context;
pub use error::Error;
pub use exit_status::ExitStatus;
// Re-export Signal since it is part of `ExitStatus`.
pub use nix::sys::signal::Signal;
pub use pid::Pid;
pub use spawn::EXEC_FAILED;
use syscalls::Errno;

/// A builder for spawning a process.
// See builder.rs for documentation of each field.
pub struct Command {
    program: CString,
    args: util::CStringArray,
    env: env::Env,
    pre_exec: Vec<Box<dyn FnMut() -> Result<(), Errno> + Send + Sync>>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("program", &self.program)
            .field("args", &self.args.iter().collect::<Vec<_>>())
            .field("env", &self.env)
            .field("pre_exec", &self.pre_exec.len())
            .finish()
    }
}

impl Command {
    /// Converts [`std::process::Command`] into [`Command`]. This is a *lossy*
    /// conversion that only preserves the program path, the arguments and the
    /// environment variables.
    pub fn from_std_lossy(cmd: &std::process::Command) -> Command {
        let mut result = Command::new(cmd.get_program());
        result.args(cmd.get_args());

        for (key, value) in cmd.get_envs() {
            match value {
                Some(value) => result.env(key, value),
                None => result.env_remove(key),
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_true() {
        let mut child = Command::new("true").spawn_deferred().unwrap();
        assert_eq!(child.wait_blocking().unwrap(), ExitStatus::Exited(0));
        assert_eq!(child.exec_result(), Ok(()));
    }

    #[test]
    fn spawn_false() {
        let mut child = Command::new("false").spawn_deferred().unwrap();
        assert_eq!(child.wait_blocking().unwrap(), ExitStatus::Exited(1));
        assert_eq!(child.exec_result(), Ok(()));
    }

    #[test]
    fn spawn_missing_program() {
        assert_eq!(
            Command::new("/iprobablydonotexist")
                .spawn_deferred()
                .unwrap_err(),
            Error::new(Errno::ENOENT, Context::FindProgram)
        );
    }

    #[test]
    fn exec_failure_is_reported() {
        // Bypass the program lookup so that `execve` itself fails in the child.
        let mut command = Command::new("/iprobablydonotexist");
        let mut child = command.spawn_unchecked().unwrap();
        assert_eq!(
            child.wait_blocking().unwrap(),
            ExitStatus::Exited(EXEC_FAILED)
        );
        assert_eq!(
            child.exec_result(),
            Err(Error::new(Errno::ENOENT, Context::Exec))
        );
    }

    #[test]
    fn pre_exec_failure_is_reported() {
        let mut command = Command::new("true");
        unsafe {
            command.pre_exec(|| Err(Errno::EPERM));
        }
        let mut child = command.spawn_deferred().unwrap();
        assert_eq!(
            child.wait_blocking().unwrap(),
            ExitStatus::Exited(EXEC_FAILED)
        );
        assert_eq!(
            child.exec_result(),
            Err(Error::new(Errno::EPERM, Context::PreExec))
        );
    }

    #[test]
    fn extra_callback_is_not_kept() {
        let mut command = Command::new("true");
        let mut child = unsafe { command.spawn_deferred_with(|| Err(Errno::EACCES)) }.unwrap();
        assert_eq!(
            child.wait_blocking().unwrap(),
            ExitStatus::Exited(EXEC_FAILED)
        );
        assert_eq!(
            child.exec_result(),
            Err(Error::new(Errno::EACCES, Context::PreExec))
        );

        let mut child = command.spawn_deferred().unwrap();
        assert_eq!(child.wait_blocking().unwrap(), ExitStatus::Exited(0));
        assert_eq!(child.exec_result(), Ok(()));
    }

    #[test]
    fn extra_callback_runs_last() {
        let mut command = Command::new("true");
        unsafe {
            command.pre_exec(|| Err(Errno::EPERM));
        }
        let mut child = unsafe { command.spawn_deferred_with(|| Err(Errno::EACCES)) }.unwrap();
        assert_eq!(
            child.wait_blocking().unwrap(),
            ExitStatus::Exited(EXEC_FAILED)
        );
        assert_eq!(
            child.exec_result(),
            Err(Error::new(Errno::EPERM, Context::PreExec))
        );
    }

    #[test]
    fn from_std_lossy() {
        let mut stdcmd = std::process::Command::new("echo");
        stdcmd.args(["arg1", "arg2"]);
        stdcmd.env("FOO", "1");
        stdcmd.env("BAR", "2");

        let cmd = Command::from_std_lossy(&stdcmd);

        assert_eq!(cmd.get_program(), "echo");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), ["arg1", "arg2"]);

        let envs = cmd
            .get_envs()
            .filter_map(|(k, v)| Some((k.to_str()?, v.and_then(|v| v.to_str()))))
            .collect::<Vec<_>>();
        assert_eq!(envs, [("BAR", Some("2")), ("FOO", Some("1"))]);
    }
}
