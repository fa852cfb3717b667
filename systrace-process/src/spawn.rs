/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use core::convert::Infallible;
use std::ffi::CStr;

use nix::unistd::fork;
use nix::unistd::ForkResult;
use syscalls::Errno;

use super::error::AddContext;
use super::error::Context;
use super::error::Error;
use super::fd::pipe;
use super::fd::Fd;
use super::util::reset_signal_handling;
use super::util::to_cstring;
use super::util::CStringArray;
use super::Child;
use super::Command;

/// Exit code of a child that failed before or during `execve`.
pub const EXEC_FAILED: i32 = 127;

impl Command {
    /// Forks a child that runs the `pre_exec` callbacks and then calls
    /// `execve`. Returns as soon as the child exists, without waiting for
    /// `execve` to happen.
    ///
    /// The program is looked up first, so a missing or non-executable program
    /// fails here with [`Context::FindProgram`] and no child is created. Any
    /// later failure in the child is available from [`Child::exec_result`].
    pub fn spawn_deferred(&mut self) -> Result<Child, Error> {
        let program = self.find_program().context(Context::FindProgram)?;
        self.spawn_program(&to_cstring(program), None)
    }

    /// Like [`Command::spawn_deferred`], with one more callback that runs
    /// after all `pre_exec` callbacks. The callback is not stored, so the
    /// command can be spawned again without accumulating it.
    ///
    /// # Safety
    ///
    /// Same requirements as [`Command::pre_exec`].
    pub unsafe fn spawn_deferred_with<F>(&mut self, mut last: F) -> Result<Child, Error>
    where
        F: FnMut() -> Result<(), Errno>,
    {
        let program = self.find_program().context(Context::FindProgram)?;
        let last: &mut dyn FnMut() -> Result<(), Errno> = &mut last;
        self.spawn_program(&to_cstring(program), Some(last))
    }

    /// Like [`Command::spawn_deferred`], but skips the program lookup and
    /// leaves the `PATH` search to `execvpe` in the child.
    pub fn spawn_unchecked(&mut self) -> Result<Child, Error> {
        let program = self.program.clone();
        self.spawn_program(&program, None)
    }

    fn spawn_program(
        &mut self,
        program: &CStr,
        last: Option<&mut dyn FnMut() -> Result<(), Errno>>,
    ) -> Result<Child, Error> {
        // Everything the child needs is allocated up front. Nothing may
        // allocate between `fork` and `execve`.
        let env = self.env_array();
        let (reader, writer) = pipe().context(Context::Pipe)?;

        match unsafe { fork() }.context(Context::Fork)? {
            ForkResult::Parent { child } => {
                // Close our copy of the writer. Otherwise, reading the pipe
                // would never see EOF.
                drop(writer);
                Ok(Child::new(child.into(), reader))
            }
            ForkResult::Child => {
                drop(reader);
                let err = match self.do_exec(program, &env, last) {
                    Ok(never) => match never {},
                    Err(err) => err,
                };
                send_error(&writer, err);
                unsafe { libc::_exit(EXEC_FAILED) }
            }
        }
    }

    /// Runs in the child. Only returns on failure.
    fn do_exec(
        &mut self,
        program: &CStr,
        env: &CStringArray,
        last: Option<&mut dyn FnMut() -> Result<(), Errno>>,
    ) -> Result<Infallible, Error> {
        unsafe { reset_signal_handling() }.context(Context::ResetSignals)?;

        for callback in &mut self.pre_exec {
            callback().context(Context::PreExec)?;
        }
        if let Some(callback) = last {
            callback().context(Context::PreExec)?;
        }

        unsafe { libc::execvpe(program.as_ptr(), self.args.as_ptr(), env.as_ptr()) };

        Err(Error::new(Errno::last(), Context::Exec))
    }
}

/// Sends an error to the parent. There is nothing left to do if this fails.
fn send_error(fd: &Fd, err: Error) {
    let bytes: [u8; 8] = err.into();
    let _ = fd.write_all_raw(&bytes);
}
