/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;

use syscalls::Errno;

use super::error::Context;
use super::error::Error;
use super::fd::Fd;
use super::ExitStatus;
use super::Pid;

/// A child process started by [`super::Command::spawn_deferred`].
///
/// NOTE: The child is neither killed nor waited on when `Child` is dropped.
#[derive(Debug)]
pub struct Child {
    pub(super) pid: Pid,

    /// `Some` once the child has been waited on through this handle.
    pub(super) exit_status: Option<ExitStatus>,

    /// Read end of the pipe the child reports a failed launch through. `None`
    /// after the result has been collected.
    pub(super) exec_error: Option<Fd>,
}

impl Child {
    pub(super) fn new(pid: Pid, exec_error: Fd) -> Self {
        Self {
            pid,
            exit_status: None,
            exec_error: Some(exec_error),
        }
    }

    /// Returns the PID of the child.
    pub fn id(&self) -> Pid {
        self.pid
    }

    /// Blocks until the child process exits. Keeps returning the same status
    /// once it has.
    ///
    /// This must not be used on a child that is being ptraced, since it would
    /// also consume the tracer's stop notifications.
    pub fn wait_blocking(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }

        let mut status = 0;
        loop {
            match Errno::result(unsafe { libc::waitpid(self.pid.as_raw(), &mut status, 0) }) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        let status = ExitStatus::from_raw(status);
        self.exit_status = Some(status);
        Ok(status)
    }

    /// Collects the outcome of the child's `execve`.
    ///
    /// Returns `Ok(())` if the program was loaded, or the error the child
    /// reported before exiting with [`crate::EXEC_FAILED`]. This blocks
    /// until the child has either called `execve` or died, so it should only
    /// be called once the child is known to be past that point.
    pub fn exec_result(&mut self) -> Result<(), Error> {
        let fd = match self.exec_error.take() {
            Some(fd) => fd,
            None => return Ok(()),
        };

        let mut buf = [0u8; 8];
        match fd.read_full(&mut buf) {
            Ok(0) => Ok(()),
            Ok(8) => Err(Error::from(buf)),
            // A short write only happens if the child died mid-report.
            Ok(_) => Err(Error::new(Errno::EIO, Context::Unknown)),
            Err(err) => Err(Error::new(
                Errno::new(err.raw_os_error().unwrap_or(libc::EIO)),
                Context::Unknown,
            )),
        }
    }
}
