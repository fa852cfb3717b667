/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use core::fmt;

use serde::Deserialize;
use serde::Serialize;
use syscalls::Errno;

/// Which step of launching a program failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[repr(u32)]
pub enum Context {
    /// No context provided.
    Unknown,
    /// The program could not be found or is not executable.
    FindProgram,
    /// Creating the error pipe failed.
    Pipe,
    /// The fork failed.
    Fork,
    /// Resetting signals failed.
    ResetSignals,
    /// The pre_exec callback(s) failed.
    PreExec,
    /// Exec failed.
    Exec,
}

impl Context {
    /// Returns a string representation of the context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown failure",
            Self::FindProgram => "program not found",
            Self::Pipe => "creating the exec error pipe failed",
            Self::Fork => "fork failed",
            Self::ResetSignals => "resetting signal handlers failed",
            Self::PreExec => "pre_exec callback(s) failed",
            Self::Exec => "execve failed",
        }
    }

    fn from_u32(raw: u32) -> Self {
        match raw {
            1 => Self::FindProgram,
            2 => Self::Pipe,
            3 => Self::Fork,
            4 => Self::ResetSignals,
            5 => Self::PreExec,
            6 => Self::Exec,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from launching a process. This is a thin wrapper around
/// [`Errno`], but knows which step went wrong.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Error {
    errno: Errno,
    context: Context,
}

impl Error {
    /// Creates a new `Error`.
    pub fn new(errno: Errno, context: Context) -> Self {
        Self { errno, context }
    }

    /// Gets the errno.
    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// Gets the error context.
    pub fn context(&self) -> Context {
        self.context
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.errno)
    }
}

impl std::error::Error for Error {}

impl From<Errno> for Error {
    fn from(err: Errno) -> Self {
        Self::new(err, Context::Unknown)
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::from(err.errno)
    }
}

impl From<[u8; 8]> for Error {
    /// Decodes an `Error` received from the child through the exec pipe.
    fn from(bytes: [u8; 8]) -> Self {
        let [a, b, c, d, e, f, g, h] = bytes;
        Self {
            errno: Errno::new(i32::from_ne_bytes([a, b, c, d])),
            context: Context::from_u32(u32::from_ne_bytes([e, f, g, h])),
        }
    }
}

impl From<Error> for [u8; 8] {
    /// Encodes an `Error` for sending through the exec pipe. Does not
    /// allocate, so it is usable between `fork` and `execve`.
    fn from(error: Error) -> Self {
        let errno = error.errno.into_raw().to_ne_bytes();
        let context = (error.context as u32).to_ne_bytes();
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&errno);
        bytes[4..].copy_from_slice(&context);
        bytes
    }
}

pub(super) trait AddContext<T> {
    fn context(self, context: Context) -> Result<T, Error>;
}

impl<T> AddContext<T> for Result<T, Errno> {
    fn context(self, context: Context) -> Result<T, Error> {
        self.map_err(move |errno| Error::new(errno, context))
    }
}

impl<T> AddContext<T> for Result<T, nix::errno::Errno> {
    fn context(self, context: Context) -> Result<T, Error> {
        self.map_err(move |errno| Error::new(Errno::new(errno as i32), context))
    }
}

impl<T> AddContext<T> for std::io::Result<T> {
    fn context(self, context: Context) -> Result<T, Error> {
        self.map_err(move |err| {
            Error::new(
                Errno::new(err.raw_os_error().unwrap_or(libc::EIO)),
                context,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes() {
        let bytes: [u8; 8] = Error::new(Errno::ENOENT, Context::Exec).into();
        assert_eq!(Error::from(bytes), Error::new(Errno::ENOENT, Context::Exec));
    }

    #[test]
    fn garbage_context_is_unknown() {
        let mut bytes: [u8; 8] = Error::new(Errno::EPERM, Context::PreExec).into();
        bytes[4..].copy_from_slice(&u32::MAX.to_ne_bytes());
        assert_eq!(Error::from(bytes).context(), Context::Unknown);
        assert_eq!(Error::from(bytes).errno(), Errno::EPERM);
    }

    #[test]
    fn display() {
        let err = Error::new(Errno::ENOENT, Context::FindProgram);
        assert!(err.to_string().starts_with("program not found: "));
    }
}
