/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;

use syscalls::Errno;

/// An owned file descriptor, closed on drop. Reads and writes go straight to
/// `libc` so they can be used in a forked child.
#[derive(Debug)]
pub struct Fd(RawFd);

impl Fd {
    /// Writes the whole buffer without allocating. Errors are returned as
    /// `Errno` for use between `fork` and `execve`.
    pub fn write_all_raw(&self, mut buf: &[u8]) -> Result<(), Errno> {
        while !buf.is_empty() {
            match Errno::result(unsafe {
                libc::write(self.0, buf.as_ptr() as *const libc::c_void, buf.len())
            }) {
                Ok(n) => buf = &buf[n as usize..],
                Err(Errno::EINTR) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Reads until `buf` is full or the other end is closed, returning the
    /// number of bytes read.
    pub fn read_full(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let rest = &mut buf[filled..];
            match Errno::result(unsafe {
                libc::read(self.0, rest.as_mut_ptr() as *mut libc::c_void, rest.len())
            }) {
                Ok(0) => break,
                Ok(n) => filled += n as usize,
                Err(Errno::EINTR) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }
}

impl AsRawFd for Fd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        unsafe { libc::close(self.0) };
    }
}

/// Creates a pipe whose ends are both closed on `execve`. Returns the
/// `(reader, writer)` pair.
pub fn pipe() -> Result<(Fd, Fd), Errno> {
    let mut fds = [0; 2];
    Errno::result(unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) })?;
    Ok((Fd(fds[0]), Fd(fds[1])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_transfers_bytes() {
        let (reader, writer) = pipe().unwrap();
        writer.write_all_raw(b"hello").unwrap();
        drop(writer);

        let mut buf = [0u8; 8];
        assert_eq!(reader.read_full(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
    }

    #[test]
    fn pipe_is_cloexec() {
        let (reader, _writer) = pipe().unwrap();
        let flags = unsafe { libc::fcntl(reader.as_raw_fd(), libc::F_GETFD) };
        assert_eq!(flags & libc::FD_CLOEXEC, libc::FD_CLOEXEC);
    }
}
