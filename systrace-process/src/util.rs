/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::ffi::CStr;
use std::ffi::CString;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use syscalls::Errno;

/// Converts an `OsStr` into a `CString`. Anything after an interior NUL byte
/// can never reach `execve` and is dropped.
pub fn to_cstring<S: AsRef<OsStr>>(s: S) -> CString {
    let bytes = s.as_ref().as_bytes();
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    // SAFETY: `bytes[..end]` contains no NUL byte.
    unsafe { CString::from_vec_unchecked(bytes[..end].to_vec()) }
}

/// A NULL terminated array of C strings, in the layout `execve` expects for
/// `argv` and `envp`.
#[derive(Clone)]
pub struct CStringArray {
    items: Vec<CString>,
    ptrs: Vec<*const libc::c_char>,
}

// The pointers only ever point into `items`, which we own.
unsafe impl Send for CStringArray {}
unsafe impl Sync for CStringArray {}

impl CStringArray {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut ptrs = Vec::with_capacity(capacity + 1);
        ptrs.push(core::ptr::null());
        Self {
            items: Vec::with_capacity(capacity),
            ptrs,
        }
    }

    pub fn push(&mut self, item: CString) {
        let last = self.ptrs.len() - 1;
        self.ptrs[last] = item.as_ptr();
        self.ptrs.push(core::ptr::null());
        self.items.push(item);
    }

    pub fn set(&mut self, i: usize, item: CString) {
        self.ptrs[i] = item.as_ptr();
        self.items[i] = item;
    }

    pub fn get(&self, i: usize) -> &CStr {
        &self.items[i]
    }

    pub fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.items.iter().map(CString::as_c_str)
    }
}

/// Puts the signal mask and the disposition of `SIGPIPE` back to their
/// defaults. Both survive `execve`, and libstd ignores `SIGPIPE`.
///
/// # Safety
///
/// Only meant to be called in a freshly forked child.
pub unsafe fn reset_signal_handling() -> Result<(), Errno> {
    let mut set = core::mem::MaybeUninit::<libc::sigset_t>::uninit();
    Errno::result(libc::sigemptyset(set.as_mut_ptr()))?;
    Errno::result(libc::pthread_sigmask(
        libc::SIG_SETMASK,
        set.as_ptr(),
        core::ptr::null_mut(),
    ))?;

    if libc::signal(libc::SIGPIPE, libc::SIG_DFL) == libc::SIG_ERR {
        return Err(Errno::last());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cstring_array_is_null_terminated() {
        let mut array = CStringArray::with_capacity(2);
        array.push(to_cstring("cat"));
        array.push(to_cstring("file"));

        let ptrs = unsafe { core::slice::from_raw_parts(array.as_ptr(), 3) };
        assert!(!ptrs[0].is_null());
        assert!(!ptrs[1].is_null());
        assert!(ptrs[2].is_null());

        array.set(0, to_cstring("dog"));
        assert_eq!(array.get(0).to_bytes(), b"dog");
        assert_eq!(array.iter().count(), 2);
    }

    #[test]
    fn interior_nul_truncates() {
        assert_eq!(to_cstring("abc\0def").as_bytes(), b"abc");
        assert_eq!(to_cstring("").as_bytes(), b"");
    }
}
