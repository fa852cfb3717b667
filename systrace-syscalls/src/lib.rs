/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Syscall signatures and the rendering of raw syscall arguments.
//!
//! A [`SyscallTable`] maps syscall numbers to a name and a list of
//! [`ParamKind`]s. Given the registers captured at a syscall stop
//! ([`RegisterSnapshot`]), [`decode_args`] renders the arguments the signature
//! declares. Nothing is ever read from the traced process's memory; pointers
//! and integers alike are rendered as hexadecimal.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[macro_use]
mod macros;

mod decode;
mod snapshot;
mod table;

// Re-export the only things that might be needed from the syscalls crate
pub use ::syscalls::Sysno;

pub use crate::decode::*;
pub use crate::snapshot::*;
pub use crate::table::*;
