/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use serde::Deserialize;
use serde::Serialize;

use crate::table::MAX_ARGS;

/// The registers that take part in a syscall, captured at one syscall stop.
///
/// This is a plain value. It says nothing about the tracee once the stop that
/// produced it is over.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    /// The syscall number (`orig_rax` on x86_64).
    pub syscall_number: u64,
    /// The argument registers (`rdi`, `rsi`, `rdx`, `r10`, `r8`, `r9`).
    pub args: [u64; MAX_ARGS],
    /// The return value register (`rax`). Only meaningful at syscall-exit.
    pub return_value: u64,
}
