/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// The general purpose registers of a tracee.
pub use libc::user_regs_struct as Regs;

/// A single register.
pub type Reg = u64;

/// The six syscall argument registers, in calling convention order.
pub type ArgRegs = [Reg; 6];

/// Architecture-independent access to the registers that take part in a
/// syscall.
pub trait RegAccess {
    /// Returns the syscall number. Unlike the register the number is passed
    /// in, this is still intact at syscall-exit.
    fn orig_syscall(&self) -> Reg;

    /// Returns the value of the register where the syscall return value is
    /// stored. Only meaningful at syscall-exit.
    fn ret(&self) -> Reg;

    /// Returns the 6 argument registers used by the syscall instruction.
    fn args(&self) -> ArgRegs;
}

#[cfg(target_arch = "x86_64")]
impl RegAccess for libc::user_regs_struct {
    fn orig_syscall(&self) -> Reg {
        self.orig_rax
    }

    fn ret(&self) -> Reg {
        self.rax
    }

    fn args(&self) -> ArgRegs {
        [self.rdi, self.rsi, self.rdx, self.r10, self.r8, self.r9]
    }
}

#[cfg(target_arch = "aarch64")]
impl RegAccess for libc::user_regs_struct {
    fn orig_syscall(&self) -> Reg {
        self.regs[8]
    }

    fn ret(&self) -> Reg {
        self.regs[0]
    }

    fn args(&self) -> ArgRegs {
        [
            self.regs[0],
            self.regs[1],
            self.regs[2],
            self.regs[3],
            self.regs[4],
            self.regs[5],
        ]
    }
}
