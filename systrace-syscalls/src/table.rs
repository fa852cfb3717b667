/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod x86_64;

use core::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Number of registers a syscall passes its arguments in.
pub const MAX_ARGS: usize = 6;

/// Largest syscall number a table accepts. Tables are indexed by number, so
/// this bounds their size.
pub const MAX_SYSCALL_NUMBER: u32 = 4095;

/// How a syscall parameter is rendered.
///
/// The kind only documents what the register holds. Every value kind renders
/// the same way, as hex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// The syscall takes no argument. Only used as the sole entry of an
    /// otherwise empty list.
    Void,
    /// Variadic tail, as in `open(path, flags, ...)`. Must come last.
    VarArgs,
    /// `int`.
    Int,
    /// `unsigned int`.
    Uint,
    /// `long`.
    Long,
    /// `unsigned long`.
    Ulong,
    /// `size_t`.
    Size,
    /// A file descriptor.
    Fd,
    /// A process or thread ID.
    Pid,
    /// A flags bitmask.
    Flags,
    /// A `mode_t`.
    Mode,
    /// An `off_t`.
    Offset,
    /// A pointer into the tracee's memory.
    Pointer,
    /// A pointer to a NUL terminated string.
    Str,
}

/// Errors in syscall signature data.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SignatureError {
    /// A signature lists more parameters than there are argument registers.
    #[error("{name} declares {count} parameters, but at most 6 fit in registers")]
    TooManyParameters {
        /// Name of the offending syscall.
        name: String,
        /// Number of declared parameters.
        count: usize,
    },

    /// Two signatures share the same number.
    #[error("syscall number {0} is defined more than once")]
    Duplicate(u32),

    /// A signature's number is above [`MAX_SYSCALL_NUMBER`].
    #[error("syscall number {0} is out of range")]
    NumberOutOfRange(u32),
}

/// A syscall number that has no signature in the table.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
#[error("unknown syscall number {0}")]
pub struct UnknownSyscall(pub u64);

/// Name and parameter list of one syscall.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct SyscallSignature {
    number: u32,
    name: &'static str,
    params: &'static [ParamKind],
}

impl SyscallSignature {
    /// Used by the `signatures!` macro. Evaluated at compile time, where the
    /// assertion turns an over-long list into a build error.
    pub(crate) const fn from_static(
        number: u32,
        name: &'static str,
        params: &'static [ParamKind],
    ) -> Self {
        assert!(params.len() <= MAX_ARGS, "too many syscall parameters");
        Self {
            number,
            name,
            params,
        }
    }

    /// Creates a signature, checking that its parameters fit in the argument
    /// registers.
    pub fn new(
        number: u32,
        name: &'static str,
        params: &'static [ParamKind],
    ) -> Result<Self, SignatureError> {
        if params.len() > MAX_ARGS {
            return Err(SignatureError::TooManyParameters {
                name: name.to_owned(),
                count: params.len(),
            });
        }

        Ok(Self {
            number,
            name,
            params,
        })
    }

    /// The syscall number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The syscall name, e.g. `"openat"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared parameters, in argument register order.
    pub fn params(&self) -> &'static [ParamKind] {
        self.params
    }
}

impl fmt::Display for SyscallSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, kind) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", kind)?;
        }
        f.write_str(")")
    }
}

/// An immutable mapping from syscall number to [`SyscallSignature`], for one
/// ABI.
#[derive(Clone, Debug)]
pub struct SyscallTable {
    /// Indexed by syscall number. Holes are numbers with no syscall.
    slots: Vec<Option<SyscallSignature>>,
}

impl SyscallTable {
    /// Builds a table, rejecting duplicate and out of range numbers.
    pub fn new<I>(signatures: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = SyscallSignature>,
    {
        let mut slots: Vec<Option<SyscallSignature>> = Vec::new();

        for sig in signatures {
            if sig.number > MAX_SYSCALL_NUMBER {
                return Err(SignatureError::NumberOutOfRange(sig.number));
            }

            let index = sig.number as usize;
            if index >= slots.len() {
                slots.resize(index + 1, None);
            }
            if slots[index].replace(sig).is_some() {
                return Err(SignatureError::Duplicate(sig.number));
            }
        }

        Ok(Self { slots })
    }

    /// The Linux x86_64 table.
    pub fn x86_64() -> Self {
        let signatures = x86_64::SIGNATURES;
        let len = signatures.last().map_or(0, |sig| sig.number as usize + 1);

        let mut slots = vec![None; len];
        for sig in signatures {
            slots[sig.number as usize] = Some(*sig);
        }

        Self { slots }
    }

    /// Looks up a syscall by the number found in its register.
    pub fn by_number(&self, number: u64) -> Result<&SyscallSignature, UnknownSyscall> {
        usize::try_from(number)
            .ok()
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
            .ok_or(UnknownSyscall(number))
    }

    /// Looks up a syscall by name.
    pub fn by_name(&self, name: &str) -> Option<&SyscallSignature> {
        self.iter().find(|sig| sig.name == name)
    }

    /// Iterates over all signatures in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = &SyscallSignature> {
        self.slots.iter().flatten()
    }

    /// Number of signatures in the table.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True if the table has no signatures.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
