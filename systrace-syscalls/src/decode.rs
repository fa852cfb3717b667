/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use core::fmt;

use crate::snapshot::RegisterSnapshot;
use crate::table::ParamKind;
use crate::table::SyscallSignature;

/// One rendered argument.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Arg {
    /// The raw register value.
    Value(u64),
    /// The variadic tail of the signature.
    Ellipsis,
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{:#x}", value),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// The arguments of one syscall, ready to print. Displays as a `", "`
/// separated list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodedArgs(Vec<Arg>);

impl DecodedArgs {
    /// The rendered arguments, in order.
    pub fn as_slice(&self) -> &[Arg] {
        &self.0
    }

    /// Number of rendered arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All six argument registers. Used when there is no signature to go by.
    pub fn raw(snapshot: &RegisterSnapshot) -> Self {
        Self(snapshot.args.iter().copied().map(Arg::Value).collect())
    }
}

impl fmt::Display for DecodedArgs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(arg, f)?;
        }
        Ok(())
    }
}

/// Renders the arguments `signature` declares from the argument registers in
/// `snapshot`.
///
/// `Void` positions are skipped. `VarArgs` renders as `...` and ends the
/// list. Everything else is the full 64-bit register in hex. Registers past
/// the declared parameters are never looked at.
pub fn decode_args(snapshot: &RegisterSnapshot, signature: &SyscallSignature) -> DecodedArgs {
    let mut args = Vec::with_capacity(signature.params().len());

    for (kind, value) in signature.params().iter().zip(snapshot.args) {
        match kind {
            ParamKind::Void => {}
            ParamKind::VarArgs => {
                args.push(Arg::Ellipsis);
                break;
            }
            ParamKind::Int
            | ParamKind::Uint
            | ParamKind::Long
            | ParamKind::Ulong
            | ParamKind::Size
            | ParamKind::Fd
            | ParamKind::Pid
            | ParamKind::Flags
            | ParamKind::Mode
            | ParamKind::Offset
            | ParamKind::Pointer
            | ParamKind::Str => args.push(Arg::Value(value)),
        }
    }

    DecodedArgs(args)
}
