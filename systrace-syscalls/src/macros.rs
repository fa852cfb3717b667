/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Builds a static list of [`crate::SyscallSignature`]s.
///
/// Each entry is `number name(Kind, ...)`. A signature with more parameters
/// than there are argument registers fails to compile.
///
/// ```ignore
/// static SIGNATURES: &[SyscallSignature] = signatures! {
///     0 read(Fd, Pointer, Size),
///     39 getpid(Void),
/// };
/// ```
macro_rules! signatures {
    ($($nr:literal $name:ident($($kind:ident),* $(,)?)),* $(,)?) => {
        &[
            $(
                $crate::table::SyscallSignature::from_static(
                    $nr,
                    stringify!($name),
                    &[$($crate::table::ParamKind::$kind),*],
                ),
            )*
        ]
    };
}
