/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The syscall-stop state machine.
//!
//! ptrace reports a syscall-entry-stop and a syscall-exit-stop the same way,
//! so the tracer has to remember which one it expects next. [`Machine`] does
//! only that bookkeeping and turns each stop into a [`Record`]. It performs no
//! I/O and never touches the tracee, which keeps it testable with made-up
//! snapshots.

use std::borrow::Cow;
use std::fmt;

use systrace_process::ExitStatus;
use systrace_syscalls::decode_args;
use systrace_syscalls::DecodedArgs;
use systrace_syscalls::RegisterSnapshot;
use systrace_syscalls::SyscallSignature;
use systrace_syscalls::SyscallTable;

use crate::error::Error;

/// Where the machine is in the entry/exit cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// The next syscall stop is an entry.
    AwaitingEntry,
    /// The next syscall stop is the exit of the last entry.
    AwaitingExit,
    /// The tracee is gone. No more events are accepted.
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingEntry => "awaiting syscall entry",
            Self::AwaitingExit => "awaiting syscall exit",
            Self::Terminated => "terminated",
        })
    }
}

/// One reportable event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Record {
    /// A syscall was entered.
    Entry {
        /// The raw syscall number.
        number: u64,
        /// `None` if the number is not in the table.
        signature: Option<SyscallSignature>,
        /// The rendered arguments.
        args: DecodedArgs,
    },

    /// The syscall from the preceding entry returned.
    Exit {
        /// The number seen at the matching entry.
        number: u64,
        /// The raw return register.
        return_value: u64,
    },

    /// The tracee terminated while inside the syscall from the preceding
    /// entry.
    Unfinished,
}

/// Returns the name a syscall is reported under. Numbers missing from the
/// table get a `syscall_<number>` placeholder.
pub fn syscall_name(number: u64, signature: Option<&SyscallSignature>) -> Cow<'static, str> {
    match signature {
        Some(sig) => Cow::Borrowed(sig.name()),
        None => Cow::Owned(format!("syscall_{}", number)),
    }
}

/// Tracks the entry/exit phase of one tracee.
#[derive(Debug)]
pub struct Machine<'t> {
    table: &'t SyscallTable,
    phase: Phase,
    /// Number and signature of the outstanding entry.
    pending: Option<(u64, Option<SyscallSignature>)>,
}

impl<'t> Machine<'t> {
    /// Creates a machine expecting a syscall entry.
    pub fn new(table: &'t SyscallTable) -> Self {
        Self {
            table,
            phase: Phase::AwaitingEntry,
            pending: None,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The signature of the outstanding entry, if there is one and it is
    /// known.
    pub fn pending_signature(&self) -> Option<&SyscallSignature> {
        self.pending.as_ref().and_then(|(_, sig)| sig.as_ref())
    }

    /// Feeds a syscall stop.
    ///
    /// At an exit, the snapshot only provides the return value. The syscall is
    /// identified by what was recorded at the entry.
    pub fn on_syscall_stop(&mut self, snapshot: &RegisterSnapshot) -> Result<Record, Error> {
        match self.phase {
            Phase::AwaitingEntry => {
                let number = snapshot.syscall_number;
                let signature = match self.table.by_number(number) {
                    Ok(sig) => Some(*sig),
                    Err(err) => {
                        tracing::warn!("{}, showing all argument registers", err);
                        None
                    }
                };

                let args = match &signature {
                    Some(sig) => decode_args(snapshot, sig),
                    None => DecodedArgs::raw(snapshot),
                };

                self.pending = Some((number, signature));
                self.transition(Phase::AwaitingExit);
                Ok(Record::Entry {
                    number,
                    signature,
                    args,
                })
            }
            Phase::AwaitingExit => {
                let (number, _) = self.pending.take().ok_or(Error::InvalidTransition {
                    phase: self.phase,
                    event: "syscall exit without entry",
                })?;
                self.transition(Phase::AwaitingEntry);
                Ok(Record::Exit {
                    number,
                    return_value: snapshot.return_value,
                })
            }
            Phase::Terminated => Err(Error::InvalidTransition {
                phase: self.phase,
                event: "syscall stop",
            }),
        }
    }

    /// Feeds the termination of the tracee. Returns [`Record::Unfinished`] if
    /// it died inside a syscall.
    pub fn on_exit(&mut self, exit_status: ExitStatus) -> Result<Option<Record>, Error> {
        let record = match self.phase {
            Phase::AwaitingEntry => None,
            Phase::AwaitingExit => {
                self.pending = None;
                Some(Record::Unfinished)
            }
            Phase::Terminated => {
                return Err(Error::InvalidTransition {
                    phase: self.phase,
                    event: "exit",
                });
            }
        };

        tracing::debug!("tracee {}", exit_status);
        self.transition(Phase::Terminated);
        Ok(record)
    }

    fn transition(&mut self, phase: Phase) {
        tracing::debug!("{} -> {}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use systrace_syscalls::Arg;

    use super::*;

    fn snapshot(number: u64, args: [u64; 6], return_value: u64) -> RegisterSnapshot {
        RegisterSnapshot {
            syscall_number: number,
            args,
            return_value,
        }
    }

    #[test]
    fn alternates_entry_and_exit() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        for _ in 0..3 {
            assert_eq!(machine.phase(), Phase::AwaitingEntry);
            let entry = machine
                .on_syscall_stop(&snapshot(39, [0; 6], 0))
                .unwrap();
            assert!(matches!(entry, Record::Entry { number: 39, .. }));

            assert_eq!(machine.phase(), Phase::AwaitingExit);
            assert_eq!(machine.pending_signature().map(|s| s.name()), Some("getpid"));
            let exit = machine
                .on_syscall_stop(&snapshot(39, [0; 6], 1234))
                .unwrap();
            assert_eq!(
                exit,
                Record::Exit {
                    number: 39,
                    return_value: 1234
                }
            );
        }
    }

    #[test]
    fn exit_uses_the_entry_syscall() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        machine
            .on_syscall_stop(&snapshot(59, [1, 2, 3, 0, 0, 0], 0))
            .unwrap();
        // After a successful execve the number register no longer matters.
        assert_eq!(
            machine.on_syscall_stop(&snapshot(999, [0; 6], 0)).unwrap(),
            Record::Exit {
                number: 59,
                return_value: 0
            }
        );
    }

    #[test]
    fn entry_decodes_arguments() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        match machine
            .on_syscall_stop(&snapshot(3, [7, 8, 9, 10, 11, 12], 0))
            .unwrap()
        {
            Record::Entry {
                number,
                signature,
                args,
            } => {
                assert_eq!(number, 3);
                assert_eq!(signature.map(|s| s.name()), Some("close"));
                assert_eq!(args.as_slice(), &[Arg::Value(7)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_syscall_gets_placeholder() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        match machine
            .on_syscall_stop(&snapshot(400, [1, 2, 3, 4, 5, 6], 0))
            .unwrap()
        {
            Record::Entry {
                number,
                signature,
                args,
            } => {
                assert_eq!(signature, None);
                assert_eq!(syscall_name(number, signature.as_ref()), "syscall_400");
                assert_eq!(args.len(), 6);
            }
            other => panic!("unexpected {:?}", other),
        }

        // The session carries on normally.
        assert!(matches!(
            machine.on_syscall_stop(&snapshot(400, [0; 6], -38i64 as u64)),
            Ok(Record::Exit { number: 400, .. })
        ));
        assert_eq!(machine.phase(), Phase::AwaitingEntry);
    }

    #[test]
    fn exit_mid_syscall_is_unfinished() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        machine.on_syscall_stop(&snapshot(231, [0; 6], 0)).unwrap();
        assert_eq!(
            machine.on_exit(ExitStatus::Exited(0)).unwrap(),
            Some(Record::Unfinished)
        );
        assert_eq!(machine.phase(), Phase::Terminated);
        assert_eq!(machine.pending_signature(), None);
    }

    #[test]
    fn exit_at_boundary_is_silent() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);

        assert_eq!(machine.on_exit(ExitStatus::Exited(0)).unwrap(), None);
        assert_eq!(machine.phase(), Phase::Terminated);
    }

    #[test]
    fn events_after_termination_are_rejected() {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);
        machine.on_exit(ExitStatus::Exited(0)).unwrap();

        assert!(matches!(
            machine.on_syscall_stop(&snapshot(39, [0; 6], 0)),
            Err(Error::InvalidTransition {
                phase: Phase::Terminated,
                ..
            })
        ));
        assert!(matches!(
            machine.on_exit(ExitStatus::Exited(0)),
            Err(Error::InvalidTransition {
                phase: Phase::Terminated,
                event: "exit"
            })
        ));
    }

    #[test]
    fn phase_display() {
        let err = Error::InvalidTransition {
            phase: Phase::Terminated,
            event: "syscall stop",
        };
        assert_eq!(
            err.to_string(),
            "invalid transition: syscall stop while terminated"
        );
    }
}
