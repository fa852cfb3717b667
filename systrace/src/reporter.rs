/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Renders [`Record`]s as trace lines.
//!
//! An entry starts a line and the matching exit finishes it, so a line is
//! visible even while the syscall blocks. The sink is flushed after every
//! record.

use std::fmt;
use std::io;
use std::io::Write;

use serde::Deserialize;
use serde::Serialize;

use crate::filter::Selection;
use crate::machine::syscall_name;
use crate::machine::Record;

/// What each trace line shows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The decimal syscall number, printed at entry.
    Number,
    /// The syscall name.
    Name,
    /// `name = 0xRET`.
    Return,
    /// `name(args) = 0xRET`.
    #[default]
    Full,
}

impl OutputMode {
    /// All modes, in the order they are listed in help text.
    pub const ALL: [OutputMode; 4] = [Self::Number, Self::Name, Self::Return, Self::Full];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Return => "return",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid output mode '{}', expected one of: number, name, return, full",
                    s
                )
            })
    }
}

/// Writes trace lines to a sink.
pub struct Reporter<W> {
    sink: W,
    mode: OutputMode,
    selection: Selection,
    /// A line was started at the last entry and still needs its ending.
    open: bool,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter writing to `sink`.
    pub fn new(sink: W, mode: OutputMode, selection: Selection) -> Self {
        Self {
            sink,
            mode,
            selection,
            open: false,
        }
    }

    /// Writes whatever `record` contributes to the trace and flushes.
    pub fn report(&mut self, record: &Record) -> io::Result<()> {
        match record {
            Record::Entry {
                number,
                signature,
                args,
            } => {
                if !self.selection.contains(*number) {
                    return Ok(());
                }

                let name = syscall_name(*number, signature.as_ref());
                match self.mode {
                    OutputMode::Number => writeln!(self.sink, "{}", number)?,
                    OutputMode::Name | OutputMode::Return => {
                        write!(self.sink, "{}", name)?;
                        self.open = true;
                    }
                    OutputMode::Full => {
                        write!(self.sink, "{}({})", name, args)?;
                        self.open = true;
                    }
                }
            }
            Record::Exit { return_value, .. } => {
                if !std::mem::take(&mut self.open) {
                    return Ok(());
                }
                match self.mode {
                    OutputMode::Number | OutputMode::Name => writeln!(self.sink)?,
                    OutputMode::Return | OutputMode::Full => {
                        writeln!(self.sink, " = {:#x}", return_value)?
                    }
                }
            }
            Record::Unfinished => {
                if !std::mem::take(&mut self.open) {
                    return Ok(());
                }
                match self.mode {
                    OutputMode::Number | OutputMode::Name => writeln!(self.sink)?,
                    OutputMode::Return | OutputMode::Full => writeln!(self.sink, " = ?")?,
                }
            }
        }

        self.sink.flush()
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W> fmt::Debug for Reporter<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("open", &self.open)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use systrace_syscalls::RegisterSnapshot;
    use systrace_syscalls::SyscallTable;

    use super::*;
    use crate::machine::Machine;

    // Feeds (number, args, return value) triples through a machine and
    // reporter. A `None` return value ends the trace inside that syscall.
    fn render(mode: OutputMode, selection: Selection, calls: &[(u64, [u64; 6], Option<u64>)]) -> String {
        let table = SyscallTable::x86_64();
        let mut machine = Machine::new(&table);
        let mut reporter = Reporter::new(Vec::new(), mode, selection);

        for (number, args, ret) in calls {
            let entry = RegisterSnapshot {
                syscall_number: *number,
                args: *args,
                return_value: 0,
            };
            reporter.report(&machine.on_syscall_stop(&entry).unwrap()).unwrap();

            match ret {
                Some(ret) => {
                    let exit = RegisterSnapshot {
                        return_value: *ret,
                        ..entry
                    };
                    reporter.report(&machine.on_syscall_stop(&exit).unwrap()).unwrap();
                }
                None => break,
            }
        }

        if let Some(record) = machine.on_exit(systrace_process::ExitStatus::Exited(0)).unwrap() {
            reporter.report(&record).unwrap();
        }

        String::from_utf8(reporter.into_inner()).unwrap()
    }

    const CALLS: &[(u64, [u64; 6], Option<u64>)] = &[
        (0, [3, 0x7ffd0000, 16, 0, 0, 0], Some(16)),
        (3, [3, 0, 0, 0, 0, 0], Some(-9i64 as u64)),
        (231, [0, 0, 0, 0, 0, 0], None),
    ];

    #[test]
    fn full_mode() {
        assert_eq!(
            render(OutputMode::Full, Selection::all(), CALLS),
            "read(0x3, 0x7ffd0000, 0x10) = 0x10\n\
             close(0x3) = 0xfffffffffffffff7\n\
             exit_group(0x0) = ?\n"
        );
    }

    #[test]
    fn return_mode() {
        assert_eq!(
            render(OutputMode::Return, Selection::all(), CALLS),
            "read = 0x10\nclose = 0xfffffffffffffff7\nexit_group = ?\n"
        );
    }

    #[test]
    fn name_mode() {
        assert_eq!(
            render(OutputMode::Name, Selection::all(), CALLS),
            "read\nclose\nexit_group\n"
        );
    }

    #[test]
    fn number_mode() {
        assert_eq!(
            render(OutputMode::Number, Selection::all(), CALLS),
            "0\n3\n231\n"
        );
    }

    #[test]
    fn varargs_and_unknown() {
        assert_eq!(
            render(
                OutputMode::Full,
                Selection::all(),
                &[
                    (257, [0xffffff9c, 0x1000, 0, 0o644, 0, 0], Some(3)),
                    (400, [1, 2, 3, 4, 5, 6], Some(-38i64 as u64)),
                ]
            ),
            "openat(0xffffff9c, 0x1000, 0x0, ...) = 0x3\n\
             syscall_400(0x1, 0x2, 0x3, 0x4, 0x5, 0x6) = 0xffffffffffffffda\n"
        );
    }

    #[test]
    fn clean_exit_adds_nothing() {
        assert_eq!(
            render(OutputMode::Full, Selection::all(), &[(39, [0; 6], Some(42))]),
            "getpid() = 0x2a\n"
        );
    }

    #[test]
    fn filtered_syscalls_are_skipped() {
        let selection = Selection::new(&["!read".parse().unwrap()]);
        assert_eq!(
            render(OutputMode::Full, selection, CALLS),
            "close(0x3) = 0xfffffffffffffff7\nexit_group(0x0) = ?\n"
        );

        let selection = Selection::new(&["read".parse().unwrap()]);
        assert_eq!(
            render(OutputMode::Return, selection, CALLS),
            "read = 0x10\n"
        );
    }

    #[test]
    fn parse_mode() {
        for mode in OutputMode::ALL {
            assert_eq!(mode.to_string().parse::<OutputMode>(), Ok(mode));
        }
        assert!("verbose".parse::<OutputMode>().is_err());
        assert_eq!(OutputMode::default(), OutputMode::Full);
    }
}
