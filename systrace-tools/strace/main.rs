/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use systrace::Command;
use systrace::Config;
use systrace::Filter;
use systrace::OutputMode;
use systrace::SyscallTable;
use systrace::TraceSession;
use systrace_util::CommonToolArguments;

/// A tool to trace system calls.
#[derive(Parser, Debug)]
struct Opts {
    #[clap(flatten)]
    common: CommonToolArguments,

    /// What each trace line shows: number, name, return or full.
    #[clap(long, value_name = "MODE", default_value_t = OutputMode::Full)]
    mode: OutputMode,

    /// The set of syscalls to show, as `name[,name...]`. Prefix with `!` to
    /// hide them instead. By default, all syscalls are shown. Can be used
    /// multiple times.
    #[clap(long, value_name = "[!]SYSCALLS")]
    trace: Vec<Filter>,

    /// Write the trace to a file instead of stdout.
    #[clap(short = 'o', long, value_name = "PATH", env = "SYSTRACE_OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Opts::parse();

    let config = Config {
        mode: args.mode,
        filters: args.trace,
    };

    let log_guard = args.common.init_tracing()?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let program = args.common.program.clone();
    let table = SyscallTable::x86_64();
    let mut command = Command::from(args.common);

    let summary = TraceSession::spawn(&mut command, &table, &config, sink)
        .and_then(|session| session.run())
        .with_context(|| format!("failed to trace {}", program))?;
    tracing::debug!("traced {} syscalls", summary.syscalls);

    drop(log_guard); // Flush logs before exiting.
    summary.exit_status.raise_or_exit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_options() {
        let opts = Opts::try_parse_from([
            "systrace",
            "--mode",
            "return",
            "--trace",
            "!mmap,brk",
            "-o",
            "/tmp/trace.txt",
            "--",
            "ls",
            "--mode",
        ])
        .unwrap();

        assert_eq!(opts.mode, OutputMode::Return);
        assert_eq!(opts.trace, vec!["!mmap,brk".parse::<Filter>().unwrap()]);
        assert_eq!(opts.output, Some(PathBuf::from("/tmp/trace.txt")));
        assert_eq!(opts.common.program, "ls");
        assert_eq!(opts.common.program_args, ["--mode"]);
    }

    #[test]
    fn program_flags_pass_through() {
        let opts = Opts::try_parse_from(["systrace", "ls", "-la", "/"]).unwrap();
        assert_eq!(opts.common.program, "ls");
        assert_eq!(opts.common.program_args, ["-la", "/"]);
    }

    #[test]
    fn defaults() {
        let opts = Opts::try_parse_from(["systrace", "true"]).unwrap();
        assert_eq!(opts.mode, OutputMode::Full);
        assert!(opts.trace.is_empty());
    }

    #[test]
    fn bad_filter_is_rejected() {
        assert!(Opts::try_parse_from(["systrace", "--trace", "nope", "true"]).is_err());
        assert!(Opts::try_parse_from(["systrace", "--mode", "loud", "true"]).is_err());
    }
}
