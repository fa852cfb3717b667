/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Arguments and logging setup shared by every systrace tool. Tools flatten
//! [`CommonToolArguments`] into their own `clap` parser.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use systrace_process::Command;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Parses an environment variable command-line argument.
pub fn parse_env(s: &str) -> anyhow::Result<(String, String)> {
    let mut iter = s.splitn(2, '=');

    let key = iter
        .next()
        .filter(|key| !key.is_empty())
        .ok_or("Invalid KEY=VALUE: string is empty")
        .map(String::from)
        .map_err(anyhow::Error::msg)?;

    let value = match iter.next() {
        Some(value) => value.to_owned(),
        None => std::env::var(&key).with_context(|| format!("{} is not set", key))?,
    };

    Ok((key, value))
}

// Arguments that are shared by all systrace tools, including which program to
// run and how to run it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Parser)]
pub struct CommonToolArguments {
    /// Direct logging to a file.  This can also be set with the RUST_LOG_FILE environment
    /// variable, but the CLI flag takes precedence.
    #[clap(long = "log-file", value_name = "PATH", env = "RUST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Do not pass-through host's environment variables, instead providing a
    /// minimal PATH only (/bin:/usr/bin). The default is to pass through the
    /// host environment.
    #[clap(long = "no-host-envs")]
    pub no_host_envs: bool,

    /// Sets an environment variable. Can be used multiple times.
    #[clap(
        long = "env",
        short = 'e',
        value_name = "ENV[=VALUE]",
        value_parser = parse_env,
        num_args = 1
    )]
    pub envs: Vec<(String, String)>,

    /// Path of the program to trace.
    #[clap(value_name = "PROGRAM")]
    pub program: String,

    /// Arguments to the program to trace.
    #[clap(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub program_args: Vec<String>,
}

impl CommonToolArguments {
    /// Creates arguments that run the given program with the defaults.
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            log_file: None,
            no_host_envs: false,
            envs: Vec::new(),
            program: program.into(),
            program_args: Vec::new(),
        }
    }

    /// Adds an argument, similar to `Command::arg`.
    pub fn arg<S: Into<String>>(&mut self, s: S) -> &mut Self {
        self.program_args.push(s.into());
        self
    }

    /// Installs the global `tracing` subscriber, filtered by `RUST_LOG`.
    ///
    /// Logs go to stderr unless `--log-file` was given. The returned guard
    /// must be kept alive until exit, or buffered log lines are lost.
    pub fn init_tracing(&self) -> anyhow::Result<Option<WorkerGuard>> {
        fn set_subscriber_with_writer<
            T: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
        >(
            writer: T,
        ) -> anyhow::Result<()> {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Unable to set global default subscriber")
        }

        match self.log_file.as_deref().and_then(unused_log_file) {
            Some(path) => {
                // `unused_log_file` only returns paths with a file name.
                let parent = path.parent().unwrap_or_else(|| Path::new("."));
                let filename = path.file_name().unwrap_or_default();

                let file_writer = tracing_appender::rolling::never(parent, filename);
                let (file_writer, guard) = tracing_appender::non_blocking(file_writer);

                eprintln!(" [systrace] Logging to file at {:?}", path);
                set_subscriber_with_writer(file_writer)?;
                Ok(Some(guard))
            }
            None => {
                if self.log_file.is_some() {
                    eprintln!(
                        " [systrace] WARNING: could not open log file, falling back to stderr"
                    );
                }
                set_subscriber_with_writer(io::stderr)?;
                Ok(None)
            }
        }
    }
}

/// Returns `path`, or `path` with a timestamp appended if it already exists.
/// Existing files are never reused.
pub fn unused_log_file(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    let orig_filename = path.file_name()?.to_os_string();
    let mut filename = orig_filename.clone();

    for _ in 0..100 {
        if parent.join(&filename).exists() {
            filename = orig_filename.clone();
            filename.push(format!("{}", Local::now().format(".%Y%m%d.%H%M%S.%f")));
        } else {
            return Some(parent.join(&filename));
        }
    }

    None
}

impl From<CommonToolArguments> for Command {
    fn from(args: CommonToolArguments) -> Self {
        let mut cmd = Command::new(args.program);
        cmd.args(args.program_args);

        if args.no_host_envs {
            cmd.env_clear();
            cmd.env("PATH", "/bin:/usr/bin");
        }

        cmd.envs(args.envs);
        cmd
    }
}
