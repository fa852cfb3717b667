/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;

use syscalls::Errno;

use super::env::Env;
use super::util::to_cstring;
use super::util::CStringArray;
use super::Command;

impl Command {
    /// Constructs a new `Command` for launching the program at path `program`,
    /// with no arguments and with the current process's environment.
    ///
    /// If `program` is not an absolute path, the `PATH` will be searched when
    /// the command is spawned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use systrace_process::Command;
    /// let command = Command::new("ls");
    /// ```
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        let program = to_cstring(program);

        let mut args = CStringArray::with_capacity(1);
        args.push(program.clone());

        Self {
            program,
            args,
            env: Env::default(),
            pre_exec: Vec::new(),
        }
    }

    /// Sets the path to the program. This can be used to override what was
    /// already set in [`Command::new`].
    ///
    /// NOTE: This does *not* change argument 0, so the program still sees the
    /// name it was invoked with.
    pub fn program<S: AsRef<OsStr>>(&mut self, program: S) -> &mut Self {
        self.program = to_cstring(program);
        self
    }

    /// Explicitly sets the first argument. By default, this is the same as the
    /// program path.
    pub fn arg0<S: AsRef<OsStr>>(&mut self, arg0: S) -> &mut Self {
        self.args.set(0, to_cstring(arg0));
        self
    }

    /// Gets the first argument.
    pub fn get_arg0(&self) -> &OsStr {
        OsStr::from_bytes(self.args.get(0).to_bytes())
    }

    /// Adds an argument to pass to the program.
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.args.push(to_cstring(arg));
        self
    }

    /// Adds multiple arguments to pass to the program.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    /// Returns the arguments that will be passed to the program, not including
    /// argument 0.
    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args
            .iter()
            .skip(1)
            .map(|arg| OsStr::from_bytes(arg.to_bytes()))
    }

    /// Inserts or updates an environment variable mapping.
    pub fn env<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.env.set(key.as_ref(), val.as_ref());
        self
    }

    /// Adds or updates multiple environment variable mappings.
    pub fn envs<I, K, V>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        for (key, val) in vars {
            self.env(key, val);
        }
        self
    }

    /// Removes an environment variable mapping.
    pub fn env_remove<K: AsRef<OsStr>>(&mut self, key: K) -> &mut Self {
        self.env.remove(key.as_ref());
        self
    }

    /// Clears the entire environment map for the child process, including
    /// variables inherited from the parent.
    pub fn env_clear(&mut self) -> &mut Self {
        self.env.clear();
        self
    }

    /// Schedules a closure to be run just before the `exec` function is
    /// invoked. Callbacks run in the order they were added.
    ///
    /// # Safety
    ///
    /// The closure runs in the child after `fork`. It must not allocate or
    /// take locks, since another thread of the parent may have been holding
    /// them at the time of the fork.
    pub unsafe fn pre_exec<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut() -> Result<(), Errno> + Send + Sync + 'static,
    {
        self.pre_exec.push(Box::new(f));
        self
    }

    /// Returns the path to the program.
    pub fn get_program(&self) -> &OsStr {
        OsStr::from_bytes(self.program.to_bytes())
    }

    /// Returns the environment variables explicitly set for the child. A value
    /// of `None` means the variable has been removed.
    pub fn get_envs(&self) -> impl Iterator<Item = (&OsStr, Option<&OsStr>)> {
        self.env.iter()
    }

    /// Gets the value of an environment variable as the child will see it.
    pub fn get_env<K: AsRef<OsStr>>(&self, env: K) -> Option<Cow<OsStr>> {
        self.env.get_captured(env)
    }

    pub(super) fn env_array(&self) -> CStringArray {
        self.env.array()
    }

    /// Finds the path to the program. A program without a path separator is
    /// looked up in the child's `PATH`. Any other relative path is taken
    /// relative to the current directory.
    pub fn find_program(&self) -> io::Result<PathBuf> {
        let program = Path::new(self.get_program());

        if program.is_absolute() {
            // Note: We shouldn't canonicalize here since that will follow
            // symlinks. Instead, just make sure the file exists and is
            // executable.
            let metadata = program.metadata()?;

            if is_executable(&metadata) {
                Ok(program.to_path_buf())
            } else {
                Err(Errno::EACCES.into())
            }
        } else if program.components().count() == 1 {
            let path = self.get_env("PATH").unwrap_or_default();

            let paths = path
                .as_bytes()
                .split(|c| *c == b':')
                .map(|bytes| Path::new(OsStr::from_bytes(bytes)));

            find_program_in_paths(program, paths)
                .ok_or_else(|| io::Error::from(Errno::ENOENT))?
                .canonicalize()
        } else {
            let path = std::env::current_dir()?.join(program);
            let metadata = path.metadata()?;
            if is_executable(&metadata) {
                path.canonicalize()
            } else {
                Err(Errno::EACCES.into())
            }
        }
    }
}

fn is_executable(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

fn find_program_in_paths<I, S>(program: &Path, iter: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    iter.into_iter()
        .map(|dir| dir.as_ref().join(program))
        .find(|path| path.metadata().map_or(false, |m| is_executable(&m)))
}
