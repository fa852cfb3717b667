/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::ffi::OsString;

use super::util::to_cstring;
use super::util::CStringArray;

/// Changes to the environment the child will inherit. A value of `None` marks
/// a variable as removed.
#[derive(Default, Clone, Debug)]
pub struct Env {
    clear: bool,
    vars: BTreeMap<OsString, Option<OsString>>,
}

impl Env {
    /// Drops every inherited variable. Variables set afterwards are the only
    /// ones the child sees.
    pub fn clear(&mut self) {
        self.clear = true;
        self.vars.clear();
    }

    pub fn set(&mut self, key: &OsStr, value: &OsStr) {
        self.vars.insert(key.to_owned(), Some(value.to_owned()));
    }

    pub fn remove(&mut self, key: &OsStr) {
        if self.clear {
            self.vars.remove(key);
        } else {
            self.vars.insert(key.to_owned(), None);
        }
    }

    /// Looks up a variable the way the child will see it, taking the parent's
    /// environment into account.
    pub fn get_captured<K: AsRef<OsStr>>(&self, key: K) -> Option<Cow<OsStr>> {
        let key = key.as_ref();

        match self.vars.get(key) {
            Some(value) => value.as_deref().map(Cow::Borrowed),
            None if self.clear => None,
            None => std::env::var_os(key).map(Cow::Owned),
        }
    }

    fn capture(&self) -> BTreeMap<OsString, OsString> {
        let mut env: BTreeMap<_, _> = if self.clear {
            BTreeMap::new()
        } else {
            std::env::vars_os().collect()
        };

        for (key, value) in &self.vars {
            match value {
                Some(value) => env.insert(key.clone(), value.clone()),
                None => env.remove(key),
            };
        }

        env
    }

    /// Builds the `envp` array passed to `execve`.
    pub fn array(&self) -> CStringArray {
        let env = self.capture();

        let mut result = CStringArray::with_capacity(env.len());
        for (mut entry, value) in env {
            entry.reserve_exact(value.len() + 1);
            entry.push("=");
            entry.push(&value);
            result.push(to_cstring(entry));
        }

        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, Option<&OsStr>)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_env_only_has_explicit_vars() {
        let mut env = Env::default();
        env.clear();
        env.set(OsStr::new("B"), OsStr::new("2"));
        env.set(OsStr::new("A"), OsStr::new("1"));

        let array = env.array();
        let entries: Vec<_> = array.iter().map(|s| s.to_bytes().to_vec()).collect();
        assert_eq!(entries, [b"A=1".to_vec(), b"B=2".to_vec()]);
    }

    #[test]
    fn removed_var_is_hidden() {
        let mut env = Env::default();
        env.remove(OsStr::new("PATH"));
        assert_eq!(env.get_captured("PATH"), None);
        assert!(
            !env.array()
                .iter()
                .any(|entry| entry.to_bytes().starts_with(b"PATH="))
        );
    }
}
