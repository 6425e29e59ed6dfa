//! Deduplicating table of file paths keyed by small integer handles.
//!
//! Handles are what the preprocessor writes into `#line` markers, so the
//! normalizer can map compiler output back to the file it came from. A
//! registry belongs to one compile session; it never forgets a path.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PathHandle(pub u32);

impl PathHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for PathHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PathHandle {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u32>().map(PathHandle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: Vec<String>,
    handles: HashMap<String, PathHandle>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `path`, allocating the next one on first sight.
    ///
    /// Equality is on the path text; `a/b.glsl` and `a/./b.glsl` get distinct handles.
    pub fn store(&mut self, path: &str) -> PathHandle {
        if let Some(handle) = self.handles.get(path) {
            return *handle;
        }
        let handle = PathHandle(self.paths.len() as u32);
        self.paths.push(path.to_string());
        self.handles.insert(path.to_string(), handle);
        handle
    }

    pub fn retrieve(&self, handle: PathHandle) -> Result<&str> {
        self.paths
            .get(handle.index())
            .map(String::as_str)
            .ok_or(Error::UnknownHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Registered paths in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (PathHandle, &str)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(idx, path)| (PathHandle(idx as u32), path.as_str()))
    }
}
