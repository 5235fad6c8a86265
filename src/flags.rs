//! Flag model shared by every flag source.
//!
//! A [`Flag`] is one compiler switch plus an optional value. Order is
//! significant everywhere: compilers apply last-wins semantics, so a
//! [`FlagList`] is never sorted or deduplicated.

use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub switch: String,
    pub value: String,
}

impl Flag {
    pub fn new(switch: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            switch: switch.into(),
            value: value.into(),
        }
    }

    /// A lone switch such as `-Wall`.
    pub fn bare(switch: impl Into<String>) -> Self {
        Self::new(switch, "")
    }

    pub fn include(dir: &Path) -> Self {
        Self::new("-I", dir.to_string_lossy())
    }

    pub fn system_include(dir: &Path) -> Self {
        Self::new("-isystem", dir.to_string_lossy())
    }

    pub fn define(def: impl Into<String>) -> Self {
        Self::new("-D", def)
    }

    /// Render as argv tokens. Switches ending in `=` are joined with their value.
    pub fn to_args(&self) -> Vec<String> {
        if self.value.is_empty() {
            vec![self.switch.clone()]
        } else if self.switch.ends_with('=') {
            vec![format!("{}{}", self.switch, self.value)]
        } else {
            vec![self.switch.clone(), self.value.clone()]
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagList(Vec<Flag>);

impl FlagList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, flag: Flag) {
        self.0.push(flag);
    }

    pub fn extend(&mut self, other: FlagList) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flag> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Flag] {
        &self.0
    }

    /// Flatten into the token list handed to the analysis tool.
    pub fn to_args(&self) -> Vec<String> {
        self.0.iter().flat_map(Flag::to_args).collect()
    }
}

impl From<Vec<Flag>> for FlagList {
    fn from(flags: Vec<Flag>) -> Self {
        Self(flags)
    }
}

impl FromIterator<Flag> for FlagList {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FlagList {
    type Item = Flag;
    type IntoIter = std::vec::IntoIter<Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlagList {
    type Item = &'a Flag;
    type IntoIter = std::slice::Iter<'a, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
