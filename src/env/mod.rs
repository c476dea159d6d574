
use std::collections::HashMap;

/// A source of variable values consulted during evaluation.
///
/// `None` means the variable is unset, which is distinct from being set
/// to the empty string.
pub trait Environment {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl Environment for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(ToOwned::to_owned)
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// An environment that reads from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into())
    }
}

/// An environment backed by a name to value mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl Environment for MapEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.0.get(name).map(ToOwned::to_owned)
    }
}

impl From<HashMap<String, String>> for MapEnv {
    fn from(value: HashMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(HashMap::from_iter(iter.into_iter().map(|(k, v)| {
            (k.as_ref().to_owned(), v.as_ref().to_owned())
        })))
    }
}

/// An environment built from `NAME=VALUE` entries, as found in a process
/// environment block.
///
/// Entries are split on the first `=`; entries without one are ignored.
/// When a name repeats, the later entry wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SliceEnv(HashMap<String, String>);

impl SliceEnv {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries.into_iter().collect()
    }
}

impl Environment for SliceEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.0.get(name).map(ToOwned::to_owned)
    }
}

impl<S> FromIterator<S> for SliceEnv
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter_map(|entry| {
                    entry
                        .as_ref()
                        .split_once('=')
                        .map(|(k, v)| (k.to_owned(), v.to_owned()))
                })
                .collect(),
        )
    }
}
