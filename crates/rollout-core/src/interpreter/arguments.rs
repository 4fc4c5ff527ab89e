//! Bound command arguments.

/// Immutable, insertion-ordered `name -> value` map produced by
/// [`ArgumentMapBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArguments {
    entries: Vec<(String, Option<String>)>,
}

impl CommandArguments {
    /// Value bound to `name` (ignoring ASCII case). `None` both for unknown
    /// names and for declared arguments that were never supplied.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    /// Like [`get`](Self::get) but treats blank values as absent.
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates argument bindings while a command line is interpreted.
#[derive(Debug, Default)]
pub struct ArgumentMapBuilder {
    entries: Vec<(String, Option<String>)>,
}

impl ArgumentMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` with no value unless it is already present.
    pub fn declare(&mut self, name: &str) -> &mut Self {
        self.insert_if_absent(name, None)
    }

    /// Add `name` bound to `value` only when no entry with that name exists.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: Option<String>) -> &mut Self {
        let name = name.into();
        if !self.entries.iter().any(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            self.entries.push((name, value));
        }
        self
    }

    /// Bind `value` to `name`, overwriting an existing binding. Names are
    /// compared ignoring ASCII case; the first spelling is kept.
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) -> &mut Self {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn build(self) -> CommandArguments {
        CommandArguments {
            entries: self.entries,
        }
    }
}

impl FromIterator<(String, Option<String>)> for CommandArguments {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        let mut builder = ArgumentMapBuilder::new();
        for (name, value) in iter {
            builder.set(name, value);
        }
        builder.build()
    }
}
