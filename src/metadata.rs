//! Typed metadata model: object fields keyed by display filename.

use std::collections::HashMap;

/// User-defined metadata of a single object, in a fixed field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing the value in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// S3 hands metadata back as an unordered map, so fields are sorted by name
/// to keep column discovery reproducible between runs.
impl From<HashMap<String, String>> for Fields {
    fn from(map: HashMap<String, String>) -> Self {
        let mut entries: Vec<(String, String)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// Scraped metadata keyed by display filename, in discovery order.
///
/// Inserting a filename that is already present replaces its fields but keeps
/// its original position, so when short filenames collide the last object
/// listed wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataSet {
    entries: Vec<(String, Fields)>,
    index: HashMap<String, usize>,
}

impl MetadataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert fields for a filename. Returns the fields that were replaced,
    /// if any.
    pub fn insert(&mut self, filename: impl Into<String>, fields: Fields) -> Option<Fields> {
        let filename = filename.into();
        match self.index.get(&filename) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, fields)),
            None => {
                self.index.insert(filename.clone(), self.entries.len());
                self.entries.push((filename, fields));
                None
            }
        }
    }

    pub fn get(&self, filename: &str) -> Option<&Fields> {
        self.index.get(filename).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fields)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every field name across all entries, deduplicated in first-seen order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .flat_map(|(_, fields)| fields.names())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Render an object key as a display filename.
///
/// With `short` set only the part after the last `/` is kept; a key without
/// any `/` is returned whole.
pub fn display_filename(key: &str, short: bool) -> &str {
    if short {
        key.rsplit('/').next().unwrap_or(key)
    } else {
        key
    }
}

/// Output file stem for a prefix: its last non-empty path segment, or
/// `output` when there is none.
pub fn output_stem(prefix: Option<&str>) -> &str {
    prefix
        .and_then(|p| p.split('/').rev().find(|segment| !segment.is_empty()))
        .unwrap_or("output")
}
