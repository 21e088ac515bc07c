//! The fixed list of names a user picks from.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};

/// One catalog record as stored in the names JSON file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NameEntry {
    pub id: u64,
    pub name: String,
}

/// A selectable catalog row: the entry id and its numbered display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameOption {
    pub id: u64,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct NameCatalog {
    entries: Vec<NameEntry>,
}

impl NameCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(entries: Vec<NameEntry>) -> CardResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for e in &entries {
            if !seen.insert(e.id) {
                return Err(CardError::validation(format!(
                    "duplicate name id {} in catalog",
                    e.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{ "id": .., "name": .. }` records.
    pub fn from_reader(reader: impl std::io::Read) -> CardResult<Self> {
        let entries: Vec<NameEntry> = serde_json::from_reader(reader)
            .map_err(|e| CardError::serde(format!("parse name catalog JSON: {e}")))?;
        Self::new(entries)
    }

    pub fn from_path(path: &Path) -> CardResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open name catalog '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&NameEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All rows, labelled `"{position}. {name}"` with 1-based positions.
    pub fn options(&self) -> Vec<NameOption> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| NameOption {
                id: e.id,
                label: format!("{}. {}", i + 1, e.name),
            })
            .collect()
    }

    /// Rows whose label contains `query`, ignoring case and Vietnamese diacritics.
    pub fn search(&self, query: &str) -> Vec<NameOption> {
        let needle = fold_vietnamese(query);
        self.options()
            .into_iter()
            .filter(|o| fold_vietnamese(&o.label).contains(&needle))
            .collect()
    }
}

const FOLD_GROUPS: &[(&str, char)] = &[
    ("àáạảãâầấậẩẫăằắặẳẵ", 'a'),
    ("èéẹẻẽêềếệểễ", 'e'),
    ("ìíịỉĩ", 'i'),
    ("òóọỏõôồốộổỗơờớợởỡ", 'o'),
    ("ùúụủũưừứựửữ", 'u'),
    ("ỳýỵỷỹ", 'y'),
    ("đ", 'd'),
];

fn fold_char(c: char) -> char {
    FOLD_GROUPS
        .iter()
        .find(|(group, _)| group.contains(c))
        .map_or(c, |(_, base)| *base)
}

/// Lowercase `s` and strip Vietnamese tone and vowel marks (`đ` becomes `d`).
///
/// Both precomposed letters and decomposed combining marks are handled.
pub fn fold_vietnamese(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(fold_char)
        .collect()
}
