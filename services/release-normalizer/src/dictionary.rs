//!
//! src/dictionary.rs  Andrew Belles  Oct 16th, 2026
//!
//! Persistent bilingual dictionary: category -> native term -> translation
//! or explicit null. Every upsert is merged into a freshly loaded copy of
//! the backing file and written back before returning.
//!

use std::{collections::BTreeMap, fs, path::{Path, PathBuf}};
use std::io::Write;

use serde::Serialize;

use crate::errors::NormalizerError;
use crate::types::{Category, Lookup};

pub type Terms = BTreeMap<String, Option<String>>;

/// Full in-memory copy of the dictionary. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    categories: BTreeMap<Category, Terms>
}

impl Default for Snapshot {
    fn default() -> Self {
        let categories = Category::ALL.iter()
            .map(|c| (*c, Terms::new()))
            .collect();
        Self { categories }
    }
}

impl Snapshot {
    pub fn terms(&self, category: Category) -> Result<&Terms, NormalizerError> {
        self.categories.get(&category)
            .ok_or_else(|| NormalizerError::CategoryNotFound(category.to_string()))
    }

    pub fn lookup(&self, category: Category, term: &str) -> Result<Lookup, NormalizerError> {
        let lookup = match self.terms(category)?.get(term) {
            None => Lookup::NotPresent,
            Some(None) => Lookup::Untranslated,
            Some(Some(t)) => Lookup::Translated(t.clone()),
        };
        Ok(lookup)
    }

    /// Insert when absent; overwrite only when a translation is supplied.
    /// Returns whether the snapshot changed
    pub fn apply(&mut self, category: Category, term: &str, translation: Option<&str>) -> bool {
        let terms = self.categories.entry(category).or_default();
        let changed = match (terms.contains_key(term), translation) {
            (false, _) => true,
            (true, Some(t)) => terms.get(term).and_then(|v| v.as_deref()) != Some(t),
            (true, None) => false,
        };
        if changed {
            terms.insert(term.to_string(), translation.map(str::to_string));
        }
        changed
    }

    /// Folds `other` into `self`. Terms only `other` knows are added and null
    /// slots are filled; translations already in `self` are kept.
    pub fn merge_from(&mut self, other: &Snapshot) {
        for (category, terms) in &other.categories {
            let ours = self.categories.entry(*category).or_default();
            for (term, translation) in terms {
                let slot = ours.entry(term.clone()).or_insert(None);
                if slot.is_none() {
                    *slot = translation.clone();
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_json(data: &str) -> Result<Self, NormalizerError> {
        let raw: BTreeMap<String, Terms> = serde_json::from_str(data)
            .map_err(|e| NormalizerError::StoreCorrupt(e.to_string()))?;

        let mut snapshot = Snapshot::default();
        for (name, terms) in raw {
            let category = Category::parse(&name)
                .map_err(|_| NormalizerError::StoreCorrupt(
                    format!("unexpected category {name}")
                ))?;
            snapshot.categories.insert(category, terms);
        }
        Ok(snapshot)
    }

    /// Pretty JSON, four space indent, non-ascii written as-is
    pub fn to_json(&self) -> Result<Vec<u8>, NormalizerError> {
        let named: BTreeMap<&str, &Terms> = self.categories.iter()
            .map(|(c, t)| (c.as_str(), t))
            .collect();

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        named.serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Durable backing for the dictionary: load everything, replace everything
pub trait DictionaryRepository {
    fn load(&self) -> Result<Snapshot, NormalizerError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), NormalizerError>;
}

pub struct JsonFileRepository {
    path: PathBuf
}

impl JsonFileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl DictionaryRepository for JsonFileRepository {
    fn load(&self) -> Result<Snapshot, NormalizerError> {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "dictionary.missing");
            return Ok(Snapshot::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Snapshot::from_json(&data)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), NormalizerError> {
        let bytes = snapshot.to_json()?;
        let parent = self.parent_dir();

        fs::create_dir_all(&parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| NormalizerError::Io(e.error))?;
        Ok(())
    }
}

impl<R: DictionaryRepository + ?Sized> DictionaryRepository for &R {
    fn load(&self) -> Result<Snapshot, NormalizerError> { (**self).load() }
    fn save(&self, snapshot: &Snapshot) -> Result<(), NormalizerError> { (**self).save(snapshot) }
}

#[cfg(test)]
pub mod memory {
    use std::cell::RefCell;

    use super::{DictionaryRepository, Snapshot};
    use crate::errors::NormalizerError;

    /// Repository kept entirely in memory. `edit` stands in for a person
    /// changing the file behind the store's back.
    #[derive(Default)]
    pub struct MemoryRepository {
        stored: RefCell<Snapshot>
    }

    impl MemoryRepository {
        pub fn with(snapshot: Snapshot) -> Self {
            Self { stored: RefCell::new(snapshot) }
        }

        pub fn edit(&self, f: impl FnOnce(&mut Snapshot)) {
            f(&mut self.stored.borrow_mut());
        }

        pub fn stored(&self) -> Snapshot {
            self.stored.borrow().clone()
        }
    }

    impl DictionaryRepository for MemoryRepository {
        fn load(&self) -> Result<Snapshot, NormalizerError> {
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, snapshot: &Snapshot) -> Result<(), NormalizerError> {
            *self.stored.borrow_mut() = snapshot.clone();
            Ok(())
        }
    }
}

pub struct DictionaryStore<'r> {
    repo: Box<dyn DictionaryRepository + 'r>,
    snapshot: Snapshot
}

impl<'r> DictionaryStore<'r> {
    pub fn open(repo: impl DictionaryRepository + 'r) -> Result<Self, NormalizerError> {
        let snapshot = repo.load()?;
        tracing::debug!(terms = snapshot.len(), "dictionary.loaded");
        Ok( Self { repo: Box::new(repo), snapshot } )
    }

    pub fn lookup(&self, category: Category, term: &str) -> Result<Lookup, NormalizerError> {
        self.snapshot.lookup(category, term)
    }

    /// (term, translation) pairs of one category in key order
    pub fn entries(&self, category: Category) ->
        Result<impl Iterator<Item = (&str, Option<&str>)>, NormalizerError> {
        let terms = self.snapshot.terms(category)?;
        Ok(terms.iter().map(|(k, v)| (k.as_str(), v.as_deref())))
    }

    /// Transactional upsert: reload, merge, apply, write, then swap in
    pub fn upsert(
        &mut self,
        category: Category,
        term: &str,
        translation: Option<&str>
    ) -> Result<(), NormalizerError> {
        let mut fresh = self.repo.load()?;
        fresh.merge_from(&self.snapshot);
        let changed = fresh.apply(category, term, translation);

        self.repo.save(&fresh)?;
        self.snapshot = fresh;

        tracing::debug!(
            category = %category, term, translation = ?translation, changed,
            "dictionary.upsert"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
