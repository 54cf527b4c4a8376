//!
//! src/resolver.rs  Andrew Belles  Oct 16th, 2026
//!
//! Maps a raw display string to its (native, latin) pair, reading and
//! growing the dictionary as new native terms show up. Handles the
//! "Name (Alt Name)" convention in either script order.
//!

use tracing::debug;

use crate::dictionary::DictionaryStore;
use crate::errors::NormalizerError;
use crate::language::is_non_latin;
use crate::types::{Category, Lookup, TermPair};

pub const VARIOUS_ARTISTS: &str = "Various Artists";

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// Splits "PRE (INNER)" into its trimmed halves. INNER stops at a second
/// opening parenthesis and has every closing one removed
fn split_parenthetical(s: &str) -> Option<(&str, String)> {
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    if close < open {
        return None;
    }

    let pre = s[..open].trim();
    let rest = &s[open + 1..];
    let segment = rest.split('(').next().unwrap_or(rest);
    let inner = segment.replace(')', "").trim().to_string();

    Some((pre, inner))
}

pub fn resolve(
    store: &mut DictionaryStore<'_>,
    raw: &str,
    category: Category
) -> Result<TermPair, NormalizerError> {
    let term = raw.trim();

    if term == VARIOUS_ARTISTS {
        return Ok(TermPair::new(Some(VARIOUS_ARTISTS), None));
    }

    let pair = match split_parenthetical(term) {
        Some((pre, inner)) => resolve_parenthetical(store, term, pre, &inner, category)?,
        None if is_non_latin(term) => resolve_native(store, term, category)?,
        None => resolve_latin(store, term, category)?,
    };

    debug!(
        category = %category, raw = term,
        native = ?pair.native, latin = ?pair.latin,
        "resolver.resolve"
    );
    Ok(pair)
}

fn resolve_parenthetical(
    store: &mut DictionaryStore<'_>,
    term: &str,
    pre: &str,
    inner: &str,
    category: Category
) -> Result<TermPair, NormalizerError> {
    let pair = match (is_non_latin(pre), is_non_latin(inner)) {
        // two native synonyms, neither translates the other
        (true, true) => {
            store.upsert(category, pre, None)?;
            store.upsert(category, inner, None)?;
            TermPair::new(Some(pre), None)
        }
        (true, false) => {
            let latin = non_empty(inner);
            store.upsert(category, pre, latin)?;
            TermPair::new(Some(pre), latin)
        }
        (false, true) => {
            let latin = non_empty(pre);
            store.upsert(category, inner, latin)?;
            TermPair::new(Some(inner), latin)
        }
        (false, false) => {
            match non_empty(pre).or(non_empty(inner)) {
                Some(latin) => {
                    debug!(latin, alias = inner, "resolver.latin_alias_dropped");
                    TermPair::new(None, Some(latin))
                }
                None => TermPair::new(Some(term), Some(term)),
            }
        }
    };
    Ok(pair)
}

fn resolve_native(
    store: &mut DictionaryStore<'_>,
    term: &str,
    category: Category
) -> Result<TermPair, NormalizerError> {
    let pair = match store.lookup(category, term)? {
        Lookup::Translated(latin) => TermPair::new(Some(term), Some(&latin)),
        Lookup::Untranslated => TermPair::new(Some(term), None),
        Lookup::NotPresent => {
            store.upsert(category, term, None)?;
            TermPair::new(Some(term), None)
        }
    };
    Ok(pair)
}

/// Reverse scan: first native key whose translation equals `term`
fn resolve_latin(
    store: &DictionaryStore<'_>,
    term: &str,
    category: Category
) -> Result<TermPair, NormalizerError> {
    let matched = store.entries(category)?
        .find(|(_, translation)| *translation == Some(term))
        .map(|(native, _)| native);

    Ok(match matched {
        Some(native) => TermPair::new(Some(native), Some(term)),
        None => TermPair::new(Some(term), Some(term)),
    })
}
