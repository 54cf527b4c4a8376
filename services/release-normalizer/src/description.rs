//!
//! src/description.rs  Andrew Belles  Oct 16th, 2026
//!
//! Album description sources: a tracklist generated from the tags, or
//! a description saved earlier under an external identifier
//!

use std::{fs, path::{Path, PathBuf}};

use url::Url;

use crate::errors::NormalizerError;

pub trait DescriptionSource {
    /// Previously stored description for `id`
    fn fetch(&self, id: &str) -> Result<String, NormalizerError>;
    /// Stores `contents` under `id` and returns what was stored
    fn store(&self, id: &str, contents: &str) -> Result<String, NormalizerError>;
}

/// Descriptions kept as `{directory}/{id}.log`
pub struct LogDirectory {
    root: PathBuf
}

impl LogDirectory {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.log", sanitize_id(id)))
    }
}

/// Path separators cannot appear in a file name
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

impl DescriptionSource for LogDirectory {
    fn fetch(&self, id: &str) -> Result<String, NormalizerError> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path)?;
        tracing::debug!(path = %path.display(), "description.fetch");
        Ok(contents)
    }

    fn store(&self, id: &str, contents: &str) -> Result<String, NormalizerError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(id);
        fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), "description.store");
        fs::read_to_string(&path).map_err(NormalizerError::from)
    }
}

/// One tracklist line, e.g. "[b]1-03[/b]. Title"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracklistEntry {
    pub disc: Option<String>,
    pub track: String,
    pub title: String
}

impl TracklistEntry {
    pub fn render(&self) -> String {
        match &self.disc {
            Some(disc) => format!("[b]{disc}-{}[/b]. {}", self.track, self.title),
            None => format!("[b]{}[/b]. {}", self.track, self.title),
        }
    }

    fn sort_key(&self) -> (u32, u32, &str) {
        let disc = self.disc.as_deref().and_then(|d| d.parse().ok()).unwrap_or(0);
        let track = self.track.parse().unwrap_or(u32::MAX);
        (disc, track, self.title.as_str())
    }
}

pub fn generate_tracklist(entries: &[TracklistEntry]) -> String {
    let mut sorted: Vec<&TracklistEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let lines: Vec<String> = sorted.iter().map(|e| e.render()).collect();
    format!("[size=5][b]Tracklist[/b][/size]\n{}", lines.join("\n"))
}

/// Link back to the store page the release was sourced from
pub fn release_description(source_url: &Url, comment: Option<&str>) -> String {
    match comment.map(str::trim).filter(|c| !c.is_empty()) {
        Some(id) => format!("Sourced from [url={source_url}{id}]Bugs[/url]"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(disc: Option<&str>, track: &str, title: &str) -> TracklistEntry {
        TracklistEntry {
            disc: disc.map(str::to_string),
            track: track.to_string(),
            title: title.to_string()
        }
    }

    #[test]
    fn tracklist_is_ordered_by_disc_then_track() {
        let block = generate_tracklist(&[
            entry(Some("2"), "01", "Encore"),
            entry(Some("1"), "02", "Palette"),
            entry(Some("1"), "01", "이런 엔딩"),
        ]);
        assert_eq!(
            block,
            "[size=5][b]Tracklist[/b][/size]\n\
             [b]1-01[/b]. 이런 엔딩\n\
             [b]1-02[/b]. Palette\n\
             [b]2-01[/b]. Encore"
        );
    }

    #[test]
    fn entries_without_disc_omit_it() {
        assert_eq!(entry(None, "07", "Celebrity").render(), "[b]07[/b]. Celebrity");
    }

    #[test]
    fn stored_descriptions_can_be_fetched() -> Result<(), NormalizerError> {
        let dir = tempfile::tempdir()?;
        let logs = LogDirectory::new(dir.path().join("logs"));

        let stored = logs.store("IU - LILAC", "[b]01[/b]. 라일락")?;
        assert_eq!(stored, "[b]01[/b]. 라일락");
        assert_eq!(logs.fetch("IU - LILAC")?, stored);
        assert!(logs.fetch("3000001").is_err());
        Ok(())
    }

    #[test]
    fn release_description_needs_an_identifier() {
        let base = Url::parse("https://music.bugs.co.kr/album/").unwrap();
        assert_eq!(
            release_description(&base, Some("4052431")),
            "Sourced from [url=https://music.bugs.co.kr/album/4052431]Bugs[/url]"
        );
        assert_eq!(release_description(&base, None), "");
        assert_eq!(release_description(&base, Some("  ")), "");
    }
}
