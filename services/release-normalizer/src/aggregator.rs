//!
//! src/aggregator.rs  Andrew Belles  Oct 16th, 2026
//!
//! Turns the tracks of one release directory into a single release
//! record: scan and homogeneity checks, term resolution, release type,
//! descriptions and the final language gate.
//!
//!

use std::{fs, path::{Path, PathBuf}};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::DescriptionConfig;
use crate::description::{self, DescriptionSource, TracklistEntry};
use crate::dictionary::DictionaryStore;
use crate::errors::NormalizerError;
use crate::language::needs_romanization;
use crate::prompt::{OperatorPrompt, Question};
use crate::release::ReleaseRecord;
use crate::resolver::{self, VARIOUS_ARTISTS};
use crate::tags::{TagReader, TagRecord};
use crate::types::{AudioFormat, Category, Media, ReleaseType};

pub const VARIOUS_ARTISTS_TOKEN: &str = "V.A.";

const GROUPING_EMPTY: &str =
    "Grouping is empty or has received an error, please enter manually (Album/Single)";
const GROUPING_INVALID: &str =
    "Grouping tag did not return an album type, please enter manually (Album/Single)";
const ROMANIZE_TITLE: &str =
    "Korean/Japanese Detected. Please enter the romaji/english title:";
const ROMANIZE_ARTIST: &str =
    "Korean/Japanese Detected. Please enter the romaji/english artist name:";

#[derive(Debug, Clone)]
pub struct ScannedTrack {
    pub path: PathBuf,
    pub tags: TagRecord
}

impl ScannedTrack {
    fn tracklist_entry(&self) -> TracklistEntry {
        let title = self.tags.title.clone().unwrap_or_else(|| {
            self.path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        });
        TracklistEntry {
            disc: self.tags.disc_number.clone(),
            track: self.tags.track_number.clone(),
            title
        }
    }
}

/// Everything gathered from the directory before any term is resolved.
/// Collections are de-duplicated and keep first-seen order
#[derive(Debug, Clone)]
pub struct ScannedRelease {
    pub format: AudioFormat,
    pub media: Media,
    pub tracks: Vec<ScannedTrack>,
    pub album_artists: Vec<String>,
    pub track_artists: Vec<String>,
    pub albums: Vec<String>,
    pub genres: Vec<String>
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Reads every track in `dir`, in file name order. Aborts on the first
/// track whose format differs from the ones before it
pub fn scan(dir: &Path, reader: &dyn TagReader) -> Result<ScannedRelease, NormalizerError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| p.is_file());
    paths.sort();

    let mut format: Option<AudioFormat> = None;
    let mut media = Media::Web;
    let mut tracks = Vec::new();
    let (mut album_artists, mut track_artists) = (Vec::new(), Vec::new());
    let (mut albums, mut genres) = (Vec::new(), Vec::new());

    for path in paths {
        let Some(ext) = extension(&path) else { continue };

        // rip logs only exist for CD sources
        if ext == "log" {
            media = Media::Cd;
            continue;
        }
        let Some(detected) = AudioFormat::from_extension(&ext) else { continue };

        match format {
            Some(seen) if seen != detected => {
                warn!(file = %path.display(), "aggregate.mixed_format");
                return Err(NormalizerError::MixedFormat(
                    seen.as_str().to_string(), detected.as_str().to_string()
                ));
            }
            _ => format = Some(detected),
        }

        let mut tags = reader.read(&path)?;

        // some writers pack several genres into one field
        if tags.genres.len() == 1 {
            tags.genres = tags.genres[0].split(';').map(str::to_string).collect();
        }

        tags.album_artists.iter().for_each(|a| push_unique(&mut album_artists, a));
        tags.artists.iter().for_each(|a| push_unique(&mut track_artists, a));
        tags.genres.iter().for_each(|g| push_unique(&mut genres, g));
        push_unique(&mut albums, &tags.album);

        debug!(file = %path.display(), format = detected.as_str(), "aggregate.scan");
        tracks.push(ScannedTrack { path, tags });
    }

    let format = format.ok_or_else(|| NormalizerError::NoTracks(dir.to_path_buf()))?;

    Ok( ScannedRelease {
        format, media, tracks, album_artists, track_artists, albums, genres
    })
}

/// Per-run options that come from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub extra_tags: Vec<String>,
    pub freeleech: bool
}

pub struct Aggregator<'a, 'r> {
    cfg: &'a DescriptionConfig,
    store: &'a mut DictionaryStore<'r>,
    reader: &'a dyn TagReader,
    descriptions: &'a dyn DescriptionSource,
    prompt: &'a mut dyn OperatorPrompt
}

impl<'a, 'r> Aggregator<'a, 'r> {
    pub fn new(
        cfg: &'a DescriptionConfig,
        store: &'a mut DictionaryStore<'r>,
        reader: &'a dyn TagReader,
        descriptions: &'a dyn DescriptionSource,
        prompt: &'a mut dyn OperatorPrompt
    ) -> Self {
        Self { cfg, store, reader, descriptions, prompt }
    }

    pub fn gather(&mut self, dir: &Path, opts: &RunOptions) ->
        Result<ReleaseRecord, NormalizerError> {

        let scanned = scan(dir, self.reader)?;
        info!(
            dir = %dir.display(),
            tracks = scanned.tracks.len(),
            format = scanned.format.as_str(),
            media = scanned.media.as_str(),
            track_artists = ?scanned.track_artists,
            "aggregate.scanned"
        );

        let mut genres = scanned.genres.clone();
        opts.extra_tags.iter().for_each(|t| push_unique(&mut genres, t));

        let tags = self.resolve_genres(&genres)?;
        let artist = self.resolve_album_artists(&scanned.album_artists)?;
        let release_type = self.resolve_release_type(&scanned)?;

        let first = &scanned.tracks.first()
            .ok_or_else(|| NormalizerError::NoTracks(dir.to_path_buf()))?
            .tags;
        if scanned.albums.len() > 1 {
            warn!(albums = ?scanned.albums, "aggregate.album_mismatch");
        }
        let title = first.album.clone();
        let release_date = release_date(&first.date);

        let album_desc = self.album_description(dir, &scanned, &artist, &title)?;
        let comment = scanned.tracks.iter().find_map(|t| t.tags.comment.as_deref());
        let release_desc = if self.cfg.enable_release_description {
            description::release_description(&self.cfg.source_url, comment)
        } else {
            String::new()
        };

        let (title, title_native) =
            self.language_gate(title, Question::RomanizedTitle, ROMANIZE_TITLE)?;
        let credit = track_credit(&scanned.track_artists, &artist);
        let (artist, romanized_from) =
            self.language_gate(artist, Question::RomanizedArtist, ROMANIZE_ARTIST)?;
        let artist_native = romanized_from.or(credit);

        Ok( ReleaseRecord {
            submit: true,
            release_type,
            title,
            title_native,
            artist,
            artist_native,
            release_date,
            format: scanned.format,
            bitrate: scanned.format.bitrate().to_string(),
            media: scanned.media,
            album_desc,
            release_desc,
            tags,
            freeleech: opts.freeleech
        })
    }

    fn resolve_genres(&mut self, genres: &[String]) -> Result<String, NormalizerError> {
        let mut resolved = Vec::new();
        for genre in genres {
            let pair = resolver::resolve(self.store, genre, Category::Genres)?;
            if pair.latin.is_none() {
                warn!(genre = %genre, "aggregate.genre_untranslated");
            }
            if let Some(form) = pair.preferred() {
                push_unique(&mut resolved, form);
            }
        }
        Ok(resolved.join(","))
    }

    fn resolve_album_artists(&mut self, artists: &[String]) -> Result<String, NormalizerError> {
        let mut resolved = Vec::new();
        for artist in artists {
            if artist == VARIOUS_ARTISTS {
                push_unique(&mut resolved, VARIOUS_ARTISTS_TOKEN);
                continue;
            }
            let pair = resolver::resolve(self.store, artist, Category::Artist)?;
            if let Some(form) = pair.preferred() {
                push_unique(&mut resolved, form);
            }
        }
        Ok(resolved.join(","))
    }

    /// Grouping through the dictionary, then the operator until the
    /// answer is Album or Single
    fn resolve_release_type(&mut self, scanned: &ScannedRelease) -> Result<ReleaseType, NormalizerError> {
        let grouping = scanned.tracks.iter()
            .find_map(|t| t.tags.grouping.as_deref())
            .map(str::trim)
            .filter(|g| !g.is_empty());

        let resolved = match grouping {
            Some(g) => resolver::resolve(self.store, g, Category::ReleaseTypes)?.latin,
            None => None,
        };
        if let Some(release_type) = resolved.as_deref().and_then(ReleaseType::parse) {
            return Ok(release_type);
        }

        let mut message = if grouping.is_none() { GROUPING_EMPTY } else { GROUPING_INVALID };
        loop {
            let answer = self.prompt.ask(Question::ReleaseType, message)?;
            if let Some(release_type) = ReleaseType::parse(&answer) {
                info!(release_type = release_type.as_str(), "aggregate.release_type.manual");
                return Ok(release_type);
            }
            warn!(answer = %answer, "aggregate.release_type.rejected");
            message = GROUPING_INVALID;
        }
    }

    fn album_description(
        &self,
        dir: &Path,
        scanned: &ScannedRelease,
        artist: &str,
        album: &str
    ) -> Result<String, NormalizerError> {
        if self.cfg.generate_tracklist {
            let entries: Vec<TracklistEntry> = scanned.tracks.iter()
                .map(ScannedTrack::tracklist_entry)
                .collect();
            let block = description::generate_tracklist(&entries);
            if self.cfg.save_tracklist {
                return self.descriptions.store(&format!("{artist} - {album}"), &block);
            }
            return Ok(block);
        }

        // the comment tag carries the id the description was saved under
        let id = scanned.tracks.iter()
            .find_map(|t| t.tags.comment.as_deref())
            .ok_or_else(|| NormalizerError::MissingRequiredTag {
                tag: "COMMENT".to_string(),
                path: dir.to_path_buf()
            })?;
        self.descriptions.fetch(id)
    }

    /// Returns (latin value, original when it had to be replaced)
    fn language_gate(
        &mut self,
        value: String,
        question: Question,
        message: &str
    ) -> Result<(String, Option<String>), NormalizerError> {
        if !needs_romanization(&value) {
            return Ok((value, None));
        }
        let answer = self.prompt.ask(question, message)?;
        info!(question = question.as_str(), original = %value, replacement = %answer, "aggregate.romanized");
        Ok((answer.trim().to_string(), Some(value)))
    }
}

/// Track artists as one credit, only when it says something the album
/// artist does not
fn track_credit(track_artists: &[String], album_artist: &str) -> Option<String> {
    let credit = track_artists.join(",");
    if credit.is_empty() || credit == album_artist {
        None
    } else {
        Some(credit)
    }
}

/// Keeps digits only; the catalog rejects separators
fn release_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let valid = match digits.len() {
        8 => NaiveDate::parse_from_str(&digits, "%Y%m%d").is_ok(),
        4 => true,
        _ => false,
    };
    if !valid {
        warn!(raw, digits = %digits, "aggregate.release_date.unusual");
    }
    digits
}
