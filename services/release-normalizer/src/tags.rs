//!
//! src/tags.rs  Andrew Belles  Oct 16th, 2026
//!
//! Per-track tag record and the reader that pulls it out of
//! FLAC / MP3 files
//!

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::errors::NormalizerError;

/// Fields the aggregator consumes from one track. Multi-valued fields keep
/// every value the tag carries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagRecord {
    pub album: String,
    pub album_artists: Vec<String>,
    pub artists: Vec<String>,
    pub date: String,
    pub genres: Vec<String>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub grouping: Option<String>,
    pub track_number: String,       // zero padded, "03"
    pub disc_number: Option<String>
}

pub trait TagReader {
    fn read(&self, path: &Path) -> Result<TagRecord, NormalizerError>;
}

/// Drops any "/total" suffix and pads to two digits
pub fn normalize_track_number(raw: &str) -> String {
    let number = raw.split('/').next().unwrap_or(raw).trim();
    format!("{number:0>2}")
}

pub fn normalize_disc_number(raw: &str) -> Option<String> {
    let number = raw.split('/').next().unwrap_or(raw).trim();
    if number.is_empty() { None } else { Some(number.to_string()) }
}

fn missing(tag: &str, path: &Path) -> NormalizerError {
    NormalizerError::MissingRequiredTag { tag: tag.to_string(), path: path.to_path_buf() }
}

#[derive(Debug, Default)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    fn first(tag: &Tag, key: &ItemKey) -> Option<String> {
        tag.get_string(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn all(tag: &Tag, key: &ItemKey) -> Vec<String> {
        tag.get_strings(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Result<TagRecord, NormalizerError> {
        let tagged_file = Probe::open(path)?.read()?;
        let tag = tagged_file.primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or_else(|| missing("ALBUM", path))?;

        let record = record_from_tag(tag, path)?;

        tracing::debug!(
            file = %path.display(),
            album = %record.album,
            track = %record.track_number,
            title = ?record.title,
            "tags.read"
        );
        Ok(record)
    }
}

/// Maps one tag onto the record, enforcing the required fields.
/// `path` is only used for error reporting
pub fn record_from_tag(tag: &Tag, path: &Path) -> Result<TagRecord, NormalizerError> {
    let first = LoftyTagReader::first;
    let all = LoftyTagReader::all;

    let album = first(tag, &ItemKey::AlbumTitle)
        .ok_or_else(|| missing("ALBUM", path))?;

    let album_artists = all(tag, &ItemKey::AlbumArtist);
    if album_artists.is_empty() {
        return Err(missing("ALBUMARTIST", path));
    }

    let date = first(tag, &ItemKey::RecordingDate)
        .or_else(|| first(tag, &ItemKey::Year))
        .ok_or_else(|| missing("DATE", path))?;

    let track_number = first(tag, &ItemKey::TrackNumber)
        .map(|t| normalize_track_number(&t))
        .ok_or_else(|| missing("TRACKNUMBER", path))?;

    // some writers use the content group key instead of grouping
    let grouping = first(tag, &ItemKey::ContentGroup)
        .or_else(|| first(tag, &ItemKey::Unknown("CONTENTGROUP".to_string())));

    Ok( TagRecord {
        album,
        album_artists,
        artists: all(tag, &ItemKey::TrackArtist),
        date,
        genres: all(tag, &ItemKey::Genre),
        title: first(tag, &ItemKey::TrackTitle),
        comment: first(tag, &ItemKey::Comment),
        grouping,
        track_number,
        disc_number: first(tag, &ItemKey::DiscNumber)
            .and_then(|d| normalize_disc_number(&d)),
    })
}

#[cfg(test)]
mod tests {
    use lofty::tag::{ItemValue, TagItem, TagType};

    use super::*;

    #[test]
    fn track_numbers_are_padded_and_trimmed() {
        assert_eq!(normalize_track_number("3"), "03");
        assert_eq!(normalize_track_number("3/12"), "03");
        assert_eq!(normalize_track_number("11"), "11");
        assert_eq!(normalize_track_number("101"), "101");
    }

    #[test]
    fn disc_numbers_drop_total() {
        assert_eq!(normalize_disc_number("1/2"), Some("1".to_string()));
        assert_eq!(normalize_disc_number(""), None);
    }

    fn text(tag: &mut Tag, key: ItemKey, value: &str) {
        tag.push_unchecked(TagItem::new(key, ItemValue::Text(value.to_string())));
    }

    fn complete_tag() -> Tag {
        let mut tag = Tag::new(TagType::VorbisComments);
        text(&mut tag, ItemKey::AlbumTitle, "LILAC");
        text(&mut tag, ItemKey::AlbumArtist, "아이유 (IU)");
        text(&mut tag, ItemKey::RecordingDate, "2021-03-25");
        text(&mut tag, ItemKey::TrackNumber, "3/12");
        text(&mut tag, ItemKey::TrackTitle, "Coin");
        tag
    }

    #[test]
    fn tag_maps_onto_record() -> Result<(), NormalizerError> {
        let mut tag = complete_tag();
        text(&mut tag, ItemKey::Genre, "K-Pop");
        text(&mut tag, ItemKey::Genre, "Ballad");
        text(&mut tag, ItemKey::DiscNumber, "1/1");

        let record = record_from_tag(&tag, Path::new("03 - Coin.flac"))?;
        assert_eq!(record.album, "LILAC");
        assert_eq!(record.album_artists, vec!["아이유 (IU)"]);
        assert_eq!(record.track_number, "03");
        assert_eq!(record.disc_number.as_deref(), Some("1"));
        assert_eq!(record.genres, vec!["K-Pop", "Ballad"]);
        assert_eq!(record.grouping, None);
        Ok(())
    }

    #[test]
    fn grouping_falls_back_to_content_group_field() -> Result<(), NormalizerError> {
        let mut tag = complete_tag();
        text(&mut tag, ItemKey::Unknown("CONTENTGROUP".to_string()), "Single");

        let record = record_from_tag(&tag, Path::new("03 - Coin.flac"))?;
        assert_eq!(record.grouping.as_deref(), Some("Single"));

        text(&mut tag, ItemKey::ContentGroup, "Album");
        let record = record_from_tag(&tag, Path::new("03 - Coin.flac"))?;
        assert_eq!(record.grouping.as_deref(), Some("Album"));
        Ok(())
    }

    #[test]
    fn missing_album_artist_is_reported() {
        let mut tag = Tag::new(TagType::VorbisComments);
        text(&mut tag, ItemKey::AlbumTitle, "LILAC");
        text(&mut tag, ItemKey::RecordingDate, "2021-03-25");
        text(&mut tag, ItemKey::TrackNumber, "1");

        let result = record_from_tag(&tag, Path::new("01 - LILAC.flac"));
        assert!(matches!(
            result,
            Err(NormalizerError::MissingRequiredTag { tag, path })
                if tag == "ALBUMARTIST" && path.ends_with("01 - LILAC.flac")
        ));
    }

    #[test]
    fn date_falls_back_to_year() -> Result<(), NormalizerError> {
        let mut tag = Tag::new(TagType::VorbisComments);
        text(&mut tag, ItemKey::AlbumTitle, "LILAC");
        text(&mut tag, ItemKey::AlbumArtist, "IU");
        text(&mut tag, ItemKey::Year, "2021");
        text(&mut tag, ItemKey::TrackNumber, "1");

        assert_eq!(record_from_tag(&tag, Path::new("01.flac"))?.date, "2021");
        Ok(())
    }

    #[test]
    fn unreadable_file_is_a_tag_error() -> Result<(), NormalizerError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("01 - broken.flac");
        std::fs::write(&path, b"not really flac")?;

        let result = LoftyTagReader.read(&path);
        assert!(matches!(result, Err(NormalizerError::TagRead(_))));
        Ok(())
    }
}
