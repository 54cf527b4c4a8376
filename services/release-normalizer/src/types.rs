use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::NormalizerError;

// Dictionary partitions, closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Version,
    General,
    Artist,
    Genres,
    Label,
    Distr,
    ReleaseTypes
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Version,
        Category::General,
        Category::Artist,
        Category::Genres,
        Category::Label,
        Category::Distr,
        Category::ReleaseTypes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Version      => "version",
            Category::General      => "general",
            Category::Artist       => "artist",
            Category::Genres       => "genres",
            Category::Label        => "label",
            Category::Distr        => "distr",
            Category::ReleaseTypes => "release_types"
        }
    }

    pub fn parse(s: &str) -> Result<Category, NormalizerError> {
        match s {
            "version"       => Ok(Category::Version),
            "general"       => Ok(Category::General),
            "artist"        => Ok(Category::Artist),
            "genres"        => Ok(Category::Genres),
            "label"         => Ok(Category::Label),
            "distr"         => Ok(Category::Distr),
            "release_types" => Ok(Category::ReleaseTypes),
            other => Err(NormalizerError::UnknownCategory(other.to_string()))
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a dictionary lookup. `Untranslated` is a recorded term
/// whose translation is an explicit null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Translated(String),
    Untranslated,
    NotPresent
}

/// Resolved (native, latin) rendering of a display string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermPair {
    pub native: Option<String>,
    pub latin: Option<String>
}

impl TermPair {
    pub fn new(native: Option<&str>, latin: Option<&str>) -> Self {
        Self {
            native: native.map(str::to_string),
            latin: latin.map(str::to_string)
        }
    }

    /// Latin form when one exists, otherwise the native one
    pub fn preferred(&self) -> Option<&str> {
        self.latin.as_deref().or(self.native.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseType {
    Album,
    Single
}

impl ReleaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseType::Album  => "Album",
            ReleaseType::Single => "Single"
        }
    }
    pub fn parse(s: &str) -> Option<ReleaseType> {
        match s.trim() {
            "Album"  => Some(ReleaseType::Album),
            "Single" => Some(ReleaseType::Single),
            _ => None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Media {
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "WEB")]
    Web
}

impl Media {
    pub fn as_str(self) -> &'static str {
        match self {
            Media::Cd  => "CD",
            Media::Web => "WEB"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    #[serde(rename = "FLAC")]
    Flac,
    #[serde(rename = "MP3")]
    Mp3
}

impl AudioFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioFormat::Flac => "FLAC",
            AudioFormat::Mp3  => "MP3"
        }
    }

    /// Bitrate label the catalog expects for each format
    pub fn bitrate(self) -> &'static str {
        match self {
            AudioFormat::Flac => "Lossless",
            AudioFormat::Mp3  => "320"
        }
    }

    pub fn from_extension(ext: &str) -> Option<AudioFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "flac" => Some(AudioFormat::Flac),
            "mp3"  => Some(AudioFormat::Mp3),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip() -> Result<(), NormalizerError> {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str())?, category);
        }
        Ok(())
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = Category::parse("labels").unwrap_err();
        assert!(matches!(err, NormalizerError::UnknownCategory(name) if name == "labels"));
    }

    #[test]
    fn release_type_accepts_only_album_and_single() {
        assert_eq!(ReleaseType::parse(" Album\n"), Some(ReleaseType::Album));
        assert_eq!(ReleaseType::parse("Single"), Some(ReleaseType::Single));
        assert_eq!(ReleaseType::parse("EP"), None);
        assert_eq!(ReleaseType::parse("album"), None);
    }

    #[test]
    fn extension_detection_ignores_case() {
        assert_eq!(AudioFormat::from_extension("FLAC"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_extension("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("log"), None);
    }
}
