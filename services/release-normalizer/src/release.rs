use serde::{Serialize, Serializer};

use crate::types::{AudioFormat, Media, ReleaseType};

fn form_flag<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *flag { "true" } else { "false" })
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Normalized release, serialized with the catalog's upload form names.
/// Built once by the aggregator and not modified afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    #[serde(serialize_with = "form_flag")]
    pub submit: bool,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    pub title: String,
    #[serde(rename = "titlejp", skip_serializing_if = "Option::is_none")]
    pub title_native: Option<String>,
    pub artist: String,
    #[serde(rename = "artistjp", skip_serializing_if = "Option::is_none")]
    pub artist_native: Option<String>,
    #[serde(rename = "releasedate")]
    pub release_date: String,
    pub format: AudioFormat,
    pub bitrate: String,
    pub media: Media,
    pub album_desc: String,
    pub release_desc: String,
    pub tags: String,
    #[serde(serialize_with = "form_flag", skip_serializing_if = "is_false")]
    pub freeleech: bool
}

impl ReleaseRecord {
    /// "{artist} - {title} [{media}-{format}].torrent"
    pub fn torrent_name(&self) -> String {
        let name = format!(
            "{} - {} [{}-{}].torrent",
            self.artist, self.title, self.media.as_str(), self.format.as_str()
        );
        name.replace(['/', '\\'], "_")
    }
}
