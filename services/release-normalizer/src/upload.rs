//!
//! src/upload.rs  Andrew Belles  Oct 16th, 2026
//!
//! Hand-off of a finished release record to the external upload tool.
//! Posting to the catalog happens elsewhere; here we only check that
//! the artifacts exist and drop the record next to them.
//!

use std::{fs, io::Write, path::{Path, PathBuf}};

use crate::config::UploadConfig;
use crate::errors::NormalizerError;
use crate::release::ReleaseRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub record_path: Option<PathBuf>,   // None on dry runs
    pub torrent: PathBuf,
    pub cover: PathBuf
}

pub trait Uploader {
    fn submit(&self, record: &ReleaseRecord, torrent: &Path, cover: &Path) ->
        Result<UploadReport, NormalizerError>;
}

pub struct HandoffUploader {
    dir: PathBuf,
    dry_run: bool
}

impl HandoffUploader {
    pub fn new(cfg: &UploadConfig) -> Self {
        Self { dir: cfg.handoff_dir.clone(), dry_run: cfg.dry_run }
    }

    fn ensure_exists(path: &Path) -> Result<(), NormalizerError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(NormalizerError::MissingArtifact(path.to_path_buf()))
        }
    }

    fn record_name(torrent: &Path) -> String {
        let stem = torrent.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "release".to_string());
        format!("{stem}.json")
    }
}

impl Uploader for HandoffUploader {
    fn submit(&self, record: &ReleaseRecord, torrent: &Path, cover: &Path) ->
        Result<UploadReport, NormalizerError> {

        Self::ensure_exists(torrent)?;
        Self::ensure_exists(cover)?;

        let mut report = UploadReport {
            record_path: None,
            torrent: torrent.to_path_buf(),
            cover: cover.to_path_buf()
        };

        if self.dry_run {
            tracing::info!(
                torrent = %torrent.display(), cover = %cover.display(),
                "upload.dry_run"
            );
            return Ok(report);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::record_name(torrent));

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut temp, record)?;
        temp.write_all(b"\n")?;
        temp.persist(&path).map_err(|e| NormalizerError::Io(e.error))?;

        tracing::info!(record = %path.display(), torrent = %torrent.display(), "upload.handoff");
        report.record_path = Some(path);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AudioFormat, Media, ReleaseType};

    fn record() -> ReleaseRecord {
        ReleaseRecord {
            submit: true,
            release_type: ReleaseType::Single,
            title: "Celebrity".to_string(),
            title_native: None,
            artist: "IU".to_string(),
            artist_native: None,
            release_date: "20210127".to_string(),
            format: AudioFormat::Mp3,
            bitrate: AudioFormat::Mp3.bitrate().to_string(),
            media: Media::Web,
            album_desc: String::new(),
            release_desc: String::new(),
            tags: "K-Pop".to_string(),
            freeleech: false
        }
    }

    fn upload_config(dir: &Path, dry_run: bool) -> UploadConfig {
        UploadConfig {
            cover_name: "cover.jpg".to_string(),
            handoff_dir: dir.join("handoff"),
            dry_run,
            freeleech: false
        }
    }

    #[test]
    fn missing_cover_is_fatal() -> Result<(), NormalizerError> {
        let dir = tempfile::tempdir()?;
        let torrent = dir.path().join("IU - Celebrity [WEB-MP3].torrent");
        fs::write(&torrent, b"d4:infoe")?;

        let uploader = HandoffUploader::new(&upload_config(dir.path(), false));
        let result = uploader.submit(&record(), &torrent, &dir.path().join("cover.jpg"));
        assert!(matches!(result, Err(NormalizerError::MissingArtifact(p)) if p.ends_with("cover.jpg")));
        Ok(())
    }

    #[test]
    fn record_is_written_next_to_torrent_name() -> Result<(), NormalizerError> {
        let dir = tempfile::tempdir()?;
        let torrent = dir.path().join("IU - Celebrity [WEB-MP3].torrent");
        let cover = dir.path().join("cover.jpg");
        fs::write(&torrent, b"d4:infoe")?;
        fs::write(&cover, b"jpg")?;

        let uploader = HandoffUploader::new(&upload_config(dir.path(), false));
        let report = uploader.submit(&record(), &torrent, &cover)?;

        let path = report.record_path.unwrap();
        assert!(path.ends_with("IU - Celebrity [WEB-MP3].json"));
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(written["type"], "Single");
        assert_eq!(written["bitrate"], "320");
        Ok(())
    }

    #[test]
    fn dry_run_writes_nothing() -> Result<(), NormalizerError> {
        let dir = tempfile::tempdir()?;
        let torrent = dir.path().join("a.torrent");
        let cover = dir.path().join("cover.jpg");
        fs::write(&torrent, b"d4:infoe")?;
        fs::write(&cover, b"jpg")?;

        let uploader = HandoffUploader::new(&upload_config(dir.path(), true));
        let report = uploader.submit(&record(), &torrent, &cover)?;
        assert_eq!(report.record_path, None);
        assert!(!dir.path().join("handoff").exists());
        Ok(())
    }
}
