//!
//! src/config.rs  Andrew Belles  Oct 16th, 2026
//!
//! Builds the single configuration object handed to every component.
//! Values come from the environment (optionally a .env file) with defaults.
//!

use std::path::PathBuf;

use url::Url;

use crate::errors::NormalizerError;

/// Defaults
pub const DICTIONARY_PATH: &str = "json_data/dictionary.json";
pub const DESCRIPTION_DIR: &str = "logs";
pub const RELEASE_SOURCE_URL: &str = "https://music.bugs.co.kr/album/";
pub const COVER_NAME: &str = "cover.jpg";
pub const HANDOFF_DIR: &str = ".";
pub const LOG_FILTER: &str = "info,release_normalizer=debug,lofty=warn";

/// Reads an environment variable, falling back when unset or blank
fn env_or(s: &str, default: &str) -> String {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Accepts 1/0, true/false, yes/no. Anything else keeps the default
fn env_to_bool(s: &str, default: bool) -> bool {
    match std::env::var(s) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

///
/// Location of the bilingual dictionary file
///
#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    pub path: PathBuf
}

fn build_dictionary() -> DictionaryConfig {
    DictionaryConfig { path: PathBuf::from(env_or("DICTIONARY_PATH", DICTIONARY_PATH)) }
}

///
/// Where album/release descriptions come from
///
#[derive(Debug, Clone)]
pub struct DescriptionConfig {
    pub directory: PathBuf,
    pub generate_tracklist: bool,  // build album desc from track titles
    pub save_tracklist: bool,      // store generated tracklist in directory
    pub enable_release_description: bool,
    pub source_url: Url            // base of the "Sourced from" link
}

fn build_description() -> Result<DescriptionConfig, NormalizerError> {
    let directory = PathBuf::from(env_or("DESCRIPTION_DIR", DESCRIPTION_DIR));
    let generate_tracklist = env_to_bool("GENERATE_TRACKLIST", true);
    let save_tracklist     = env_to_bool("SAVE_TRACKLIST", false);
    let enable_release_description = env_to_bool("ENABLE_RELEASE_DESCRIPTION", false);

    let source_url = env_or("RELEASE_SOURCE_URL", RELEASE_SOURCE_URL);
    let mut source_url = Url::parse(&source_url)
        .map_err(|e| NormalizerError::Config(
            format!("RELEASE_SOURCE_URL invalid {e}")
        ))?;
    ensure_https(&source_url).map_err(NormalizerError::Config)?;

    // ensure trailing slash
    if !source_url.path().ends_with('/') {
        let mut path = source_url.path().to_string();
        path.push('/');
        source_url.set_path(&path);
    }

    Ok( DescriptionConfig {
        directory,
        generate_tracklist,
        save_tracklist,
        enable_release_description,
        source_url
    })
}

///
/// Hand-off of the finished release record to the upload tool
///
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub cover_name: String,
    pub handoff_dir: PathBuf,
    pub dry_run: bool,
    pub freeleech: bool
}

fn build_upload() -> UploadConfig {
    UploadConfig {
        cover_name: env_or("COVER_NAME", COVER_NAME),
        handoff_dir: PathBuf::from(env_or("HANDOFF_DIR", HANDOFF_DIR)),
        dry_run: false,
        freeleech: false
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: LOG_FILTER.to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_file_line: false,
            include_target: true
        }
    }
}

fn build_logging() -> Result<LoggingConfig, NormalizerError> {
    let format = match env_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
        "pretty" => LogFormat::Pretty,
        "json"   => LogFormat::Json,
        other => return Err(NormalizerError::Config(
            format!("LOG_FORMAT must be pretty or json, got {other}")
        ))
    };
    let include_file_line = format == LogFormat::Json;

    Ok( LoggingConfig { format, include_file_line, ..LoggingConfig::default() } )
}

///
/// AppConfig which holds everything the aggregator and hand-off need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dictionary: DictionaryConfig,
    pub description: DescriptionConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, NormalizerError> {
    dotenvy::dotenv().ok();

    let dictionary  = build_dictionary();
    let description = build_description()?;
    let upload      = build_upload();
    let logging     = build_logging()?;

    Ok( AppConfig { dictionary, description, upload, logging } )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_is_required_for_source_url() {
        let url = Url::parse("http://music.bugs.co.kr/album/").unwrap();
        assert!(ensure_https(&url).is_err());

        let url = Url::parse(RELEASE_SOURCE_URL).unwrap();
        assert!(ensure_https(&url).is_ok());
    }

    #[test]
    fn unset_bool_keeps_default() {
        assert!(env_to_bool("RELEASE_NORMALIZER_TEST_UNSET_FLAG", true));
        assert!(!env_to_bool("RELEASE_NORMALIZER_TEST_UNSET_FLAG", false));
    }

    #[test]
    fn defaults_describe_a_local_layout() -> Result<(), NormalizerError> {
        let description = build_description()?;
        assert!(description.source_url.path().ends_with('/'));

        let logging = LoggingConfig::default();
        assert_eq!(logging.format, LogFormat::Pretty);
        Ok(())
    }
}
