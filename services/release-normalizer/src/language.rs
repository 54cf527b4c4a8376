//!
//! src/language.rs  Andrew Belles  Oct 16th, 2026
//!
//! Script test used by the term resolver and the per-character
//! language gate applied to the final title and artist fields
//!

/// True when any code point falls outside basic latin (U+0000..=U+007F)
pub fn is_non_latin(s: &str) -> bool {
    s.chars().any(|c| !c.is_ascii())
}

fn lang_to_code(lang: whatlang::Lang) -> &'static str {
    use whatlang::Lang::*;
    match lang {
        Eng => "en",
        Kor => "ko",
        Jpn => "ja",
        Cmn => "zh",
        _ => "other",
    }
}

/// Language of a single character, None when detection fails
fn detect_char(c: char) -> Option<&'static str> {
    let mut buf = [0u8; 4];
    let info = whatlang::detect(c.encode_utf8(&mut buf))?;
    Some(lang_to_code(info.lang()))
}

/// Coarse gate: one character classified as korean anywhere in the
/// field means the operator has to supply a romanized value
pub fn needs_romanization(s: &str) -> bool {
    let verdict = s.chars()
        .filter_map(detect_char)
        .any(|code| code == "ko");

    tracing::trace!(field = s, needs_romanization = verdict, "language.gate");
    verdict
}
