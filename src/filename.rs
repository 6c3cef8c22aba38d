//! Filename splitting shared by the subtitle checks
//!
//! `movie.en.srt` splits into stem `movie`, language token `en` and
//! extension `srt`. Leading dots belong to the name, so `.en.srt` has stem
//! `.en` and no token.

use serde::Serialize;

/// A subtitle basename split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageToken<'a> {
    /// Name without language token and extension
    pub stem: &'a str,
    /// Dot-segment before the extension, empty when absent
    pub token: &'a str,
    /// Extension without the dot, empty when absent
    pub extension: &'a str,
}

impl<'a> LanguageToken<'a> {
    /// Whether the name carries a language token at all
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Split off the last extension, keeping leading dots in the name
///
/// Returns the name without extension and the extension without its dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(pos) => {
            let dot = leading + pos;
            (&name[..dot], &name[dot + 1..])
        }
        None => (name, ""),
    }
}

/// Name without its final extension
pub fn file_stem(name: &str) -> &str {
    split_extension(name).0
}

/// Split a basename into stem, language token and extension
pub fn split_language_token(basename: &str) -> LanguageToken<'_> {
    let (without_ext, extension) = split_extension(basename);
    let (stem, token) = split_extension(without_ext);
    LanguageToken {
        stem,
        token,
        extension,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("movie.srt"), ("movie", "srt"));
        assert_eq!(split_extension("movie"), ("movie", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("..a.b"), ("..a", "b"));
        assert_eq!(split_extension("trailing."), ("trailing", ""));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_language_token() {
        let t = split_language_token("movie.en.srt");
        assert_eq!(t.stem, "movie");
        assert_eq!(t.token, "en");
        assert_eq!(t.extension, "srt");
        assert!(t.has_token());
    }

    #[test]
    fn test_language_token_multiple_dots() {
        let t = split_language_token("The.Movie.2010.eng.srt");
        assert_eq!(t.stem, "The.Movie.2010");
        assert_eq!(t.token, "eng");
    }

    #[test]
    fn test_no_token() {
        let t = split_language_token("movie.srt");
        assert_eq!(t.stem, "movie");
        assert_eq!(t.token, "");
        assert!(!t.has_token());
    }

    #[test]
    fn test_hidden_file_has_no_token() {
        let t = split_language_token(".en.srt");
        assert_eq!(t.stem, ".en");
        assert_eq!(t.token, "");
        assert_eq!(t.extension, "srt");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("movie.mkv"), "movie");
        assert_eq!(file_stem("Movie.2010.mkv"), "Movie.2010");
    }
}
