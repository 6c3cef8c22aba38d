//! Subtitle cue parsing
//!
//! Turns decoded subtitle text into timed cues. Three layouts are read:
//! SubRip blocks, MicroDVD frame lines and the `[Events]` section of
//! SubStation Alpha files. Malformed entries are skipped; a file that
//! yields no cue at all is a parse error.

use encoding_rs::WINDOWS_1252;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{AuditError, AuditErrorKind};
use crate::models::SubtitleFormat;

/// Frame rate assumed for MicroDVD files without a rate header
pub const DEFAULT_MICRODVD_FPS: f64 = 23.976;

static SRT_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})",
    )
    .expect("srt timing regex should compile")
});

static MICRODVD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{(\d+)\}\{(\d*)\}(.*)$").expect("microdvd line regex should compile")
});

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>|\{[^}]*\}").expect("markup regex should compile"));

/// One timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cue {
    /// Position in the file, starting at 1
    pub index: usize,
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds
    pub end_ms: u64,
    /// Caption text, lines separated by `\n`, markup untouched
    pub text: String,
}

/// Decode raw subtitle bytes with the legacy Windows-1252 code page
///
/// A byte order mark takes precedence, so UTF-8 and UTF-16 files with a BOM
/// still decode correctly. Every byte sequence decodes.
pub fn decode_legacy(bytes: &[u8]) -> String {
    let (text, encoding, _) = WINDOWS_1252.decode(bytes);
    if encoding != WINDOWS_1252 {
        log::debug!("Subtitle decoded as {} from its byte order mark", encoding.name());
    }
    text.into_owned()
}

/// Parse subtitle text in the given format
pub fn parse(text: &str, format: SubtitleFormat) -> Result<Vec<Cue>, AuditError> {
    let text = text.trim_start_matches('\u{feff}').replace("\r\n", "\n").replace('\r', "\n");
    let cues = match format {
        SubtitleFormat::Srt => parse_srt(&text),
        SubtitleFormat::MicroDvd => parse_microdvd(&text),
        SubtitleFormat::Ass => parse_ass(&text),
    };
    if cues.is_empty() {
        return Err(AuditError::new(
            AuditErrorKind::Parse,
            None,
            format!("no {} cues found", format.as_str()),
        ));
    }
    Ok(cues)
}

fn parse_srt(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }

        let timing = block.iter().position(|l| l.contains("-->"));
        let parsed = timing.and_then(|i| {
            let caps = SRT_TIMING.captures(block[i])?;
            let stamp = |first: usize| {
                let field = |n: usize| caps[first + n].parse::<u64>().ok();
                clock_ms(field(0)?, field(1)?, field(2)?)?
                    .checked_add(fraction_ms(&caps[first + 3]))
            };
            Some((i, stamp(1)?, stamp(5)?))
        });
        match parsed {
            Some((i, start, end)) => cues.push(Cue {
                index: cues.len() + 1,
                start_ms: start,
                end_ms: end,
                text: block[i + 1..].join("\n"),
            }),
            None => log::debug!("Skipping malformed subtitle block starting {:?}", block[0]),
        }
        block.clear();
    }

    cues
}

fn parse_microdvd(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut fps = DEFAULT_MICRODVD_FPS;

    for line in text.lines() {
        let Some(caps) = MICRODVD_LINE.captures(line.trim()) else {
            if !line.trim().is_empty() {
                log::debug!("Skipping malformed MicroDVD line {:?}", line);
            }
            continue;
        };

        let start_frame: u64 = caps[1].parse().unwrap_or(0);
        let end_frame: u64 = caps[2].parse().unwrap_or(start_frame);
        let body = &caps[3];

        // A leading {1}{1}<rate> line declares the frame rate
        if cues.is_empty() && start_frame == 1 && end_frame == 1 {
            if let Ok(rate) = body.trim().parse::<f64>() {
                if rate > 0.0 {
                    fps = rate;
                    continue;
                }
            }
        }

        cues.push(Cue {
            index: cues.len() + 1,
            start_ms: frame_ms(start_frame, fps),
            end_ms: frame_ms(end_frame, fps),
            text: body.replace('|', "\n"),
        });
    }

    cues
}

fn parse_ass(text: &str) -> Vec<Cue> {
    const DEFAULT_FORMAT: [&str; 10] = [
        "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
    ];

    let mut cues = Vec::new();
    let mut in_events = false;
    let mut format: Vec<String> = DEFAULT_FORMAT.iter().map(|s| s.to_string()).collect();

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events {
            continue;
        }

        if let Some(fields) = strip_prefix_ignore_case(line, "format:") {
            format = fields.split(',').map(|f| f.trim().to_lowercase()).collect();
            continue;
        }
        let Some(values) = strip_prefix_ignore_case(line, "dialogue:") else {
            continue;
        };

        let values: Vec<&str> = values.splitn(format.len(), ',').collect();
        let field = |name: &str| {
            format
                .iter()
                .position(|f| f == name)
                .and_then(|i| values.get(i))
                .map(|v| v.trim())
        };

        let (Some(start), Some(end), Some(body)) = (
            field("start").and_then(parse_ass_time),
            field("end").and_then(parse_ass_time),
            field("text"),
        ) else {
            log::debug!("Skipping malformed dialogue line {:?}", line);
            continue;
        };

        cues.push(Cue {
            index: cues.len() + 1,
            start_ms: start,
            end_ms: end,
            text: body
                .replace("\\N", "\n")
                .replace("\\n", "\n")
                .replace("\\h", " "),
        });
    }

    cues
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

/// `H:MM:SS.cc`
fn parse_ass_time(value: &str) -> Option<u64> {
    let mut parts = value.trim().splitn(3, ':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let (seconds, fraction) = parts.next()?.split_once('.')?;
    clock_ms(hours, minutes, seconds.parse().ok()?)?.checked_add(fraction_ms(fraction))
}

/// `None` when the clock does not fit in milliseconds
fn clock_ms(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)
}

/// Fractional seconds written with one to three digits
fn fraction_ms(digits: &str) -> u64 {
    let digits: String = digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(3)
        .collect();
    let value: u64 = digits.parse().unwrap_or(0);
    value * 10u64.pow(3 - digits.len() as u32)
}

fn frame_ms(frame: u64, fps: f64) -> u64 {
    (frame as f64 * 1000.0 / fps).round() as u64
}

/// Remove HTML-style tags and `{...}` override blocks, then unescape entities
pub fn strip_markup(text: &str) -> String {
    let stripped = MARKUP.replace_all(text, "");
    let unescaped = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    unescaped
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of every cue after the first, markup removed, one cue per line group
pub fn corpus(cues: &[Cue]) -> String {
    cues.iter()
        .skip(1)
        .map(|cue| strip_markup(&cue.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\r\n00:00:01,000 --> 00:00:02,500\r\nSubtitles by <b>Example</b>\r\n\r\n\
2\r\n00:00:03,000 --> 00:00:04,000\r\nBonjour &amp; bienvenue\r\n<i>à Paris</i>\r\n\r\n\
garbage without timing\r\n\r\n\
3\r\n00:01:00.5 --> 00:01:01,000\r\n{\\an8}Au revoir\r\n";

    #[test]
    fn test_parse_srt() {
        let cues = parse(SRT, SubtitleFormat::Srt).unwrap();
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].start_ms, 1000);
        assert_eq!(cues[0].end_ms, 2500);
        assert_eq!(cues[1].text, "Bonjour &amp; bienvenue\n<i>à Paris</i>");
        assert_eq!(cues[2].start_ms, 60_500);
        assert_eq!(cues[2].index, 3);
    }

    #[test]
    fn test_corpus_skips_first_cue_and_strips_markup() {
        let cues = parse(SRT, SubtitleFormat::Srt).unwrap();
        assert_eq!(corpus(&cues), "Bonjour & bienvenue\nà Paris\nAu revoir");
    }

    #[test]
    fn test_parse_microdvd_with_rate_header() {
        let text = "{1}{1}25\n{25}{50}Hello|world\n{y:i}not a cue\n{75}{100}{y:i}Again\n";
        let cues = parse(text, SubtitleFormat::MicroDvd).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start_ms, 1000);
        assert_eq!(cues[0].end_ms, 2000);
        assert_eq!(cues[0].text, "Hello\nworld");
        assert_eq!(strip_markup(&cues[1].text), "Again");
    }

    #[test]
    fn test_parse_microdvd_default_rate() {
        let cues = parse("{0}{24}Hi\n", SubtitleFormat::MicroDvd).unwrap();
        assert_eq!(cues[0].end_ms, 1001);
    }

    #[test]
    fn test_parse_ass_events() {
        let text = "[Script Info]\nTitle: test\n\n[V4+ Styles]\nFormat: Name, Fontname\n\n\
[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
Dialogue: 0,0:00:01.50,0:00:03.00,Default,,0,0,0,,{\\i1}Hola,\\Nmundo\n\
Comment: 0,0:00:04.00,0:00:05.00,Default,,0,0,0,,ignored\n\
Dialogue: broken\n";
        let cues = parse(text, SubtitleFormat::Ass).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_ms, 1500);
        assert_eq!(cues[0].end_ms, 3000);
        assert_eq!(strip_markup(&cues[0].text), "Hola,\nmundo");
    }

    #[test]
    fn test_overflowing_timestamps_are_skipped() {
        let text = "1\n9999999999999:00:01,000 --> 9999999999999:00:02,000\nToo late\n\n\
2\n00:00:03,000 --> 00:00:04,000\nOn time\n";
        let cues = parse(text, SubtitleFormat::Srt).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "On time");

        let only_bad = "1\n9999999999999:00:01,000 --> 9999999999999:00:02,000\nToo late\n";
        assert_eq!(
            parse(only_bad, SubtitleFormat::Srt).unwrap_err().kind,
            AuditErrorKind::Parse
        );

        let ass = "[Events]\nDialogue: 0,9999999999999:00:01.00,9999999999999:00:02.00,,,0,0,0,,Lost\n\
Dialogue: 0,0:00:01.00,0:00:02.00,,,0,0,0,,Kept\n";
        let cues = parse(ass, SubtitleFormat::Ass).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Kept");
    }

    #[test]
    fn test_no_cues_is_parse_error() {
        let err = parse("just some text\n", SubtitleFormat::Srt).unwrap_err();
        assert_eq!(err.kind, AuditErrorKind::Parse);
        assert!(parse("", SubtitleFormat::Ass).is_err());
    }

    #[test]
    fn test_decode_legacy() {
        assert_eq!(decode_legacy(b"caf\xe9"), "café");
        assert_eq!(decode_legacy(b"\xef\xbb\xbfcaf\xc3\xa9"), "café");
    }

    #[test]
    fn test_strip_markup_entities() {
        assert_eq!(strip_markup("<font color=\"red\">a &lt;b&gt;</font>"), "a <b>");
        assert_eq!(strip_markup("  \n <i></i> "), "");
    }
}
