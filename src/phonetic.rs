//! Phonetic key encoder for folder names
//!
//! A Soundex variant with a configurable key length, used to cluster folder
//! names that sound alike ("Smith" / "Smyth").

use crate::error::EncodingError;

/// Key length used for folder grouping
pub const FOLDER_KEY_LENGTH: usize = 8;

/// Keys produced by four-digit year names at [`FOLDER_KEY_LENGTH`]
pub const YEAR_SENTINELS: [&str; 2] = ["10000000", "20000000"];

/// Check whether a key is one of the year sentinels
pub fn is_year_sentinel(key: &str) -> bool {
    YEAR_SENTINELS.contains(&key)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Code(char),
    Vowel,
    Silent,
    Other,
}

fn classify(c: char) -> Class {
    match c.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => Class::Code('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Class::Code('2'),
        'd' | 't' => Class::Code('3'),
        'l' => Class::Code('4'),
        'm' | 'n' => Class::Code('5'),
        'r' => Class::Code('6'),
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' => Class::Vowel,
        'h' | 'w' => Class::Silent,
        _ => Class::Other,
    }
}

/// Compute the phonetic key of `name`, exactly `length` characters long
pub fn encode(name: &str, length: usize) -> Result<String, EncodingError> {
    if length == 0 {
        return Err(EncodingError::ZeroLength);
    }

    let mut chars = name.chars().skip_while(|c| !c.is_alphanumeric());
    let first = chars
        .next()
        .ok_or_else(|| EncodingError::Uncodeable(name.to_string()))?;

    let mut key: Vec<char> = first.to_uppercase().collect();
    key.truncate(length);

    // The first letter's own code suppresses an identical code right after it
    let mut last = match classify(first) {
        Class::Code(digit) => Some(digit),
        _ => None,
    };

    for c in chars {
        if key.len() >= length {
            break;
        }
        if !c.is_ascii_alphabetic() {
            continue;
        }
        match classify(c) {
            Class::Code(digit) => {
                if last != Some(digit) {
                    key.push(digit);
                }
                last = Some(digit);
            }
            Class::Vowel => last = None,
            Class::Silent | Class::Other => {}
        }
    }

    key.resize(length, '0');
    Ok(key.into_iter().collect())
}
