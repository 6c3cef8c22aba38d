//! Property-based tests for the pure auditing functions
//!
//! Uses proptest to verify invariants across many random inputs.

use media_auditor::folders::{group_exact, group_phonetic, FolderFilter};
use media_auditor::iso639::{self, CodeStandard, IsoStandard};
use media_auditor::phonetic::{encode, FOLDER_KEY_LENGTH};
use media_auditor::{split_language_token, FolderRecord};
use proptest::prelude::*;
use std::path::PathBuf;

// ===== Helpers =====

fn language_entry() -> impl Strategy<Value = iso639::LanguageEntry> {
    prop::sample::select(iso639::entries().to_vec())
}

fn folder_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            "[A-Za-z]{1,8}",
            "[0-9]{4}",
            "(Season [0-9]|S0[0-9]|Specials)",
            "[ !._-]{0,3}",
        ],
        0..40,
    )
}

fn records(names: &[String]) -> Vec<FolderRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| FolderRecord {
            path: PathBuf::from(format!("/library/{}/{}", i, name)),
            basename: name.clone(),
            phonetic_key: None,
        })
        .collect()
}

// ===== Property Tests =====

proptest! {
    /// Property: encoding is deterministic and always yields exactly `length` characters
    #[test]
    fn encoder_is_deterministic_and_fixed_length(name in "\\PC{0,30}", length in 1usize..12) {
        let first = encode(&name, length);
        let second = encode(&name, length);
        prop_assert_eq!(&first, &second);
        if let Ok(key) = first {
            prop_assert_eq!(key.chars().count(), length);
        }
    }

    /// Property: names with a leading ASCII letter always encode
    #[test]
    fn names_with_letters_encode(name in "[A-Za-z][A-Za-z0-9 ]{0,20}") {
        let key = encode(&name, FOLDER_KEY_LENGTH);
        prop_assert!(key.is_ok());
        let key = key.unwrap();
        let first = name.chars().next().unwrap().to_ascii_uppercase();
        prop_assert!(key.starts_with(first));
    }

    /// Property: registry codes classify under their own standard
    #[test]
    fn registry_codes_classify_to_their_standard(entry in language_entry()) {
        prop_assert_eq!(iso639::classify(entry.part2b).standard, CodeStandard::Part2);
        prop_assert_eq!(iso639::classify(entry.terminology()).standard, CodeStandard::Part2);
        if let Some(part1) = entry.part1 {
            prop_assert_eq!(iso639::classify(part1).standard, CodeStandard::Part1);
            prop_assert_eq!(iso639::classify(&part1.to_uppercase()).standard, CodeStandard::Part1);
        }
    }

    /// Property: 639-2 to 639-1 and back lands on the same language
    #[test]
    fn cross_mapping_round_trips(entry in language_entry()) {
        let part1 = iso639::convert(entry.part2b, IsoStandard::Part2, IsoStandard::Part1);
        prop_assert_eq!(part1.as_deref(), entry.part1);

        if let Some(part1) = part1 {
            let back = iso639::convert(&part1, IsoStandard::Part1, IsoStandard::Part2).unwrap();
            prop_assert_eq!(iso639::classify(&back).name, Some(entry.name));
            let from_terminology =
                iso639::convert(entry.terminology(), IsoStandard::Part2, IsoStandard::Part1);
            prop_assert_eq!(from_terminology, Some(part1));
        }
    }

    /// Property: tokens of the wrong shape never classify
    #[test]
    fn malformed_tokens_are_unrecognized(token in "[a-z]{4,8}|[0-9]{1,3}") {
        let verdict = iso639::judge(&token, IsoStandard::Part1);
        prop_assert_eq!(verdict.found.standard, CodeStandard::Unrecognized);
        prop_assert!(verdict.suggestion.is_none());
        prop_assert!(!verdict.is_compliant());
    }

    /// Property: token extraction never panics and reconstructs the name
    #[test]
    fn token_split_is_total(name in "\\PC{0,40}") {
        let parts = split_language_token(&name);
        if parts.has_token() {
            prop_assert_eq!(
                format!("{}.{}.{}", parts.stem, parts.token, parts.extension),
                name.clone()
            );
        }
        prop_assert!(name.starts_with(parts.stem));
    }

    /// Property: every folder is counted exactly once as unique, duplicate or ignored
    #[test]
    fn folder_counters_add_up(
        names in folder_names(),
        ignore_years in any::<bool>(),
        ignore_seasons in any::<bool>(),
    ) {
        let folders = records(&names);
        let filter = FolderFilter { ignore_years, ignore_seasons };

        for report in [group_exact(&folders, filter), group_phonetic(&folders, filter)] {
            let s = report.summary;
            prop_assert_eq!(s.total, names.len());
            prop_assert_eq!(s.unique + s.duplicate + s.ignored, s.total);
            prop_assert_eq!(report.findings.len(), s.duplicate);
        }
    }

    /// Property: grouping the same folders twice gives the same result
    #[test]
    fn folder_grouping_is_idempotent(names in folder_names()) {
        let folders = records(&names);
        let filter = FolderFilter { ignore_years: true, ignore_seasons: false };
        prop_assert_eq!(group_phonetic(&folders, filter), group_phonetic(&folders, filter));
        prop_assert_eq!(group_exact(&folders, filter), group_exact(&folders, filter));
    }

    /// Property: year folders never register or pair in phonetic mode when suppressed
    #[test]
    fn suppressed_years_never_pair(years in prop::collection::vec("[0-9]{4}", 1..10)) {
        let folders = records(&years);
        let filter = FolderFilter { ignore_years: true, ignore_seasons: false };
        let report = group_phonetic(&folders, filter);
        prop_assert_eq!(report.summary.ignored, years.len());
        prop_assert_eq!(report.summary.unique, 0);
        prop_assert!(report.findings.is_empty());
    }
}
