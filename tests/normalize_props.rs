use morphhb_loader::lemma::parse_lemma;
use morphhb_loader::morph::decode_morphology;
use morphhb_loader::normalize::{is_cantillation, normalize_surface, remove_slashes, strip_cantillation};
use proptest::prelude::*;

/// Strings biased toward the Hebrew block, slashes and ASCII.
fn hebrewish() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            (0x0590u32..=0x05FFu32).prop_map(|c| char::from_u32(c).unwrap()),
            Just('/'),
            Just(' '),
            any::<char>(),
        ],
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn no_cantillation_survives(s in hebrewish()) {
        prop_assert!(!strip_cantillation(&s).chars().any(is_cantillation));
    }

    #[test]
    fn other_code_points_kept_in_order(s in hebrewish()) {
        let expected: Vec<char> = s.chars().filter(|c| !is_cantillation(*c)).collect();
        let actual: Vec<char> = strip_cantillation(&s).chars().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn no_slash_after_normalizing(s in hebrewish()) {
        prop_assert!(!remove_slashes(&strip_cantillation(&s)).contains('/'));
        prop_assert!(!normalize_surface(&s).contains('/'));
    }

    #[test]
    fn normalizing_is_idempotent(s in hebrewish()) {
        let once = normalize_surface(&s);
        prop_assert_eq!(normalize_surface(&once), once);
    }

    #[test]
    fn lemma_never_panics(s in ".*") {
        let lemma = parse_lemma(Some(&s));
        if let Some(primary) = lemma.primary {
            prop_assert!(primary.starts_with('H'));
        }
    }

    #[test]
    fn unknown_language_is_identity(lang in "[^HA]", rest in "[A-Za-z0-9/]{0,10}") {
        let code = format!("{}{}", lang, rest);
        prop_assert_eq!(decode_morphology(&code), code);
    }
}
