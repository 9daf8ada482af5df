//! Strong's lemma references.
//!
//! A morphhb `lemma` attribute lists prefix particles first and the head
//! word's Strong's number last: `7225`, `b/7225`, `c/d/776`, `1254 a`.
//! Letters and `+` after the number (`1254 a`, `1254a`, `3068+`) mark
//! homographs and multi-word names and are dropped.

use serde::Serialize;

/// Language prefix given to every resolved Strong's number.
const STRONGS_PREFIX: &str = "H";

/// A lemma attribute split into its head entry and prefix chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LemmaRef {
    /// Strong's id of the head word, e.g. `H7225`.
    pub primary: Option<String>,
    /// Opaque `/`-joined prefix markers, e.g. `c/d`.
    pub prefix: Option<String>,
}

/// Resolve a lemma attribute. Never fails; unparseable numbers become `None`.
pub fn parse_lemma(lemma: Option<&str>) -> LemmaRef {
    let lemma = match lemma {
        Some(l) if !l.is_empty() => l,
        _ => return LemmaRef::default(),
    };

    match lemma.rsplit_once('/') {
        None => LemmaRef {
            primary: strongs_id(lemma),
            prefix: None,
        },
        Some((prefix, head)) => LemmaRef {
            primary: strongs_id(head),
            prefix: Some(prefix.to_string()),
        },
    }
}

fn strongs_id(segment: &str) -> Option<String> {
    // Only the leading digits count: `3068+` and `1254a` both carry a number.
    let token = segment.split_whitespace().next()?;
    let digits = token.split(|c: char| !c.is_ascii_digit()).next()?;
    let number: u32 = digits.parse().ok()?;
    Some(format!("{}{}", STRONGS_PREFIX, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(primary: Option<&str>, prefix: Option<&str>) -> LemmaRef {
        LemmaRef {
            primary: primary.map(String::from),
            prefix: prefix.map(String::from),
        }
    }

    #[test]
    fn empty_and_absent() {
        assert_eq!(parse_lemma(None), lemma(None, None));
        assert_eq!(parse_lemma(Some("")), lemma(None, None));
    }

    #[test]
    fn bare_number() {
        assert_eq!(parse_lemma(Some("7225")), lemma(Some("H7225"), None));
    }

    #[test]
    fn single_prefix() {
        assert_eq!(parse_lemma(Some("b/7225")), lemma(Some("H7225"), Some("b")));
    }

    #[test]
    fn prefix_chain_keeps_order() {
        assert_eq!(
            parse_lemma(Some("c/d/776")),
            lemma(Some("H776"), Some("c/d"))
        );
    }

    #[test]
    fn homograph_letter_dropped() {
        assert_eq!(parse_lemma(Some("1254 a")), lemma(Some("H1254"), None));
        assert_eq!(
            parse_lemma(Some("c/1961 b")),
            lemma(Some("H1961"), Some("c"))
        );
    }

    #[test]
    fn trailing_marker_after_digits() {
        assert_eq!(parse_lemma(Some("3068+")), lemma(Some("H3068"), None));
        assert_eq!(parse_lemma(Some("1254a")), lemma(Some("H1254"), None));
        assert_eq!(
            parse_lemma(Some("b/3068+")),
            lemma(Some("H3068"), Some("b"))
        );
        assert_eq!(parse_lemma(Some("871 a+")), lemma(Some("H871"), None));
    }

    #[test]
    fn leading_zeros_normalized() {
        assert_eq!(parse_lemma(Some("0430")), lemma(Some("H430"), None));
    }

    #[test]
    fn unparseable_head_degrades() {
        assert_eq!(parse_lemma(Some("l")), lemma(None, None));
        assert_eq!(parse_lemma(Some("b/x")), lemma(None, Some("b")));
        assert_eq!(parse_lemma(Some("d/")), lemma(None, Some("d")));
        assert_eq!(parse_lemma(Some("   ")), lemma(None, None));
    }
}
