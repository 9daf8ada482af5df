//! OSHB morphology code decoding.
//!
//! A morphology code is a compact positional string: a language letter, a
//! part-of-speech letter, then a variable number of single-letter fields
//! whose order depends on the part of speech. Words fused with prefixes
//! carry compound codes joined by `/`, with the language letter only on the
//! first segment:
//!
//! ```text
//! HVqp3ms    Verb, Qal, Perfect, 3rd, masc., sing.
//! HR/Ncfsa   Preposition + Noun, common, fem., sing., absolute
//! ```
//!
//! Every field slot is optional: if the next letter is not in the slot's
//! table the slot is skipped and the letter is offered to the next slot.
//! A letter that no remaining slot accepts makes the code undecodable, and
//! [`decode_morphology`] then returns the original code untouched so callers
//! always have something to display.

use serde::Serialize;
use thiserror::Error;

type Table = &'static [(char, &'static str)];

/// Errors from [`parse_morphology`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphError {
    #[error("empty morphology code")]
    Empty,
    #[error("unknown language letter '{0}'")]
    UnknownLanguage(char),
    #[error("segment {segment} has no part of speech")]
    MissingPartOfSpeech { segment: usize },
    #[error("unknown part of speech letter '{0}'")]
    UnknownPartOfSpeech(char),
    #[error("unexpected '{found}' in {part_of_speech} segment {segment}")]
    UnexpectedField {
        segment: usize,
        part_of_speech: &'static str,
        found: char,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Hebrew,
    Aramaic,
}

impl Language {
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'H' => Some(Language::Hebrew),
            'A' => Some(Language::Aramaic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Hebrew => "Hebrew",
            Language::Aramaic => "Aramaic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Adjective,
    Conjunction,
    Adverb,
    Noun,
    Pronoun,
    Preposition,
    Suffix,
    Particle,
    Verb,
}

impl PartOfSpeech {
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'A' => Some(PartOfSpeech::Adjective),
            'C' => Some(PartOfSpeech::Conjunction),
            'D' => Some(PartOfSpeech::Adverb),
            'N' => Some(PartOfSpeech::Noun),
            'P' => Some(PartOfSpeech::Pronoun),
            'R' => Some(PartOfSpeech::Preposition),
            'S' => Some(PartOfSpeech::Suffix),
            'T' => Some(PartOfSpeech::Particle),
            'V' => Some(PartOfSpeech::Verb),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::Preposition => "Preposition",
            PartOfSpeech::Suffix => "Suffix",
            PartOfSpeech::Particle => "Particle",
            PartOfSpeech::Verb => "Verb",
        }
    }

    /// Field slots in the order they are consumed.
    fn slots(self, language: Language) -> &'static [Slot] {
        match self {
            PartOfSpeech::Verb => match language {
                Language::Hebrew => HEBREW_VERB_SLOTS,
                Language::Aramaic => ARAMAIC_VERB_SLOTS,
            },
            PartOfSpeech::Noun => NOUN_SLOTS,
            // Adjectives carry a type letter in the corpus but it is not decoded yet.
            PartOfSpeech::Adjective => ADJECTIVE_SLOTS,
            PartOfSpeech::Pronoun => PRONOUN_SLOTS,
            PartOfSpeech::Particle => PARTICLE_SLOTS,
            PartOfSpeech::Suffix => SUFFIX_SLOTS,
            PartOfSpeech::Conjunction | PartOfSpeech::Adverb | PartOfSpeech::Preposition => &[],
        }
    }
}

/// Which grammatical feature a decoded letter describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Stem,
    VerbType,
    NounType,
    PronounType,
    ParticleType,
    SuffixType,
    Person,
    Gender,
    Number,
    State,
}

struct Slot {
    field: Field,
    table: Table,
}

impl Slot {
    const fn new(field: Field, table: Table) -> Self {
        Self { field, table }
    }

    fn lookup(&self, c: char) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(code, _)| *code == c)
            .map(|(_, label)| *label)
    }
}

const HEBREW_STEMS: Table = &[
    ('q', "Qal"),
    ('N', "Niphal"),
    ('p', "Piel"),
    ('P', "Pual"),
    ('h', "Hiphil"),
    ('H', "Hophal"),
    ('t', "Hithpael"),
    ('o', "Polel"),
    ('O', "Polal"),
    ('r', "Hithpolel"),
    ('m', "Poel"),
    ('M', "Poal"),
    ('k', "Palel"),
    ('K', "Pulal"),
    ('Q', "Qal Passive"),
    ('l', "Pilpel"),
    ('L', "Polpal"),
    ('f', "Hithpalpel"),
    ('D', "Nithpael"),
    ('j', "Pealal"),
    ('i', "Pilel"),
    ('u', "Hothpaal"),
    ('c', "Tiphil"),
    ('v', "Hishtaphel"),
    ('w', "Nithpalel"),
    ('y', "Nithpoel"),
    ('z', "Hithpoel"),
];

const ARAMAIC_STEMS: Table = &[
    ('q', "Peal"),
    ('Q', "Peil"),
    ('u', "Hithpeel"),
    ('p', "Pael"),
    ('P', "Ithpaal"),
    ('M', "Hithpaal"),
    ('a', "Aphel"),
    ('h', "Haphel"),
    ('s', "Saphel"),
    ('e', "Shaphel"),
    ('H', "Hophal"),
    ('i', "Ithpeel"),
    ('t', "Hishtaphel"),
    ('v', "Ishtaphel"),
    ('w', "Hithaphel"),
    ('o', "Polel"),
    ('z', "Ithpoel"),
    ('r', "Hithpolel"),
    ('f', "Hithpalpel"),
    ('b', "Hephal"),
    ('c', "Tiphel"),
    ('m', "Poel"),
    ('l', "Palpel"),
    ('L', "Ithpalpel"),
    ('O', "Ithpolel"),
    ('G', "Ittaphal"),
];

const VERB_TYPES: Table = &[
    ('p', "Perfect"),
    ('q', "Sequential Perfect"),
    ('i', "Imperfect"),
    ('w', "Sequential Imperfect"),
    ('h', "Cohortative"),
    ('j', "Jussive"),
    ('v', "Imperative"),
    ('r', "Participle Active"),
    ('s', "Participle Passive"),
    ('a', "Infinitive Absolute"),
    ('c', "Infinitive Construct"),
];

const NOUN_TYPES: Table = &[('c', "common"), ('g', "gentilic"), ('p', "proper name")];

const PRONOUN_TYPES: Table = &[
    ('d', "demonstrative"),
    ('f', "indefinite"),
    ('i', "interrogative"),
    ('p', "personal"),
    ('r', "relative"),
];

const PARTICLE_TYPES: Table = &[
    ('a', "affirmation"),
    ('d', "definite article"),
    ('e', "exhortation"),
    ('i', "interrogative"),
    ('j', "interjection"),
    ('m', "demonstrative"),
    ('n', "negative"),
    ('o', "direct object marker"),
    ('r', "relative"),
];

const SUFFIX_TYPES: Table = &[
    ('d', "directional he"),
    ('h', "paragogic he"),
    ('n', "paragogic nun"),
    ('p', "pronominal"),
];

const PERSONS: Table = &[('1', "1st"), ('2', "2nd"), ('3', "3rd")];

const GENDERS: Table = &[
    ('m', "masc."),
    ('f', "fem."),
    ('b', "both"),
    ('c', "common"),
];

const NUMBERS: Table = &[('s', "sing."), ('p', "plur."), ('d', "dual")];

const STATES: Table = &[('a', "absolute"), ('c', "construct"), ('d', "determined")];

const HEBREW_VERB_SLOTS: &[Slot] = &[
    Slot::new(Field::Stem, HEBREW_STEMS),
    Slot::new(Field::VerbType, VERB_TYPES),
    Slot::new(Field::Person, PERSONS),
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
    Slot::new(Field::State, STATES),
];

const ARAMAIC_VERB_SLOTS: &[Slot] = &[
    Slot::new(Field::Stem, ARAMAIC_STEMS),
    Slot::new(Field::VerbType, VERB_TYPES),
    Slot::new(Field::Person, PERSONS),
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
    Slot::new(Field::State, STATES),
];

const NOUN_SLOTS: &[Slot] = &[
    Slot::new(Field::NounType, NOUN_TYPES),
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
    Slot::new(Field::State, STATES),
];

const ADJECTIVE_SLOTS: &[Slot] = &[
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
    Slot::new(Field::State, STATES),
];

const PRONOUN_SLOTS: &[Slot] = &[
    Slot::new(Field::PronounType, PRONOUN_TYPES),
    Slot::new(Field::Person, PERSONS),
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
];

const PARTICLE_SLOTS: &[Slot] = &[Slot::new(Field::ParticleType, PARTICLE_TYPES)];

const SUFFIX_SLOTS: &[Slot] = &[
    Slot::new(Field::SuffixType, SUFFIX_TYPES),
    Slot::new(Field::Person, PERSONS),
    Slot::new(Field::Gender, GENDERS),
    Slot::new(Field::Number, NUMBERS),
];

/// One decoded field of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub field: Field,
    pub value: &'static str,
}

/// One `/`-separated piece of a morphology code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MorphSegment {
    pub part_of_speech: PartOfSpeech,
    pub fields: Vec<DecodedField>,
}

impl MorphSegment {
    /// Part-of-speech label followed by field labels, comma separated.
    pub fn describe(&self) -> String {
        std::iter::once(self.part_of_speech.label())
            .chain(self.fields.iter().map(|f| f.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A fully decoded morphology code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Morphology {
    pub language: Language,
    pub segments: Vec<MorphSegment>,
}

impl Morphology {
    pub fn describe(&self) -> String {
        self.segments
            .iter()
            .map(MorphSegment::describe)
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Decode a (possibly compound) morphology code into its structured form.
pub fn parse_morphology(code: &str) -> Result<Morphology, MorphError> {
    let mut chars = code.chars();
    let lang_code = chars.next().ok_or(MorphError::Empty)?;
    let language = Language::from_code(lang_code).ok_or(MorphError::UnknownLanguage(lang_code))?;

    let segments = chars
        .as_str()
        .split('/')
        .enumerate()
        .map(|(i, segment)| parse_segment(i, segment, language))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Morphology { language, segments })
}

fn parse_segment(
    index: usize,
    segment: &str,
    language: Language,
) -> Result<MorphSegment, MorphError> {
    let mut chars = segment.chars().peekable();
    let pos_code = chars
        .next()
        .ok_or(MorphError::MissingPartOfSpeech { segment: index })?;
    let part_of_speech =
        PartOfSpeech::from_code(pos_code).ok_or(MorphError::UnknownPartOfSpeech(pos_code))?;

    let mut fields = Vec::new();
    for slot in part_of_speech.slots(language) {
        let Some(&c) = chars.peek() else { break };
        if let Some(value) = slot.lookup(c) {
            fields.push(DecodedField {
                field: slot.field,
                value,
            });
            chars.next();
        }
    }

    if let Some(found) = chars.next() {
        return Err(MorphError::UnexpectedField {
            segment: index,
            part_of_speech: part_of_speech.label(),
            found,
        });
    }

    Ok(MorphSegment {
        part_of_speech,
        fields,
    })
}

/// Render a morphology code for display.
///
/// Returns `""` for an empty code and the code itself when any part of it
/// cannot be decoded.
pub fn decode_morphology(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    match parse_morphology(code) {
        Ok(morph) => morph.describe(),
        Err(_) => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code() {
        assert_eq!(decode_morphology(""), "");
        assert_eq!(parse_morphology(""), Err(MorphError::Empty));
    }

    #[test]
    fn qal_perfect() {
        assert_eq!(
            decode_morphology("HVqp3ms"),
            "Verb, Qal, Perfect, 3rd, masc., sing."
        );
    }

    #[test]
    fn compound_preposition_noun() {
        let out = decode_morphology("HR/Ncfsa");
        assert_eq!(out, "Preposition + Noun, common, fem., sing., absolute");
        let parts: Vec<&str> = out.split(" + ").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("Preposition"));
        assert!(parts[1].starts_with("Noun"));
    }

    #[test]
    fn language_governs_later_segments() {
        assert_eq!(
            decode_morphology("HC/Vqw3ms"),
            "Conjunction + Verb, Qal, Sequential Imperfect, 3rd, masc., sing."
        );
        let morph = parse_morphology("AC/Vhp3ms").unwrap();
        assert_eq!(morph.language, Language::Aramaic);
        assert_eq!(morph.segments[1].fields[0].value, "Haphel");
    }

    #[test]
    fn stem_table_depends_on_language() {
        assert!(decode_morphology("HVqp3ms").contains("Qal"));
        assert!(decode_morphology("AVqp3ms").contains("Peal"));
        assert_eq!(decode_morphology("HVap3ms"), "HVap3ms");
        assert!(decode_morphology("AVap3ms").contains("Aphel"));
    }

    #[test]
    fn fields_are_optional() {
        assert_eq!(decode_morphology("HVqc"), "Verb, Qal, Infinitive Construct");
        assert_eq!(decode_morphology("HNp"), "Noun, proper name");
        assert_eq!(decode_morphology("HNpm"), "Noun, proper name, masc.");
        // absent person: participle goes straight to gender
        assert_eq!(
            decode_morphology("HVqrmsa"),
            "Verb, Qal, Participle Active, masc., sing., absolute"
        );
    }

    #[test]
    fn words_without_fields() {
        assert_eq!(decode_morphology("HC"), "Conjunction");
        assert_eq!(decode_morphology("HD"), "Adverb");
        assert_eq!(decode_morphology("HR"), "Preposition");
    }

    #[test]
    fn pronoun_particle_suffix() {
        assert_eq!(
            decode_morphology("HPp3ms"),
            "Pronoun, personal, 3rd, masc., sing."
        );
        assert_eq!(decode_morphology("HTo"), "Particle, direct object marker");
        assert_eq!(
            decode_morphology("HTd/Ncmsa"),
            "Particle, definite article + Noun, common, masc., sing., absolute"
        );
        assert_eq!(
            decode_morphology("HNcmsc/Sp3fs"),
            "Noun, common, masc., sing., construct + Suffix, pronominal, 3rd, fem., sing."
        );
        assert_eq!(decode_morphology("HSd"), "Suffix, directional he");
    }

    #[test]
    fn adjective_without_type_letter() {
        assert_eq!(
            decode_morphology("HAfpa"),
            "Adjective, fem., plur., absolute"
        );
    }

    // Current behavior: adjectives have no type slot. The corpus's `a` type
    // letter is read as the state, the gender that follows is left over, and
    // the whole code passes through.
    #[test]
    fn adjective_type_letter_passes_through() {
        assert_eq!(decode_morphology("HAamsa"), "HAamsa");
        assert!(matches!(
            parse_morphology("HAamsa"),
            Err(MorphError::UnexpectedField { found: 'm', .. })
        ));
    }

    #[test]
    fn unknown_language_is_identity() {
        assert_eq!(decode_morphology("XVqp3ms"), "XVqp3ms");
        assert_eq!(decode_morphology("hVqp3ms"), "hVqp3ms");
        assert_eq!(
            parse_morphology("XVqp3ms"),
            Err(MorphError::UnknownLanguage('X'))
        );
    }

    #[test]
    fn unknown_part_of_speech_is_identity() {
        assert_eq!(decode_morphology("HZqp3ms"), "HZqp3ms");
        assert_eq!(decode_morphology("H"), "H");
        assert_eq!(decode_morphology("HR/Xcfsa"), "HR/Xcfsa");
    }

    #[test]
    fn unknown_field_value_is_identity() {
        assert_eq!(decode_morphology("HVqp3ms9"), "HVqp3ms9");
        assert_eq!(decode_morphology("HR/Ncfsaz"), "HR/Ncfsaz");
        assert_eq!(decode_morphology("HR/"), "HR/");
    }

    #[test]
    fn deterministic() {
        let a = decode_morphology("HC/Vqw3ms");
        let b = decode_morphology("HC/Vqw3ms");
        assert_eq!(a, b);
    }
}
