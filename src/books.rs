//! Canonical catalog of the books of the Hebrew Bible.
//!
//! Ids are the OSIS book ids used by morphhb for both the `osisID`
//! attributes and the corpus file names (`Gen.xml`, `1Sam.xml`, ...).
//! Chapter counts follow the Leningrad Codex versification of the corpus,
//! which differs from English Bibles in a few books (Joel has 4 chapters,
//! Malachi 3).

use crate::models::{Book, TESTAMENT_OT};

/// Static metadata for one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub hebrew_name: &'static str,
    pub abbreviation: &'static str,
    pub chapter_count: u32,
}

impl BookInfo {
    /// 1-based position in canonical order.
    pub fn order_index(&self) -> i64 {
        BOOKS
            .iter()
            .position(|b| b.id == self.id)
            .map(|i| i as i64 + 1)
            .unwrap_or(0)
    }

    /// Corpus file name for this book.
    pub fn file_name(&self) -> String {
        format!("{}.xml", self.id)
    }

    pub fn to_row(&self) -> Book {
        Book {
            id: self.id.to_string(),
            name: self.name.to_string(),
            hebrew_name: self.hebrew_name.to_string(),
            abbreviation: self.abbreviation.to_string(),
            chapter_count: i64::from(self.chapter_count),
            testament: TESTAMENT_OT.to_string(),
            order_index: self.order_index(),
        }
    }
}

const fn book(
    id: &'static str,
    name: &'static str,
    hebrew_name: &'static str,
    abbreviation: &'static str,
    chapter_count: u32,
) -> BookInfo {
    BookInfo {
        id,
        name,
        hebrew_name,
        abbreviation,
        chapter_count,
    }
}

pub const BOOKS: &[BookInfo] = &[
    book("Gen", "Genesis", "בראשית", "Gen", 50),
    book("Exod", "Exodus", "שמות", "Ex", 40),
    book("Lev", "Leviticus", "ויקרא", "Lev", 27),
    book("Num", "Numbers", "במדבר", "Num", 36),
    book("Deut", "Deuteronomy", "דברים", "Deut", 34),
    book("Josh", "Joshua", "יהושע", "Josh", 24),
    book("Judg", "Judges", "שופטים", "Judg", 21),
    book("Ruth", "Ruth", "רות", "Ruth", 4),
    book("1Sam", "1 Samuel", "שמואל א", "1Sa", 31),
    book("2Sam", "2 Samuel", "שמואל ב", "2Sa", 24),
    book("1Kgs", "1 Kings", "מלכים א", "1Ki", 22),
    book("2Kgs", "2 Kings", "מלכים ב", "2Ki", 25),
    book("1Chr", "1 Chronicles", "דברי הימים א", "1Ch", 29),
    book("2Chr", "2 Chronicles", "דברי הימים ב", "2Ch", 36),
    book("Ezra", "Ezra", "עזרא", "Ezr", 10),
    book("Neh", "Nehemiah", "נחמיה", "Neh", 13),
    book("Esth", "Esther", "אסתר", "Est", 10),
    book("Job", "Job", "איוב", "Job", 42),
    book("Ps", "Psalms", "תהלים", "Ps", 150),
    book("Prov", "Proverbs", "משלי", "Prov", 31),
    book("Eccl", "Ecclesiastes", "קהלת", "Eccl", 12),
    book("Song", "Song of Songs", "שיר השירים", "Song", 8),
    book("Isa", "Isaiah", "ישעיהו", "Isa", 66),
    book("Jer", "Jeremiah", "ירמיהו", "Jer", 52),
    book("Lam", "Lamentations", "איכה", "Lam", 5),
    book("Ezek", "Ezekiel", "יחזקאל", "Ezek", 48),
    book("Dan", "Daniel", "דניאל", "Dan", 12),
    book("Hos", "Hosea", "הושע", "Hos", 14),
    book("Joel", "Joel", "יואל", "Joel", 4),
    book("Amos", "Amos", "עמוס", "Amos", 9),
    book("Obad", "Obadiah", "עבדיה", "Obad", 1),
    book("Jonah", "Jonah", "יונה", "Jon", 4),
    book("Mic", "Micah", "מיכה", "Mic", 7),
    book("Nah", "Nahum", "נחום", "Nah", 3),
    book("Hab", "Habakkuk", "חבקוק", "Hab", 3),
    book("Zeph", "Zephaniah", "צפניה", "Zeph", 3),
    book("Hag", "Haggai", "חגי", "Hag", 2),
    book("Zech", "Zechariah", "זכריה", "Zech", 14),
    book("Mal", "Malachi", "מלאכי", "Mal", 3),
];

/// Look a book up by OSIS id or abbreviation, ignoring ASCII case.
pub fn find_book(key: &str) -> Option<&'static BookInfo> {
    BOOKS
        .iter()
        .find(|b| b.id.eq_ignore_ascii_case(key) || b.abbreviation.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_nine_books() {
        assert_eq!(BOOKS.len(), 39);
        let total: u32 = BOOKS.iter().map(|b| b.chapter_count).sum();
        assert_eq!(total, 929);
    }

    #[test]
    fn ids_unique() {
        for (i, a) in BOOKS.iter().enumerate() {
            for b in &BOOKS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn lookup_by_id_and_abbreviation() {
        assert_eq!(find_book("gen").map(|b| b.id), Some("Gen"));
        assert_eq!(find_book("Ex").map(|b| b.id), Some("Exod"));
        assert_eq!(find_book("1sa").map(|b| b.id), Some("1Sam"));
        assert!(find_book("Matt").is_none());
    }

    #[test]
    fn row_metadata() {
        let row = find_book("Mal").unwrap().to_row();
        assert_eq!(row.order_index, 39);
        assert_eq!(row.chapter_count, 3);
        assert_eq!(row.testament, "OT");
        assert_eq!(find_book("Gen").unwrap().order_index(), 1);
        assert_eq!(find_book("Ruth").unwrap().file_name(), "Ruth.xml");
    }
}
