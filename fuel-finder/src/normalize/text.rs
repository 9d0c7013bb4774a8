//! Text classification and cleanup for tag values.
//!
//! The "English" test here is a character-class check, not language
//! detection: transliterated Urdu written in Latin letters passes, and an
//! English name containing an accented letter fails. That limitation is
//! accepted.

use std::borrow::Cow;

/// Punctuation allowed in English text by default.
pub const DEFAULT_PUNCTUATION: &str = ".,()-'\"/&";

/// Classifies strings as English-looking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnglishHeuristic {
    punctuation: Vec<char>,
}

impl EnglishHeuristic {
    /// Build a heuristic allowing the given punctuation characters.
    ///
    /// Non-ASCII characters in `punctuation` are ignored.
    pub fn new(punctuation: &str) -> Self {
        Self {
            punctuation: punctuation.chars().filter(char::is_ascii).collect(),
        }
    }

    /// Whether `text` is non-empty and made only of ASCII letters, digits,
    /// whitespace, and the allowed punctuation.
    ///
    /// ```
    /// use fuel_finder::normalize::EnglishHeuristic;
    ///
    /// let heuristic = EnglishHeuristic::default();
    /// assert!(heuristic.is_english("Total Parco (Blue Area)"));
    /// assert!(!heuristic.is_english("کراچی"));
    /// assert!(!heuristic.is_english(""));
    /// ```
    pub fn is_english(&self, text: &str) -> bool {
        !text.is_empty()
            && text.chars().all(|c| {
                c.is_ascii_alphanumeric()
                    || c.is_ascii_whitespace()
                    || self.punctuation.contains(&c)
            })
    }
}

impl Default for EnglishHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION)
    }
}

/// Urdu terms commonly found in Pakistani OSM tags, with English renderings.
const URDU_TERMS: &[(&str, &str)] = &[
    // Places
    ("اسلام آباد", "Islamabad"),
    ("فیصل آباد", "Faisalabad"),
    ("کراچی", "Karachi"),
    ("لاہور", "Lahore"),
    ("ملتان", "Multan"),
    ("حیدرآباد", "Hyderabad"),
    ("راولپنڈی", "Rawalpindi"),
    ("پشاور", "Peshawar"),
    ("کوئٹہ", "Quetta"),
    ("سکھر", "Sukkur"),
    // Fuel stations
    ("پیٹرول پمپ", "Petrol Pump"),
    ("ایندھن اسٹیشن", "Fuel Station"),
    ("گیس اسٹیشن", "Gas Station"),
    ("پی ایس او", "PSO"),
    ("شیل", "Shell"),
    ("ٹوٹل", "Total"),
    ("ایٹک", "Attock"),
    ("حسکول", "Hascol"),
    // Land use
    ("رہائشی علاقہ", "Residential Area"),
    ("تجارتی علاقہ", "Commercial Area"),
    ("صنعتی علاقہ", "Industrial Area"),
    ("زرعی زمین", "Agricultural Land"),
    ("پارک", "Park"),
    ("اسپتال", "Hospital"),
    ("اسکول", "School"),
    ("مسجد", "Mosque"),
    ("بازار", "Market"),
    ("مال", "Mall"),
    // General
    ("شمال", "North"),
    ("جنوب", "South"),
    ("مشرق", "East"),
    ("مغرب", "West"),
    ("سڑک", "Road"),
    ("گلی", "Street"),
    ("محلہ", "Neighborhood"),
];

/// Replace known Urdu terms with their English renderings.
///
/// Returns the input unchanged (borrowed) when it is already ASCII.
/// Unknown Urdu words are left in place, so the result may still fail
/// [`EnglishHeuristic::is_english`].
pub fn translate_known_terms(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    // Longest first, so "شمال" is not split by the shorter "مال".
    let mut terms: Vec<_> = URDU_TERMS.iter().collect();
    terms.sort_by_key(|(urdu, _)| std::cmp::Reverse(urdu.chars().count()));

    let mut translated = text.to_owned();
    for (urdu, english) in terms {
        if translated.contains(urdu) {
            translated = translated.replace(urdu, english);
        }
    }
    Cow::Owned(translated)
}
