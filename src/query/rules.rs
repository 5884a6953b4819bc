//! Rule-based entity extraction.
//!
//! A small deterministic stand-in for a statistical NER model, tuned to the
//! way people ask about college allotments. It emits spaCy-style labels so
//! the [`LabelMap`](super::labels::LabelMap) can route them:
//!
//! | label      | recognised as                                                    |
//! |------------|------------------------------------------------------------------|
//! | `ORG`      | a run of capitalised words containing an institution keyword     |
//! | `CARDINAL` | digits, optionally grouped with commas (`10,000`), unless the    |
//! |            | previous word marks it as a year or a counselling round          |
//! | `CATEGORY` | a phrase from the category gazetteer (`SC`, `EWS`, ...); words   |
//! |            | of one or two letters only match when written in capitals        |
//! | `COURSE`   | a phrase from the course gazetteer (`MBBS`, `BDS`, ...)          |
//!
//! Gazetteers start from configured seeds and are extended with the distinct
//! values of the loaded table, so a course spelled the way the spreadsheet
//! spells it is always recognised.
//!
//! ```text
//! "What is the cutoff for SC category at Maulana Azad Medical College?"
//!                         ^^                ^^^^^^^^^^^^^^^^^^^^^^^^^^
//!                      CATEGORY                        ORG
//! ```

use super::entity::{Entity, EntityExtractor};
use crate::data::model::Table;

/// Category seeds used when the config does not provide any.
pub const DEFAULT_CATEGORIES: &[&str] = &["General", "SC", "ST", "OBC", "EWS", "PwD", "UR"];

/// Course seeds used when the config does not provide any.
pub const DEFAULT_COURSES: &[&str] = &["MBBS", "BDS", "BAMS", "BHMS", "BUMS", "B.Sc Nursing"];

/// A capitalised run only counts as an organisation if one of its words is one of these.
const INSTITUTION_WORDS: &[&str] = &[
    "college",
    "university",
    "institute",
    "institution",
    "hospital",
    "sciences",
    "academy",
    "vidyapeeth",
    "aiims",
    "jipmer",
    "pgimer",
];

/// Lower-case words allowed inside an organisation name.
const CONNECTORS: &[&str] = &["of", "and", "&"];

/// Capitalised words that never belong to an organisation name (question
/// openers, pronouns, prepositions at sentence start).
const STOP_WORDS: &[&str] = &[
    "what", "which", "who", "where", "when", "how", "why", "is", "are", "am", "can", "could",
    "do", "does", "will", "would", "should", "may", "my", "i", "i'm", "me", "we", "you", "your",
    "for", "in", "at", "to", "the", "a", "an", "tell", "show", "list", "give", "find", "please",
    "with", "under", "get", "if", "and", "of",
];

/// Title abbreviations whose trailing `.` does not end a clause (`St. John's`).
const ABBREVIATIONS: &[&str] = &["st", "dr", "mt", "sri", "shri", "smt", "govt"];

/// A number right after one of these counts something other than a rank.
const NOT_RANK_AFTER: &[&str] = &["round", "neet", "year", "session", "batch", "phase"];

/// A year right after one of these is a date, not a rank.
const YEAR_AFTER: &[&str] = &["in", "of", "since", "from", "during"];

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A whitespace-delimited word with surrounding punctuation removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    /// Byte offsets of `text` in the source string.
    start: usize,
    end: usize,
    /// The raw word ended in clause punctuation (`,` `?` ...).
    closes: bool,
    /// A title abbreviation such as `St.` or `Dr.`.
    abbrev: bool,
}

impl Token<'_> {
    fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    fn is_capitalised(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    fn is_stop_word(&self) -> bool {
        STOP_WORDS.contains(&self.lower().as_str())
    }

    fn is_connector(&self) -> bool {
        CONNECTORS.contains(&self.text)
    }

    fn is_institution_word(&self) -> bool {
        let lower = self.lower();
        let stem = lower.strip_suffix("'s").unwrap_or(&lower);
        INSTITUTION_WORDS.contains(&stem)
    }

    /// Words of one or two letters must be written in capitals to match a
    /// gazetteer entry, so `St` never reads as the `ST` category.
    fn may_match_gazetteer(&self) -> bool {
        !self.abbrev && (self.text.chars().count() > 2 || !self.text.chars().any(char::is_lowercase))
    }

    fn is_year(&self) -> bool {
        self.text.len() == 4
            && (self.text.starts_with("19") || self.text.starts_with("20"))
            && self.text.bytes().all(|b| b.is_ascii_digit())
    }

    fn is_cardinal(&self) -> bool {
        let mut groups = self.text.split(',');
        let Some(head) = groups.next() else {
            return false;
        };
        let all_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(head) {
            return false;
        }
        let rest: Vec<&str> = groups.collect();
        rest.is_empty() || (head.len() <= 3 && rest.iter().all(|g| g.len() == 3 && all_digits(g)))
    }
}

fn is_edge_punct(c: char) -> bool {
    !c.is_alphanumeric() && c != '&'
}

fn tokens(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut word_start = None;

    for (i, ch) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        if !ch.is_whitespace() {
            word_start.get_or_insert(i);
            continue;
        }
        let Some(s) = word_start.take() else {
            continue;
        };
        let raw = &text[s..i];
        let body = raw.trim_matches(is_edge_punct);
        if body.is_empty() {
            continue;
        }
        let lead = raw.len() - raw.trim_start_matches(is_edge_punct).len();
        let tail = &raw[lead + body.len()..];
        let abbrev = tail == "." && ABBREVIATIONS.contains(&body.to_lowercase().as_str());
        out.push(Token {
            text: body,
            start: s + lead,
            end: s + lead + body.len(),
            closes: !abbrev && tail.contains(&[',', ';', ':', '?', '!', '.'][..]),
            abbrev,
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Gazetteer
// ---------------------------------------------------------------------------

/// Known phrases stored as lower-cased token sequences.
#[derive(Debug, Clone, Default)]
struct Gazetteer {
    phrases: Vec<Vec<String>>,
}

impl Gazetteer {
    fn insert(&mut self, phrase: &str) {
        let words: Vec<String> = tokens(phrase).iter().map(Token::lower).collect();
        if !words.is_empty() && !self.phrases.contains(&words) {
            self.phrases.push(words);
        }
    }

    /// Length in tokens of the longest phrase starting at `words[0]`, or 0.
    fn longest_match(&self, words: &[String]) -> usize {
        self.phrases
            .iter()
            .filter(|p| words.len() >= p.len() && words[..p.len()] == p[..])
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    fn contains_word(&self, word: &str) -> bool {
        self.phrases.iter().any(|p| p.len() == 1 && p[0] == word)
    }
}

// ---------------------------------------------------------------------------
// RuleExtractor
// ---------------------------------------------------------------------------

/// Deterministic extractor for allotment questions.
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor {
    categories: Gazetteer,
    courses: Gazetteer,
}

impl RuleExtractor {
    /// Build an extractor from category and course seed phrases.
    pub fn new<C, K>(categories: C, courses: K) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let mut ex = Self::default();
        for c in categories {
            ex.categories.insert(c.as_ref());
        }
        for c in courses {
            ex.courses.insert(c.as_ref());
        }
        ex
    }

    /// Add the table's distinct course and category values to the gazetteers.
    pub fn with_table(mut self, table: &Table) -> Self {
        for c in &table.categories {
            self.categories.insert(c);
        }
        for c in &table.courses {
            self.courses.insert(c);
        }
        log::debug!(
            "Rule extractor knows {} categories and {} courses",
            self.categories.phrases.len(),
            self.courses.phrases.len()
        );
        self
    }

    fn is_gazetteer_word(&self, tok: &Token<'_>) -> bool {
        if !tok.may_match_gazetteer() {
            return false;
        }
        let lower = tok.lower();
        self.categories.contains_word(&lower) || self.courses.contains_word(&lower)
    }

    /// Token index ranges of organisation names.
    fn org_spans(&self, toks: &[Token<'_>]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut i = 0;

        while i < toks.len() {
            if !toks[i].is_capitalised() || toks[i].is_stop_word() {
                i += 1;
                continue;
            }

            // Grow the run over capitalised words and inner connectors.
            let mut j = i;
            while !toks[j].closes && j + 1 < toks.len() {
                let next = &toks[j + 1];
                let joins = (next.is_capitalised() && !next.is_stop_word()) || next.is_connector();
                if !joins {
                    break;
                }
                j += 1;
            }

            let (mut lo, mut hi) = (i, j + 1);
            while lo < hi && (toks[lo].is_connector() || self.is_gazetteer_word(&toks[lo])) {
                lo += 1;
            }
            while hi > lo && (toks[hi - 1].is_connector() || self.is_gazetteer_word(&toks[hi - 1])) {
                hi -= 1;
            }
            if toks[lo..hi].iter().any(Token::is_institution_word) {
                spans.push((lo, hi));
            }
            i = j + 1;
        }
        spans
    }
}

impl EntityExtractor for RuleExtractor {
    fn extract(&self, text: &str) -> Vec<Entity> {
        let toks = tokens(text);
        let lowered: Vec<String> = toks.iter().map(Token::lower).collect();
        let slice = |lo: usize, hi: usize| &text[toks[lo].start..toks[hi - 1].end];

        let orgs = self.org_spans(&toks);
        let mut found: Vec<(usize, Entity)> = orgs
            .iter()
            .map(|&(lo, hi)| (lo, Entity::new("ORG", slice(lo, hi))))
            .collect();

        let in_org = |k: usize| orgs.iter().any(|&(lo, hi)| (lo..hi).contains(&k));
        let mut k = 0;
        while k < toks.len() {
            if in_org(k) {
                k += 1;
                continue;
            }
            if toks[k].is_cardinal() {
                if is_rank_position(&lowered, &toks, k) {
                    found.push((k, Entity::new("CARDINAL", toks[k].text)));
                }
                k += 1;
                continue;
            }

            let rest = &lowered[k..];
            let single = |len: usize| {
                if len == 1 && !toks[k].may_match_gazetteer() {
                    0
                } else {
                    len
                }
            };
            let cat = single(self.categories.longest_match(rest));
            let course = single(self.courses.longest_match(rest));
            let (label, len) = if course > cat {
                ("COURSE", course)
            } else {
                ("CATEGORY", cat)
            };
            if len > 0 && !(k..k + len).any(in_org) {
                found.push((k, Entity::new(label, slice(k, k + len))));
                k += len;
            } else {
                k += 1;
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, e)| e).collect()
    }
}

/// Whether the number at `k` can be a rank given the word before it.
fn is_rank_position(lowered: &[String], toks: &[Token<'_>], k: usize) -> bool {
    let Some(prev) = k.checked_sub(1).map(|p| lowered[p].as_str()) else {
        return true;
    };
    if NOT_RANK_AFTER.contains(&prev) {
        return false;
    }
    !(toks[k].is_year() && YEAR_AFTER.contains(&prev))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Columns, Record};

    fn extractor() -> RuleExtractor {
        RuleExtractor::new(DEFAULT_CATEGORIES, DEFAULT_COURSES)
    }

    fn labelled(text: &str) -> Vec<(String, String)> {
        extractor()
            .extract(text)
            .into_iter()
            .map(|e| (e.label, e.text))
            .collect()
    }

    fn pair(label: &str, text: &str) -> (String, String) {
        (label.to_string(), text.to_string())
    }

    #[test]
    fn tokens_strip_punctuation_and_keep_offsets() {
        let text = "cutoff at (King George's), 10,000?";
        let toks = tokens(text);
        let words: Vec<&str> = toks.iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["cutoff", "at", "King", "George's", "10,000"]);
        assert_eq!(&text[toks[3].start..toks[3].end], "George's");
        assert!(toks[3].closes);
        assert!(!toks[2].closes);
    }

    #[test]
    fn cardinals_accept_digit_groups_only() {
        let is_cardinal = |s: &str| tokens(s)[0].is_cardinal();
        assert!(is_cardinal("10000"));
        assert!(is_cardinal("10,000"));
        assert!(is_cardinal("1,234,567"));
        assert!(!is_cardinal("1,23"));
        assert!(!is_cardinal("12.5"));
        assert!(!is_cardinal("2nd"));
    }

    #[test]
    fn college_name_after_question_words() {
        assert_eq!(
            labelled("What rank should I get for Vardhaman Mahavir Medical College?"),
            vec![pair("ORG", "Vardhaman Mahavir Medical College")]
        );
    }

    #[test]
    fn category_and_college() {
        assert_eq!(
            labelled("What is the cutoff for SC category at Maulana Azad Medical College?"),
            vec![
                pair("CATEGORY", "SC"),
                pair("ORG", "Maulana Azad Medical College")
            ]
        );
        assert_eq!(
            labelled("What is the cutoff for general category at Vardhaman Mahavir Medical College?"),
            vec![
                pair("CATEGORY", "general"),
                pair("ORG", "Vardhaman Mahavir Medical College")
            ]
        );
    }

    #[test]
    fn course_and_college() {
        assert_eq!(
            labelled("Which rank is needed for MBBS in Kasturba Medical College?"),
            vec![pair("COURSE", "MBBS"), pair("ORG", "Kasturba Medical College")]
        );
    }

    #[test]
    fn possessive_names_and_connectors() {
        assert_eq!(
            labelled("What rank is required for EWS category at King George's Medical University?"),
            vec![
                pair("CATEGORY", "EWS"),
                pair("ORG", "King George's Medical University")
            ]
        );
        assert_eq!(
            labelled("cutoff at All India Institute of Medical Sciences, New Delhi"),
            vec![pair("ORG", "All India Institute of Medical Sciences")]
        );
    }

    #[test]
    fn rank_question() {
        assert_eq!(
            labelled("My rank is 10000, what colleges can I expect and what courses can I expect?"),
            vec![pair("CARDINAL", "10000")]
        );
    }

    #[test]
    fn course_word_does_not_start_an_org() {
        assert_eq!(
            labelled("MBBS Kasturba Medical College OBC"),
            vec![
                pair("COURSE", "MBBS"),
                pair("ORG", "Kasturba Medical College"),
                pair("CATEGORY", "OBC"),
            ]
        );
    }

    #[test]
    fn saint_abbreviation_stays_inside_the_name() {
        assert_eq!(
            labelled("cutoff at St. John's Medical College?"),
            vec![pair("ORG", "St. John's Medical College")]
        );
        assert_eq!(
            labelled("ST category at Dr. Ram Manohar Lohia Hospital"),
            vec![
                pair("CATEGORY", "ST"),
                pair("ORG", "Dr. Ram Manohar Lohia Hospital")
            ]
        );
    }

    #[test]
    fn short_categories_need_capitals() {
        assert!(labelled("seats in st and sc quota").is_empty());
        assert_eq!(labelled("seats for SC"), vec![pair("CATEGORY", "SC")]);
    }

    #[test]
    fn years_and_rounds_are_not_ranks() {
        assert_eq!(
            labelled("NEET 2024 cutoff for OBC at Maulana Azad Medical College"),
            vec![
                pair("CATEGORY", "OBC"),
                pair("ORG", "Maulana Azad Medical College")
            ]
        );
        assert_eq!(
            labelled("round 2 cutoff for OBC at Kasturba Medical College"),
            vec![
                pair("CATEGORY", "OBC"),
                pair("ORG", "Kasturba Medical College")
            ]
        );
        assert!(labelled("cutoff in 2023").is_empty());
        assert_eq!(
            labelled("round 2 colleges for rank 2000"),
            vec![pair("CARDINAL", "2000")]
        );
    }

    #[test]
    fn capitalised_words_without_keyword_are_not_orgs() {
        assert!(labelled("Is Delhi better than Mumbai").is_empty());
    }

    #[test]
    fn table_values_extend_gazetteers() {
        let table = Table::from_records(
            vec![Record::new(
                "Alpha Medical College",
                "B.Sc Nursing (Hons)",
                "OBC PwD",
                700,
            )],
            Columns::default(),
            Vec::new(),
        );
        let ex = extractor().with_table(&table);
        let got: Vec<(String, String)> = ex
            .extract("seats for obc pwd in b.sc nursing (hons) at 700")
            .into_iter()
            .map(|e| (e.label, e.text))
            .collect();
        assert_eq!(
            got,
            vec![
                pair("CATEGORY", "obc pwd"),
                pair("COURSE", "b.sc nursing (hons"),
                pair("CARDINAL", "700"),
            ]
        );
    }
}
