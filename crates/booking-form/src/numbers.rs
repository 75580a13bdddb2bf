//! Number extraction from spoken transcripts

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn digits_regex() -> Option<&'static Regex> {
    static DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").ok()).as_ref()
}

fn small_number(word: &str) -> Option<u32> {
    let n = match word {
        "zero" => 0,
        "one" | "a" | "an" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        _ => return None,
    };
    Some(n)
}

fn tens(word: &str) -> Option<u32> {
    let n = match word {
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(n)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Word {
    Units,
    Teens,
    Tens,
    Hundred,
}

/// Whether `next` can continue a number whose last word was `last`.
fn continues(last: Option<Word>, next: Word, seen_hundred: bool) -> bool {
    match (last, next) {
        (None, _) => true,
        (Some(Word::Tens), Word::Units) => true,
        (Some(Word::Hundred), Word::Units | Word::Teens | Word::Tens) => true,
        (Some(Word::Units | Word::Teens), Word::Hundred) => !seen_hundred,
        _ => false,
    }
}

/// First number in `text`, written either as digits ("2 adults") or as
/// English words ("fifty two", "twenty-one", "one hundred and five").
///
/// Articles ("a", "an") only count when followed by a scale
/// word, so "a hundred" is 100 but "a family" is not a number. A word
/// that cannot extend the number read so far ends it: "one two" is 1.
pub fn parse_spoken_number(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    if let Some(m) = digits_regex().and_then(|re| re.find(&lower)) {
        match m.as_str().parse::<u32>() {
            Ok(n) => return Some(n),
            Err(e) => debug!(digits = m.as_str(), "digit run not usable as a count: {e}"),
        }
    }

    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    let mut total: Option<u32> = None;
    let mut last: Option<Word> = None;
    let mut seen_hundred = false;
    for (i, &word) in words.iter().enumerate() {
        let next_is_scale = words.get(i + 1).is_some_and(|w| *w == "hundred");
        if matches!(word, "a" | "an") && !next_is_scale {
            if total.is_some() {
                break;
            }
            continue;
        }
        if word == "and" {
            if total.is_some() && last != Some(Word::Hundred) {
                break;
            }
            continue;
        }

        let (kind, n) = if let Some(n) = tens(word) {
            (Word::Tens, n)
        } else if let Some(n) = small_number(word) {
            (if n < 10 { Word::Units } else { Word::Teens }, n)
        } else if word == "hundred" {
            (Word::Hundred, 100)
        } else if total.is_some() {
            break;
        } else {
            continue;
        };

        if !continues(last, kind, seen_hundred) {
            break;
        }
        total = Some(match kind {
            Word::Hundred => {
                seen_hundred = true;
                total.unwrap_or(1).max(1).saturating_mul(n)
            }
            _ => total.unwrap_or(0).saturating_add(n),
        });
        last = Some(kind);
    }
    total
}
