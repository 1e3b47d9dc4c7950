use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported digest languages. The set is closed: unsupported codes are
/// rejected at the request boundary instead of reaching the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    fn stop_words(&self) -> &'static [&'static str] {
        match self {
            Language::De => GERMAN_STOP_WORDS,
            Language::En => ENGLISH_STOP_WORDS,
        }
    }

    /// Abbreviations that end in a period without ending a sentence,
    /// stored without the trailing dot.
    fn abbreviations(&self) -> &'static [&'static str] {
        match self {
            Language::De => GERMAN_ABBREVIATIONS,
            Language::En => ENGLISH_ABBREVIATIONS,
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            other => bail!("unsupported language code: {other}"),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Split text into sentences with language-aware boundary rules: a `.`, `!`
/// or `?` ends a sentence only when followed by whitespace or end of input,
/// and a `.` additionally must not terminate a known abbreviation, a single
/// initial, or (in German) an ordinal number like "3. Oktober".
pub fn split_sentences(text: &str, language: Language) -> Vec<String> {
    let abbreviations = language.abbreviations();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some(next) if next.is_whitespace() => {
                c != '.' || !suppresses_period_break(&current, language, abbreviations)
            }
            // next char attaches to the token ("3.14", "e.g.", quoted dots)
            Some(_) => false,
        };
        if at_boundary {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// True when the token before a trailing period is an abbreviation, a single
/// initial ("J."), or a German ordinal.
fn suppresses_period_break(current: &str, language: Language, abbreviations: &[&str]) -> bool {
    let before_dot = &current[..current.len() - 1];
    let last_token = before_dot
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("");

    if last_token.chars().count() == 1 && last_token.chars().all(char::is_alphabetic) {
        return true;
    }
    if language == Language::De
        && !last_token.is_empty()
        && last_token.chars().all(|c| c.is_ascii_digit())
    {
        return true;
    }
    abbreviations
        .iter()
        .any(|abbr| last_token.eq_ignore_ascii_case(abbr))
}

/// Lowercased word terms of a sentence with the language's stop words
/// removed. Used as the feature vector for sentence similarity.
pub fn content_terms(sentence: &str, language: Language) -> Vec<String> {
    let stop_words = language.stop_words();
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .filter(|w| !stop_words.contains(&w.as_str()))
        .collect()
}

const GERMAN_ABBREVIATIONS: &[&str] = &[
    "z.B", "u.a", "d.h", "bzw", "ca", "evtl", "ggf", "usw", "vgl", "bzgl", "inkl", "zzgl",
    "Dr", "Prof", "Nr", "Abs", "Art", "Str", "St", "Mio", "Mrd",
];

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "approx", "Mr", "Mrs", "Ms", "Dr", "Prof", "St", "Jr", "Sr",
    "Inc", "Ltd", "Corp", "Co", "No", "U.S", "U.K", "U.N",
];

const GERMAN_STOP_WORDS: &[&str] = &[
    "aber", "alle", "allem", "allen", "aller", "alles", "als", "also", "am", "an", "andere",
    "auch", "auf", "aus", "bei", "bin", "bis", "bist", "da", "damit", "dann", "das", "dass",
    "dem", "den", "der", "des", "die", "dies", "diese", "diesem", "diesen", "dieser", "doch",
    "dort", "durch", "ein", "eine", "einem", "einen", "einer", "eines", "er", "es", "für",
    "gegen", "hab", "habe", "haben", "hat", "hatte", "hier", "ich", "ihr", "ihre", "im", "in",
    "ins", "ist", "ja", "jede", "jedem", "jeden", "jeder", "jedes", "kann", "kein", "keine",
    "können", "machen", "man", "mehr", "mit", "muss", "nach", "nicht", "noch", "nun", "nur",
    "ob", "oder", "ohne", "schon", "sein", "seine", "sich", "sie", "sind", "so", "über", "um",
    "und", "uns", "unter", "vom", "von", "vor", "war", "waren", "was", "wenn", "werden", "wie",
    "wieder", "wir", "wird", "wurde", "wurden", "zu", "zum", "zur",
];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "down", "each", "few", "for", "from", "further", "had", "has",
    "have", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "out", "over", "own", "said", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your",
];
