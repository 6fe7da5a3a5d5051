//! Classifier input preparation.
//!
//! Mirrors the text vectorization layer the classifier was trained with:
//! ASCII lower-casing, `<br />` removal and ASCII punctuation stripping, then a
//! whitespace split mapped onto a fixed vocabulary and padded to a fixed length.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use super::{InferenceError, InferenceResult};

pub const PAD_TOKEN: &str = "";
pub const OOV_TOKEN: &str = "[UNK]";
pub const PAD_ID: i64 = 0;
pub const OOV_ID: i64 = 1;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn standardize(input: &str) -> String {
    input
        .to_ascii_lowercase()
        .replace("<br />", " ")
        .chars()
        .filter(|ch| !ch.is_ascii_punctuation())
        .collect()
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: HashMap<String, i64>,
}

impl Vocabulary {
    /// Builds a vocabulary from one token per line. Index 0 is always the
    /// padding token and index 1 the OOV token.
    pub fn from_lines<I, S>(lines: I, max_tokens: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = vec![PAD_TOKEN.to_string(), OOV_TOKEN.to_string()];
        let mut seen: HashSet<String> = tokens.iter().cloned().collect();

        for line in lines {
            if tokens.len() >= max_tokens {
                break;
            }
            let token = line.as_ref().trim();
            if seen.contains(token) {
                continue;
            }
            seen.insert(token.to_string());
            tokens.push(token.to_string());
        }

        let ids = tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (token.clone(), idx as i64))
            .collect();
        Self { tokens, ids }
    }

    pub fn load(path: impl AsRef<Path>, max_tokens: usize) -> InferenceResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| InferenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let contents = decode_vocabulary(&raw);
        Ok(Self::from_lines(contents.lines(), max_tokens))
    }

    pub fn id(&self, token: &str) -> i64 {
        self.ids.get(token).copied().unwrap_or(OOV_ID)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn decode_vocabulary(raw: &[u8]) -> String {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::warn!("vocabulary is not valid UTF-8; decoding lossily");
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: Vocabulary,
    sequence_length: usize,
}

impl Vectorizer {
    pub fn new(vocabulary: Vocabulary, sequence_length: usize) -> Self {
        Self {
            vocabulary,
            sequence_length,
        }
    }

    pub fn vectorize(&self, text: &str) -> Vec<i64> {
        let standardized = standardize(text);
        let mut ids: Vec<i64> = standardized
            .split_whitespace()
            .take(self.sequence_length)
            .map(|token| self.vocabulary.id(token))
            .collect();
        ids.resize(self.sequence_length, PAD_ID);
        ids
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn standardize_lowercases_and_strips_markup_and_punctuation() {
        assert_eq!(standardize("Hello,<br />World!"), "hello world");
        assert_eq!(standardize("ঢাকা, বাংলাদেশ।"), "ঢাকা বাংলাদেশ।");
        assert_eq!(standardize("It's \"quoted\" (ok)"), "its quoted ok");
    }

    #[test]
    fn standardize_only_lowercases_ascii() {
        assert_eq!(standardize("ÉCOLE Ωmega ДОМ BBC"), "École Ωmega ДОМ bbc");
    }

    #[test]
    fn vocabulary_reserves_padding_and_oov_slots() {
        let vocab = Vocabulary::from_lines(["ঢাকা", "খেলা"], 100);
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id(""), PAD_ID);
        assert_eq!(vocab.id("[UNK]"), OOV_ID);
        assert_eq!(vocab.id("ঢাকা"), 2);
        assert_eq!(vocab.id("খেলা"), 3);
        assert_eq!(vocab.id("missing"), OOV_ID);
    }

    #[test]
    fn vocabulary_dedupes_and_keeps_first_occurrence() {
        let vocab = Vocabulary::from_lines(["", "[UNK]", " a ", "b", "a", "c"], 100);
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.id("a"), 2);
        assert_eq!(vocab.id("b"), 3);
        assert_eq!(vocab.id("c"), 4);
    }

    #[test]
    fn vocabulary_is_capped_at_max_tokens() {
        let vocab = Vocabulary::from_lines(["a", "b", "c", "d"], 4);
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id("b"), 3);
        assert_eq!(vocab.id("c"), OOV_ID);
    }

    #[test]
    fn load_strips_byte_order_mark() {
        let mut path = std::env::temp_dir();
        path.push(format!("vocab-{}.txt", uuid::Uuid::new_v4()));
        {
            let mut file = std::fs::File::create(&path).expect("create temp vocab");
            file.write_all(b"\xEF\xBB\xBFfirst\nsecond\n")
                .expect("write temp vocab");
        }

        let vocab = Vocabulary::load(&path, 100).expect("vocab should load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(vocab.id("first"), 2);
        assert_eq!(vocab.id("second"), 3);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Vocabulary::load("/definitely/not/here.txt", 100).expect_err("should fail");
        assert!(matches!(err, InferenceError::Io { .. }));
    }

    #[test]
    fn vectorize_pads_and_truncates() {
        let vocab = Vocabulary::from_lines(["news", "today"], 100);
        let vectorizer = Vectorizer::new(vocab, 4);

        assert_eq!(vectorizer.vectorize("News, today!"), vec![2, 3, 0, 0]);
        assert_eq!(
            vectorizer.vectorize("today news unknown today news"),
            vec![3, 2, 1, 3]
        );
        assert_eq!(vectorizer.vectorize("   "), vec![0, 0, 0, 0]);
    }
}
