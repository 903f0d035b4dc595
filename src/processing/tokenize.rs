//! Bag-of-words indexing of raw entry text

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::MIN_TOKEN_LEN;
use crate::core::{Corpus, Document, SparseVector};

// Common English words and contractions, matched case-sensitively
const STOP_WORDS: &[&str] = &[
	"'tis", "'twas", "a", "able", "about", "across", "after", "ain't", "all", "almost", "also",
	"am", "among", "an", "and", "any", "are", "aren't", "as", "at", "be", "because", "been",
	"but", "by", "can", "can't", "cannot", "could", "could've", "couldn't", "dear", "did",
	"didn't", "do", "does", "doesn't", "don't", "either", "else", "ever", "every", "for", "from",
	"get", "got", "had", "has", "hasn't", "have", "he", "he'd", "he'll", "he's", "her", "hers",
	"him", "his", "how", "how'd", "how'll", "how's", "however", "i", "i'd", "i'll", "i'm",
	"i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "just", "least", "let",
	"like", "likely", "may", "me", "might", "might've", "mightn't", "most", "must", "must've",
	"mustn't", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
	"other", "our", "own", "rather", "said", "say", "says", "shan't", "she", "she'd", "she'll",
	"she's", "should", "should've", "shouldn't", "since", "so", "some", "than", "that",
	"that'll", "that's", "the", "their", "them", "then", "there", "there's", "these", "they",
	"they'd", "they'll", "they're", "they've", "this", "tis", "to", "too", "twas", "us", "wants",
	"was", "wasn't", "we", "we'd", "we'll", "we're", "were", "weren't", "what", "what'd",
	"what's", "when", "when'd", "when'll", "when's", "where", "where'd", "where'll", "where's",
	"which", "while", "who", "who'd", "who'll", "who's", "whom", "why", "why'd", "why'll",
	"why's", "will", "with", "won't", "would", "would've", "wouldn't", "yet", "you", "you'd",
	"you'll", "you're", "you've", "your",
];

static STOP_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
static SPACE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn stop_words() -> &'static HashSet<&'static str> {
	STOP_SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

pub fn is_stop_word(word: &str) -> bool {
	stop_words().contains(word)
}

/// Remove `<...>` tags and collapse whitespace runs into single spaces
pub fn clean_markup(text: &str) -> String {
	let tags = TAG_PATTERN.get_or_init(|| Regex::new(r"</?[^>]+>").expect("static tag pattern"));
	let spaces = SPACE_PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"));

	let stripped = tags.replace_all(text, "");
	spaces.replace_all(&stripped, " ").into_owned()
}

/// Replace ASCII punctuation with spaces, keeping apostrophes for contractions
fn discard_punctuation(text: &str) -> String {
	text.chars()
		.map(|c| if c.is_ascii_punctuation() && c != '\'' { ' ' } else { c })
		.collect()
}

fn is_keyword(token: &str) -> bool {
	token.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(token)
}

/// Tokens that survive punctuation, length and stop-word filtering, in order
pub fn keywords(text: &str) -> Vec<String> {
	let cleaned = discard_punctuation(&clean_markup(text));
	cleaned
		.split_whitespace()
		.filter(|token| is_keyword(token))
		.map(str::to_string)
		.collect()
}

/// Term-frequency vector of `text`
pub fn index(text: &str) -> SparseVector {
	let mut vector = SparseVector::new();
	for word in keywords(text) {
		vector.add(&word, 1.0);
	}
	vector
}

/// Index title and body of a document, optionally lower-cased first
pub fn index_document(document: &Document, lowercase: bool) -> SparseVector {
	let text = document.text();
	if lowercase {
		index(&text.to_lowercase())
	} else {
		index(&text)
	}
}

/// Index every document of a collection
pub fn build_index(documents: &BTreeMap<String, Document>, lowercase: bool) -> Corpus {
	documents
		.iter()
		.map(|(id, document)| (id.clone(), index_document(document, lowercase)))
		.collect()
}
