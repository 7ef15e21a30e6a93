//! Lexical relevance scoring.
//!
//! BM25 over the chunk collection of a single URL. Rewards query-term
//! overlap, saturates with repeated term frequency, and penalizes chunks that
//! are long relative to the collection average. Purely lexical: no stemming
//! beyond tokenization, no synonyms.

use std::collections::HashMap;

/// Tokenize text into searchable terms: lowercase, split on non-alphanumeric
/// characters, drop tokens shorter than two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() >= 2)
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate, preserving first-seen order. Used for query
/// terms so repeated words in a question do not double-count.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Collection-level statistics for one URL's chunks.
pub struct CorpusStats<'a> {
    /// Total chunks in the collection.
    pub total_docs: usize,
    /// Number of chunks containing each term.
    pub doc_freqs: &'a HashMap<String, usize>,
    /// Average chunk length in tokens.
    pub avg_doc_len: f32,
}

impl CorpusStats<'_> {
    /// Smoothed IDF: ln((N - df + 0.5) / (df + 0.5) + 1). Always positive.
    pub fn idf(&self, term: &str) -> f32 {
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f32;
        let n = self.total_docs as f32;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

/// BM25 scorer with the standard parameters.
///
/// For each query term t:
/// score += IDF(t) * (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * dl/avgdl))
#[derive(Debug, Clone)]
pub struct Bm25Scorer {
    /// Term frequency saturation.
    k1: f32,
    /// Length normalization strength.
    b: f32,
}

impl Default for Bm25Scorer {
    fn default() -> Self {
        Bm25Scorer { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Scorer {
    pub fn new(k1: f32, b: f32) -> Self {
        Bm25Scorer { k1, b }
    }

    /// Score one chunk against pre-tokenized query terms.
    ///
    /// `term_counts` and `doc_len` are the chunk's term-frequency table and
    /// token count, computed once at ingestion time.
    pub fn score(
        &self,
        query_terms: &[String],
        term_counts: &HashMap<String, u32>,
        doc_len: usize,
        stats: &CorpusStats,
    ) -> f32 {
        if query_terms.is_empty() || doc_len == 0 {
            return 0.0;
        }

        let dl = doc_len as f32;
        let avg_len = stats.avg_doc_len.max(1.0);
        let mut score = 0.0;

        for term in query_terms {
            let tf = term_counts.get(term.as_str()).copied().unwrap_or(0) as f32;
            if tf == 0.0 {
                continue;
            }

            let idf = stats.idf(term);
            let tf_component =
                (tf * (self.k1 + 1.0)) / (tf + self.k1 * (1.0 - self.b + self.b * dl / avg_len));

            score += idf * tf_component;
        }

        score
    }
}

/// Build a chunk's term-frequency table from its text.
pub fn term_counts(text: &str) -> (HashMap<String, u32>, usize) {
    let tokens = tokenize(text);
    let len = tokens.len();
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    (counts, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_for(texts: &[&str]) -> (HashMap<String, usize>, f32) {
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        let mut total_tokens = 0usize;
        for text in texts {
            let (counts, len) = term_counts(text);
            total_tokens += len;
            for term in counts.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
        }
        let avg = total_tokens as f32 / texts.len().max(1) as f32;
        (doc_freqs, avg)
    }

    #[test]
    fn tokenize_basic() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn tokenize_filters_short_tokens() {
        // "I" and "a" are below the two-character floor
        assert_eq!(tokenize("I am a test"), vec!["am", "test"]);
    }

    #[test]
    fn tokenize_unique_dedupes() {
        assert_eq!(tokenize_unique("test test TEST"), vec!["test"]);
    }

    #[test]
    fn idf_favors_rare_terms() {
        let mut doc_freqs = HashMap::new();
        doc_freqs.insert("common".to_string(), 50);
        doc_freqs.insert("rare".to_string(), 1);
        let stats = CorpusStats {
            total_docs: 100,
            doc_freqs: &doc_freqs,
            avg_doc_len: 10.0,
        };

        assert!(stats.idf("rare") > stats.idf("common"));
        assert!(stats.idf("missing") > stats.idf("rare"));
        assert!(stats.idf("common") > 0.0);
    }

    #[test]
    fn more_query_overlap_scores_higher() {
        let texts = [
            "Brazil's population is 203 million.",
            "Brazil's capital is Bras\u{ed}lia.",
        ];
        let (doc_freqs, avg) = stats_for(&texts);
        let stats = CorpusStats {
            total_docs: texts.len(),
            doc_freqs: &doc_freqs,
            avg_doc_len: avg,
        };
        let scorer = Bm25Scorer::default();
        let query = tokenize_unique("What is Brazil's capital?");

        let (counts_a, len_a) = term_counts(texts[0]);
        let (counts_b, len_b) = term_counts(texts[1]);
        let population = scorer.score(&query, &counts_a, len_a, &stats);
        let capital = scorer.score(&query, &counts_b, len_b, &stats);

        assert!(capital > population);
    }

    #[test]
    fn long_chunks_penalized() {
        let padding = "water earth fire wind ".repeat(20);
        let long = format!("the answer is here {}", padding);
        let short = "the answer is here";
        let texts = [long.as_str(), short];
        let (doc_freqs, avg) = stats_for(&texts);
        let stats = CorpusStats {
            total_docs: texts.len(),
            doc_freqs: &doc_freqs,
            avg_doc_len: avg,
        };
        let scorer = Bm25Scorer::default();
        let query = tokenize_unique("answer");

        let (counts_long, len_long) = term_counts(&long);
        let (counts_short, len_short) = term_counts(short);
        let score_long = scorer.score(&query, &counts_long, len_long, &stats);
        let score_short = scorer.score(&query, &counts_short, len_short, &stats);

        assert!(score_short > score_long);
    }

    #[test]
    fn no_overlap_scores_zero() {
        let (counts, len) = term_counts("hello world");
        let doc_freqs = HashMap::new();
        let stats = CorpusStats {
            total_docs: 1,
            doc_freqs: &doc_freqs,
            avg_doc_len: len as f32,
        };
        let scorer = Bm25Scorer::default();

        let score = scorer.score(&tokenize_unique("banana"), &counts, len, &stats);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_query_scores_zero() {
        let (counts, len) = term_counts("hello world");
        let doc_freqs = HashMap::new();
        let stats = CorpusStats {
            total_docs: 1,
            doc_freqs: &doc_freqs,
            avg_doc_len: 2.0,
        };
        let scorer = Bm25Scorer::default();

        assert_eq!(scorer.score(&[], &counts, len, &stats), 0.0);
    }

    #[test]
    fn scoring_is_stable() {
        let texts = ["alpha beta gamma", "beta gamma delta", "gamma delta epsilon"];
        let (doc_freqs, avg) = stats_for(&texts);
        let stats = CorpusStats {
            total_docs: texts.len(),
            doc_freqs: &doc_freqs,
            avg_doc_len: avg,
        };
        let scorer = Bm25Scorer::default();
        let query = tokenize_unique("beta gamma");

        let score_once: Vec<f32> = texts
            .iter()
            .map(|t| {
                let (counts, len) = term_counts(t);
                scorer.score(&query, &counts, len, &stats)
            })
            .collect();
        let score_again: Vec<f32> = texts
            .iter()
            .map(|t| {
                let (counts, len) = term_counts(t);
                scorer.score(&query, &counts, len, &stats)
            })
            .collect();

        assert_eq!(score_once, score_again);
    }
}
