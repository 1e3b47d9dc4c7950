//! Sentence ranking by eigenvector centrality over a similarity graph.
//!
//! Classic LexRank shape: sentences become nodes, idf-modified cosine
//! similarity above a threshold becomes an edge, and a damped power
//! iteration over the row-stochastic adjacency yields one centrality
//! value per sentence.

use std::collections::{HashMap, HashSet};

const DAMPING: f64 = 0.85;
const SIMILARITY_THRESHOLD: f64 = 0.1;
const MAX_ITERATIONS: usize = 50;
const CONVERGENCE_EPSILON: f64 = 1e-4;

/// Rank sentences given their stop-word-filtered terms.
///
/// Returns one centrality value per input sentence, or `None` when the input
/// is degenerate (no sentences, or no sentence has any content term left),
/// in which case the caller falls back to truncation.
pub fn rank(sentence_terms: &[Vec<String>]) -> Option<Vec<f64>> {
    let n = sentence_terms.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        if sentence_terms[0].is_empty() {
            return None;
        }
        return Some(vec![1.0]);
    }

    // document frequency per term, for idf-modified cosine
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for terms in sentence_terms {
        let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
        for term in unique {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
    }
    if doc_freq.is_empty() {
        return None;
    }

    // tf-idf vector per sentence; idf is smoothed so terms present in every
    // sentence still carry a little weight instead of zeroing the vectors
    let vectors: Vec<HashMap<&str, f64>> = sentence_terms
        .iter()
        .map(|terms| {
            let mut tf: HashMap<&str, f64> = HashMap::new();
            for term in terms {
                *tf.entry(term.as_str()).or_insert(0.0) += 1.0;
            }
            for (term, weight) in tf.iter_mut() {
                let df = doc_freq[term] as f64;
                *weight *= ((n as f64 + 1.0) / df).ln();
            }
            tf
        })
        .collect();

    let mut adjacency = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = cosine(&vectors[i], &vectors[j]);
            if similarity > SIMILARITY_THRESHOLD {
                adjacency[i][j] = similarity;
                adjacency[j][i] = similarity;
            }
        }
    }

    let row_sums: Vec<f64> = adjacency.iter().map(|row| row.iter().sum()).collect();

    // damped power iteration; rows without edges distribute uniformly
    let uniform = 1.0 / n as f64;
    let mut scores = vec![uniform; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![(1.0 - DAMPING) * uniform; n];
        for i in 0..n {
            if row_sums[i] > 0.0 {
                for j in 0..n {
                    if adjacency[i][j] > 0.0 {
                        next[j] += DAMPING * scores[i] * adjacency[i][j] / row_sums[i];
                    }
                }
            } else {
                for item in next.iter_mut() {
                    *item += DAMPING * scores[i] * uniform;
                }
            }
        }
        let delta: f64 = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .sum();
        scores = next;
        if delta < CONVERGENCE_EPSILON {
            break;
        }
    }

    if scores.iter().any(|s| !s.is_finite()) {
        return None;
    }
    Some(scores)
}

fn cosine(a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
