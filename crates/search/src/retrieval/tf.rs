//! Vocabulary and term-frequency vectors

use std::collections::HashMap;

/// Token to slot mapping, slots assigned in insertion order
#[derive(Debug, Default)]
pub struct Vocabulary {
    slots: HashMap<String, usize>,
}

impl Vocabulary {
    /// Slot for `token`, assigning the next free one if unseen
    pub fn insert(&mut self, token: &str) -> usize {
        let next = self.slots.len();
        *self.slots.entry(token.to_string()).or_insert(next)
    }

    pub fn slot(&self, token: &str) -> Option<usize> {
        self.slots.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// L2-normalized term-frequency vector, stored sparsely by slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: HashMap<usize, f64>,
}

impl TermVector {
    /// Count `tokens` over `vocabulary`, then divide by the Euclidean norm
    ///
    /// Tokens missing from the vocabulary are ignored. A zero vector stays zero.
    pub fn normalized(tokens: &[String], vocabulary: &Vocabulary) -> Self {
        let mut weights: HashMap<usize, f64> = HashMap::new();
        for slot in tokens.iter().filter_map(|t| vocabulary.slot(t)) {
            *weights.entry(slot).or_insert(0.0) += 1.0;
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in weights.values_mut() {
                *weight /= norm;
            }
        }

        Self { weights }
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };

        small
            .iter()
            .filter_map(|(slot, w)| large.get(slot).map(|v| w * v))
            .fold(0.0, |acc, x| acc + x)
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_slots_follow_insertion_order() {
        let mut vocab = Vocabulary::default();
        assert_eq!(vocab.insert("buffer"), 0);
        assert_eq!(vocab.insert("overflow"), 1);
        assert_eq!(vocab.insert("buffer"), 0);
        assert_eq!(vocab.slot("overflow"), Some(1));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let mut vocab = Vocabulary::default();
        for t in ["a", "b", "c"] {
            vocab.insert(t);
        }
        let v = TermVector::normalized(&tokens(&["a", "a", "b"]), &vocab);
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.dot(&v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let vocab = Vocabulary::default();
        let v = TermVector::normalized(&tokens(&["unknown"]), &vocab);
        assert!(v.is_zero());
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.dot(&v), 0.0);
    }

    #[test]
    fn test_cosine_of_disjoint_vectors() {
        let mut vocab = Vocabulary::default();
        for t in ["x", "y"] {
            vocab.insert(t);
        }
        let x = TermVector::normalized(&tokens(&["x"]), &vocab);
        let y = TermVector::normalized(&tokens(&["y"]), &vocab);
        assert_eq!(x.dot(&y), 0.0);
        // An empty f64 sum is -0.0; similarity must be a positive zero
        assert!(!x.dot(&y).is_sign_negative());
        assert!(!x.dot(&TermVector::default()).is_sign_negative());
    }
}
