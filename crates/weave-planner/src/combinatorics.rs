//! Lazy combinatorial iterators.
//!
//! Both iterators are one-shot and forward only: once exhausted they stay
//! exhausted. Neither materializes the full set of combinations.

use std::collections::BTreeSet;

/// Cartesian product over a list of member sets.
///
/// Combinations are produced by a mixed-radix counter over one index per
/// member set, so each combination appears exactly once. A product of zero
/// sets, or of any empty set, yields nothing.
#[derive(Debug, Clone)]
pub struct ProductSet<T> {
    sets: Vec<Vec<T>>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> ProductSet<T> {
    #[must_use]
    pub fn new(sets: Vec<Vec<T>>) -> Self {
        let done = sets.is_empty() || sets.iter().any(Vec::is_empty);
        let indices = vec![0; sets.len()];
        Self { sets, indices, done }
    }

    /// Number of combinations of the whole product, saturating on overflow.
    pub fn size(&self) -> usize {
        if self.sets.is_empty() {
            return 0;
        }
        self.sets.iter().fold(1_usize, |n, s| n.saturating_mul(s.len()))
    }
}

impl<T: Clone> Iterator for ProductSet<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let combination =
            self.indices.iter().zip(&self.sets).map(|(&i, set)| set[i].clone()).collect();

        // Increment the counter, least significant digit first.
        let mut overflow = true;
        for (index, set) in self.indices.iter_mut().zip(&self.sets) {
            *index += 1;
            if *index < set.len() {
                overflow = false;
                break;
            }
            *index = 0;
        }
        self.done = overflow;

        Some(combination)
    }
}

/// Non-empty subsets of a set, ordered by increasing cardinality.
///
/// Subsets of equal size come in lexicographic order of their elements.
/// Callers may prune the traversal with [`PowerSet::exclude_supersets_of`].
#[derive(Debug, Clone)]
pub struct PowerSet<T> {
    elements: Vec<T>,
    current: Vec<usize>,
    excluded: Vec<Vec<usize>>,
    done: bool,
}

impl<T: Clone + Ord> PowerSet<T> {
    #[must_use]
    pub fn new(elements: impl IntoIterator<Item = T>) -> Self {
        let elements: Vec<T> =
            elements.into_iter().collect::<BTreeSet<T>>().into_iter().collect();
        let done = elements.is_empty();
        Self { elements, current: vec![0], excluded: Vec::new(), done }
    }

    /// Skips every subset yet to come that contains all of `subset`.
    pub fn exclude_supersets_of(&mut self, subset: &[T]) {
        let mut indices = Vec::with_capacity(subset.len());
        for element in subset {
            match self.elements.binary_search(element) {
                Ok(i) => indices.push(i),
                // Nothing in this power set contains a foreign element.
                Err(_) => return,
            }
        }
        indices.sort_unstable();
        indices.dedup();
        self.excluded.push(indices);
    }

    fn is_excluded(&self, candidate: &[usize]) -> bool {
        self.excluded
            .iter()
            .any(|subset| subset.iter().all(|i| candidate.binary_search(i).is_ok()))
    }

    /// Moves `current` to the next index combination.
    fn step(&mut self) {
        let n = self.elements.len();
        let k = self.current.len();
        // Find the rightmost index that can still be incremented.
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.current[i] < n - k + i {
                self.current[i] += 1;
                for j in i + 1..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
                return;
            }
        }
        // All subsets of size k are done, continue with size k + 1.
        if k < n {
            self.current = (0..=k).collect();
        } else {
            self.done = true;
        }
    }
}

impl<T: Clone + Ord> Iterator for PowerSet<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let candidate = self.current.clone();
            self.step();
            if !self.is_excluded(&candidate) {
                return Some(candidate.iter().map(|&i| self.elements[i].clone()).collect());
            }
        }
        None
    }
}
