use motif_core::{EmbeddingVector, Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// Dot product between the query and the stored vector.
    pub score: f64,
}

impl From<SearchHit> for (String, f64) {
    fn from(hit: SearchHit) -> Self {
        (hit.id, hit.score)
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    vector: EmbeddingVector,
}

/// Exact similarity index.
///
/// Entries keep their first-insertion position; overwriting an identifier
/// replaces its vector in place. Scores are plain dot products, which equal
/// cosine similarity when stored and query vectors are unit length. The
/// index never re-normalizes.
///
/// Not synchronized. Wrap it in a single `Mutex` covering both
/// [`add_item`](Self::add_item) and [`search`](Self::search) if it has to be
/// shared.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

impl SimilarityIndex {
    /// An empty index whose dimension is set by the first insert.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty index that only accepts vectors of `dimension`.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// The stored vector for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EmbeddingVector> {
        self.positions.get(id).map(|&pos| &self.entries[pos].vector)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmbeddingVector)> {
        self.entries.iter().map(|e| (e.id.as_str(), &e.vector))
    }

    /// Insert `vector` under `id`, overwriting any previous vector for it.
    ///
    /// The index stores its own copy. A vector whose dimension differs from
    /// the index's is rejected and the index is left unchanged.
    pub fn add_item(&mut self, id: impl Into<String>, vector: &EmbeddingVector) -> Result<()> {
        let expected = *self.dimension.get_or_insert(vector.dimension());
        if vector.dimension() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: vector.dimension(),
            });
        }

        let id = id.into();
        if let Some(&pos) = self.positions.get(&id) {
            self.entries[pos].vector = vector.clone();
        } else {
            self.positions.insert(id.clone(), self.entries.len());
            self.entries.push(IndexEntry {
                id,
                vector: vector.clone(),
            });
        }
        Ok(())
    }

    /// The `k` stored identifiers most similar to `query`.
    ///
    /// Results are ordered by descending score, ties by insertion order. At
    /// most `min(k, len)` hits are returned; an empty index yields no hits
    /// for any query.
    pub fn search(&self, query: &EmbeddingVector, k: usize) -> Result<Vec<SearchHit>> {
        let Some(expected) = self.dimension.filter(|_| !self.is_empty()) else {
            return Ok(Vec::new());
        };
        if query.dimension() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: query.dimension(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored = self
            .entries
            .iter()
            .enumerate()
            // Adding 0.0 folds -0.0 into 0.0 so equal scores tie exactly.
            .map(|(pos, entry)| query.dot(&entry.vector).map(|score| (pos, score + 0.0)))
            .collect::<Result<Vec<_>>>()?;

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(rank);

        Ok(scored
            .into_iter()
            .map(|(pos, score)| SearchHit {
                id: self.entries[pos].id.clone(),
                score,
            })
            .collect())
    }
}

/// Descending score, then ascending insertion position.
fn rank(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Validate a signed `k` from caller input.
///
/// Zero is valid and yields an empty result set; negative values are
/// reported as [`Error::InvalidK`] rather than clamped.
pub fn checked_k(k: i64) -> Result<usize> {
    usize::try_from(k).map_err(|_| Error::InvalidK(k))
}
