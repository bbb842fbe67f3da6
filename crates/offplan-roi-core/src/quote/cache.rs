use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::{run_quote, QuoteCalculation, QuoteRequest};
use crate::types::ComputationOutput;
use crate::RoiResult;

/// Caller-owned memo of quote results keyed by the request's content hash.
///
/// Two requests with identical content share one entry regardless of where
/// they came from; any edit to the input produces a new key.
#[derive(Debug, Default)]
pub struct QuoteCache {
    entries: HashMap<u64, ComputationOutput<QuoteCalculation>>,
    hits: u64,
    misses: u64,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash of the request's canonical JSON form.
    pub fn content_key(request: &QuoteRequest) -> RoiResult<u64> {
        let canonical = serde_json::to_string(request)?;
        let mut hasher = DefaultHasher::new();
        canonical.hash(&mut hasher);
        Ok(hasher.finish())
    }

    pub fn get_or_compute(
        &mut self,
        request: &QuoteRequest,
    ) -> RoiResult<&ComputationOutput<QuoteCalculation>> {
        let key = Self::content_key(request)?;
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let output = run_quote(request)?;
            self.entries.insert(key, output);
        }
        Ok(&self.entries[&key])
    }

    pub fn invalidate(&mut self, request: &QuoteRequest) -> RoiResult<bool> {
        let key = Self::content_key(request)?;
        Ok(self.entries.remove(&key).is_some())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
