//! The data source interface

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::errors::SourceResult;
use crate::records::Record;

/// Future returned by [`DataSource::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = SourceResult<Vec<Record>>> + Send + 'a>>;

/// Settings shared by every fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Upper bound on a single fetch
    pub request_timeout: Duration,
    /// Fixed RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(10_000),
            seed: None,
        }
    }
}

impl SourceConfig {
    /// RNG for one source. `salt` keeps seeded sources from mirroring
    /// each other.
    pub(crate) fn rng(&self, salt: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ salt),
            None => StdRng::from_entropy(),
        }
    }
}

/// A producer of records for one provenance tag
///
/// Every record returned is tagged with [`DataSource::name`] as its
/// `source` and carries a `lastUpdated` timestamp.
pub trait DataSource: Send + Sync {
    /// Provenance tag, e.g. "USDA"
    fn name(&self) -> &str;

    fn fetch<'a>(&'a self, config: &'a SourceConfig) -> FetchFuture<'a>;
}
