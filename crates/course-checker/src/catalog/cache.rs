use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::{ArcSwap, ArcSwapOption};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::family::ProgrammeFamily;
use super::record::ProgrammeRecord;
use super::store::{CatalogStore, CatalogStoreError};
use crate::config::CatalogConfig;

pub const DEFAULT_TTL_HOURS: u32 = 6;

type CategorySlots = HashMap<&'static str, ArcSwap<Vec<ProgrammeRecord>>>;

/// Fatal catalog failures. Per-category problems never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(#[source] CatalogStoreError),
}

/// In-memory, category-scoped snapshot of the programme catalog.
///
/// Every category of every family has a slot from construction onwards, so
/// readers never observe a missing key. A refresh replaces each slot with a
/// single pointer swap; readers holding the previous `Arc` keep a consistent
/// list until they drop it.
pub struct CatalogCache<S> {
    store: Arc<S>,
    ttl: Duration,
    slots: HashMap<ProgrammeFamily, CategorySlots>,
    refreshed_at: ArcSwapOption<DateTime<Utc>>,
    refresh_guard: Mutex<()>,
}

impl<S> CatalogCache<S>
where
    S: CatalogStore,
{
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        let slots = ProgrammeFamily::ordered()
            .into_iter()
            .map(|family| {
                let categories: CategorySlots = family
                    .categories()
                    .iter()
                    .map(|category| (*category, ArcSwap::from_pointee(Vec::new())))
                    .collect();
                (family, categories)
            })
            .collect();

        Self {
            store,
            ttl,
            slots,
            refreshed_at: ArcSwapOption::empty(),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn from_config(store: Arc<S>, config: &CatalogConfig) -> Self {
        Self::new(store, Duration::hours(i64::from(config.ttl_hours)))
    }

    /// First load at process start; the caller must not serve checks if this fails.
    pub fn initialize(&self) -> Result<RefreshReport, CatalogError> {
        match self.refresh() {
            Ok(report) => {
                info!(
                    categories = report.categories,
                    programmes = report.programmes,
                    failed = report.failed.len(),
                    "catalog cache initialized"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(error = %err, "failed to initialize catalog cache");
                Err(err)
            }
        }
    }

    /// Reload every category of every family, replacing each list wholesale.
    ///
    /// Refreshes are serialized; a second caller waits for the first to finish.
    pub fn refresh(&self) -> Result<RefreshReport, CatalogError> {
        let _guard = self
            .refresh_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        info!("starting catalog refresh");
        self.store.ping().map_err(CatalogError::Unavailable)?;

        let mut categories = 0;
        let mut programmes = 0;
        let mut dropped_documents = 0;
        let mut failed = Vec::new();

        for family in ProgrammeFamily::ordered() {
            let Some(slots) = self.slots.get(&family) else {
                continue;
            };

            let mut family_programmes = 0;
            for category in family.categories() {
                let Some(slot) = slots.get(category) else {
                    continue;
                };

                let records = match self.store.load_category(family, category) {
                    Ok(documents) => {
                        let (records, dropped) = coerce_documents(family, category, documents);
                        dropped_documents += dropped;
                        records
                    }
                    Err(err) => {
                        warn!(
                            %family,
                            category,
                            error = %err,
                            "category load failed; serving empty list"
                        );
                        failed.push(FailedCategory {
                            family,
                            category: category.to_string(),
                            reason: err.to_string(),
                        });
                        Vec::new()
                    }
                };

                family_programmes += records.len();
                slot.store(Arc::new(records));
                categories += 1;
            }

            info!(%family, programmes = family_programmes, "loaded {} categories", slots.len());
            programmes += family_programmes;
        }

        let refreshed_at = Utc::now();
        self.refreshed_at.store(Some(Arc::new(refreshed_at)));
        info!(categories, programmes, failed = failed.len(), "catalog refresh complete");

        Ok(RefreshReport {
            refreshed_at,
            categories,
            programmes,
            dropped_documents,
            failed,
        })
    }

    pub fn should_refresh(&self) -> bool {
        self.should_refresh_at(Utc::now())
    }

    pub fn should_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_refreshed() {
            Some(refreshed_at) => now - refreshed_at > self.ttl,
            None => true,
        }
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at.load_full().map(|at| *at)
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.load().is_some()
    }

    /// Snapshot of one category; unknown keys read as an empty list.
    pub fn get(&self, family: ProgrammeFamily, category: &str) -> Arc<Vec<ProgrammeRecord>> {
        self.slots
            .get(&family)
            .and_then(|slots| slots.get(category))
            .map(|slot| slot.load_full())
            .unwrap_or_default()
    }

    pub fn degree_cluster(&self, cluster_number: u8) -> Arc<Vec<ProgrammeRecord>> {
        ProgrammeFamily::degree_cluster(cluster_number)
            .map(|category| self.get(ProgrammeFamily::Degree, category))
            .unwrap_or_default()
    }

    pub fn summary(&self) -> CatalogSummary {
        let families = ProgrammeFamily::ordered()
            .into_iter()
            .map(|family| {
                let categories: Vec<CategorySummary> = family
                    .categories()
                    .iter()
                    .map(|category| CategorySummary {
                        name: category.to_string(),
                        programmes: self.get(family, category).len(),
                    })
                    .collect();
                FamilySummary {
                    family,
                    programmes: categories.iter().map(|entry| entry.programmes).sum(),
                    categories,
                }
            })
            .collect();

        CatalogSummary {
            refreshed_at: self.last_refreshed(),
            stale: self.should_refresh(),
            families,
        }
    }
}

fn coerce_documents(
    family: ProgrammeFamily,
    category: &str,
    documents: Vec<Value>,
) -> (Vec<ProgrammeRecord>, usize) {
    let mut dropped = 0;
    let records = documents
        .iter()
        .filter_map(|document| match ProgrammeRecord::from_document(document) {
            Ok(record) => Some(record),
            Err(err) => {
                dropped += 1;
                debug!(%family, category, error = %err, "dropping programme document");
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!(%family, category, dropped, "dropped malformed programme documents");
    }

    (records, dropped)
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub refreshed_at: DateTime<Utc>,
    pub categories: usize,
    pub programmes: usize,
    pub dropped_documents: usize,
    pub failed: Vec<FailedCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCategory {
    pub family: ProgrammeFamily,
    pub category: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub refreshed_at: Option<DateTime<Utc>>,
    pub stale: bool,
    pub families: Vec<FamilySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilySummary {
    pub family: ProgrammeFamily,
    pub programmes: usize,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub programmes: usize,
}
