//! Programme catalog: typed records, the backing-store seam and the TTL cache.

mod cache;
mod family;
mod record;
mod store;

pub use cache::{
    CatalogCache, CatalogError, CatalogSummary, CategorySummary, FailedCategory, FamilySummary,
    RefreshReport, DEFAULT_TTL_HOURS,
};
pub use family::ProgrammeFamily;
pub use record::{
    CutOffPoints, MinimumGrade, NotADocument, ProgrammeRecord, SubjectRequirement,
    SubjectRequirements,
};
pub use store::{CatalogStore, CatalogStoreError, JsonDirectoryStore};
