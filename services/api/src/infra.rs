use course_checker::courses::{CheckResultRecord, CheckResultRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Check results keyed by lower-cased email, oldest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCheckResultRepository {
    records: Arc<Mutex<HashMap<String, Vec<CheckResultRecord>>>>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl CheckResultRepository for InMemoryCheckResultRepository {
    fn record(&self, record: CheckResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .entry(email_key(&record.email))
            .or_default()
            .push(record);
        Ok(())
    }

    fn latest_for(&self, email: &str) -> Result<Option<CheckResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(&email_key(email))
            .and_then(|history| history.last())
            .cloned())
    }
}
