use crate::infra::InMemoryCheckResultRepository;
use clap::Args;
use course_checker::catalog::{CatalogCache, JsonDirectoryStore, RefreshReport};
use course_checker::config::{AppConfig, CatalogConfig};
use course_checker::courses::{CourseCheckRequest, CourseCheckResponse, CourseCheckService};
use course_checker::error::AppError;
use course_checker::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON file holding a course check request
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Override the catalog directory (CATALOG_DIR)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
    /// Print the raw JSON response instead of a readable listing
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogSummaryArgs {
    /// Override the catalog directory (CATALOG_DIR)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
    /// Print the refresh report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        request,
        catalog_dir,
        json,
    } = args;

    let config = load_cli_config(catalog_dir)?;
    let request = read_request(&request)?;

    let (cache, _) = load_catalog(&config.catalog)?;
    let service = CourseCheckService::new(
        cache,
        Arc::new(InMemoryCheckResultRepository::default()),
    );
    let response = service.check(request)?;

    if json {
        println!("{}", to_pretty_json(&response)?);
    } else {
        render_check_response(&response);
    }
    Ok(())
}

pub(crate) fn run_catalog_summary(args: CatalogSummaryArgs) -> Result<(), AppError> {
    let CatalogSummaryArgs { catalog_dir, json } = args;

    let config = load_cli_config(catalog_dir)?;
    let (cache, report) = load_catalog(&config.catalog)?;

    if json {
        println!("{}", to_pretty_json(&report)?);
    } else {
        render_catalog_summary(&config.catalog, &cache, &report);
    }
    Ok(())
}

fn load_cli_config(catalog_dir: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(root) = catalog_dir {
        config.catalog.root = root;
    }
    telemetry::init_cli(&config.telemetry)?;
    Ok(config)
}

fn load_catalog(
    config: &CatalogConfig,
) -> Result<(Arc<CatalogCache<JsonDirectoryStore>>, RefreshReport), AppError> {
    let store = Arc::new(JsonDirectoryStore::from_config(config));
    let cache = CatalogCache::from_config(store, config);
    let report = cache.initialize()?;
    Ok((Arc::new(cache), report))
}

pub(crate) fn read_request(path: &Path) -> Result<CourseCheckRequest, AppError> {
    let raw = std::fs::read(path)?;
    let request = serde_json::from_slice(&raw)?;
    Ok(request)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    Ok(rendered)
}

fn render_check_response(response: &CourseCheckResponse) {
    println!(
        "Course check for {} ({}) - {}",
        response.email, response.index_number, response.education_type
    );
    println!("Checked at {}", response.timestamp);

    if response.results.is_empty() {
        println!("No qualifying programmes found.");
        return;
    }

    println!(
        "{} qualifying programmes across {} categories",
        response.programme_count(),
        response.results.len()
    );
    for cluster in &response.results {
        println!("\n{} ({})", cluster.cluster_name, cluster.programmes.len());
        for programme in &cluster.programmes {
            let mut line = format!("  - {}", programme.programme_name);
            if !programme.institution_name.is_empty() {
                line.push_str(&format!(" | {}", programme.institution_name));
            }
            if let Some(code) = &programme.programme_code {
                line.push_str(&format!(" | code {code}"));
            }
            if let Some(points) = programme.cut_off_points {
                line.push_str(&format!(" | cut-off {points:.3}"));
            }
            if let Some(grade) = &programme.minimum_grade {
                line.push_str(&format!(" | min {grade}"));
            }
            println!("{line}");
        }
    }
}

fn render_catalog_summary(
    config: &CatalogConfig,
    cache: &CatalogCache<JsonDirectoryStore>,
    report: &RefreshReport,
) {
    println!("Catalog at {}", config.root.display());
    println!(
        "Refreshed {} | {} categories | {} programmes | {} dropped documents",
        report.refreshed_at.to_rfc3339(),
        report.categories,
        report.programmes,
        report.dropped_documents
    );

    for family in cache.summary().families {
        println!(
            "\n{} [{}] ({} programmes)",
            family.family,
            config.database_for(family.family),
            family.programmes
        );
        for category in family.categories {
            println!("  - {}: {}", category.name, category.programmes);
        }
    }

    if report.failed.is_empty() {
        return;
    }
    println!("\nFailed categories ({})", report.failed.len());
    for failure in &report.failed {
        println!("  - {}/{}: {}", failure.family, failure.category, failure.reason);
    }
}
