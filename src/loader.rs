use crate::models::{AwardRow, Company, CompanyRow, Config, DataSourceMode, Dataset};
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the companies and procurement tables from CSV exports, either
/// from a local directory or over HTTP.
pub struct DataLoader {
    client: reqwest::Client,
}

struct TableSource<'a> {
    label: &'a str,
    path: PathBuf,
    url: Option<&'a str>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn load_dataset(&self, config: &Config) -> Result<Dataset> {
        let data_dir = Path::new(config.data_directory.as_deref().unwrap_or("data-source"));

        let companies_source = TableSource {
            label: "companies",
            path: data_dir.join(config.companies_file.as_deref().unwrap_or("companies.csv")),
            url: config.companies_url.as_deref(),
        };
        let awards_source = TableSource {
            label: "gov_procurement",
            path: data_dir.join(config.procurement_file.as_deref().unwrap_or("gov_procurement.csv")),
            url: config.procurement_url.as_deref(),
        };

        let companies_csv = self.read_table(&companies_source, config.data_source_mode).await?;
        let awards_csv = self.read_table(&awards_source, config.data_source_mode).await?;

        let company_rows: Vec<CompanyRow> = parse_csv(&companies_csv, companies_source.label)?;
        let award_rows: Vec<AwardRow> = parse_csv(&awards_csv, awards_source.label)?;

        let dataset = build_dataset(company_rows, award_rows);
        tracing::info!(
            companies = dataset.companies.len(),
            awards = dataset.awards.len(),
            "dataset loaded"
        );

        let unresolved = dataset.unresolved_award_count();
        if unresolved > 0 {
            tracing::warn!(
                unresolved,
                "awards reference unknown companies and are excluded from company views"
            );
        }
        Ok(dataset)
    }

    async fn read_table(&self, source: &TableSource<'_>, mode: DataSourceMode) -> Result<String> {
        match mode {
            DataSourceMode::Local => read_file(&source.path),
            DataSourceMode::Internet => {
                let url = source
                    .url
                    .ok_or_else(|| anyhow!("No URL configured for table {}", source.label))?;
                self.fetch_url(url).await
            }
            DataSourceMode::Both => {
                if source.path.exists() {
                    read_file(&source.path)
                } else if let Some(url) = source.url {
                    tracing::info!(
                        table = source.label,
                        path = %source.path.display(),
                        "local export missing, falling back to URL"
                    );
                    self.fetch_url(url).await
                } else {
                    Err(anyhow!(
                        "Table {} not found at {} and no URL configured",
                        source.label,
                        source.path.display()
                    ))
                }
            }
        }
    }

    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        println!("🌐 Fetching data from: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP request failed with status: {}", response.status()));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from: {}", url))
    }
}

fn read_file(path: &Path) -> Result<String> {
    println!("📄 Reading: {}", path.display());
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Deserialize CSV content by header name. Rows that do not fit the row
/// type are skipped with a warning; structural CSV errors abort.
pub fn parse_csv<T: DeserializeOwned>(content: &str, source: &str) -> Result<Vec<T>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) if matches!(err.kind(), csv::ErrorKind::Deserialize { .. }) => {
                skipped += 1;
                tracing::warn!(source, row = line + 1, error = %err, "skipping malformed row");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to parse CSV from {}", source));
            }
        }
    }

    if rows.is_empty() {
        println!("   ⚠️  Warning: No rows found in {}", source);
    } else {
        println!("   ✅ Loaded {} rows from {}", rows.len(), source);
    }
    if skipped > 0 {
        println!("   🔄 Skipped {} malformed rows", skipped);
    }
    Ok(rows)
}

/// Convert raw rows into the dataset. Companies without an identifier are
/// dropped and repeated identifiers keep their first row.
pub fn build_dataset(company_rows: Vec<CompanyRow>, award_rows: Vec<AwardRow>) -> Dataset {
    let mut seen: HashSet<String> = HashSet::new();
    let mut companies: Vec<Company> = Vec::new();
    for company in company_rows.into_iter().filter_map(CompanyRow::into_company) {
        if seen.insert(company.organization_id.clone()) {
            companies.push(company);
        } else {
            tracing::warn!(id = %company.organization_id, "duplicate company id, keeping first row");
        }
    }

    let awards = award_rows.into_iter().map(AwardRow::into_award).collect();
    Dataset::new(companies, awards)
}
