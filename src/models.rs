use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Data source configuration
    pub data_source_mode: DataSourceMode,
    pub data_directory: Option<String>,
    pub companies_file: Option<String>,
    pub procurement_file: Option<String>,
    pub companies_url: Option<String>,
    pub procurement_url: Option<String>,
    pub output_directory: Option<String>,
    // View configuration
    pub search_limit: usize,
    pub homepage_bins: usize,
    pub company_bins: usize,
    pub overlay_points: usize,
    pub top_n: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceMode {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "internet")]
    Internet,
    #[serde(rename = "both")]
    Both,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source_mode: DataSourceMode::Local,
            data_directory: Some("data-source".to_string()),
            companies_file: Some("companies.csv".to_string()),
            procurement_file: Some("gov_procurement.csv".to_string()),
            companies_url: Some("https://example.com/exports/companies.csv".to_string()),
            procurement_url: Some("https://example.com/exports/gov_procurement.csv".to_string()),
            output_directory: Some("output".to_string()),
            search_limit: crate::resolver::DEFAULT_LIMIT,
            homepage_bins: 50,
            company_bins: 30,
            overlay_points: 100,
            top_n: 10,
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let positive = [
            ("search_limit", self.search_limit),
            ("homepage_bins", self.homepage_bins),
            ("company_bins", self.company_bins),
            ("overlay_points", self.overlay_points),
            ("top_n", self.top_n),
        ];
        for (name, value) in positive {
            if value == 0 {
                anyhow::bail!("{} must be greater than zero", name);
            }
        }
        Ok(())
    }
}

/// A company row as exported from the `companies` table. Exports name the
/// display column either `name` or `name_english`; when both are present the
/// first non-blank one in that order wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRow {
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_english: Option<String>,
}

/// An award row as exported from the `gov_procurement` table. Every field is
/// kept as raw text so a single bad cell never rejects the whole row.
///
/// Columns that go by two names get one field each and are coalesced on
/// conversion, so an export carrying both headers still loads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardRow {
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub winner_tin: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_money: Option<String>,
    #[serde(default)]
    pub project_value: Option<String>,
    #[serde(default)]
    pub dept_name: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub contract_date: Option<String>,
    #[serde(default)]
    pub contract_start_date: Option<String>,
    #[serde(default)]
    pub contract_finish_date: Option<String>,
    #[serde(default)]
    pub contract_end_date: Option<String>,
    #[serde(default)]
    pub announce_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub organization_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcurementAward {
    pub winner_id: Option<String>,
    pub winner_name: Option<String>,
    pub project_name: Option<String>,
    pub project_value: Option<Decimal>,
    pub department_name: Option<String>,
    pub province: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub announce_date: Option<NaiveDate>,
}

impl CompanyRow {
    pub fn into_company(self) -> Option<Company> {
        let organization_id = non_blank(self.organization_id)?;
        let name = coalesce(self.name, self.name_english).unwrap_or_else(|| organization_id.clone());
        Some(Company {
            organization_id,
            name,
        })
    }
}

impl AwardRow {
    pub fn into_award(self) -> ProcurementAward {
        let raw_money = coalesce(self.project_money, self.project_value).unwrap_or_default();
        let project_value = parse_money(&raw_money);
        if project_value.is_none() && !raw_money.is_empty() {
            tracing::debug!(value = %raw_money, "project value is not numeric, treating as absent");
        }
        let start = coalesce(self.contract_date, self.contract_start_date);
        let end = coalesce(self.contract_finish_date, self.contract_end_date);

        ProcurementAward {
            winner_id: coalesce(self.winner_id, self.winner_tin),
            winner_name: non_blank(self.winner),
            project_name: non_blank(self.project_name),
            project_value,
            department_name: coalesce(self.dept_name, self.department_name),
            province: non_blank(self.province),
            contract_start_date: start.as_deref().and_then(parse_date),
            contract_end_date: end.as_deref().and_then(parse_date),
            announce_date: self.announce_date.as_deref().and_then(parse_date),
        }
    }
}

impl ProcurementAward {
    /// Contract length in days; only defined when both ends are known and
    /// the contract does not finish before it starts.
    pub fn duration_days(&self) -> Option<i64> {
        let start = self.contract_start_date?;
        let end = self.contract_end_date?;
        if end < start {
            return None;
        }
        Some((end - start).num_days())
    }

    pub fn value_f64(&self) -> Option<f64> {
        self.project_value.and_then(|value| value.to_f64())
    }
}

static MONEY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,$฿]").expect("money pattern is valid"));

/// Parse a monetary cell. Blank, non-numeric and negative values are absent.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned = MONEY_NOISE.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;

    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value)
}

/// Parse a date cell. Timestamps are truncated to their calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        let rest = &raw[10..];
        if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T') {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn coalesce(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    non_blank(preferred).or_else(|| non_blank(fallback))
}

/// Both tables, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub companies: Vec<Company>,
    pub awards: Vec<ProcurementAward>,
    id_index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(companies: Vec<Company>, awards: Vec<ProcurementAward>) -> Self {
        let mut id_index = HashMap::new();
        for (index, company) in companies.iter().enumerate() {
            id_index
                .entry(company.organization_id.clone())
                .or_insert(index);
        }
        Self {
            companies,
            awards,
            id_index,
        }
    }

    pub fn company_by_id(&self, organization_id: &str) -> Option<&Company> {
        self.id_index
            .get(organization_id.trim())
            .map(|&index| &self.companies[index])
    }

    /// Awards won by `company`, in dataset order.
    pub fn awards_for(&self, company: &Company) -> Vec<&ProcurementAward> {
        self.awards
            .iter()
            .filter(|award| award.winner_id.as_deref() == Some(company.organization_id.as_str()))
            .collect()
    }

    pub fn resolved_winner_name(&self, award: &ProcurementAward) -> String {
        award
            .winner_id
            .as_deref()
            .and_then(|id| self.company_by_id(id))
            .map(|company| company.name.clone())
            .or_else(|| award.winner_name.clone())
            .or_else(|| award.winner_id.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn unresolved_award_count(&self) -> usize {
        self.awards
            .iter()
            .filter(|award| {
                award
                    .winner_id
                    .as_deref()
                    .map_or(true, |id| !self.id_index.contains_key(id))
            })
            .count()
    }
}
