use crate::models::{Company, Config, Dataset, ProcurementAward};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

pub const UNKNOWN_BUCKET: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total_value: Decimal,
    pub award_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: String, // YYYY-MM
    pub award_count: usize,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerCount {
    pub organization_id: Option<String>,
    pub name: String,
    pub award_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Department,
    Province,
}

impl CategoryField {
    pub fn value<'a>(&self, award: &'a ProcurementAward) -> Option<&'a str> {
        match self {
            CategoryField::Department => award.department_name.as_deref(),
            CategoryField::Province => award.province.as_deref(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Department => "Department",
            CategoryField::Province => "Province",
        }
    }
}

pub fn total_count(awards: &[&ProcurementAward]) -> usize {
    awards.len()
}

/// Sum of every present project value; absent values contribute nothing.
pub fn total_value(awards: &[&ProcurementAward]) -> Decimal {
    awards
        .iter()
        .filter_map(|award| award.project_value)
        .fold(Decimal::ZERO, accumulate)
}

pub fn valued_count(awards: &[&ProcurementAward]) -> usize {
    awards
        .iter()
        .filter(|award| award.project_value.is_some())
        .count()
}

/// Mean over awards that carry a value. `None` when no award does.
pub fn average_value(awards: &[&ProcurementAward]) -> Option<Decimal> {
    let count = valued_count(awards);
    if count == 0 {
        return None;
    }
    Some(total_value(awards) / Decimal::from(count))
}

pub fn value_histogram(awards: &[&ProcurementAward], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = awards.iter().filter_map(|award| award.value_f64()).collect();
    histogram(&values, bins)
}

pub fn duration_histogram(awards: &[&ProcurementAward], bins: usize) -> Vec<HistogramBin> {
    let durations: Vec<f64> = awards
        .iter()
        .filter_map(|award| award.duration_days())
        .map(|days| days as f64)
        .collect();
    histogram(&durations, bins)
}

/// Equal-width bins spanning [min, max]. The last bin is closed on the right.
/// A sample with a single distinct value lands in one zero-width bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = min_max(&values);
    if max == min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Categories ranked by descending count; ties keep first-seen order.
/// Awards without a value for `field` are counted under [`UNKNOWN_BUCKET`].
pub fn categorical_distribution(
    awards: &[&ProcurementAward],
    field: CategoryField,
) -> Vec<CategoryCount> {
    rank_counts(awards.iter().map(|award| category_of(award, field)))
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

/// Summed value per category, largest first. This is the table behind the
/// province map.
pub fn category_value_totals(
    awards: &[&ProcurementAward],
    field: CategoryField,
) -> Vec<CategoryTotal> {
    let mut order: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for award in awards {
        let category = category_of(award, field);
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            order.push(CategoryTotal {
                category,
                total_value: Decimal::ZERO,
                award_count: 0,
            });
            order.len() - 1
        });
        order[slot].award_count += 1;
        if let Some(value) = award.project_value {
            order[slot].total_value = accumulate(order[slot].total_value, value);
        }
    }

    order.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    order
}

/// Fitted normal density over `sample`, scaled so it lines up with a
/// frequency histogram of the same sample using `bins` bins.
///
/// Returns an empty curve when the sample has fewer than two values or no
/// spread, since the standard deviation is then undefined or zero.
pub fn normal_overlay(sample: &[f64], bins: usize, points: usize) -> Vec<OverlayPoint> {
    let sample: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    let n = sample.len();
    if n < 2 || bins == 0 || points == 0 {
        return Vec::new();
    }

    let mean = sample.iter().sum::<f64>() / n as f64;
    let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Vec::new();
    }

    let (min, max) = min_max(&sample);
    let scale = n as f64 * (max - min) / bins as f64;
    let step = if points > 1 {
        (max - min) / (points - 1) as f64
    } else {
        0.0
    };

    (0..points)
        .map(|i| {
            let x = if i + 1 == points && points > 1 {
                max
            } else {
                min + step * i as f64
            };
            OverlayPoint {
                x,
                y: normal_pdf(x, mean, std_dev) * scale,
            }
        })
        .collect()
}

pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

/// Most frequent winners, resolved to company names where possible.
pub fn top_winners(awards: &[&ProcurementAward], dataset: &Dataset, n: usize) -> Vec<WinnerCount> {
    let mut first_award: HashMap<String, &ProcurementAward> = HashMap::new();
    let keys = awards.iter().map(|award| {
        let key = award
            .winner_id
            .clone()
            .or_else(|| award.winner_name.clone())
            .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
        first_award.entry(key.clone()).or_insert(*award);
        key
    });
    let ranked = rank_counts(keys);

    ranked
        .into_iter()
        .take(n)
        .map(|(key, award_count)| {
            let award = first_award[&key];
            WinnerCount {
                organization_id: award.winner_id.clone(),
                name: dataset.resolved_winner_name(award),
                award_count,
            }
        })
        .collect()
}

/// Highest-value awards first. Awards without a value are left out.
pub fn top_awards_by_value<'a>(awards: &[&'a ProcurementAward], n: usize) -> Vec<&'a ProcurementAward> {
    let mut valued: Vec<&'a ProcurementAward> = awards
        .iter()
        .copied()
        .filter(|award| award.project_value.is_some())
        .collect();
    valued.sort_by(|a, b| b.project_value.cmp(&a.project_value));
    valued.truncate(n);
    valued
}

/// Award count and value per announce month, oldest first.
pub fn monthly_series(awards: &[&ProcurementAward]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for award in awards {
        if let Some(date) = award.announce_date {
            let entry = months
                .entry(date.format("%Y-%m").to_string())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            if let Some(value) = award.project_value {
                entry.1 = accumulate(entry.1, value);
            }
        }
    }

    months
        .into_iter()
        .map(|(month, (award_count, total_value))| MonthlyPoint {
            month,
            award_count,
            total_value,
        })
        .collect()
}

/// Adds `value` to a running money total. A value that would overflow the
/// total is left out.
fn accumulate(total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        tracing::warn!(%value, %total, "project value overflows the running total, skipping");
        total
    })
}

fn category_of(award: &ProcurementAward, field: CategoryField) -> String {
    field
        .value(award)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_BUCKET)
        .to_string()
}

fn rank_counts(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for key in keys {
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[derive(Debug, Clone)]
pub struct HomepageSummary {
    pub total_companies: usize,
    pub total_awards: usize,
    pub valued_awards: usize,
    pub unresolved_awards: usize,
    pub total_value: Decimal,
    pub average_value: Option<Decimal>,
    pub top_winners: Vec<WinnerCount>,
    pub departments: Vec<CategoryCount>,
    pub provinces: Vec<CategoryCount>,
    pub province_values: Vec<CategoryTotal>,
    pub value_histogram: Vec<HistogramBin>,
    pub duration_histogram: Vec<HistogramBin>,
    pub monthly: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone)]
pub struct CompanySummary<'a> {
    pub company: &'a Company,
    pub total_awards: usize,
    pub valued_awards: usize,
    pub total_value: Decimal,
    pub average_value: Option<Decimal>,
    pub value_histogram: Vec<HistogramBin>,
    pub normal_overlay: Vec<OverlayPoint>,
    pub departments: Vec<CategoryCount>,
    pub provinces: Vec<CategoryCount>,
    pub duration_histogram: Vec<HistogramBin>,
    pub top_projects: Vec<&'a ProcurementAward>,
}

pub struct DashboardAnalyzer {
    pub homepage_bins: usize,
    pub company_bins: usize,
    pub overlay_points: usize,
    pub top_n: usize,
}

impl Default for DashboardAnalyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DashboardAnalyzer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            homepage_bins: config.homepage_bins,
            company_bins: config.company_bins,
            overlay_points: config.overlay_points,
            top_n: config.top_n,
        }
    }

    /// Global view over every award, resolved or not.
    pub fn homepage(&self, dataset: &Dataset) -> HomepageSummary {
        let awards: Vec<&ProcurementAward> = dataset.awards.iter().collect();

        HomepageSummary {
            total_companies: dataset.companies.len(),
            total_awards: total_count(&awards),
            valued_awards: valued_count(&awards),
            unresolved_awards: dataset.unresolved_award_count(),
            total_value: total_value(&awards),
            average_value: average_value(&awards),
            top_winners: top_winners(&awards, dataset, self.top_n),
            departments: categorical_distribution(&awards, CategoryField::Department),
            provinces: categorical_distribution(&awards, CategoryField::Province),
            province_values: category_value_totals(&awards, CategoryField::Province),
            value_histogram: value_histogram(&awards, self.homepage_bins),
            duration_histogram: duration_histogram(&awards, self.homepage_bins),
            monthly: monthly_series(&awards),
        }
    }

    /// Drill-down over the awards won by one company.
    pub fn company<'a>(&self, dataset: &'a Dataset, company: &'a Company) -> CompanySummary<'a> {
        let awards = dataset.awards_for(company);
        let sample: Vec<f64> = awards.iter().filter_map(|award| award.value_f64()).collect();

        CompanySummary {
            company,
            total_awards: total_count(&awards),
            valued_awards: valued_count(&awards),
            total_value: total_value(&awards),
            average_value: average_value(&awards),
            value_histogram: histogram(&sample, self.company_bins),
            normal_overlay: normal_overlay(&sample, self.company_bins, self.overlay_points),
            departments: categorical_distribution(&awards, CategoryField::Department),
            provinces: categorical_distribution(&awards, CategoryField::Province),
            duration_histogram: duration_histogram(&awards, self.company_bins),
            top_projects: top_awards_by_value(&awards, self.top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_money;
    use chrono::NaiveDate;

    fn award(winner: &str, money: &str) -> ProcurementAward {
        ProcurementAward {
            winner_id: Some(winner.to_string()),
            winner_name: None,
            project_name: Some(format!("Project {}", money)),
            project_value: parse_money(money),
            department_name: None,
            province: None,
            contract_start_date: None,
            contract_end_date: None,
            announce_date: None,
        }
    }

    fn dated(start: Option<(i32, u32, u32)>, end: Option<(i32, u32, u32)>) -> ProcurementAward {
        let date = |d: Option<(i32, u32, u32)>| d.and_then(|(y, m, dd)| NaiveDate::from_ymd_opt(y, m, dd));
        ProcurementAward {
            contract_start_date: date(start),
            contract_end_date: date(end),
            ..award("C1", "1")
        }
    }

    fn acme_dataset() -> Dataset {
        Dataset::new(
            vec![Company {
                organization_id: "C1".to_string(),
                name: "Acme Co".to_string(),
            }],
            vec![award("C1", "100"), award("C1", "bad"), award("C1", "200")],
        )
    }

    #[test]
    fn metrics_exclude_malformed_values() {
        let dataset = acme_dataset();
        let awards: Vec<&ProcurementAward> = dataset.awards.iter().collect();

        assert_eq!(total_count(&awards), 3);
        assert_eq!(valued_count(&awards), 2);
        assert_eq!(total_value(&awards), Decimal::from(300));
        assert_eq!(average_value(&awards), Some(Decimal::from(150)));
    }

    #[test]
    fn empty_input_has_no_average() {
        let awards: Vec<&ProcurementAward> = Vec::new();
        assert_eq!(total_count(&awards), 0);
        assert_eq!(total_value(&awards), Decimal::ZERO);
        assert_eq!(average_value(&awards), None);

        let unvalued = [award("C1", "n/a")];
        let refs: Vec<&ProcurementAward> = unvalued.iter().collect();
        assert_eq!(average_value(&refs), None);
    }

    #[test]
    fn oversized_values_do_not_overflow_totals() {
        let huge = "79228162514264337593543950335";
        let mut awards = vec![award("C1", huge), award("C1", huge), award("C1", "1")];
        for a in awards.iter_mut() {
            a.province = Some("Bangkok".to_string());
            a.announce_date = NaiveDate::from_ymd_opt(2022, 1, 5);
        }
        let refs: Vec<&ProcurementAward> = awards.iter().collect();

        assert_eq!(total_value(&refs), Decimal::MAX);
        assert_eq!(valued_count(&refs), 3);
        assert!(average_value(&refs).is_some());

        let totals = category_value_totals(&refs, CategoryField::Province);
        assert_eq!(totals[0].total_value, Decimal::MAX);
        assert_eq!(totals[0].award_count, 3);
        let monthly = monthly_series(&refs);
        assert_eq!(monthly[0].total_value, Decimal::MAX);
        assert_eq!(monthly[0].award_count, 3);

        let dataset = Dataset::new(Vec::new(), awards.clone());
        let summary = DashboardAnalyzer::default().homepage(&dataset);
        assert_eq!(summary.total_value, Decimal::MAX);
    }

    #[test]
    fn total_value_ignores_order() {
        let awards = [award("C1", "10.5"), award("C2", "3"), award("C3", "bad"), award("C1", "7.25")];
        let forward: Vec<&ProcurementAward> = awards.iter().collect();
        let backward: Vec<&ProcurementAward> = awards.iter().rev().collect();
        assert_eq!(total_value(&forward), total_value(&backward));
        assert_eq!(total_value(&forward), Decimal::new(2075, 2));
    }

    #[test]
    fn histogram_spans_min_to_max() {
        let bins = histogram(&[0.0, 1.0, 2.5, 5.0, 10.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 1, 1, 1]);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
        let single = histogram(&[4.0, 4.0, 4.0], 10);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
    }

    #[test]
    fn value_histogram_skips_absent_values() {
        let dataset = acme_dataset();
        let awards: Vec<&ProcurementAward> = dataset.awards.iter().collect();
        let bins = value_histogram(&awards, 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn categorical_distribution_counts_every_award() {
        let mut awards = vec![award("C1", "1"), award("C1", "2"), award("C2", "3"), award("C3", "4")];
        awards[0].province = Some("Bangkok".to_string());
        awards[1].province = Some("Chiang Mai".to_string());
        awards[2].province = Some("Bangkok".to_string());
        awards[3].province = Some("   ".to_string());
        let refs: Vec<&ProcurementAward> = awards.iter().collect();

        let distribution = categorical_distribution(&refs, CategoryField::Province);
        assert_eq!(distribution.iter().map(|c| c.count).sum::<usize>(), refs.len());
        assert_eq!(
            distribution,
            vec![
                CategoryCount { category: "Bangkok".to_string(), count: 2 },
                CategoryCount { category: "Chiang Mai".to_string(), count: 1 },
                CategoryCount { category: UNKNOWN_BUCKET.to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn category_value_totals_rank_by_value() {
        let mut awards = vec![award("C1", "10"), award("C1", "500"), award("C2", "bad")];
        awards[0].province = Some("Bangkok".to_string());
        awards[1].province = Some("Phuket".to_string());
        awards[2].province = Some("Phuket".to_string());
        let refs: Vec<&ProcurementAward> = awards.iter().collect();

        let totals = category_value_totals(&refs, CategoryField::Province);
        assert_eq!(totals[0].category, "Phuket");
        assert_eq!(totals[0].total_value, Decimal::from(500));
        assert_eq!(totals[0].award_count, 2);
        assert_eq!(totals[1].category, "Bangkok");
    }

    #[test]
    fn duration_histogram_counts_only_valid_durations() {
        let awards = vec![
            dated(Some((2021, 1, 1)), Some((2021, 1, 31))),
            dated(Some((2021, 1, 1)), Some((2021, 1, 1))),
            dated(Some((2021, 2, 1)), Some((2021, 1, 1))),
            dated(None, Some((2021, 1, 1))),
            dated(Some((2021, 1, 1)), Some((2021, 12, 31))),
        ];
        let refs: Vec<&ProcurementAward> = awards.iter().collect();
        let valid = refs.iter().filter(|a| a.duration_days().is_some()).count();

        let bins = duration_histogram(&refs, 5);
        assert_eq!(valid, 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), valid);
    }

    #[test]
    fn normal_overlay_is_omitted_for_degenerate_samples() {
        assert!(normal_overlay(&[], 30, 100).is_empty());
        assert!(normal_overlay(&[42.0], 30, 100).is_empty());
        assert!(normal_overlay(&[10.0, 10.0], 30, 100).is_empty());
    }

    #[test]
    fn normal_overlay_is_scaled_to_histogram() {
        let sample = [100.0, 200.0, 300.0, 400.0];
        let overlay = normal_overlay(&sample, 30, 100);
        assert_eq!(overlay.len(), 100);
        assert_eq!(overlay[0].x, 100.0);
        assert_eq!(overlay[99].x, 400.0);

        let mean = 250.0;
        let std_dev = (((150.0f64).powi(2) * 2.0 + (50.0f64).powi(2) * 2.0) / 3.0).sqrt();
        let scale = 4.0 * 300.0 / 30.0;
        let expected = normal_pdf(100.0, mean, std_dev) * scale;
        assert!((overlay[0].y - expected).abs() < 1e-12);

        // Symmetric sample gives a symmetric curve.
        assert!((overlay[0].y - overlay[99].y).abs() < 1e-12);
    }

    #[test]
    fn normal_pdf_peaks_at_mean() {
        let peak = normal_pdf(0.0, 0.0, 1.0);
        assert!((peak - 1.0 / (2.0 * PI).sqrt()).abs() < 1e-12);
        assert!(normal_pdf(1.0, 0.0, 1.0) < peak);
    }

    #[test]
    fn top_winners_resolve_names_and_keep_tie_order() {
        let mut orphan = award("C9", "5");
        orphan.winner_name = Some("Orphan Ltd".to_string());
        let dataset = Dataset::new(
            vec![
                Company { organization_id: "C1".to_string(), name: "Acme Co".to_string() },
                Company { organization_id: "C2".to_string(), name: "Widgets Inc".to_string() },
            ],
            vec![award("C2", "1"), award("C1", "2"), award("C1", "3"), orphan],
        );
        let awards: Vec<&ProcurementAward> = dataset.awards.iter().collect();

        let winners = top_winners(&awards, &dataset, 10);
        let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Co", "Widgets Inc", "Orphan Ltd"]);
        assert_eq!(winners[0].award_count, 2);
        assert_eq!(top_winners(&awards, &dataset, 1).len(), 1);
    }

    #[test]
    fn top_awards_by_value_skip_unvalued() {
        let awards = [award("C1", "5"), award("C1", "bad"), award("C1", "50"), award("C1", "20")];
        let refs: Vec<&ProcurementAward> = awards.iter().collect();
        let top = top_awards_by_value(&refs, 2);
        let values: Vec<Option<Decimal>> = top.iter().map(|a| a.project_value).collect();
        assert_eq!(values, vec![Some(Decimal::from(50)), Some(Decimal::from(20))]);
    }

    #[test]
    fn monthly_series_groups_by_announce_month() {
        let mut awards = vec![award("C1", "10"), award("C1", "20"), award("C1", "5"), award("C1", "1")];
        awards[0].announce_date = NaiveDate::from_ymd_opt(2021, 3, 2);
        awards[1].announce_date = NaiveDate::from_ymd_opt(2021, 3, 28);
        awards[2].announce_date = NaiveDate::from_ymd_opt(2020, 12, 1);
        let refs: Vec<&ProcurementAward> = awards.iter().collect();

        let series = monthly_series(&refs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "2020-12");
        assert_eq!(series[1].month, "2021-03");
        assert_eq!(series[1].award_count, 2);
        assert_eq!(series[1].total_value, Decimal::from(30));
    }

    #[test]
    fn company_summary_filters_by_winner() {
        let base = acme_dataset();
        let mut awards = base.awards.clone();
        awards.push(award("C2", "9999"));
        let dataset = Dataset::new(base.companies.clone(), awards);
        let analyzer = DashboardAnalyzer::default();
        let acme = dataset.company_by_id("C1").expect("company exists");

        let summary = analyzer.company(&dataset, acme);
        assert_eq!(summary.total_awards, 3);
        assert_eq!(summary.total_value, Decimal::from(300));
        assert_eq!(summary.average_value, Some(Decimal::from(150)));
        assert_eq!(summary.normal_overlay.len(), 100);
        assert_eq!(summary.top_projects.len(), 2);

        let homepage = analyzer.homepage(&dataset);
        assert_eq!(homepage.total_awards, 4);
        assert_eq!(homepage.unresolved_awards, 1);
        assert_eq!(homepage.total_value, Decimal::from(10299));
    }
}
