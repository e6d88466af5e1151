use crate::analyzer::{
    CategoryCount, CategoryField, CategoryTotal, CompanySummary, HistogramBin, HomepageSummary, MonthlyPoint,
    OverlayPoint, WinnerCount,
};
use crate::models::ProcurementAward;
use crate::resolver::{CandidateKind, CompanyMatch};
use anyhow::Result;
use csv::Writer;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use url::form_urlencoded;

pub fn format_money(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.round_dp(2));
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    format!("${}.{}", group_thousands(whole), fraction)
}

pub fn format_optional_money(value: Option<Decimal>) -> String {
    value.map(format_money).unwrap_or_else(|| "N/A".to_string())
}

pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

fn format_date(award: &ProcurementAward) -> String {
    award
        .announce_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn text_or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Directory for one view, emptied of previous results.
pub fn prepare_view_directory(output_dir: &str, view: &str) -> Result<PathBuf> {
    let path = Path::new(output_dir).join(view);
    if path.exists() {
        println!("🧹 Cleaning previous results in {}", path.display());
        fs::remove_dir_all(&path)?;
    }
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn print_homepage(summary: &HomepageSummary, top_n: usize) {
    println!("\n📊 PROCUREMENT DASHBOARD - HOMEPAGE");
    println!("===================================\n");

    println!("Summary Statistics");
    println!("   Total Companies: {}", format_count(summary.total_companies));
    println!("   Total Projects: {}", format_count(summary.total_awards));
    println!("   Total Project Value: {}", format_money(summary.total_value));
    println!(
        "   Avg Project Value: {} (over {} valued projects)",
        format_optional_money(summary.average_value),
        format_count(summary.valued_awards)
    );
    if summary.unresolved_awards > 0 {
        println!(
            "   ⚠️  {} projects reference unknown companies",
            format_count(summary.unresolved_awards)
        );
    }

    println!("\n🏆 Top {} Companies by Project Count:", top_n);
    for (i, winner) in summary.top_winners.iter().enumerate() {
        println!("   {}. {} - {} projects", i + 1, winner.name, format_count(winner.award_count));
    }

    println!("\n🏛️  Project Distribution by Department:");
    print_distribution(&summary.departments, summary.total_awards, top_n);

    println!("\n📍 Project Distribution by Province:");
    print_distribution(&summary.provinces, summary.total_awards, top_n);

    println!("\n📈 Project Value Distribution (log scale recommended):");
    print_histogram(&summary.value_histogram);
}

pub fn print_company(summary: &CompanySummary<'_>) {
    println!("\n🏢 Company Details: {}", summary.company.name);
    println!("==========================================\n");
    println!("   Organization ID: {}", summary.company.organization_id);
    println!("   Total Projects: {}", format_count(summary.total_awards));
    println!("   Total Project Value: {}", format_money(summary.total_value));
    println!("   Avg Project Value: {}", format_optional_money(summary.average_value));

    println!("\n📈 Project Budget Distribution:");
    if summary.value_histogram.is_empty() {
        println!("   No project data available.");
    } else {
        print_histogram(&summary.value_histogram);
        if summary.normal_overlay.is_empty() {
            println!("   (normal curve omitted: not enough spread in project values)");
        }
    }

    println!("\n💰 Top Projects Won (by value):");
    if summary.top_projects.is_empty() {
        println!("   No project data available.");
    }
    for (i, award) in summary.top_projects.iter().enumerate() {
        println!(
            "   {}. {} | {} | {} | {} | {}",
            i + 1,
            text_or_dash(&award.project_name),
            format_optional_money(award.project_value),
            format_date(award),
            text_or_dash(&award.department_name),
            text_or_dash(&award.province),
        );
    }
}

pub fn print_search(query: &str, matches: &[CompanyMatch<'_>]) {
    println!("\n🔎 Company Search: \"{}\"", query);
    println!("==========================================\n");

    if matches.is_empty() {
        println!("   No matches found. Please try a different search term.");
    }
    for (i, m) in matches.iter().enumerate() {
        let kind = match m.kind {
            CandidateKind::Id => "id",
            CandidateKind::Name => "name",
        };
        println!(
            "   {}. {} ({} match, score {}) -> {} [{}]",
            i + 1,
            m.value,
            kind,
            m.score,
            m.company.name,
            m.company_link()
        );
    }
    println!("\nYou can also open a company directly with --route \"?page=company&id=COMPANY_ID\"");
}

pub fn print_not_found(reason: &str) {
    println!("\n❓ Not found: {}", reason);
    println!("   Available pages: homepage, search, company");
}

fn print_distribution(buckets: &[CategoryCount], total: usize, top_n: usize) {
    if buckets.is_empty() {
        println!("   No project data available.");
        return;
    }
    for bucket in buckets.iter().take(top_n) {
        let share = if total > 0 {
            bucket.count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("   {} - {} ({:.1}%)", bucket.category, format_count(bucket.count), share);
    }
    if buckets.len() > top_n {
        println!("   ... and {} more", buckets.len() - top_n);
    }
}

fn print_histogram(bins: &[HistogramBin]) {
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in bins.iter().filter(|b| b.count > 0) {
        let width = if peak > 0 { (bin.count * 40).div_ceil(peak) } else { 0 };
        println!(
            "   {:>16.2} - {:<16.2} {:>6} {}",
            bin.start,
            bin.end,
            bin.count,
            "█".repeat(width)
        );
    }
}

pub fn write_homepage(summary: &HomepageSummary, output_dir: &str) -> Result<PathBuf> {
    let dir = prepare_view_directory(output_dir, "homepage")?;

    let mut content = String::new();
    content.push_str("Procurement Dashboard - Homepage\n");
    content.push_str("================================\n\n");
    content.push_str(&format!(
        "Total companies: {}\n\
        Total projects: {}\n\
        Valued projects: {}\n\
        Projects with unknown winner: {}\n\
        Total project value: {}\n\
        Average project value: {}\n",
        format_count(summary.total_companies),
        format_count(summary.total_awards),
        format_count(summary.valued_awards),
        format_count(summary.unresolved_awards),
        format_money(summary.total_value),
        format_optional_money(summary.average_value),
    ));
    fs::write(dir.join("summary.txt"), content)?;

    write_winners(&summary.top_winners, &dir.join("top_companies.csv"))?;
    write_distribution(
        &summary.departments,
        CategoryField::Department.label(),
        &dir.join("departments.csv"),
    )?;
    write_distribution(
        &summary.provinces,
        CategoryField::Province.label(),
        &dir.join("provinces.csv"),
    )?;
    write_category_totals(
        &summary.province_values,
        CategoryField::Province.label(),
        &dir.join("province_values.csv"),
    )?;
    write_histogram(&summary.value_histogram, &dir.join("value_histogram.csv"))?;
    write_histogram(&summary.duration_histogram, &dir.join("duration_histogram.csv"))?;
    write_monthly(&summary.monthly, &dir.join("monthly.csv"))?;
    Ok(dir)
}

/// Per-company output directory. The id is percent-encoded so distinct ids
/// never share a directory and no path separator survives.
fn company_directory(organization_id: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(organization_id.as_bytes()).collect();
    format!("company_{}", encoded)
}

pub fn write_company(summary: &CompanySummary<'_>, output_dir: &str) -> Result<PathBuf> {
    let view = company_directory(&summary.company.organization_id);
    let dir = prepare_view_directory(output_dir, &view)?;

    let mut content = String::new();
    content.push_str(&format!("Company Details: {}\n", summary.company.name));
    content.push_str("==========================================\n\n");
    content.push_str(&format!(
        "Organization ID: {}\n\
        Total projects: {}\n\
        Valued projects: {}\n\
        Total project value: {}\n\
        Average project value: {}\n",
        summary.company.organization_id,
        format_count(summary.total_awards),
        format_count(summary.valued_awards),
        format_money(summary.total_value),
        format_optional_money(summary.average_value),
    ));
    fs::write(dir.join("summary.txt"), content)?;

    write_histogram(&summary.value_histogram, &dir.join("value_histogram.csv"))?;
    write_overlay(&summary.normal_overlay, &dir.join("normal_overlay.csv"))?;
    write_distribution(
        &summary.departments,
        CategoryField::Department.label(),
        &dir.join("departments.csv"),
    )?;
    write_distribution(
        &summary.provinces,
        CategoryField::Province.label(),
        &dir.join("provinces.csv"),
    )?;
    write_histogram(&summary.duration_histogram, &dir.join("duration_histogram.csv"))?;
    write_top_projects(&summary.top_projects, &dir.join("top_projects.csv"))?;
    Ok(dir)
}

pub fn write_search(query: &str, matches: &[CompanyMatch<'_>], output_dir: &str) -> Result<PathBuf> {
    let dir = prepare_view_directory(output_dir, "search")?;
    let mut writer = Writer::from_path(dir.join("matches.csv"))?;
    writer.write_record(["Query", "Rank", "Value", "Kind", "Score", "Organization_ID", "Name", "Link"])?;
    for (i, m) in matches.iter().enumerate() {
        let kind = match m.kind {
            CandidateKind::Id => "id",
            CandidateKind::Name => "name",
        };
        writer.write_record([
            query,
            &(i + 1).to_string(),
            m.value,
            kind,
            &m.score.to_string(),
            &m.company.organization_id,
            &m.company.name,
            &m.company_link(),
        ])?;
    }
    writer.flush()?;
    Ok(dir)
}

fn write_histogram(bins: &[HistogramBin], path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Bin_Start", "Bin_End", "Count"])?;
    for bin in bins {
        writer.write_record([bin.start.to_string(), bin.end.to_string(), bin.count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_overlay(points: &[OverlayPoint], path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["X", "Y"])?;
    for point in points {
        writer.write_record([point.x.to_string(), point.y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_distribution(buckets: &[CategoryCount], label: &str, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([label, "Count"])?;
    for bucket in buckets {
        writer.write_record([bucket.category.as_str(), &bucket.count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_category_totals(totals: &[CategoryTotal], label: &str, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([label, "Total_Value", "Projects"])?;
    for total in totals {
        writer.write_record([
            total.category.as_str(),
            &total.total_value.to_string(),
            &total.award_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_winners(winners: &[WinnerCount], path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Rank", "Organization_ID", "Name", "Projects"])?;
    for (i, winner) in winners.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string().as_str(),
            winner.organization_id.as_deref().unwrap_or(""),
            &winner.name,
            &winner.award_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_monthly(series: &[MonthlyPoint], path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Month", "Projects", "Total_Value"])?;
    for point in series {
        writer.write_record([
            point.month.as_str(),
            &point.award_count.to_string(),
            &point.total_value.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_top_projects(awards: &[&ProcurementAward], path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Project_Name", "Project_Money", "Announce_Date", "Dept_Name", "Province"])?;
    for award in awards {
        writer.write_record([
            text_or_dash(&award.project_name),
            &format_optional_money(award.project_value),
            &format_date(award),
            text_or_dash(&award.department_name),
            text_or_dash(&award.province),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
