mod analyzer;
mod loader;
mod models;
mod navigation;
mod report;
mod resolver;

use analyzer::DashboardAnalyzer;
use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use loader::DataLoader;
use models::{Config, Dataset};
use navigation::{Route, View};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("procurement-dashboard")
        .version("0.1")
        .about("Summaries and company drill-downs over government procurement awards")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("page")
                .short('p')
                .long("page")
                .value_name("PAGE")
                .help("Page to show: homepage, search or company"),
        )
        .arg(
            Arg::new("id")
                .short('i')
                .long("id")
                .value_name("ID")
                .help("Company organization ID for the company page"),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("TEXT")
                .help("Company name or ID to search for"),
        )
        .arg(
            Arg::new("route")
                .short('r')
                .long("route")
                .value_name("QUERYSTRING")
                .help("Route as query parameters, e.g. \"?page=company&id=COMPANY_ID\"")
                .conflicts_with_all(["page", "id", "query"]),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .value_name("N")
                .help("Maximum number of search suggestions")
                .value_parser(value_parser!(u64).range(1..)),
        )
}

fn route_from_args(matches: &ArgMatches) -> Route {
    if let Some(raw) = matches.get_one::<String>("route") {
        return Route::from_query_string(raw);
    }
    Route::new(
        matches.get_one::<String>("page").map(String::as_str),
        matches.get_one::<String>("id").map(String::as_str),
        matches.get_one::<String>("query").map(String::as_str),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and point it at your procurement exports, then run the program again.",
            config_file
        );
        return Ok(());
    };

    let limit = matches
        .get_one::<u64>("limit")
        .map(|&n| n as usize)
        .unwrap_or(config.search_limit);
    let route = route_from_args(&matches);
    let output_dir = config.output_directory.as_deref().unwrap_or("output");
    fs::create_dir_all(output_dir)?;

    println!("🧭 Route: {}", route.to_query_string());
    println!("📂 Data source: {:?}", config.data_source_mode);
    println!("📄 Output directory: {}", output_dir);
    tracing::debug!(?route, limit, "starting dashboard run");

    let dataset = DataLoader::new().load_dataset(&config).await?;
    let analyzer = DashboardAnalyzer::from_config(&config);

    render(route.view(&dataset, limit), &dataset, &analyzer, output_dir)?;

    println!("\n✅ Done!");
    Ok(())
}

fn render(
    view: View<'_>,
    dataset: &Dataset,
    analyzer: &DashboardAnalyzer,
    output_dir: &str,
) -> Result<()> {
    match view {
        View::Homepage => {
            let summary = analyzer.homepage(dataset);
            report::print_homepage(&summary, analyzer.top_n);
            let dir = report::write_homepage(&summary, output_dir)?;
            println!("\n📂 Chart data written to: {}", dir.display());
        }
        View::Search { query, matches } => {
            report::print_search(&query, &matches);
            let dir = report::write_search(&query, &matches, output_dir)?;
            println!("\n📂 Suggestions written to: {}", dir.display());
        }
        View::CompanyDetail(company) => {
            let summary = analyzer.company(dataset, company);
            report::print_company(&summary);
            let dir = report::write_company(&summary, output_dir)?;
            println!("\n📂 Chart data written to: {}", dir.display());
        }
        View::NotFound(reason) => {
            tracing::info!(%reason, "route did not resolve to a view");
            report::print_not_found(&reason);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Page;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn explicit_flags_build_the_route() {
        let matches = cli().get_matches_from(["procurement-dashboard", "--id", "C1"]);
        let route = route_from_args(&matches);
        assert_eq!(route.page, Page::Company);
        assert_eq!(route.company_id.as_deref(), Some("C1"));
    }

    #[test]
    fn route_flag_parses_query_parameters() {
        let matches = cli().get_matches_from([
            "procurement-dashboard",
            "--route",
            "?page=search&q=acme",
        ]);
        let route = route_from_args(&matches);
        assert_eq!(route.page, Page::Search);
        assert_eq!(route.query.as_deref(), Some("acme"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let result = cli().try_get_matches_from(["procurement-dashboard", "--limit", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn not_found_view_renders_without_error() {
        let dataset = Dataset::default();
        let analyzer = DashboardAnalyzer::default();
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().to_str().expect("utf-8 path");

        let view = Route::company("missing").view(&dataset, 5);
        assert!(render(view, &dataset, &analyzer, output).is_ok());
    }
}
