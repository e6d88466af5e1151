use crate::models::Company;
use std::collections::{BTreeSet, HashSet};

pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Id,
    Name,
}

/// One searchable string, tagged with the company and column it came from.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub kind: CandidateKind,
    pub value: &'a str,
    pub company_index: usize,
}

#[derive(Debug, Clone)]
pub struct CompanyMatch<'a> {
    pub kind: CandidateKind,
    pub value: &'a str,
    pub score: u8,
    pub company: &'a Company,
}

impl CompanyMatch<'_> {
    /// Route string that opens the detail page for the matched company.
    pub fn company_link(&self) -> String {
        crate::navigation::Route::company(&self.company.organization_id).to_query_string()
    }
}

/// All identifiers first, then all names, in dataset order.
pub fn candidate_pool(companies: &[Company]) -> Vec<Candidate<'_>> {
    let ids = companies.iter().enumerate().map(|(index, company)| Candidate {
        kind: CandidateKind::Id,
        value: company.organization_id.as_str(),
        company_index: index,
    });
    let names = companies.iter().enumerate().map(|(index, company)| Candidate {
        kind: CandidateKind::Name,
        value: company.name.as_str(),
        company_index: index,
    });
    ids.chain(names).collect()
}

/// Rank companies against a free-text query, returning at most `limit`
/// distinct strings. Equal strings from different companies collapse into
/// the first (highest ranked) one.
pub fn resolve<'a>(query: &str, companies: &'a [Company], limit: usize) -> Vec<CompanyMatch<'a>> {
    let processed_query = process(query);
    if processed_query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(u8, Candidate<'a>)> = candidate_pool(companies)
        .into_iter()
        .map(|candidate| (score_processed(&processed_query, &process(candidate.value)), candidate))
        .collect();

    // Stable sort keeps pool order among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for (score, candidate) in scored {
        if matches.len() >= limit {
            break;
        }
        if !seen.insert(candidate.value) {
            continue;
        }
        matches.push(CompanyMatch {
            kind: candidate.kind,
            value: candidate.value,
            score,
            company: &companies[candidate.company_index],
        });
    }

    tracing::debug!(query, results = matches.len(), "resolved company query");
    matches
}

/// Similarity of two processed strings on a 0-100 scale.
fn score_processed(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut best = ratio(a, b);
    best = best.max(token_sort_ratio(a, b) * 0.95);
    best = best.max(token_set_ratio(a, b) * 0.95);

    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let length_ratio = long.chars().count() as f64 / short.chars().count() as f64;
    if length_ratio >= 1.5 {
        best = best.max(partial_ratio(short, long) * 0.9);
    }

    best.round().clamp(0.0, 100.0) as u8
}

/// Lowercase, turn punctuation into spaces and collapse whitespace.
fn process(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let common = join(tokens_a.intersection(&tokens_b).copied().collect());
    let only_a = join(tokens_a.difference(&tokens_b).copied().collect());
    let only_b = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_a = format!("{} {}", common, only_a).trim().to_string();
    let combined_b = format!("{} {}", common, only_b).trim().to_string();

    let mut best = ratio(&combined_a, &combined_b);
    if !common.is_empty() {
        best = best
            .max(ratio(&common, &combined_a))
            .max(ratio(&common, &combined_b));
    }
    best
}

/// Best ratio of `short` against every same-length window of `long`.
fn partial_ratio(short: &str, long: &str) -> f64 {
    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();
    if short_len == 0 || long_chars.len() < short_len {
        return ratio(short, long);
    }

    long_chars
        .windows(short_len)
        .map(|window| ratio(short, &window.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
