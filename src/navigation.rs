use crate::models::{Company, Dataset};
use crate::resolver::{self, CompanyMatch};
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Homepage,
    Search,
    Company,
    Unknown(String),
}

impl Page {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "" | "home" | "homepage" => Page::Homepage,
            "search" | "company search" => Page::Search,
            "company" => Page::Company,
            _ => Page::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Page::Homepage => "homepage",
            Page::Search => "search",
            Page::Company => "company",
            Page::Unknown(raw) => raw,
        }
    }
}

/// Routing state: which page to show and for which company or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub page: Page,
    pub company_id: Option<String>,
    pub query: Option<String>,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            page: Page::Homepage,
            company_id: None,
            query: None,
        }
    }
}

#[derive(Debug)]
pub enum View<'a> {
    Homepage,
    Search {
        query: String,
        matches: Vec<CompanyMatch<'a>>,
    },
    CompanyDetail(&'a Company),
    NotFound(String),
}

impl Route {
    /// Without an explicit page, an id opens the company page and a query
    /// opens the search page.
    pub fn new(page: Option<&str>, company_id: Option<&str>, query: Option<&str>) -> Self {
        let company_id = non_empty(company_id);
        let query = query.map(str::to_string);
        let page = match page {
            Some(raw) => Page::parse(raw),
            None if company_id.is_some() => Page::Company,
            None if query.is_some() => Page::Search,
            None => Page::Homepage,
        };
        Self {
            page,
            company_id,
            query,
        }
    }

    pub fn company(organization_id: &str) -> Self {
        Self {
            page: Page::Company,
            company_id: Some(organization_id.to_string()),
            query: None,
        }
    }

    /// Parse `?page=company&id=C1` style routing parameters. Unknown keys are
    /// ignored; the last occurrence of a repeated key wins.
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.split_once('?').map_or(raw, |(_, rest)| rest);

        let mut page = None;
        let mut company_id = None;
        let mut query = None;
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => page = Some(value.into_owned()),
                "id" => company_id = Some(value.into_owned()),
                "q" | "query" => query = Some(value.into_owned()),
                _ => tracing::debug!(%key, "ignoring unknown route parameter"),
            }
        }

        Self::new(page.as_deref(), company_id.as_deref(), query.as_deref())
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("page", self.page.as_str());
        if let Some(id) = &self.company_id {
            serializer.append_pair("id", id);
        }
        if let Some(query) = &self.query {
            serializer.append_pair("q", query);
        }
        format!("?{}", serializer.finish())
    }

    pub fn view<'a>(&self, dataset: &'a Dataset, limit: usize) -> View<'a> {
        match &self.page {
            Page::Homepage => View::Homepage,
            Page::Search => {
                let query = self.query.clone().unwrap_or_default();
                let matches = resolver::resolve(&query, &dataset.companies, limit);
                View::Search { query, matches }
            }
            Page::Company => match self.company_id.as_deref() {
                None => View::NotFound("No company ID provided.".to_string()),
                Some(id) => match dataset.company_by_id(id) {
                    Some(company) => View::CompanyDetail(company),
                    None => View::NotFound(format!("Company with ID {} not found.", id)),
                },
            },
            Page::Unknown(raw) => View::NotFound(format!("Page '{}' does not exist.", raw)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcurementAward;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Company {
                    organization_id: "C1".to_string(),
                    name: "Acme Co".to_string(),
                },
                Company {
                    organization_id: "C2".to_string(),
                    name: "Widgets Inc".to_string(),
                },
            ],
            Vec::<ProcurementAward>::new(),
        )
    }

    #[test]
    fn parses_page_aliases() {
        assert_eq!(Page::parse(""), Page::Homepage);
        assert_eq!(Page::parse("Homepage"), Page::Homepage);
        assert_eq!(Page::parse("Company Search"), Page::Search);
        assert_eq!(Page::parse("company_search"), Page::Search);
        assert_eq!(Page::parse("COMPANY"), Page::Company);
        assert_eq!(Page::parse("admin"), Page::Unknown("admin".to_string()));
    }

    #[test]
    fn parses_query_string_routes() {
        let route = Route::from_query_string("localhost:8501/?page=company&id=C1");
        assert_eq!(route.page, Page::Company);
        assert_eq!(route.company_id.as_deref(), Some("C1"));

        let route = Route::from_query_string("page=search&q=acme%20co");
        assert_eq!(route.page, Page::Search);
        assert_eq!(route.query.as_deref(), Some("acme co"));

        assert_eq!(Route::from_query_string(""), Route::default());
        assert_eq!(Route::from_query_string("?id=C7").page, Page::Company);
        assert_eq!(Route::new(None, None, Some("acme")).page, Page::Search);
    }

    #[test]
    fn company_route_round_trips() {
        let route = Route::company("C 1");
        assert_eq!(route.to_query_string(), "?page=company&id=C+1");
        assert_eq!(Route::from_query_string(&route.to_query_string()), route);
    }

    #[test]
    fn resolves_company_detail_view() {
        let data = dataset();
        match Route::company("C2").view(&data, 5) {
            View::CompanyDetail(company) => assert_eq!(company.name, "Widgets Inc"),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn unknown_targets_render_not_found() {
        let data = dataset();
        assert!(matches!(Route::company("C404").view(&data, 5), View::NotFound(_)));
        assert!(matches!(
            Route::new(Some("company"), None, None).view(&data, 5),
            View::NotFound(_)
        ));
        assert!(matches!(
            Route::new(Some("reports"), None, None).view(&data, 5),
            View::NotFound(_)
        ));
    }

    #[test]
    fn search_view_carries_ranked_matches() {
        let data = dataset();
        match Route::new(Some("search"), None, Some("acme")).view(&data, 5) {
            View::Search { query, matches } => {
                assert_eq!(query, "acme");
                assert_eq!(matches[0].value, "Acme Co");
            }
            other => panic!("unexpected view: {:?}", other),
        }

        match Route::new(Some("search"), None, None).view(&data, 5) {
            View::Search { matches, .. } => assert!(matches.is_empty()),
            other => panic!("unexpected view: {:?}", other),
        }
    }
}
