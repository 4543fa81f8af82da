use askama::Template;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::PageDocument;
use crate::error::SearchError;
use crate::files::{list_files, FileFilter};
use crate::formatter::{ResultTemplate, TokenSource};
use crate::matcher::{SnippetMode, TermMatcher};
use crate::templates::ResultsTemplate;

pub const DEFAULT_TEMPLATE: &str = "<h5 class='search_title'><a target='_top' href='#{href}' class='search_link'>#{title}</a></h5><p>...#{token}...</p><p class='match'><em>Terms matched: #{count} - URL: #{href}</em></p>";

/// Where and how the engine looks for pages.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub default_template: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".."),
            extensions: vec!["html".to_string(), "htm".to_string()],
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The term as received; see [`SearchRequest::term`].
    pub query: String,
    pub filter: String,
    pub template: Option<String>,
    pub live_limit: Option<usize>,
    pub live: bool,
    pub case_sensitive: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter: "*".to_string(),
            template: None,
            live_limit: None,
            live: false,
            case_sensitive: false,
        }
    }

    /// The term actually searched for: `+` stands for a space and a bare
    /// `?s=` means nothing was typed.
    pub fn term(&self) -> String {
        if self.query == "?s=" {
            return String::new();
        }
        self.query.replace('+', " ")
    }

    fn snippet_mode(&self) -> SnippetMode {
        if self.live {
            SnippetMode::Live
        } else {
            SnippetMode::Full
        }
    }
}

/// One scanned page. Pages without a match carry a single empty snippet.
#[derive(Debug, Clone)]
pub struct ResultItem {
    pub title: String,
    pub href: String,
    pub snippets: Vec<String>,
    pub match_count: usize,
    pub meta: HashMap<String, String>,
}

impl ResultItem {
    pub fn has_matches(&self) -> bool {
        self.snippets.iter().any(|s| !s.is_empty())
    }
}

impl TokenSource for ResultItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn href(&self) -> &str {
        &self.href
    }

    fn first_snippet(&self) -> &str {
        self.snippets.first().map(String::as_str).unwrap_or_default()
    }

    fn count(&self) -> usize {
        self.match_count
    }

    fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub snippet: String,
    pub count: usize,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results_count: usize,
    pub total_matches: usize,
    pub files_searched: usize,
    pub results: Vec<SearchHit>,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    settings: SearchSettings,
}

impl SearchEngine {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let filter = FileFilter::parse(&request.filter)?;
        let term = request.term();
        let matcher = TermMatcher::new(&term, request.case_sensitive)?;
        let template = ResultTemplate::parse(
            request
                .template
                .as_deref()
                .unwrap_or(&self.settings.default_template),
        );

        let mut items = self.scan(&filter, &matcher, &template, request.snippet_mode());
        let files_searched = items.len();

        // Stable: pages with equal counts keep their enumeration order.
        items.sort_by(|a, b| b.match_count.cmp(&a.match_count));

        let total_matches: usize = items.iter().map(|item| item.match_count).sum();
        let matched: Vec<&ResultItem> = items.iter().filter(|item| item.has_matches()).collect();
        let results_count = matched.len();

        // A zero limit means no limit.
        let shown = match (request.live, request.live_limit) {
            (true, Some(limit)) if limit > 0 => limit.min(results_count),
            _ => results_count,
        };

        let results: Vec<SearchHit> = matched[..shown]
            .iter()
            .map(|item| SearchHit {
                title: item.title.clone(),
                href: item.href.clone(),
                snippet: item.first_snippet().to_string(),
                count: item.match_count,
                formatted: template.render(*item),
            })
            .collect();

        let html = ResultsTemplate {
            live: request.live,
            term: &term,
            query: &request.query,
            filter: &request.filter,
            results_count,
            total_matches,
            hits: &results,
        }
        .render()?;

        Ok(SearchResponse {
            query: term,
            results_count,
            total_matches,
            files_searched,
            results,
            html,
        })
    }

    /// Reads and matches every candidate page, one file at a time.
    pub fn scan(
        &self,
        filter: &FileFilter,
        matcher: &TermMatcher,
        template: &ResultTemplate,
        mode: SnippetMode,
    ) -> Vec<ResultItem> {
        let files = list_files(&self.settings.root, &self.settings.extensions[..]);
        tracing::debug!("Scanning {} files under {}", files.len(), self.settings.root.display());

        let meta_names = template.meta_names();
        let mut items = Vec::new();

        for path in files {
            if !filter.matches(&path) {
                continue;
            }

            let document = match read_document(&path) {
                Ok(Some(document)) => document,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("Error reading file {}: {}", path.display(), e);
                    continue;
                }
            };

            items.push(build_item(&path, &document, matcher, &meta_names, mode));
        }

        items
    }
}

/// `Ok(None)` for empty files, which are left out of the search entirely.
fn read_document(path: &Path) -> std::io::Result<Option<PageDocument>> {
    if fs::metadata(path)?.len() == 0 {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(PageDocument::from_bytes(&bytes)))
}

fn build_item(
    path: &Path,
    document: &PageDocument,
    matcher: &TermMatcher,
    meta_names: &[&str],
    mode: SnippetMode,
) -> ResultItem {
    let matches = matcher.find(&document.text);

    let mut snippets: Vec<String> = matches
        .iter()
        .map(|span| matcher.snippet(&document.text, span, mode))
        .collect();
    if snippets.is_empty() {
        snippets.push(String::new());
    }

    let meta = meta_names
        .iter()
        .filter_map(|name| document.meta(name).map(|value| (name.to_string(), value)))
        .collect();

    ResultItem {
        title: document.title.clone(),
        href: path.to_string_lossy().into_owned(),
        snippets,
        match_count: matches.len(),
        meta,
    }
}
