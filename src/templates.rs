use askama::Template;

use crate::search::SearchHit;

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub live: bool,
    pub term: &'a str,
    pub query: &'a str,
    pub filter: &'a str,
    pub results_count: usize,
    pub total_matches: usize,
    pub hits: &'a [SearchHit],
}
