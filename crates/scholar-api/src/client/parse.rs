//! Google Scholar results-page parsing.
//!
//! Pure functions over HTML so they can be tested and benchmarked without a network.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::models::{Authors, Bib, PubYear, RawPublication};

/// Publications parsed from one results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsPage {
    /// Publications in page order.
    pub publications: Vec<RawPublication>,

    /// Whether the page links to a following page.
    pub has_next: bool,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

static RESULTS_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("#gs_res_ccl, #gs_res_ccl_mid"));
static CAPTCHA: LazyLock<Selector> =
    LazyLock::new(|| selector("#gs_captcha_ccl, #gs_captcha_f, #captcha-form"));
static RESULT: LazyLock<Selector> = LazyLock::new(|| selector("div.gs_ri"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h3.gs_rt"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static BYLINE: LazyLock<Selector> = LazyLock::new(|| selector("div.gs_a"));
static FOOTER_LINK: LazyLock<Selector> = LazyLock::new(|| selector("div.gs_fl a"));
static NEXT_BUTTON: LazyLock<Selector> = LazyLock::new(|| selector("button.gs_btnPR"));
static NEXT_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a .gs_ico_nav_next"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").expect("valid year regex"));
static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(1[89]\d{2}|20\d{2})$").expect("valid year regex"));
static CITED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Cited by\s+(\d+)").expect("valid citation regex"));
// [PDF], [HTML], [CITATION][C], [BOOK][B] ...
static TITLE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*\[[^\]]*\])+\s*").expect("valid marker regex"));

/// Parse a Google Scholar results page.
///
/// `base` resolves relative publication links.
///
/// # Errors
///
/// Returns [`ClientError::Blocked`] for CAPTCHA pages and [`ClientError::Parse`]
/// when the page has no results container at all.
pub fn parse_results_page(html: &str, base: &Url) -> ClientResult<ResultsPage> {
    let document = Html::parse_document(html);

    if document.select(&CAPTCHA).next().is_some() {
        return Err(ClientError::blocked("CAPTCHA challenge in results page"));
    }

    let publications: Vec<RawPublication> =
        document.select(&RESULT).map(|result| parse_result(result, base)).collect();

    if publications.is_empty() && document.select(&RESULTS_CONTAINER).next().is_none() {
        return Err(ClientError::parse("results container not found"));
    }

    Ok(ResultsPage { publications, has_next: has_next_page(&document) })
}

fn parse_result(result: ElementRef<'_>, base: &Url) -> RawPublication {
    let heading = result.select(&TITLE).next();
    let link = heading.and_then(|h| h.select(&TITLE_LINK).next());

    let title = match (link, heading) {
        (Some(a), _) => Some(collapse_whitespace(&element_text(a))),
        (None, Some(h)) => {
            let text = element_text(h);
            Some(collapse_whitespace(&TITLE_MARKERS.replace(&text, "")))
        }
        (None, None) => None,
    }
    .filter(|t| !t.is_empty());

    let pub_url = link.and_then(|a| a.value().attr("href")).map(|href| resolve(base, href));

    let (author, pub_year) = result
        .select(&BYLINE)
        .next()
        .map(|byline| parse_byline(&element_text(byline)))
        .unwrap_or_default();

    let num_citations = result.select(&FOOTER_LINK).find_map(|a| {
        CITED_BY.captures(&element_text(a)).and_then(|caps| caps[1].parse::<u64>().ok())
    });

    RawPublication { bib: Bib { title, author, pub_year }, pub_url, num_citations }
}

/// Split the `gs_a` byline (`"A Author, B Author - Venue, 2019 - host"`) into
/// authors and year.
///
/// The year is the last one in the venue segment. A comma segment of the
/// author part that is only a year is taken as the year, not as an author.
fn parse_byline(text: &str) -> (Option<Authors>, Option<PubYear>) {
    let text = text.replace('\u{a0}', " ");
    let trimmed = text.trim_start();
    let (authors_part, rest) = trimmed.strip_prefix('-').map_or_else(
        || trimmed.split_once(" - ").unwrap_or((trimmed, "")),
        |rest| ("", rest),
    );

    let (bare_years, names): (Vec<&str>, Vec<&str>) = authors_part
        .split(',')
        .map(|name| name.trim().trim_end_matches('…').trim())
        .filter(|name| !name.is_empty())
        .partition(|name| BARE_YEAR.is_match(name));
    let author = (!names.is_empty())
        .then_some(Authors::List(names.into_iter().map(str::to_string).collect()));

    let venue = rest.split(" - ").next().unwrap_or_default();
    let pub_year = YEAR
        .find_iter(venue)
        .last()
        .map(|m| m.as_str())
        .or_else(|| bare_years.last().copied())
        .map(PubYear::from);

    (author, pub_year)
}

fn has_next_page(document: &Html) -> bool {
    let button = document
        .select(&NEXT_BUTTON)
        .any(|b| b.value().attr("disabled").is_none() && b.value().attr("onclick").is_some());
    button || document.select(&NEXT_LINK).next().is_some()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href).map_or_else(|_| href.to_string(), String::from)
}
