use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use url::Url;

pub(crate) use self::{detail::DetailScraper, listing::{JobCard, ListingScraper}, text::Regexes};

mod detail;
pub(crate) mod listing;
mod text;


/// A fetched page, ready to be handed to a [`PageScraper`].
pub(crate) struct ScraperState {
    pub(crate) html: String,
    pub(crate) url: Arc<Url>
}


impl ScraperState {
    pub(crate) fn new(html: String, url: Url) -> Self {
        Self { html, url: Arc::new(url) }
    }

    pub(super) fn get_scraper(&self) -> Html {
        Html::parse_document(&self.html)
    }
}


/// Title and location read from a listing card, carried along with the request for the card's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct JobContext {
    pub(crate) title: Option<String>,
    pub(crate) location: Option<String>
}


impl JobContext {
    /// The title with surrounding whitespace removed, or an empty string when the card had none.
    pub(crate) fn title(&self) -> &str {
        self.title.as_deref().map_or("", str::trim)
    }

    /// The location with surrounding whitespace removed, or an empty string when the card had none.
    pub(crate) fn location(&self) -> &str {
        self.location.as_deref().map_or("", str::trim)
    }
}


pub(crate) trait PageScraper {
    const NAME: &'static str;
    type Output;

    /// Scrapes the given html, which was retrieved from the URL in the state.
    ///
    /// Parts of the page that are missing never fail a scrape; they produce empty values instead.
    fn scrape(&self, state: &ScraperState) -> Self::Output;
}


/// Compiles one of the fixed selectors this crate scrapes with.
pub(super) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Built in selector should have been valid")
}


/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];


/// The rendered text under `scope`, leaving out scripts, stylesheets and templates.
pub(super) fn visible_text(scope: ElementRef) -> String {
    scope
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor.value().as_element().is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
            })
        })
        .map(|(_, text)| &**text)
        .collect()
}


/// The first text node directly inside any element matching `selector`.
pub(super) fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .flat_map(|element| element.children())
        .find_map(|node| node.value().as_text().map(|text| text.to_string()))
}
