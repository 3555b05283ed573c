use std::sync::Arc;

use scraper::Html;
use tracing::debug;

use crate::{error::CrawlError, skills::{self, PosTagger}};

use super::{selector, visible_text, PageScraper, Regexes, ScraperState};


const DESCRIPTION: &str = "main.SxL7od";


/// Everything read off a job detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DetailPage {
    /// Visible text of the description with whitespace collapsed.
    pub(crate) clean_content: String,
    /// Markup of the description with whitespace collapsed. Not part of the emitted record.
    pub(crate) raw_content: String,
    pub(crate) skills: Vec<String>,
    pub(crate) contact_email: Option<String>,
    pub(crate) contact_phone: Option<String>
}


/// A scraper for a single job posting page
#[derive(Clone)]
pub(crate) struct DetailScraper {
    regexes: Arc<Regexes>,
    tagger: Arc<dyn PosTagger>,
    max_skills: usize
}


impl DetailScraper {
    pub(crate) fn new(regexes: Arc<Regexes>, tagger: Arc<dyn PosTagger>, max_skills: usize) -> Self {
        Self { regexes, tagger, max_skills }
    }
}


impl PageScraper for DetailScraper {
    const NAME: &'static str = "detail";
    type Output = Result<DetailPage, CrawlError>;

    fn scrape(&self, state: &ScraperState) -> Self::Output {
        // Adjacent tags would otherwise glue their words together in the extracted text.
        let scraper = Html::parse_document(&state.html.replace('<', " <"));

        let (clean_content, raw_content) = match scraper.select(&selector(DESCRIPTION)).next() {
            Some(description) => (
                self.regexes.collapse_whitespace(&visible_text(description)),
                self.regexes.collapse_whitespace(&description.inner_html())
            ),
            None => {
                debug!(scraper = Self::NAME, url = %state.url, "No description container");
                (String::new(), String::new())
            }
        };

        let skills = skills::extract_skills(self.tagger.as_ref(), &clean_content, self.max_skills)
            .map_err(CrawlError::Skills)?;

        Ok(DetailPage {
            contact_email: self.regexes.first_email(&clean_content),
            contact_phone: self.regexes.last_phone(&clean_content),
            clean_content,
            raw_content,
            skills
        })
    }
}
