use tracing::debug;

use super::{first_text, selector, JobContext, PageScraper, ScraperState};


/// The container of one search result. The class attribute has to match exactly, double space included.
const CARD: &str = r#"div[class="VfPpkd-WsjYwc VfPpkd-WsjYwc-OWXEXe-INsAgc KC1dQ Usd1Ac AaN0Dd  kFpsj"]"#;
const CARD_LINK: &str = "div > div:nth-of-type(5) > div > a";
const CARD_TITLE: &str = "div > div > div > h3";
const CARD_LOCATION: &str = "div > div:nth-of-type(2) > div > span:nth-of-type(2) > span";


/// One search result on the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct JobCard {
    pub(crate) link: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) location: Option<String>
}


impl JobCard {
    /// The link to follow and the context to carry along. None if the card has no usable link.
    pub(crate) fn into_follow(self) -> Option<(String, JobContext)> {
        let link = self.link.filter(|link| !link.trim().is_empty())?;
        Some((link, JobContext { title: self.title, location: self.location }))
    }
}


/// A scraper for the careers search results page
#[derive(Default)]
pub(crate) struct ListingScraper;

impl PageScraper for ListingScraper {
    const NAME: &'static str = "listing";
    type Output = Vec<JobCard>;

    fn scrape(&self, state: &ScraperState) -> Vec<JobCard> {
        let scraper = state.get_scraper();
        let card = selector(CARD);
        let link = selector(CARD_LINK);
        let title = selector(CARD_TITLE);
        let location = selector(CARD_LOCATION);

        let cards: Vec<JobCard> = scraper
            .select(&card)
            .map(|element| JobCard {
                link: element
                    .select(&link)
                    .find_map(|a| a.value().attr("href"))
                    .map(str::to_string),
                title: first_text(element, &title),
                location: first_text(element, &location)
            })
            .collect();

        debug!(scraper = Self::NAME, url = %state.url, cards = cards.len(), "Scraped listing page");
        cards
    }
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const CARD_CLASS: &str = "VfPpkd-WsjYwc VfPpkd-WsjYwc-OWXEXe-INsAgc KC1dQ Usd1Ac AaN0Dd  kFpsj";

    /// One search result laid out the way the listing page nests it.
    pub(crate) fn card(link: Option<&str>, title: &str, location: &str) -> String {
        let link = link
            .map(|href| format!(r#"<a href="{href}">Learn more</a>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="{CARD_CLASS}"><div>
                <div><div><h3>{title}</h3></div></div>
                <div><div><span>place</span><span><span>{location}</span></span></div></div>
                <div></div>
                <div></div>
                <div><div>{link}</div></div>
            </div></div>"#
        )
    }

    fn scrape(body: &str) -> Vec<JobCard> {
        let html = format!("<html><body><main>{body}</main></body></html>");
        let state = ScraperState::new(html, "https://www.google.com/about/careers/applications/jobs/results/".parse().unwrap());
        ListingScraper.scrape(&state)
    }

    #[test]
    fn reads_link_title_and_location() {
        let cards = scrape(&card(Some("jobs/results/123-software-engineer"), "Software Engineer", "Zurich, Switzerland"));
        assert_eq!(cards, [JobCard {
            link: Some("jobs/results/123-software-engineer".to_string()),
            title: Some("Software Engineer".to_string()),
            location: Some("Zurich, Switzerland".to_string())
        }]);
    }

    #[test]
    fn no_cards_on_an_unrelated_page() {
        assert!(scrape("<div class=\"KC1dQ\"><h3>Not a card</h3></div>").is_empty());
    }

    #[test]
    fn class_attribute_must_match_exactly() {
        let html = card(Some("jobs/1"), "Engineer", "Zurich").replace("AaN0Dd  kFpsj", "AaN0Dd kFpsj");
        assert!(scrape(&html).is_empty());
    }

    #[test]
    fn missing_fields_do_not_stop_other_cards() {
        let body = [
            card(None, "No Link", "Zurich"),
            "<div class=\"VfPpkd-WsjYwc VfPpkd-WsjYwc-OWXEXe-INsAgc KC1dQ Usd1Ac AaN0Dd  kFpsj\"></div>".to_string(),
            card(Some("jobs/2"), "Site Reliability Engineer", "Zurich")
        ]
        .concat();
        let cards = scrape(&body);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].link, None);
        assert_eq!(cards[0].title.as_deref(), Some("No Link"));
        assert_eq!(cards[1], JobCard::default());
        assert_eq!(cards[2].link.as_deref(), Some("jobs/2"));
    }

    #[test]
    fn only_cards_with_links_are_followed() {
        let followed: Vec<_> = [
            JobCard { link: None, title: Some("a".to_string()), location: None },
            JobCard { link: Some("  ".to_string()), ..Default::default() },
            JobCard { link: Some("jobs/3".to_string()), title: Some(" Engineer ".to_string()), location: None }
        ]
        .into_iter()
        .filter_map(JobCard::into_follow)
        .collect();
        assert_eq!(followed.len(), 1);
        let (link, context) = &followed[0];
        assert_eq!(link, "jobs/3");
        assert_eq!(context.title(), "Engineer");
        assert_eq!(context.location(), "");
    }
}
