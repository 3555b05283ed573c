use std::{io::Write, sync::Arc};

use anyhow::Context;
use reqwest::Client;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, error, info};
use url::Url;

use crate::{
    config::Config,
    error::CrawlError,
    geo::{self, Geocoder},
    output::JsonLinesSink,
    page_scrapers::{DetailScraper, JobCard, JobContext, ListingScraper, PageScraper, Regexes, ScraperState},
    record::JobRecord,
    skills::PosTagger
};


/// A detail page to fetch, along with what the listing card said about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobRequest {
    pub(crate) url: Url,
    pub(crate) context: JobContext
}


#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CrawlSummary {
    /// Detail pages requested from the listing.
    pub(crate) scheduled: usize,
    pub(crate) emitted: usize,
    pub(crate) failed: usize
}


/// Drives one crawl: the listing page, then every job page it links to.
pub(crate) struct Crawler {
    client: Client,
    start_url: Url,
    base_url: Url,
    concurrent_requests: usize,
    detail_scraper: DetailScraper,
    geocoder: Arc<dyn Geocoder>
}


impl Crawler {
    pub(crate) fn new(config: &Config, tagger: Arc<dyn PosTagger>, geocoder: Arc<dyn Geocoder>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            start_url: config.start_url()?,
            base_url: config.base_url()?,
            concurrent_requests: config.concurrent_requests as usize,
            detail_scraper: DetailScraper::new(Arc::new(Regexes::default()), tagger, config.max_skills as usize),
            geocoder
        })
    }

    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        let fetch_error = |source| CrawlError::Fetch { url: url.to_string(), source };

        let response = self.client
            .get(url.clone())
            .send()
            .await
            .map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status { url: url.to_string(), status });
        }
        let body = response.bytes().await.map_err(fetch_error)?;
        String::from_utf8(body.to_vec()).map_err(|source| CrawlError::Decode { url: url.to_string(), source })
    }

    /// Fetches the listing page and returns a request for every card worth following.
    pub(crate) async fn crawl_listing(&self) -> Result<Vec<JobRequest>, CrawlError> {
        info!(url = %self.start_url, "Fetching listing page");
        let html = self.fetch(&self.start_url).await?;
        let state = ScraperState::new(html, self.start_url.clone());
        let cards = tokio_rayon::spawn(move || ListingScraper.scrape(&state)).await;
        Ok(self.follow(cards, &self.start_url))
    }

    /// Resolves each card's link against the page it was found on. Cards without a link are skipped.
    fn follow(&self, cards: Vec<JobCard>, page_url: &Url) -> Vec<JobRequest> {
        cards
            .into_iter()
            .filter_map(JobCard::into_follow)
            .filter_map(|(link, context)| {
                let url = page_url
                    .join(&link)
                    .or_else(|_| self.base_url.join(&link))
                    .map_err(|source| CrawlError::InvalidLink { link, base: page_url.to_string(), source });
                match url {
                    Ok(url) => {
                        debug!(%url, title = context.title(), "Scheduling job page");
                        Some(JobRequest { url, context })
                    }
                    Err(e) => {
                        error!(error = ?e, "Skipping job card");
                        None
                    }
                }
            })
            .collect()
    }

    pub(crate) async fn crawl_detail(&self, request: JobRequest) -> Result<JobRecord, CrawlError> {
        let html = self.fetch(&request.url).await?;
        self.process_detail(request, html).await
    }

    /// Turns a fetched job page into a record.
    ///
    /// The location is geocoded from what the listing card said, not from the job page.
    pub(crate) async fn process_detail(&self, request: JobRequest, html: String) -> Result<JobRecord, CrawlError> {
        let JobRequest { url, context } = request;

        let scraper = self.detail_scraper.clone();
        let state = ScraperState::new(html, url.clone());
        let page = tokio_rayon::spawn(move || scraper.scrape(&state)).await?;
        debug!(%url, description_bytes = page.raw_content.len(), skills = page.skills.len(), "Parsed job page");

        let location = geo::resolve_location(self.geocoder.as_ref(), context.location()).await;

        Ok(JobRecord {
            title: context.title().to_string(),
            location: location.into(),
            clean_content: page.clean_content,
            skills: page.skills,
            contact_email: page.contact_email,
            contact_phone: page.contact_phone,
            url: url.to_string()
        })
    }

    /// Crawls everything and writes a record per job page. Failures are logged and skipped.
    pub(crate) async fn run<W: Write>(self: Arc<Self>, sink: &mut JsonLinesSink<W>) -> CrawlSummary {
        let mut summary = CrawlSummary::default();

        let requests = match self.crawl_listing().await {
            Ok(requests) => requests,
            Err(e) => {
                error!(error = ?e, "Listing page failed");
                return summary;
            }
        };
        summary.scheduled = requests.len();
        info!(jobs = summary.scheduled, "Following job links");

        let permits = Arc::new(Semaphore::new(self.concurrent_requests));
        let mut tasks = JoinSet::new();
        for request in requests {
            let crawler = Arc::clone(&self);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let url = request.url.clone();
                (url, crawler.crawl_detail(request).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(record))) => match sink.write(&record) {
                    Ok(()) => {
                        debug!(%url, "Emitted record");
                        summary.emitted += 1;
                    }
                    Err(e) => {
                        error!(%url, error = ?e, "Failed to emit record");
                        summary.failed += 1;
                    }
                },
                Ok((url, Err(e))) => {
                    error!(%url, error = ?e, "Job page failed");
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(error = %e, "Job page task did not finish");
                    summary.failed += 1;
                }
            }
        }

        if let Err(e) = sink.flush() {
            error!(error = ?e, "Failed to flush records");
        }
        summary
    }
}
