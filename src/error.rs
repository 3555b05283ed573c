use std::string::FromUtf8Error;

use thiserror::Error;


/// Failure of one unit of crawl work: the listing page or a single detail page.
///
/// The crawl driver logs these and carries on with the remaining work.
#[derive(Debug, Error)]
pub(crate) enum CrawlError {
    #[error("request to {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error
    },
    #[error("{url} answered with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode
    },
    #[error("{url} is not valid UTF-8")]
    Decode {
        url: String,
        #[source]
        source: FromUtf8Error
    },
    #[error("job link {link:?} cannot be resolved against {base}")]
    InvalidLink {
        link: String,
        base: String,
        #[source]
        source: url::ParseError
    },
    #[error("skill extraction failed: {0:#}")]
    Skills(anyhow::Error),
    #[error("failed to write record")]
    Write(#[from] std::io::Error),
    #[error("failed to encode record")]
    Encode(#[from] serde_json::Error)
}
