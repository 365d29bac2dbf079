//! Redirect chain following.

use url::Url;

use crate::error_handling::HttpError;
use crate::http::{CheckHeaders, CookieJar, ResponseRecord, SocketClient};

/// Result of following a redirect chain to its end.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// Response of the last hop
    pub response: ResponseRecord,
    /// Every URL requested, in order
    pub chain: Vec<Url>,
    /// Cookies accumulated along the chain
    pub cookies: CookieJar,
}

impl ChainOutcome {
    pub fn final_url(&self) -> Option<&Url> {
        self.chain.last()
    }
}

/// Follows the redirect chain starting at `start_url`.
///
/// Issues at most `max_hops` GET requests, one socket at a time, carrying
/// cookies forward. Only cookies applicable to each hop are sent.
///
/// # Arguments
///
/// * `client` - Socket client used for every hop
/// * `start_url` - The check URL
/// * `headers` - Optional check headers sent on every hop
/// * `max_hops` - Maximum number of requests
///
/// # Errors
///
/// Returns the first hop's `HttpError`, or `HttpError::TooManyRedirects` when
/// the last allowed hop still redirects.
pub fn follow_redirects(
    client: &SocketClient,
    start_url: &Url,
    headers: &CheckHeaders,
    max_hops: usize,
) -> Result<ChainOutcome, HttpError> {
    let mut chain: Vec<Url> = Vec::new();
    let mut cookies = CookieJar::new();
    let mut current = start_url.clone();

    for _ in 0..max_hops {
        chain.push(current.clone());
        let response = client.get(&current, &mut cookies, headers)?;

        match &response.redirect {
            Some(next) => {
                log::debug!("Redirect {} -> {}", current, next);
                current = next.clone();
            }
            None => {
                return Ok(ChainOutcome {
                    response,
                    chain,
                    cookies,
                });
            }
        }
    }

    log::warn!(
        "Redirect chain from {} exceeded {} hops",
        start_url,
        max_hops
    );
    Err(HttpError::TooManyRedirects(max_hops))
}
