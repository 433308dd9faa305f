use log::debug;
use scryfall::List;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

// headers required according to https://scryfall.com/docs/api/
const USER_AGENT: &str = "mtgproxies/0.4";
const ACCEPT: &str = "*/*";
const SCRYFALL_COOLDOWN: Duration = Duration::from_millis(100);
const SCRYFALL_API_HOST: &str = "api.scryfall.com";

pub struct ScryfallClient {
    client: reqwest::blocking::Client,
    // only held to find out when we can call
    last_api_call: Mutex<Option<Instant>>,
}

impl ScryfallClient {
    pub fn new() -> Result<ScryfallClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        Ok(ScryfallClient {
            client: reqwest::blocking::Client::builder()
                .default_headers(headers)
                .build()?,
            last_api_call: Mutex::new(None),
        })
    }

    // the image CDN is not rate limited
    fn wait_for_cooldown(&self, url: &str) {
        let is_api = reqwest::Url::parse(url)
            .ok()
            .is_some_and(|u| u.host_str() == Some(SCRYFALL_API_HOST));
        if !is_api {
            return;
        }
        let mut last = match self.last_api_call.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = *last {
            let next_call = previous + SCRYFALL_COOLDOWN;
            let now = Instant::now();
            if next_call > now {
                std::thread::sleep(next_call - now);
            }
        }
        *last = Some(Instant::now());
    }

    /// GET with rate limiting, a non-success status is an error.
    pub fn call(&self, url: &str) -> Result<reqwest::blocking::Response> {
        self.wait_for_cooldown(url);
        debug!("calling {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.call(url)?.json()?)
    }

    /// Follows `next_page` until the list is exhausted.
    pub fn depaginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut data = Vec::new();
        let mut next = Some(url.to_string());
        while let Some(url) = next {
            let page: List<T> = self.get_json(&url)?;
            data.extend(page.data);
            next = if page.has_more { page.next_page } else { None };
        }
        Ok(data)
    }
}
