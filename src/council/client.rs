//! HTTP client driving the council's three-step bin collection form.
//!
//! The flow is strictly sequential: every submission needs the nonce issued by
//! the previous response, and the server ties one nonce/session pair to one
//! in-flight flow. A [`SessionTokens`] value must therefore never be shared
//! between concurrent lookups.

use std::time::{Duration, Instant};

use html_scraper::Html;
use reqwest::StatusCode;
use tracing::{debug, trace};

use crate::council::errors::BinDayError;
use crate::council::form::FormConfig;
use crate::council::parse::{self, AddressEntry, CollectionScheduleRow};
use crate::council::session::SessionTokens;
use crate::utils::log_if_slow;

/// HTTP behaviour shared by every session the client opens.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub slow_threshold: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            slow_threshold: Duration::from_secs(5),
            user_agent: format!("bindays/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for the council's form server.
///
/// Holds only immutable configuration; all per-flow state lives in the
/// [`SessionTokens`] returned by [`bootstrap`](Self::bootstrap).
#[derive(Debug, Clone)]
pub struct FormPageClient {
    form: FormConfig,
    settings: HttpSettings,
}

impl FormPageClient {
    pub fn new(form: FormConfig, settings: HttpSettings) -> Self {
        Self { form, settings }
    }

    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    /// Build an HTTP client with a fresh, private cookie jar.
    fn new_http(&self) -> Result<reqwest::Client, BinDayError> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.settings.timeout)
            .user_agent(&self.settings.user_agent)
            .build()
            .map_err(|e| BinDayError::Transport {
                message: "failed to build HTTP client".to_string(),
                source: Some(e),
            })
    }

    /// Read a response body, rejecting anything other than 200.
    async fn read_page(
        response: reqwest::Response,
        failure: impl FnOnce(StatusCode) -> String,
    ) -> Result<Html, BinDayError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(BinDayError::transport(failure(status)));
        }
        let body = response.text().await?;
        trace!(bytes = body.len(), "read form page");
        Ok(Html::parse_document(&body))
    }

    async fn submit(
        &self,
        tokens: &SessionTokens,
        fields: &[(String, String)],
    ) -> Result<reqwest::Response, BinDayError> {
        let url = self.form.submission_url(tokens);
        Ok(tokens.http().post(url).form(fields).send().await?)
    }

    /// Open a new session by loading the landing page.
    pub async fn bootstrap(&self) -> Result<SessionTokens, BinDayError> {
        let start = Instant::now();
        let http = self.new_http()?;

        let response = http.get(self.form.landing_url.clone()).send().await?;
        let html = Self::read_page(response, |status| {
            format!("session bootstrap failed ({status})")
        })
        .await?;

        let page = parse::page_tokens(&html, &self.form)?;
        let tokens = SessionTokens::new(http, page.session_id, page.page_session_id, page.nonce)?;

        log_if_slow(start, self.settings.slow_threshold, "session bootstrap");
        debug!(tokens = ?tokens, "session bootstrapped");
        Ok(tokens)
    }

    /// Search the postcode and return every address the form offers for it.
    pub async fn submit_postcode(
        &self,
        tokens: SessionTokens,
        postcode: &str,
    ) -> Result<(SessionTokens, Vec<AddressEntry>), BinDayError> {
        let start = Instant::now();
        let fields = self.form.postcode_search(&tokens, postcode);

        let response = self.submit(&tokens, &fields).await?;
        let html = Self::read_page(response, |status| {
            format!("failed to find addresses for postcode {postcode} ({status})")
        })
        .await?;

        let addresses = parse::addresses(&html, &self.form)?;
        let tokens = tokens.with_nonce(parse::nonce(&html, &self.form)?)?;

        log_if_slow(start, self.settings.slow_threshold, "postcode search");
        debug!(postcode, count = addresses.len(), "addresses found");
        Ok((tokens, addresses))
    }

    /// Pick an address by key and return its collection schedule rows.
    pub async fn submit_address(
        &self,
        tokens: SessionTokens,
        postcode: &str,
        address_key: &str,
    ) -> Result<(SessionTokens, Vec<CollectionScheduleRow>), BinDayError> {
        let start = Instant::now();
        let fields = self.form.address_pick(&tokens, postcode, address_key);

        let response = self.submit(&tokens, &fields).await?;
        let html = Self::read_page(response, |status| {
            format!("failed to request dates for {address_key} ({status})")
        })
        .await?;

        let tokens = tokens.with_nonce(parse::nonce(&html, &self.form)?)?;
        let rows = parse::schedule(&html, &self.form)?;

        log_if_slow(start, self.settings.slow_threshold, "address pick");
        debug!(postcode, rows = rows.len(), "collection schedule read");
        Ok((tokens, rows))
    }
}
