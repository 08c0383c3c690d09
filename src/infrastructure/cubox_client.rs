//! HTTP adapter for the Cubox web API.
//!
//! Wraps the three endpoints used by the exporter. Every request starts
//! from a copy of the base header set and only overrides `Referer`, so the
//! client itself is never mutated after construction.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONNECTION, COOKIE,
    DNT, REFERER, USER_AGENT,
};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::{AppError, ExportConfig, ExportFormat, Result};

const INBOX_PATH: &str = "/c/api/v2/search_engine/inbox";
const EXPORT_PATH: &str = "/c/api/search_engines/export";
const DELETE_PATH: &str = "/c/api/search_engine/delete";

/// Browser fingerprint the web app is used with.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.0.0";
const BROWSER_SEC_CH_UA: &str =
    r#""Microsoft Edge";v="125", "Chromium";v="125", "Not.A/Brand";v="24""#;

/// One page of the inbox listing as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxPage {
    /// Application-level status, `200` on success.
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    /// Total number of pages. Only guaranteed on success.
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub data: Option<Vec<InboxEntry>>,
}

/// A single inbox entry.
#[derive(Debug, Deserialize)]
pub struct InboxEntry {
    #[serde(rename = "userSearchEngineID")]
    pub user_search_engine_id: String,
    #[serde(default)]
    pub title: String,
}

/// Client for the Cubox inbox endpoints.
#[derive(Debug)]
pub struct CuboxClient {
    http: Client,
    base_url: String,
    card_url: Url,
    base_headers: HeaderMap,
}

impl CuboxClient {
    /// Build a client for the given configuration.
    ///
    /// # Errors
    /// Returns a configuration error if the base URL is invalid or the token
    /// cannot be carried in an HTTP header.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        let card_url = Url::parse(&format!("{base_url}/my/card")).map_err(|e| AppError::Config {
            message: format!("Invalid Cubox base URL '{base_url}': {e}"),
        })?;

        let base_headers = base_headers(&config.api_token, &base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AppError::http)?;

        Ok(Self {
            http,
            base_url,
            card_url,
            base_headers,
        })
    }

    /// Fetch one page of the inbox.
    ///
    /// # Errors
    /// Returns an HTTP error on transport failure or a JSON error when the
    /// body is not a valid inbox page.
    pub async fn inbox_page(&self, page: u32) -> Result<InboxPage> {
        let url = format!("{}{INBOX_PATH}", self.base_url);
        let referer = format!("{}/my/inbox", self.base_url);

        let body = self
            .http
            .get(&url)
            .query(&[("page", page)])
            .headers(self.headers_with_referer(&referer))
            .send()
            .await
            .map_err(AppError::http)?
            .text()
            .await
            .map_err(AppError::http)?;

        serde_json::from_str(&body).map_err(AppError::json_parse)
    }

    /// Request the export of one article and return the raw file content.
    ///
    /// # Errors
    /// Returns the underlying reqwest error on transport failure or a
    /// non-success HTTP status.
    pub async fn export(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> std::result::Result<Vec<u8>, reqwest::Error> {
        let url = format!("{}{EXPORT_PATH}", self.base_url);
        let referer = self.card_referer(id, true);

        let response = self
            .http
            .post(&url)
            .headers(self.headers_with_referer(&referer))
            .form(&[
                ("engineIds", id),
                ("type", format.as_str()),
                ("snap", "false"),
                ("compressed", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Delete one article from the inbox and return the raw response body.
    ///
    /// # Errors
    /// Returns the underlying reqwest error on transport failure.
    pub async fn delete(&self, id: &str) -> std::result::Result<String, reqwest::Error> {
        let url = format!("{}{DELETE_PATH}/{id}", self.base_url);
        let referer = self.card_referer(id, false);

        self.http
            .post(&url)
            .headers(self.headers_with_referer(&referer))
            .send()
            .await?
            .text()
            .await
    }

    /// `<base>/my/card?id=<id>[&query=true]`, with the id percent-encoded.
    fn card_referer(&self, id: &str, query: bool) -> String {
        let mut url = self.card_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("id", id);
            if query {
                pairs.append_pair("query", "true");
            }
        }
        url.into()
    }

    /// Copy of the base headers with a request-specific `Referer`.
    fn headers_with_referer(&self, referer: &str) -> HeaderMap {
        let mut headers = self.base_headers.clone();
        match HeaderValue::from_str(referer) {
            Ok(value) => {
                headers.insert(REFERER, value);
            }
            Err(e) => tracing::warn!(referer, error = %e, "Keeping default Referer"),
        }
        headers
    }
}

/// Headers shared by every request.
fn base_headers(token: &str, base_url: &str) -> Result<HeaderMap> {
    let invalid_token = |_| AppError::Config {
        message: "API token contains characters not allowed in HTTP headers".into(),
    };

    let mut authorization = HeaderValue::from_str(token).map_err(invalid_token)?;
    authorization.set_sensitive(true);
    let mut cookie = HeaderValue::from_str(&format!("token={token}")).map_err(invalid_token)?;
    cookie.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(COOKIE, cookie);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    for (name, value) in [
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
        ("sec-ch-ua", BROWSER_SEC_CH_UA),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
    ] {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if let Ok(referer) = HeaderValue::from_str(&format!("{base_url}/my/inbox")) {
        headers.insert(REFERER, referer);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CuboxClient {
        CuboxClient::new(&ExportConfig::new("tok123", "out")).unwrap()
    }

    #[test]
    fn test_base_headers_carry_token() {
        let client = client();
        assert_eq!(client.base_headers[AUTHORIZATION], "tok123");
        assert_eq!(client.base_headers[COOKIE], "token=tok123");
        assert_eq!(client.base_headers[REFERER], "https://cubox.pro/my/inbox");
        assert!(client.base_headers.contains_key("sec-ch-ua"));
    }

    #[test]
    fn test_referer_override_leaves_base_untouched() {
        let client = client();
        let headers = client.headers_with_referer("https://cubox.pro/my/card?id=a1");

        assert_eq!(headers[REFERER], "https://cubox.pro/my/card?id=a1");
        assert_eq!(client.base_headers[REFERER], "https://cubox.pro/my/inbox");
    }

    #[test]
    fn test_card_referer() {
        let client = client();
        assert_eq!(
            client.card_referer("a1", true),
            "https://cubox.pro/my/card?id=a1&query=true"
        );
        assert_eq!(client.card_referer("a 1", false), "https://cubox.pro/my/card?id=a+1");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let err = CuboxClient::new(&ExportConfig::new("bad\ntoken", "out")).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ExportConfig::new("tok", "out").with_base_url("not a url");
        let err = CuboxClient::new(&config).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_parse_error_page_without_page_count() {
        let page: InboxPage =
            serde_json::from_str(r#"{"code": 500, "message": "boom", "data": null}"#).unwrap();
        assert_eq!(page.code, 500);
        assert_eq!(page.message.as_deref(), Some("boom"));
        assert!(page.page_count.is_none());
        assert!(page.data.is_none());
    }

    #[test]
    fn test_parse_success_page() {
        let page: InboxPage = serde_json::from_str(
            r#"{"code":200,"pageCount":3,"data":[{"userSearchEngineID":"a1","title":"Foo"}]}"#,
        )
        .unwrap();
        assert_eq!(page.page_count, Some(3));
        let data = page.data.unwrap();
        assert_eq!(data[0].user_search_engine_id, "a1");
        assert_eq!(data[0].title, "Foo");
    }
}
