//! Minimal client for the hosted store's PostgREST interface.

use std::fmt::Display;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
}

impl PostgrestClient {
    /// Fails when the URL does not parse or the key is not a valid header value.
    pub fn new(base_url: &str, service_key: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url.trim())?;
        if base.cannot_be_a_base() {
            anyhow::bail!("hosted store URL cannot be a base: {}", base_url);
        }

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(service_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", service_key))?,
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", base.as_str().trim_end_matches('/')),
        })
    }

    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: table.to_string(),
            params: Vec::new(),
        }
    }
}

/// A request against one table, built up with filters before it is sent.
pub struct TableQuery<'a> {
    client: &'a PostgrestClient,
    table: String,
    params: Vec<(String, String)>,
}

impl<'a> TableQuery<'a> {
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("eq.{}", value)));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("gte.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.params.push(("order".into(), format!("{}.{}", column, dir)));
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.params.push(("limit".into(), n.to_string()));
        self
    }

    pub fn on_conflict(mut self, columns: &str) -> Self {
        self.params.push(("on_conflict".into(), columns.into()));
        self
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let url = format!("{}/{}", self.client.rest_url, self.table);
        self.client.http.request(method, url).query(&self.params)
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> AppResult<Vec<T>> {
        let resp = self.request(Method::GET).send().await?;
        self.rows(resp).await
    }

    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(self, body: &B) -> AppResult<Vec<T>> {
        let resp = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        self.rows(resp).await
    }

    /// Insert, merging into the existing row on an `on_conflict` key clash.
    pub async fn upsert<B: Serialize + ?Sized>(self, body: &B) -> AppResult<()> {
        let resp = self
            .request(Method::POST)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body)
            .send()
            .await?;
        self.ok(resp).await
    }

    /// Patch every row matching the filters; returns the rows touched.
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(self, body: &B) -> AppResult<Vec<T>> {
        let resp = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        self.rows(resp).await
    }

    pub async fn delete(self) -> AppResult<()> {
        let resp = self.request(Method::DELETE).send().await?;
        self.ok(resp).await
    }

    async fn rows<T: DeserializeOwned>(&self, resp: Response) -> AppResult<Vec<T>> {
        let resp = self.check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn ok(&self, resp: Response) -> AppResult<()> {
        self.check(resp).await.map(|_| ())
    }

    async fn check(&self, resp: Response) -> AppResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AppError::Hosted(format!("{} {}: {}", self.table, status, body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_url() {
        assert!(PostgrestClient::new("not a url", "key").is_err());
        assert!(PostgrestClient::new("mailto:someone@example.com", "key").is_err());
    }

    #[test]
    fn test_rejects_key_with_newline() {
        assert!(PostgrestClient::new("https://example.supabase.co", "bad\nkey").is_err());
    }

    #[test]
    fn test_rest_url_strips_trailing_slash() {
        let client = PostgrestClient::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(client.rest_url, "https://example.supabase.co/rest/v1");
    }
}
