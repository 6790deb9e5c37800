//! Thin wrapper over a pooled reqwest client: URL building, query-parameter
//! filtering, bearer auth, JSON decode, and error normalization per the
//! portal's `{error, message}` convention.

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
    auth_token: Option<String>,
    max_retries: u32,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth_token: Option<String>,
        max_retries: u32,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            http,
            timeout,
            auth_token,
            max_retries,
        })
    }

    pub fn from_config(cfg: &Config) -> ApiResult<Self> {
        Self::new(
            cfg.api_url.clone(),
            Duration::from_millis(cfg.http_timeout_ms),
            cfg.auth_token.clone(),
            cfg.http_retries,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    /// GET a JSON resource. Params with `None` or empty-string values are
    /// omitted from the query string. Retries 429 responses a bounded number
    /// of times with jittered backoff; GETs are idempotent so this is safe.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> ApiResult<T> {
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| {
                v.as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|v| (*k, v))
            })
            .collect();

        let mut attempt = 0u32;
        loop {
            let mut req = self.http.get(self.url(path)).timeout(self.timeout);
            if !pairs.is_empty() {
                req = req.query(&pairs);
            }
            let res = self.auth(req).send().await?;
            let status = res.status();
            if status.is_success() {
                return Ok(res.json::<T>().await?);
            }
            if status.as_u16() == 429 && attempt < self.max_retries {
                attempt += 1;
                let back_ms = backoff_delay_ms(attempt);
                log::warn!("[portalx][http] 429 GET {path} retry={attempt} backoff={back_ms}ms");
                tokio::time::sleep(Duration::from_millis(back_ms)).await;
                continue;
            }
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
    }

    /// POST a JSON body, expect a JSON response. Never retried: submits are
    /// not idempotent (a duplicated deploy would queue two jobs).
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let req = self
            .http
            .post(self.url(path))
            .json(body)
            .timeout(self.timeout);
        let res = self.auth(req).send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

// 300, 600, 1200, ... capped, plus up to 250ms of jitter.
fn backoff_delay_ms(attempt: u32) -> u64 {
    let base = 300u64.saturating_mul(1u64 << (attempt.min(5) - 1));
    let jitter: u64 = rand::thread_rng().gen_range(0..=250);
    base + jitter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        for attempt in 1..=8 {
            let d = backoff_delay_ms(attempt);
            assert!(d >= 300, "attempt {attempt} below base: {d}");
            assert!(d <= 300 * 16 + 250, "attempt {attempt} above cap: {d}");
        }
    }
}
