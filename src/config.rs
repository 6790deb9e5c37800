use anyhow::{anyhow, Result};
use clap::Args;

/// Connection and cadence settings shared by every command.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Args, Debug, Clone)]
pub struct CliArgs {
    /// Developer-portal backend base URL
    #[arg(long, env = "PORTAL_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the portal API (optional)
    #[arg(long, env = "PORTAL_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// HTTP request timeout in milliseconds (1000-120000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Retry attempts for rate-limited GET requests (0-10)
    #[arg(long, env = "HTTP_RETRIES")]
    pub http_retries: Option<u32>,

    /// Network-status polling interval in milliseconds (500-60000)
    #[arg(long, env = "POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Deploy-job polling interval in milliseconds (250-30000)
    #[arg(long, env = "JOB_POLL_INTERVAL_MS")]
    pub job_poll_interval_ms: Option<u64>,

    /// Search debounce window in milliseconds (50-5000)
    #[arg(long, env = "DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Default page size for listings (1-100)
    #[arg(long, env = "PAGE_LIMIT")]
    pub page_limit: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub http_timeout_ms: u64,
    pub http_retries: u32,
    pub poll_interval_ms: u64,
    pub job_poll_interval_ms: u64,
    pub debounce_ms: u64,
    pub page_limit: u32,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Resolve parsed args into a validated configuration.
pub fn load(args: &CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    validate_url(&api_url, "PORTAL_API_URL")?;

    let http_timeout_ms = args.http_timeout_ms.unwrap_or(30_000);
    let http_timeout_ms = validate_in_range(http_timeout_ms, 1000, 120_000, "HTTP_TIMEOUT_MS")?;

    let http_retries = args.http_retries.unwrap_or(2);
    let http_retries = validate_in_range(http_retries, 0, 10, "HTTP_RETRIES")?;

    let poll_interval_ms = args.poll_interval_ms.unwrap_or(5000);
    let poll_interval_ms = validate_in_range(poll_interval_ms, 500, 60_000, "POLL_INTERVAL_MS")?;

    let job_poll_interval_ms = args.job_poll_interval_ms.unwrap_or(2000);
    let job_poll_interval_ms =
        validate_in_range(job_poll_interval_ms, 250, 30_000, "JOB_POLL_INTERVAL_MS")?;

    let debounce_ms = args.debounce_ms.unwrap_or(300);
    let debounce_ms = validate_in_range(debounce_ms, 50, 5000, "DEBOUNCE_MS")?;

    let page_limit = args.page_limit.unwrap_or(20);
    let page_limit = validate_in_range(page_limit, 1, 100, "PAGE_LIMIT")?;

    Ok(Config {
        api_url,
        auth_token: args.auth_token.clone(),
        http_timeout_ms,
        http_retries,
        poll_interval_ms,
        job_poll_interval_ms,
        debounce_ms,
        page_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            api_url: None,
            auth_token: None,
            http_timeout_ms: None,
            http_retries: None,
            poll_interval_ms: None,
            job_poll_interval_ms: None,
            debounce_ms: None,
            page_limit: None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = load(&empty_args()).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:3000");
        assert_eq!(cfg.http_timeout_ms, 30_000);
        assert_eq!(cfg.debounce_ms, 300);
        assert_eq!(cfg.page_limit, 20);
    }

    #[test]
    fn rejects_out_of_range_interval() {
        let mut args = empty_args();
        args.poll_interval_ms = Some(100);
        assert!(load(&args).is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        let mut args = empty_args();
        args.api_url = Some("ftp://portal".into());
        let err = load(&args).unwrap_err().to_string();
        assert!(err.contains("PORTAL_API_URL"));
    }
}
