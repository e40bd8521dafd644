//! One-shot HTTP retrieval of `objects.inv`.
//!
//! Uses the curl crate (libcurl) with redirects and timeouts; no retry or
//! caching. The inventory is fully materialized in memory before parsing.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// GET `objects.inv` resolved against `base_url`, returning the raw bytes.
pub(crate) fn fetch_bytes(base_url: &str) -> Result<Vec<u8>> {
    let base =
        Url::parse(base_url).with_context(|| format!("invalid base URL: {}", base_url))?;
    let inv_url = base
        .join("objects.inv")
        .context("resolve objects.inv against base URL")?;

    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(inv_url.as_str()).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .with_context(|| format!("GET {} failed", inv_url))?;
    }

    let code = easy.response_code().context("no response code")?;
    if code < 200 || code >= 300 {
        anyhow::bail!("GET {} returned HTTP {}", inv_url, code);
    }

    tracing::debug!("fetched {} ({} bytes)", inv_url, body.len());
    Ok(body)
}
