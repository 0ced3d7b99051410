use std::time::Duration;

use anyhow::{Context, Result, ensure};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Truncates a string to a maximum length in bytes, adding `...` to the end if it was truncated.
///
/// Backs off further when the cut would land inside a UTF-8 codepoint
pub fn truncate_string(string: &impl ToString, max_length: usize) -> String {
    let string = string.to_string();
    if string.len() <= max_length {
        return string;
    }

    let mut end = max_length.saturating_sub(3);
    while !string.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &string[..end])
}

/// # Errors
/// Errors when the TLS backend cannot be initialized
pub fn init_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!(
            "{}/{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        ))
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .context("Building HTTP client")
}

/// Downloads a document as text
///
/// # Errors
/// Errors on network error, non-success status, a body that isn't UTF-8 or an empty body
#[instrument(skip(client))]
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let res = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Fetching {url}"))?;

    ensure!(
        res.status().is_success(),
        "Fetching {url} failed with status {}",
        res.status()
    );

    let pb = res.content_length().map_or_else(ProgressBar::new_spinner, |len| {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    });

    let mut body = Vec::new();
    let mut stream = res.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Downloading {url}"))?;
        pb.inc(chunk.len() as u64);
        body.extend_from_slice(&chunk);
    }
    pb.finish_and_clear();
    debug!("Downloaded {} bytes from {url}", body.len());

    let text = String::from_utf8(body).with_context(|| format!("Decoding {url} as UTF-8"))?;
    ensure!(!text.trim().is_empty(), "{url} returned an empty document");

    Ok(text)
}

/// Spawn a task that watches for CTRL + C signal and cancels a [`CancellationToken`] when caught
pub fn spawn_ct_watcher(ct: CancellationToken) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Caught CTRL+C signal!");
        ct.cancel();
    });
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string(&"short", 10), "short");
        assert_eq!(truncate_string(&"abcdefghij", 8), "abcde...");
        // "其" is three bytes; the cut backs off to a char boundary
        assert_eq!(truncate_string(&"其他其他", 8), "其...");
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("#EXTM3U"))
            .mount(&server)
            .await;

        let client = init_http_client(Duration::from_secs(5)).unwrap();
        let text = fetch_text(&client, &format!("{}/ok", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "#EXTM3U");
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/binary"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x00]))
            .mount(&server)
            .await;

        let client = init_http_client(Duration::from_secs(5)).unwrap();
        for route in ["/missing", "/empty", "/binary"] {
            let url = format!("{}{route}", server.uri());
            assert!(fetch_text(&client, &url).await.is_err(), "{route} should fail");
        }
    }
}
