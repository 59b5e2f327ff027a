use async_trait::async_trait;
use futures_util::StreamExt;
use hn_core::{Error, Result};
use reqwest::header::RANGE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Once either marker shows up the prefix holds everything the extractor needs.
const STOP_MARKERS: [&[u8]; 2] = [b"</article>", b"</head>"];

/// Source of raw HTML documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// Fetches at most `byte_limit` bytes of a document from a gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    byte_limit: usize,
}

impl GatewayClient {
    pub fn new(byte_limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("hn/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, byte_limit))
    }

    pub fn with_client(client: reqwest::Client, byte_limit: usize) -> Self {
        Self { client, byte_limit }
    }

    pub fn byte_limit(&self) -> usize {
        self.byte_limit
    }
}

fn find_marker(buf: &[u8], from: usize) -> bool {
    STOP_MARKERS.iter().any(|marker| {
        let start = from.saturating_sub(marker.len() - 1);
        buf[start..].windows(marker.len()).any(|window| window == *marker)
    })
}

/// Streams the body until `limit` bytes were read or, with `stop_at_markers`,
/// a stop marker appeared. Dropping the stream early closes the connection.
async fn read_bounded(response: reqwest::Response, limit: usize, stop_at_markers: bool) -> Result<Vec<u8>> {
    let mut stream = response.bytes_stream();
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));

    while buf.len() < limit {
        let Some(chunk) = stream.next().await else {
            break;
        };
        let chunk = chunk?;
        let scanned = buf.len();
        buf.extend_from_slice(&chunk);
        if stop_at_markers && find_marker(&buf, scanned) {
            break;
        }
    }

    Ok(buf)
}

#[async_trait]
impl DocumentSource for GatewayClient {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(RANGE, format!("bytes=0-{}", self.byte_limit))
            .send()
            .await?;

        let status = response.status();
        let bytes = if status == StatusCode::PARTIAL_CONTENT {
            // A ranged body is wanted whole, but a gateway may still overshoot the range
            read_bounded(response, self.byte_limit, false).await?
        } else if status.is_success() {
            debug!("Range ignored by {}, reading a bounded prefix", url);
            read_bounded(response, self.byte_limit, true).await?
        } else {
            debug!("Range request to {} failed with {}, retrying without range", url, status);
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Err(Error::Status {
                    status: response.status().as_u16(),
                    url: url.to_string(),
                });
            }
            read_bounded(response, self.byte_limit, true).await?
        };

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
