use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::csv_roster::parse_csv_roster;
use super::export_url::build_csv_export_url;
use super::{LoadError, SheetLoader};
use crate::grades::Roster;

/// Fetches a Google Sheets tab through its public CSV export link.
pub struct HttpSheetLoader {
    export_url: String,
    http_client: reqwest::Client,
}

impl HttpSheetLoader {
    pub fn new(sheet_url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let export_url = build_csv_export_url(sheet_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("grades-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| LoadError::Http {
                url: export_url.clone(),
                source,
            })?;

        Ok(Self::with_client(export_url, http_client))
    }

    /// Use an already built client against a ready export URL.
    pub fn with_client(export_url: String, http_client: reqwest::Client) -> Self {
        Self {
            export_url,
            http_client,
        }
    }

    pub fn export_url(&self) -> &str {
        &self.export_url
    }
}

#[async_trait]
impl SheetLoader for HttpSheetLoader {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        let started = Instant::now();
        debug!("Fetching roster from {}", self.export_url);

        let http_error = |source| LoadError::Http {
            url: self.export_url.clone(),
            source,
        };

        let response = self
            .http_client
            .get(&self.export_url)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.export_url.clone(),
                status: status.as_u16(),
            });
        }

        // A sheet that is not shared by link redirects to an HTML sign-in page
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.starts_with("text/html") {
            return Err(LoadError::NotCsv {
                url: self.export_url.clone(),
                content_type,
            });
        }

        let body = response.text().await.map_err(http_error)?;
        let roster = parse_csv_roster(&body)?;

        info!(
            "Fetched roster ({} rows) in {}ms",
            roster.len(),
            started.elapsed().as_millis()
        );
        Ok(Arc::new(roster))
    }

    fn describe(&self) -> String {
        self.export_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the URL to fetch.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/export?format=csv&gid=0", addr)
    }

    fn loader(url: String) -> HttpSheetLoader {
        HttpSheetLoader::with_client(url, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_csv_response_is_parsed() {
        let url = serve_once(
            "200 OK",
            "text/csv; charset=utf-8",
            "ID Number,Quiz 1 Scores\n202412345.0,18\n",
        )
        .await;

        let roster = loader(url).load().await.unwrap();
        assert_eq!(roster.columns(), ["ID Number", "Quiz 1 Scores"]);
        assert_eq!(roster.rows()[0].display("ID Number"), "202412345.0");
        assert_eq!(roster.rows()[0].display("Quiz 1 Scores"), "18");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let url = serve_once("403 Forbidden", "text/plain", "forbidden").await;

        let err = loader(url.clone()).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 403, url: ref u } if *u == url));
    }

    #[tokio::test]
    async fn test_html_sign_in_page_is_not_csv() {
        let url = serve_once(
            "200 OK",
            "text/html; charset=utf-8",
            "<!DOCTYPE html><html><body>Sign in</body></html>",
        )
        .await;

        let err = loader(url).load().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotCsv { ref content_type, .. } if content_type.starts_with("text/html")
        ));
    }
}
