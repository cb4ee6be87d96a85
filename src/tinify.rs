//! HTTP transport for the Tinify (TinyPNG) API.
//!
//! A shrink is two requests: `POST /shrink` uploads the source and answers
//! with the location of the result, then the result is downloaded from that
//! location. Metadata preservation turns the download into a `POST` with a
//! JSON body.

use crate::client::{CompressionService, Preserve};
use crate::config::Config;
use crate::constants::{
    COMPRESSION_COUNT_HEADER, TINIFY_AUTH_USER, TINIFY_SHRINK_PATH, USER_AGENT,
};
use crate::error::{CompressionError, Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ShrinkResponse {
    output: ShrinkOutput,
}

#[derive(Debug, Deserialize)]
struct ShrinkOutput {
    url: Option<String>,
    size: Option<u64>,
    #[serde(rename = "type")]
    mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PreserveRequest<'a> {
    preserve: &'a [Preserve],
}

/// Tinify client bound to one API key.
#[derive(Debug, Clone)]
pub struct TinifyClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl TinifyClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                Error::Remote(CompressionError::Connection(format!(
                    "Failed to create HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Builds a client from the loaded configuration; fails with `Auth`
    /// when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(config.endpoint.clone(), api_key)
    }

    fn shrink_url(&self) -> String {
        format!("{}{}", self.endpoint, TINIFY_SHRINK_PATH)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(TINIFY_AUTH_USER, Some(&self.api_key))
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Response, CompressionError> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| CompressionError::Connection(format!("Error while connecting: {}", e)))
    }

    async fn download(
        &self,
        url: &str,
        preserve: &[Preserve],
    ) -> std::result::Result<Vec<u8>, CompressionError> {
        let request = if preserve.is_empty() {
            self.http.get(url)
        } else {
            self.http.post(url).json(&PreserveRequest { preserve })
        };

        let response = self.send(request).await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(|e| {
            CompressionError::Connection(format!("Error while reading result: {}", e))
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CompressionService for TinifyClient {
    async fn validate_key(&self) -> std::result::Result<u64, CompressionError> {
        let response = self.send(self.http.post(self.shrink_url())).await?;
        let count = compression_count(response.headers());
        let status = response.status();

        if status.is_success() {
            return Ok(count);
        }

        // An accepted key gets a client error for the empty upload, or 429
        // once its monthly limit is used up. Both still carry the counter.
        match classify_status(status, String::new()) {
            CompressionError::Client(_) => Ok(count),
            CompressionError::Account(_) if status == StatusCode::TOO_MANY_REQUESTS => Ok(count),
            _ => Err(error_from_response(response).await),
        }
    }

    async fn compress(
        &self,
        source: Vec<u8>,
        preserve: &[Preserve],
    ) -> std::result::Result<Vec<u8>, CompressionError> {
        let response = self
            .send(self.http.post(self.shrink_url()).body(source))
            .await?;
        let response = ensure_success(response).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body: ShrinkResponse = response.json().await.map_err(|e| {
            CompressionError::Unknown(format!("Error while parsing response: {}", e))
        })?;

        if let (Some(size), Some(mime_type)) = (body.output.size, &body.output.mime_type) {
            verbose!("Service produced {} bytes of {}", size, mime_type);
        }

        let url = body.output.url.or(location).ok_or_else(|| {
            CompressionError::Unknown("Response did not include an output location".to_string())
        })?;

        self.download(&url, preserve).await
    }
}

/// Maps an HTTP status to the service's error classes.
pub fn classify_status(status: StatusCode, message: String) -> CompressionError {
    match status.as_u16() {
        401 | 429 => CompressionError::Account(message),
        400..=499 => CompressionError::Client(message),
        500..=599 => CompressionError::Server(message),
        _ => CompressionError::Unknown(message),
    }
}

fn compression_count(headers: &HeaderMap) -> u64 {
    headers
        .get(COMPRESSION_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn ensure_success(response: Response) -> std::result::Result<Response, CompressionError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> CompressionError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    classify_status(status, describe_error(status, &text))
}

fn describe_error(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "No message returned".to_string());

    match parsed.error {
        Some(kind) => format!("{} (HTTP {}/{})", message, status.as_u16(), kind),
        None => format!("{} (HTTP {})", message, status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::fetch_usage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// `api:key` in basic auth.
    const EXPECTED_AUTH: &str = "Basic YXBpOmtleQ==";

    #[derive(Debug)]
    struct Received {
        method: String,
        path: String,
        authorization: Option<String>,
        body: Vec<u8>,
    }

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    fn reply(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", status_line);
        for (name, value) in headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        ));
        let mut out = head.into_bytes();
        out.extend_from_slice(body);
        out
    }

    async fn read_request(stream: &mut TcpStream) -> Received {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers ended");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let mut request_line = lines.next().unwrap().split_whitespace();
        let method = request_line.next().unwrap().to_string();
        let path = request_line.next().unwrap().to_string();

        let mut content_length = 0;
        let mut authorization = None;
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                match name.trim().to_ascii_lowercase().as_str() {
                    "content-length" => content_length = value.trim().parse().unwrap(),
                    "authorization" => authorization = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body ended");
            buf.extend_from_slice(&chunk[..n]);
        }

        Received {
            method,
            path,
            authorization,
            body: buf[header_end..header_end + content_length].to_vec(),
        }
    }

    /// Answers one connection per canned reply, in order, and hands back
    /// what was received.
    fn serve(listener: TcpListener, replies: Vec<Vec<u8>>) -> JoinHandle<Vec<Received>> {
        tokio::spawn(async move {
            let mut received = Vec::new();
            for response in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                received.push(read_request(&mut stream).await);
                stream.write_all(&response).await.unwrap();
                stream.shutdown().await.ok();
            }
            received
        })
    }

    #[test]
    fn test_classify_status() {
        let class = |code| classify_status(status(code), String::new());
        assert!(matches!(class(401), CompressionError::Account(_)));
        assert!(matches!(class(429), CompressionError::Account(_)));
        assert!(matches!(class(400), CompressionError::Client(_)));
        assert!(matches!(class(415), CompressionError::Client(_)));
        assert!(matches!(class(500), CompressionError::Server(_)));
        assert!(matches!(class(503), CompressionError::Server(_)));
        assert!(matches!(class(302), CompressionError::Unknown(_)));
    }

    #[test]
    fn test_describe_error_with_json_body() {
        let body = r#"{"error":"Unauthorized","message":"Credentials are invalid."}"#;
        assert_eq!(
            describe_error(status(401), body),
            "Credentials are invalid. (HTTP 401/Unauthorized)"
        );
    }

    #[test]
    fn test_describe_error_with_garbage_body() {
        assert_eq!(
            describe_error(status(502), "<html>bad gateway</html>"),
            "Bad Gateway (HTTP 502)"
        );
    }

    #[test]
    fn test_compression_count_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(compression_count(&headers), 0);

        headers.insert(COMPRESSION_COUNT_HEADER, "42".parse().unwrap());
        assert_eq!(compression_count(&headers), 42);

        headers.insert(COMPRESSION_COUNT_HEADER, "n/a".parse().unwrap());
        assert_eq!(compression_count(&headers), 0);
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let client = TinifyClient::new("http://localhost:9000/", "key").unwrap();
        assert_eq!(client.shrink_url(), "http://localhost:9000/shrink");
    }

    #[test]
    fn test_from_config_requires_key() {
        let result = TinifyClient::from_config(&Config::default());
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        // Port 1 on loopback is never served in test environments.
        let client = TinifyClient::new("http://127.0.0.1:1", "key").unwrap();
        let result = client.validate_key().await;
        assert!(matches!(result, Err(CompressionError::Connection(_))));
    }

    #[tokio::test]
    async fn test_validate_key_accepts_input_missing() {
        let (listener, base) = bind().await;
        let server = serve(
            listener,
            vec![reply(
                "400 Bad Request",
                &[("Compression-Count", "12")],
                br#"{"error":"InputMissing","message":"Input file is empty."}"#,
            )],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        assert_eq!(client.validate_key().await, Ok(12));

        let received = server.await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].path, "/shrink");
        assert_eq!(received[0].authorization.as_deref(), Some(EXPECTED_AUTH));
        assert!(received[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_validate_key_at_monthly_limit_reports_quota() {
        let (listener, base) = bind().await;
        let server = serve(
            listener,
            vec![reply(
                "429 Too Many Requests",
                &[("Compression-Count", "500")],
                br#"{"error":"TooManyRequests","message":"Your monthly limit has been exceeded"}"#,
            )],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        let usage = fetch_usage(&client, 500).await.unwrap();
        assert_eq!(usage.compressed_count, 500);
        assert!(matches!(
            usage.ensure_available(),
            Err(Error::QuotaExceeded { count: 500, limit: 500 })
        ));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_key_rejected_credentials() {
        let (listener, base) = bind().await;
        let server = serve(
            listener,
            vec![reply(
                "401 Unauthorized",
                &[],
                br#"{"error":"Unauthorized","message":"Credentials are invalid."}"#,
            )],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        let result = fetch_usage(&client, 500).await;
        match result {
            Err(Error::Auth(message)) => {
                assert!(message.contains("Credentials are invalid. (HTTP 401/Unauthorized)"))
            }
            other => panic!("expected an auth error, got {:?}", other),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_compress_uploads_then_downloads_with_preserve() {
        let (listener, base) = bind().await;
        let shrink_body = serde_json::json!({
            "input": { "size": 20, "type": "image/png" },
            "output": { "size": 5, "type": "image/png", "url": format!("{}/output/abc", base) }
        })
        .to_string();
        let server = serve(
            listener,
            vec![
                reply("201 Created", &[("Compression-Count", "3")], shrink_body.as_bytes()),
                reply("200 OK", &[("Content-Type", "image/png")], b"small"),
            ],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        let output = client
            .compress(b"original image bytes".to_vec(), &[Preserve::Creation])
            .await
            .unwrap();
        assert_eq!(output, b"small");

        let received = server.await.unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].path, "/shrink");
        assert_eq!(received[0].body, b"original image bytes");
        assert_eq!(received[1].method, "POST");
        assert_eq!(received[1].path, "/output/abc");
        assert_eq!(received[1].authorization.as_deref(), Some(EXPECTED_AUTH));
        assert_eq!(received[1].body, br#"{"preserve":["creation"]}"#);
    }

    #[tokio::test]
    async fn test_compress_falls_back_to_location_header() {
        let (listener, base) = bind().await;
        let location = format!("{}/output/xyz", base);
        let server = serve(
            listener,
            vec![
                reply(
                    "201 Created",
                    &[("Location", location.as_str())],
                    br#"{"output":{"size":5,"type":"image/jpeg"}}"#,
                ),
                reply("200 OK", &[], b"small"),
            ],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        let output = client.compress(b"jpeg".to_vec(), &[]).await.unwrap();
        assert_eq!(output, b"small");

        let received = server.await.unwrap();
        assert_eq!(received[1].method, "GET");
        assert_eq!(received[1].path, "/output/xyz");
        assert!(received[1].body.is_empty());
    }

    #[tokio::test]
    async fn test_compress_rejected_input_is_client_error() {
        let (listener, base) = bind().await;
        let server = serve(
            listener,
            vec![reply(
                "415 Unsupported Media Type",
                &[],
                br#"{"error":"Unsupported media type","message":"File type is not supported."}"#,
            )],
        );

        let client = TinifyClient::new(base, "key").unwrap();
        let result = client.compress(b"not an image".to_vec(), &[]).await;
        assert_eq!(
            result,
            Err(CompressionError::Client(
                "File type is not supported. (HTTP 415/Unsupported media type)".to_string()
            ))
        );

        assert_eq!(server.await.unwrap().len(), 1);
    }
}
