//! Request engine: one logical call with timeout, retry and backoff.
//!
//! ```text
//! attempt n=1
//!   send with per-attempt timeout
//!   2xx + parseable body  -> done
//!   failure               -> classify
//!       not retryable or n == max_attempts -> return error as is
//!       otherwise sleep backoff(n+1), n += 1, try again
//! ```
//!
//! Attempts are strictly sequential. Bodies are small buffered strings, so
//! every attempt re-sends the same descriptor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::adapters::{CallerHeaders, Endpoint};
use crate::classify::{classify_status, classify_transport};
use crate::error::{Result, WikiError};
use crate::log::{LogLevel, Logger};
use crate::request::{Method, Payload, RawResponse, RequestDescriptor, ResponseFormat};

/// Upper bound on a single backoff delay.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Attempt budget and timing for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries, including the first
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    /// Applied unchanged to every attempt
    pub timeout_ms: u64,
}

impl RetryPolicy {
    /// # Errors
    ///
    /// Returns `WikiError::Validation` if `max_attempts` or `timeout_ms` is zero.
    pub fn new(max_attempts: u32, base_delay_ms: u64, timeout_ms: u64) -> Result<Self> {
        if max_attempts < 1 {
            return Err(WikiError::validation("max attempts must be at least 1"));
        }
        if timeout_ms < 1 {
            return Err(WikiError::validation("timeout must be at least 1 ms"));
        }
        Ok(Self {
            max_attempts,
            base_delay_ms,
            timeout_ms,
        })
    }

    /// Policy from a retry count, where `retries` excludes the first try.
    pub fn from_retries(retries: u32, base_delay_ms: u64, timeout_ms: u64) -> Result<Self> {
        Self::new(retries.saturating_add(1), base_delay_ms, timeout_ms)
    }

    /// Delay before attempt `attempt`: `base * 2^(attempt-2)`, capped at
    /// [`MAX_BACKOFF_MS`]. Zero for the first attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let factor = 2u64.checked_pow(attempt - 2).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Sends one request and buffers the whole response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor, timeout: Duration) -> Result<RawResponse>;
}

/// [`Transport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns `WikiError::Internal` if the TLS backend cannot initialize.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| WikiError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor, timeout: Duration) -> Result<RawResponse> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .timeout(timeout);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport(&e, timeout_ms))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(&e, timeout_ms))?;

        Ok(RawResponse { status, body })
    }
}

/// Executes descriptors under a [`RetryPolicy`], reporting each attempt to
/// the injected logger.
pub struct RequestEngine<T: Transport = ReqwestTransport> {
    transport: T,
    policy: RetryPolicy,
    logger: Arc<dyn Logger>,
}

impl<T: Transport> RequestEngine<T> {
    pub fn new(transport: T, policy: RetryPolicy, logger: Arc<dyn Logger>) -> Self {
        Self {
            transport,
            policy,
            logger,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Build the endpoint's request and execute it.
    pub async fn call<E: Endpoint + ?Sized>(
        &self,
        endpoint: &E,
        caller: &CallerHeaders,
    ) -> Result<Payload> {
        let request = endpoint.build(caller)?;
        self.execute(&request, endpoint.response_format()).await
    }

    /// Execute a request, retrying retryable failures.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt, unwrapped.
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        format: ResponseFormat,
    ) -> Result<Payload> {
        let max = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            let started = Instant::now();
            let outcome = self.attempt(request, format).await;
            let elapsed_ms = started.elapsed().as_millis();

            let err = match outcome {
                Ok(payload) => {
                    self.logger.log(
                        LogLevel::Verbose,
                        &format!(
                            "attempt {}/{}: {} {} succeeded in {} ms",
                            attempt, max, request.method, request.url, elapsed_ms
                        ),
                    );
                    return Ok(payload);
                }
                Err(err) => err,
            };

            self.logger.log(
                LogLevel::Verbose,
                &format!(
                    "attempt {}/{}: {} {} failed in {} ms: {} ({})",
                    attempt,
                    max,
                    request.method,
                    request.url,
                    elapsed_ms,
                    err,
                    err.code()
                ),
            );

            if !err.is_retryable() || attempt >= max {
                return Err(err);
            }

            let delay = self.policy.backoff(attempt + 1);
            self.logger.log(
                LogLevel::Debug,
                &format!("retrying in {} ms", delay.as_millis()),
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, request: &RequestDescriptor, format: ResponseFormat) -> Result<Payload> {
        let timeout = self.policy.timeout();
        let response = match tokio::time::timeout(timeout, self.transport.send(request, timeout))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(WikiError::Timeout {
                    timeout_ms: self.policy.timeout_ms,
                })
            }
        };

        if let Some(err) = classify_status(&response) {
            return Err(err);
        }
        Payload::parse(format, response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl Logger for RecordingLogger {
        fn log(&self, level: LogLevel, message: &str) {
            self.lines.lock().unwrap().push((level, message.to_string()));
        }
    }

    enum Step {
        Respond(u16, &'static str),
        Hang,
    }

    struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        sent_at: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                sent_at: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> usize {
            self.sent_at.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for Arc<ScriptedTransport> {
        async fn send(&self, _request: &RequestDescriptor, _timeout: Duration) -> Result<RawResponse> {
            self.sent_at.lock().unwrap().push(Instant::now());
            let step = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted");
            match step {
                Step::Respond(status, body) => Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                Step::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("the engine timeout fires first")
                }
            }
        }
    }

    fn request() -> RequestDescriptor {
        RequestDescriptor {
            method: Method::Get,
            url: "https://example.org/entities/items/Q42".to_string(),
            headers: Default::default(),
            body: None,
        }
    }

    fn engine(
        transport: &Arc<ScriptedTransport>,
        policy: RetryPolicy,
    ) -> (RequestEngine<Arc<ScriptedTransport>>, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let engine = RequestEngine::new(Arc::clone(transport), policy, logger.clone());
        (engine, logger)
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(10, 100, 1000).unwrap();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_millis(100));
        assert_eq!(policy.backoff(3), Duration::from_millis(200));
        assert_eq!(policy.backoff(4), Duration::from_millis(400));
        assert_eq!(policy.backoff(20), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(policy.backoff(200), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_policy_validation() {
        assert!(RetryPolicy::new(0, 0, 10).is_err());
        assert!(RetryPolicy::new(1, 0, 0).is_err());
        assert_eq!(RetryPolicy::from_retries(2, 400, 15000).unwrap().max_attempts, 3);
        assert_eq!(
            RetryPolicy::from_retries(u32::MAX, 0, 1).unwrap().max_attempts,
            u32::MAX
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_server_errors_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Step::Respond(503, "busy"),
            Step::Respond(503, "busy"),
            Step::Respond(200, "{\"id\":\"Q42\"}"),
        ]));
        let (engine, logger) = engine(&transport, RetryPolicy::new(3, 100, 5000).unwrap());

        let payload = engine.execute(&request(), ResponseFormat::Json).await.unwrap();
        assert_eq!(payload, Payload::Json(serde_json::json!({"id": "Q42"})));
        assert_eq!(transport.attempts(), 3);

        let sent_at = transport.sent_at.lock().unwrap().clone();
        let first_gap = sent_at[1] - sent_at[0];
        let second_gap = sent_at[2] - sent_at[1];
        assert!(first_gap >= Duration::from_millis(100) && first_gap < Duration::from_millis(110));
        assert!(second_gap >= Duration::from_millis(200) && second_gap < Duration::from_millis(210));

        let lines = logger.lines.lock().unwrap();
        let attempts = lines
            .iter()
            .filter(|(level, line)| *level == LogLevel::Verbose && line.starts_with("attempt "))
            .count();
        assert_eq!(attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![Step::Respond(404, "missing")]));
        let (engine, _) = engine(&transport, RetryPolicy::new(3, 100, 5000).unwrap());

        let err = engine.execute(&request(), ResponseFormat::Json).await.unwrap_err();
        assert!(matches!(err, WikiError::Client { status: 404, .. }));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Step::Respond(500, "first"),
            Step::Respond(502, "second"),
        ]));
        let (engine, _) = engine(&transport, RetryPolicy::new(2, 10, 5000).unwrap());

        let err = engine.execute(&request(), ResponseFormat::Json).await.unwrap_err();
        assert!(matches!(err, WikiError::Server { status: 502, .. }));
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_attempt_gets_the_full_timeout() {
        let transport = Arc::new(ScriptedTransport::new(vec![Step::Hang, Step::Hang]));
        let (engine, _) = engine(&transport, RetryPolicy::new(2, 0, 50).unwrap());

        let started = Instant::now();
        let err = engine.execute(&request(), ResponseFormat::Json).await.unwrap_err();
        assert!(matches!(err, WikiError::Timeout { timeout_ms: 50 }));
        assert_eq!(transport.attempts(), 2);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_json_is_protocol_error_without_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![Step::Respond(200, "<html>")]));
        let (engine, _) = engine(&transport, RetryPolicy::new(3, 0, 5000).unwrap());

        let err = engine.execute(&request(), ResponseFormat::Json).await.unwrap_err();
        assert!(matches!(err, WikiError::Protocol(_)));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_reqwest_transport_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/entities/items/Q42")
            .match_header("user-agent", "Test/1.0")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"Q42","type":"item"}"#)
            .create_async()
            .await;

        let engine = RequestEngine::new(
            ReqwestTransport::new().unwrap(),
            RetryPolicy::new(1, 0, 5000).unwrap(),
            Arc::new(RecordingLogger::default()),
        );
        let endpoint = crate::adapters::EntityGet {
            base_url: server.url(),
            id: "Q42".parse().unwrap(),
        };
        let payload = engine
            .call(&endpoint, &CallerHeaders::new(Some("Test/1.0".to_string())))
            .await
            .unwrap();

        assert_eq!(payload.to_json()["id"], "Q42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reqwest_transport_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sparql")
            .with_status(500)
            .with_body("upstream exploded")
            .expect(3)
            .create_async()
            .await;

        let engine = RequestEngine::new(
            ReqwestTransport::new().unwrap(),
            RetryPolicy::new(3, 0, 5000).unwrap(),
            Arc::new(RecordingLogger::default()),
        );
        let endpoint = crate::adapters::SparqlQuery {
            endpoint: format!("{}/sparql", server.url()),
            query: "SELECT * WHERE { ?s ?p ?o } LIMIT 1".to_string(),
            format: crate::adapters::SparqlFormat::Csv,
        };
        let err = engine
            .call(&endpoint, &CallerHeaders::default())
            .await
            .unwrap_err();

        assert!(matches!(err, WikiError::Server { status: 500, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = ReqwestTransport::new().unwrap();
        let mut request = request();
        request.url = format!("http://127.0.0.1:{}/x", port);
        let err = transport
            .send(&request, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, WikiError::Connection(_)));
    }
}
