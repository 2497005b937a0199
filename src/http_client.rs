//! Shared HTTP agent, retry policy and bounded body reads.

use std::io::{self, Read};
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`get_bytes`].
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("Failed to read response body: {0}")]
    Body(#[from] io::Error),
}

impl HttpError {
    /// Transport failures and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::Transport { .. } => true,
            HttpError::Status { status, .. } => *status >= 500,
            HttpError::Body(_) => false,
        }
    }
}

/// Retry settings for network operations with exponential backoff.
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first try.
    pub max_attempts: usize,
    /// Base delay used for the exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay allowed between attempts.
    pub max_delay: Duration,
}

impl RetryConfig {
    /// A single attempt with no waiting.
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Return a shared HTTP agent with consistent timeouts.
pub fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .build()
    })
}

/// GET `url` and return its body, retrying transient failures.
pub fn get_bytes(url: &str, max_bytes: usize, retry: RetryConfig) -> Result<Vec<u8>, HttpError> {
    retry_with_backoff(
        retry,
        || {
            let response = agent().get(url).call().map_err(|err| match err {
                ureq::Error::Status(status, _) => HttpError::Status {
                    url: url.to_string(),
                    status,
                },
                ureq::Error::Transport(transport) => HttpError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                },
            })?;
            Ok(read_response_bytes(response, max_bytes)?)
        },
        HttpError::is_retryable,
    )
}

/// Retry an operation with bounded exponential backoff when the predicate allows it.
pub fn retry_with_backoff<T, E, F, R>(
    config: RetryConfig,
    mut action: F,
    mut should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    R: FnMut(&E) -> bool,
{
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        match action() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= config.max_attempts || !should_retry(&err) {
                    return Err(err);
                }
                tracing::debug!("Retrying request (attempt {} failed)", attempt);
                std::thread::sleep(backoff_delay(
                    config.base_delay,
                    config.max_delay,
                    attempt,
                ));
            }
        }
    }
}

/// Read a response into memory, enforcing a maximum byte size.
pub fn read_response_bytes(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, io::Error> {
    check_content_length(&response, max_bytes)?;
    let mut limited = response.into_reader().take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}

fn check_content_length(response: &ureq::Response, max_bytes: usize) -> Result<(), io::Error> {
    let Some(length) = response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok())
    else {
        return Ok(());
    };
    if length > max_bytes as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: {length} bytes"),
        ));
    }
    Ok(())
}

fn backoff_delay(base: Duration, max: Duration, attempt: usize) -> Duration {
    let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(max).min(max)
}
