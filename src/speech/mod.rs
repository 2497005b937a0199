//! Spoken recommendations: text-to-speech download and local playback.

mod output;

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::app_dirs;
use crate::config::SpeechConfig;
use crate::http_client::{self, HttpError, RetryConfig};

pub use output::AudioOutput;

/// File name of the synthesized message inside the audio directory.
pub const OUTPUT_FILE: &str = "output.mp3";
const MAX_AUDIO_BYTES: usize = 8 * 1024 * 1024;
/// Longest text the speech endpoint accepts per request.
const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Nothing to say")]
    EmptyMessage,
    #[error("Invalid speech URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Speech service returned no audio")]
    EmptyAudio,
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No audio directory: {0}")]
    AudioDir(String),
    #[error("Audio output failed: {0}")]
    Output(String),
    #[error("Audio decode failed: {0}")]
    Decode(String),
}

/// Kannada sentence announcing the recommended crop.
pub fn recommendation_message(crop: &str) -> String {
    format!("ನಿಮಗೆ ಶಿಫಾರಸು ಮಾಡಲಾದ ಬೆಳೆ {crop}")
}

/// Default location of the synthesized message.
pub fn default_output_path() -> Result<PathBuf, SpeechError> {
    let dir = app_dirs::audio_dir().map_err(|err| SpeechError::AudioDir(err.to_string()))?;
    Ok(dir.join(OUTPUT_FILE))
}

/// Fetch speech audio for `message` and write it as MP3 to `out_path`.
///
/// Long messages are sent in several requests and the MP3 frames appended.
pub fn synthesize(
    message: &str,
    config: &SpeechConfig,
    out_path: &Path,
) -> Result<PathBuf, SpeechError> {
    let chunks = split_message(message, MAX_CHUNK_CHARS);
    if chunks.is_empty() {
        return Err(SpeechError::EmptyMessage);
    }
    let mut audio = Vec::new();
    for (index, chunk) in chunks.iter().enumerate() {
        let url = request_url(config, chunk, index, chunks.len())?;
        let bytes = http_client::get_bytes(url.as_str(), MAX_AUDIO_BYTES, RetryConfig::default())?;
        audio.extend_from_slice(&bytes);
    }
    if audio.is_empty() {
        return Err(SpeechError::EmptyAudio);
    }
    std::fs::write(out_path, &audio).map_err(|source| SpeechError::Write {
        path: out_path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Synthesized {} bytes of speech to {}",
        audio.len(),
        out_path.display()
    );
    Ok(out_path.to_path_buf())
}

/// Speaks a recommendation aloud.
pub trait Announcer {
    /// Announce `crop`, returning the audio file that was played.
    fn announce(&mut self, crop: &str) -> Result<PathBuf, SpeechError>;
}

/// Synthesizes the message over HTTP and plays it on the default device.
pub struct SpeechAnnouncer {
    config: SpeechConfig,
    out_path: PathBuf,
    output: Option<AudioOutput>,
}

impl SpeechAnnouncer {
    pub fn new(config: SpeechConfig, out_path: PathBuf) -> Self {
        Self {
            config,
            out_path,
            output: None,
        }
    }

    /// Block until playback finishes, for callers that exit right after.
    pub fn wait_until_done(&self) {
        if let Some(output) = &self.output {
            output.wait_until_done();
        }
    }
}

impl Announcer for SpeechAnnouncer {
    fn announce(&mut self, crop: &str) -> Result<PathBuf, SpeechError> {
        let path = synthesize(&recommendation_message(crop), &self.config, &self.out_path)?;
        if self.output.is_none() {
            self.output = Some(AudioOutput::open_default()?);
        }
        if let Some(output) = self.output.as_mut() {
            output.play_file(&path)?;
        }
        Ok(path)
    }
}

fn request_url(
    config: &SpeechConfig,
    text: &str,
    index: usize,
    total: usize,
) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &config.base_url,
        &[
            ("ie", "UTF-8".to_string()),
            ("q", text.to_string()),
            ("tl", config.language.clone()),
            ("total", total.to_string()),
            ("idx", index.to_string()),
            ("textlen", text.chars().count().to_string()),
            ("client", "tw-ob".to_string()),
        ],
    )
}

/// Split on whitespace into pieces of at most `max_chars` characters.
/// A single word longer than the limit is cut at character boundaries.
fn split_message(message: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in message.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
