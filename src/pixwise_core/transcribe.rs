//! Audio transcription of exported videos.
//!
//! The transcript is only logged; nothing downstream consumes it.

use crate::pixwise_core::error::{PixwiseError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Produces a text transcript of a video's audio track.
pub trait Transcriber {
    fn transcribe(&self, media_path: &Path) -> Result<String>;
}

/// Extracts audio with ffmpeg and sends it to the OpenAI transcription API.
pub struct WhisperTranscriber {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(WhisperTranscriber {
            client,
            api_key,
            model: TRANSCRIPTION_MODEL.to_string(),
        })
    }

    /// Build a transcriber from `OPENAI_API_KEY`, or `None` if it is unset.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Some(Self::new(key)?)),
            _ => Ok(None),
        }
    }

    fn request_transcript(&self, audio_path: &Path) -> Result<String> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("model", self.model.clone())
            .file("file", audio_path)?;

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PixwiseError::Transcription(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response.json()?;
        Ok(parsed.text)
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, media_path: &Path) -> Result<String> {
        let scratch = tempfile::Builder::new()
            .prefix("pixwise-")
            .suffix(".mp3")
            .tempfile()?;

        extract_audio(media_path, scratch.path())?;
        log::info!(
            "Extracted audio of {} to {}",
            media_path.display(),
            scratch.path().display()
        );

        self.request_transcript(scratch.path())
    }
}

/// Extract the audio track of `media_path` to an mp3 at `audio_path`.
pub fn extract_audio(media_path: &Path, audio_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(media_path)
        .args(["-vn", "-acodec", "libmp3lame", "-y"])
        .arg(audio_path)
        .output()
        .map_err(|e| PixwiseError::Transcoder(format!("failed to run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PixwiseError::Transcoder(format!(
            "ffmpeg exited with {} for {}: {}",
            output.status,
            media_path.display(),
            stderr.lines().last().unwrap_or_default()
        )));
    }

    Ok(())
}

/// Check if ffmpeg is available on the system.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
