//! Audio extraction from video files via FFmpeg.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SubtransError};

/// Metadata about an extracted audio artifact.
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg").arg("-version").output().map_err(|e| {
        SubtransError::AudioExtraction(format!(
            "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(SubtransError::AudioExtraction(
            "FFmpeg check failed".to_string(),
        ));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe").arg("-version").output().map_err(|e| {
        SubtransError::AudioExtraction(format!(
            "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(SubtransError::AudioExtraction(
            "FFprobe check failed".to_string(),
        ));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get media duration using FFprobe.
pub fn get_media_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| SubtransError::AudioExtraction(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SubtransError::AudioExtraction(format!(
            "FFprobe failed: {stderr}"
        )));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str.trim().parse().map_err(|e| {
        SubtransError::AudioExtraction(format!(
            "Failed to parse duration '{}': {e}",
            duration_str.trim()
        ))
    })?;

    Ok(Duration::from_secs_f64(duration_secs))
}

/// Extract the audio track from a video file as mono 16kHz 32kbps MP3.
///
/// Low-bitrate mono at 16kHz is what speech-recognition backends expect,
/// and it keeps the artifact small enough for inline upload.
pub async fn extract_audio(input: &Path, output: &Path) -> Result<AudioMetadata> {
    check_ffmpeg()?;
    check_ffprobe()?;

    if !input.exists() {
        return Err(SubtransError::FileNotFound(input.display().to_string()));
    }

    info!("Extracting audio from {}", input.display());

    let duration = get_media_duration(input)?;
    debug!("Input duration: {:?}", duration);

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args([
            "-vn",
            "-acodec",
            "libmp3lame",
            "-b:a",
            "32k",
            "-ar",
            "16000",
            "-ac",
            "1",
        ])
        .arg(output)
        .status()
        .map_err(|e| SubtransError::AudioExtraction(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(SubtransError::AudioExtraction(
            "FFmpeg audio extraction failed".to_string(),
        ));
    }

    if !output.exists() {
        return Err(SubtransError::AudioExtraction(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio extracted to {}", output.display());

    Ok(AudioMetadata {
        duration,
        sample_rate: 16000,
        channels: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_check_ffmpeg() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }
        assert!(check_ffmpeg().is_ok());
    }

    #[tokio::test]
    async fn test_extract_audio_file_not_found() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }

        let result =
            extract_audio(Path::new("/nonexistent/file.mp4"), Path::new("/tmp/out.mp3")).await;
        match result {
            Err(SubtransError::FileNotFound(path)) => assert!(path.contains("nonexistent")),
            other => panic!("Expected FileNotFound error, got: {other:?}"),
        }
    }
}
