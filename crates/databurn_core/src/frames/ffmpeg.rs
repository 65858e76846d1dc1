//! ffmpeg frame extraction.
//!
//! Frames are written as `frame_%06d.png` into a work directory. The region
//! of interest is cut and cleaned up by the filter chain, so OCR sees only
//! the burn-in band.

use std::path::Path;
use std::process::Command;

use super::error::{FrameError, FrameResult};
use super::{list_frames, ExtractOptions, FrameFile, FRAME_PATTERN};

/// Check whether `ffmpeg` can be started.
pub fn is_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Build the `-vf` filter chain for `options`.
///
/// Order: resample to the timecode rate, crop, upscale, invert, blur.
///
/// The crop is clamped to the picture: on frames smaller than the rectangle
/// the band keeps its left edge and slides up to stay inside the image.
pub fn filter_chain(options: &ExtractOptions) -> String {
    let mut filters = vec![format!("fps={}", options.fps)];

    if let Some(crop) = options.crop {
        filters.push(format!(
            "crop='min({w},iw-{x})':'min({h},ih)':{x}:'min({y},ih-oh)'",
            w = crop.width,
            h = crop.height,
            x = crop.x,
            y = crop.y
        ));
    }
    if options.scale > 1 {
        filters.push(format!(
            "scale=iw*{0}:ih*{0}:flags=bicubic",
            options.scale
        ));
    }
    if options.invert {
        filters.push("negate".to_string());
    }
    if options.blur_sigma > 0.0 {
        filters.push(format!("gblur=sigma={}", options.blur_sigma));
    }

    filters.join(",")
}

/// Arguments passed to ffmpeg, without the program name.
pub fn extract_args(video: &Path, output_dir: &Path, options: &ExtractOptions) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "warning".to_string(),
        "-i".to_string(),
        video.display().to_string(),
        "-vf".to_string(),
        filter_chain(options),
        output_dir.join(FRAME_PATTERN).display().to_string(),
    ]
}

/// Extract every frame of `video` into `output_dir`.
///
/// The directory is created if needed. Each line ffmpeg prints is passed to
/// `on_output` along with whether it came from stderr. Returns the frames
/// ordered by index.
pub fn extract_frames(
    video: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    on_output: &dyn Fn(&str, bool),
) -> FrameResult<Vec<FrameFile>> {
    if !video.exists() {
        return Err(FrameError::FileNotFound(video.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| FrameError::io(output_dir, e))?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args(extract_args(video, output_dir, options));

    tracing::debug!("Running FFmpeg: {:?}", cmd);

    let output = cmd.output().map_err(|e| FrameError::ToolUnavailable {
        tool: "ffmpeg".to_string(),
        message: e.to_string(),
    })?;

    forward_output(&output.stdout, &output.stderr, on_output);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FrameError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message: stderr.trim().to_string(),
        });
    }

    let frames = list_frames(output_dir)?;
    if frames.is_empty() {
        return Err(FrameError::NoFrames(output_dir.to_path_buf()));
    }

    tracing::info!(
        "Extracted {} frames from {} into {}",
        frames.len(),
        video.display(),
        output_dir.display()
    );

    Ok(frames)
}

/// Feed captured tool output to `on_output`, stdout first.
fn forward_output(stdout: &[u8], stderr: &[u8], on_output: &dyn Fn(&str, bool)) {
    for (bytes, is_stderr) in [(stdout, false), (stderr, true)] {
        for line in String::from_utf8_lossy(bytes).lines() {
            if !line.trim().is_empty() {
                on_output(line, is_stderr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::CropRect;
    use crate::logging::{LogConfig, RunLogger};
    use crate::timecode::FrameRate;

    #[test]
    fn default_chain_matches_burn_in_band() {
        assert_eq!(
            filter_chain(&ExtractOptions::default()),
            "fps=25,crop='min(1400,iw-10)':'min(150,ih)':10:'min(1000,ih-oh)',\
             scale=iw*2:ih*2:flags=bicubic,negate,gblur=sigma=0.8"
        );
    }

    #[test]
    fn bare_chain_only_resamples() {
        let options = ExtractOptions::unprocessed(FrameRate::FILM);
        assert_eq!(filter_chain(&options), "fps=24");
    }

    #[test]
    fn crop_without_scale() {
        let options = ExtractOptions {
            crop: Some(CropRect {
                x: 0,
                y: 900,
                width: 1920,
                height: 180,
            }),
            ..ExtractOptions::unprocessed(FrameRate::PAL)
        };
        assert_eq!(
            filter_chain(&options),
            "fps=25,crop='min(1920,iw-0)':'min(180,ih)':0:'min(900,ih-oh)'"
        );
    }

    #[test]
    fn args_target_frame_pattern() {
        let args = extract_args(
            Path::new("in.mov"),
            Path::new("/tmp/run"),
            &ExtractOptions::unprocessed(FrameRate::PAL),
        );
        assert_eq!(args[4], "in.mov");
        assert!(args.last().unwrap().ends_with("frame_%06d.png"));
    }

    #[test]
    fn missing_video_is_reported_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_frames(
            &dir.path().join("absent.mov"),
            dir.path(),
            &ExtractOptions::default(),
            &|_, _| {},
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::FileNotFound(_)));
    }

    #[test]
    fn tool_output_reaches_run_log_tail() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        forward_output(
            b"",
            b"[png @ 0x1] deprecated pixel format\n\nin.mov: Invalid data found\n",
            &|line, is_stderr| logger.output_line(line, is_stderr),
        );

        assert_eq!(
            logger.tail(),
            ["[png @ 0x1] deprecated pixel format", "in.mov: Invalid data found"]
        );
    }
}
