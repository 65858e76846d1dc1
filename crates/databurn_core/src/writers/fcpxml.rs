//! FCPXML 1.8 writer.
//!
//! Produces a resource table with one asset per distinct filename and a
//! single spine holding one clip per segment. All times are frame counts over
//! the frame rate (`N/25s`), so no rounding is involved.

use std::collections::HashMap;

use crate::models::{total_frames, ClipSegment};
use crate::timecode::{FrameRate, Timecode};

/// Pixel dimensions of a format resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFormat {
    pub width: u32,
    pub height: u32,
}

impl VideoFormat {
    pub const HD: VideoFormat = VideoFormat {
        width: 1920,
        height: 1080,
    };
    pub const UHD: VideoFormat = VideoFormat {
        width: 3840,
        height: 2160,
    };

    fn resource_name(&self, fps: FrameRate) -> String {
        match *self {
            VideoFormat::HD => format!("FFVideoFormat1080p{}", fps),
            VideoFormat { width, height } => format!("FFVideoFormat{}x{}p{}", width, height, fps),
        }
    }
}

/// Options for FCPXML output.
#[derive(Debug, Clone)]
pub struct FcpxmlOptions {
    pub fps: FrameRate,
    /// Sequence `tcStart`; should match the timeline base used to segment.
    pub timeline_base: Timecode,
    pub event_name: String,
    pub project_name: String,
    /// Directory prefix for asset `src` URLs.
    pub media_root: Option<String>,
    pub sequence_format: VideoFormat,
    pub clip_format: VideoFormat,
}

impl Default for FcpxmlOptions {
    fn default() -> Self {
        let fps = FrameRate::default();
        Self {
            fps,
            timeline_base: Timecode::from_frames(10 * 3600 * u64::from(fps.get()), fps),
            event_name: "Databurn".to_string(),
            project_name: "Generated Timeline".to_string(),
            media_root: None,
            sequence_format: VideoFormat::HD,
            clip_format: VideoFormat::UHD,
        }
    }
}

/// Per-filename asset entry.
struct Asset<'a> {
    id: String,
    name: &'a str,
    start: u64,
    end: u64,
}

/// Render segments as an FCPXML document.
pub fn write_fcpxml(segments: &[ClipSegment], options: &FcpxmlOptions) -> String {
    let fps = options.fps;
    let assets = collect_assets(segments, fps);
    let asset_ids: HashMap<&str, &str> = assets.iter().map(|a| (a.name, a.id.as_str())).collect();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<!DOCTYPE fcpxml>\n");
    xml.push_str("<fcpxml version=\"1.8\">\n");

    // Resources
    xml.push_str("  <resources>\n");
    xml.push_str(&format_resource("r0", options.sequence_format, fps));
    xml.push_str(&format_resource("r1", options.clip_format, fps));
    for asset in &assets {
        xml.push_str(&format!(
            "    <asset id=\"{}\" name=\"{}\" src=\"{}\" start=\"{}\" duration=\"{}\" hasVideo=\"1\" hasAudio=\"1\" audioSources=\"1\" audioChannels=\"2\" format=\"r1\"/>\n",
            asset.id,
            escape_xml(asset.name),
            escape_xml(&asset_src(options.media_root.as_deref(), asset.name)),
            rational(asset.start, fps),
            rational(asset.end - asset.start, fps),
        ));
    }
    xml.push_str("  </resources>\n");

    // Library
    xml.push_str("  <library>\n");
    xml.push_str(&format!("    <event name=\"{}\">\n", escape_xml(&options.event_name)));
    xml.push_str(&format!(
        "      <project name=\"{}\">\n",
        escape_xml(&options.project_name)
    ));
    xml.push_str(&format!(
        "        <sequence format=\"r0\" duration=\"{}\" tcStart=\"{}\" tcFormat=\"NDF\">\n",
        rational(total_frames(segments), fps),
        rational(options.timeline_base.to_frames(fps), fps),
    ));
    xml.push_str("          <spine>\n");

    for segment in segments {
        let start = rational(segment.source_start_frames(fps), fps);
        let duration = rational(segment.frame_count, fps);
        let asset_id = asset_ids.get(segment.filename.as_str()).copied().unwrap_or("r1");

        xml.push_str(&format!(
            "            <clip name=\"{}\" offset=\"{}\" start=\"{}\" duration=\"{}\" format=\"r1\" tcFormat=\"NDF\" enabled=\"1\">\n",
            escape_xml(&segment.filename),
            rational(segment.timeline_offset_frames(fps), fps),
            start,
            duration,
        ));
        xml.push_str(&format!(
            "              <video ref=\"{}\" offset=\"{}\" start=\"{}\" duration=\"{}\"/>\n",
            asset_id, start, start, duration,
        ));
        xml.push_str("            </clip>\n");
    }

    xml.push_str("          </spine>\n");
    xml.push_str("        </sequence>\n");
    xml.push_str("      </project>\n");
    xml.push_str("    </event>\n");
    xml.push_str("  </library>\n");
    xml.push_str("</fcpxml>\n");

    xml
}

/// Distinct filenames in order of first appearance, ids `r2`, `r3`, ...
///
/// Each asset spans from the earliest source start to the latest source end
/// seen for that filename.
fn collect_assets(segments: &[ClipSegment], fps: FrameRate) -> Vec<Asset<'_>> {
    let mut assets: Vec<Asset> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for segment in segments {
        let start = segment.source_start_frames(fps);
        let end = start + segment.frame_count;
        match index.get(segment.filename.as_str()) {
            Some(&i) => {
                let asset = &mut assets[i];
                asset.start = asset.start.min(start);
                asset.end = asset.end.max(end);
            }
            None => {
                index.insert(&segment.filename, assets.len());
                assets.push(Asset {
                    id: format!("r{}", assets.len() + 2),
                    name: &segment.filename,
                    start,
                    end,
                });
            }
        }
    }

    assets
}

fn format_resource(id: &str, format: VideoFormat, fps: FrameRate) -> String {
    format!(
        "    <format id=\"{}\" name=\"{}\" frameDuration=\"1/{}s\" width=\"{}\" height=\"{}\"/>\n",
        id,
        format.resource_name(fps),
        fps,
        format.width,
        format.height
    )
}

fn asset_src(media_root: Option<&str>, name: &str) -> String {
    match media_root {
        Some(root) if !root.is_empty() => {
            format!("file://localhost/{}/{}", root.trim_matches('/'), name)
        }
        _ => format!("file://localhost/{}", name),
    }
}

/// Frame count as an FCPXML rational time.
fn rational(frames: u64, fps: FrameRate) -> String {
    format!("{}/{}s", frames, fps)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse FCPXML, allowing the `<!DOCTYPE fcpxml>` the writer emits.
    fn parse_xml(xml: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
        roxmltree::Document::parse_with_options(
            xml,
            roxmltree::ParsingOptions {
                allow_dtd: true,
                ..Default::default()
            },
        )
    }

    fn segment(name: &str, source: &str, timeline: &str, frames: u64) -> ClipSegment {
        let fps = FrameRate::PAL;
        ClipSegment::from_run(
            name,
            Timecode::parse(source, fps).unwrap(),
            Timecode::parse(timeline, fps).unwrap(),
            frames,
            fps,
        )
    }

    fn sample() -> Vec<ClipSegment> {
        vec![
            segment("A.mov", "01:00:00:00", "10:00:00:00", 2),
            segment("B.mov", "02:00:00:00", "10:00:00:02", 3),
            segment("A.mov", "01:00:00:10", "10:00:00:05", 1),
        ]
    }

    #[test]
    fn parses_as_xml() {
        let xml = write_fcpxml(&sample(), &FcpxmlOptions::default());
        let doc = parse_xml(&xml).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "fcpxml");
        assert_eq!(doc.root_element().attribute("version"), Some("1.8"));
    }

    #[test]
    fn one_asset_per_distinct_filename() {
        let xml = write_fcpxml(&sample(), &FcpxmlOptions::default());
        let doc = parse_xml(&xml).unwrap();

        let assets: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("asset")).collect();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].attribute("id"), Some("r2"));
        assert_eq!(assets[0].attribute("name"), Some("A.mov"));
        assert_eq!(assets[1].attribute("id"), Some("r3"));
        // A.mov spans 01:00:00:00 to 01:00:00:11.
        assert_eq!(assets[0].attribute("start"), Some("90000/25s"));
        assert_eq!(assets[0].attribute("duration"), Some("11/25s"));
    }

    #[test]
    fn spine_offsets_accumulate() {
        let xml = write_fcpxml(&sample(), &FcpxmlOptions::default());
        let doc = parse_xml(&xml).unwrap();

        let clips: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("clip")).collect();
        let offsets: Vec<_> = clips.iter().filter_map(|c| c.attribute("offset")).collect();
        let durations: Vec<_> = clips.iter().filter_map(|c| c.attribute("duration")).collect();
        assert_eq!(offsets, ["900000/25s", "900002/25s", "900005/25s"]);
        assert_eq!(durations, ["2/25s", "3/25s", "1/25s"]);

        let refs: Vec<_> = doc
            .descendants()
            .filter(|n| n.has_tag_name("video"))
            .filter_map(|v| v.attribute("ref"))
            .collect();
        assert_eq!(refs, ["r2", "r3", "r2"]);
    }

    #[test]
    fn sequence_carries_total_duration_and_base() {
        let xml = write_fcpxml(&sample(), &FcpxmlOptions::default());
        let doc = parse_xml(&xml).unwrap();
        let sequence = doc.descendants().find(|n| n.has_tag_name("sequence")).unwrap();
        assert_eq!(sequence.attribute("duration"), Some("6/25s"));
        assert_eq!(sequence.attribute("tcStart"), Some("900000/25s"));
    }

    #[test]
    fn format_resources_follow_frame_rate() {
        let options = FcpxmlOptions {
            fps: FrameRate::FILM,
            timeline_base: Timecode::ZERO,
            ..FcpxmlOptions::default()
        };
        let xml = write_fcpxml(&[], &options);
        assert!(xml.contains("name=\"FFVideoFormat1080p24\" frameDuration=\"1/24s\""));
        assert!(xml.contains("name=\"FFVideoFormat3840x2160p24\""));
        assert!(parse_xml(&xml).is_ok());
    }

    #[test]
    fn escapes_names_and_uses_media_root() {
        let options = FcpxmlOptions {
            media_root: Some("/Volumes/Media/".to_string()),
            ..FcpxmlOptions::default()
        };
        let xml = write_fcpxml(&[segment("A&B.mov", "00:00:00:00", "10:00:00:00", 1)], &options);
        assert!(xml.contains("name=\"A&amp;B.mov\""));
        assert!(xml.contains("src=\"file://localhost/Volumes/Media/A&amp;B.mov\""));
    }
}
