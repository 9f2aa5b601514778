//! Reply text for a processed video.

use crate::core::GenerationResult;

/// Builds the single result message: caption, tags (when present), video and thumbnail links.
pub fn compose_reply(video_url: &str, generation: &GenerationResult) -> String {
    let mut lines = vec![
        "✨ Your video has been processed!".to_string(),
        String::new(),
        format!("📝 Caption: {}", generation.caption),
    ];
    if !generation.hashtags.is_empty() {
        lines.push(format!("🏷️ Hashtags: {}", generation.hashtags.join(" ")));
    }
    if !generation.keywords.is_empty() {
        lines.push(format!("🔑 Keywords: {}", generation.keywords.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("📺 Video: {}", video_url));
    lines.push(format!("🖼️ Thumbnail: {}", generation.thumbnail_url));
    lines.join("\n")
}
