//! YouTube link helpers used when rendering result videos and materials.

/// Length of a YouTube video id.
const ID_LEN: usize = 11;

/// URL fragments directly followed by a video id.
const ID_MARKERS: [&str; 4] = [
    "youtube.com/watch?v=",
    "youtube.com/embed/",
    "youtube.com/shorts/",
    "youtu.be/",
];

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Extract the video id from a YouTube link.
///
/// Recognises `youtube.com/watch?v=`, `youtube.com/embed/`,
/// `youtube.com/shorts/` and `youtu.be/` followed by an 11-character id.
/// Otherwise the `v` query parameter is used, and failing that the (up to)
/// 11 characters after any `v=`.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    for marker in ID_MARKERS {
        for (pos, _) in url.match_indices(marker) {
            let rest = &url[pos + marker.len()..];
            if let Some(id) = rest.get(..ID_LEN)
                && id.chars().all(is_id_char)
            {
                return Some(id.to_string());
            }
        }
    }

    let rest = query_param(url, "v").or_else(|| url.split_once("v=").map(|(_, rest)| rest))?;
    let id: String = rest.chars().take(ID_LEN).collect();
    (!id.is_empty()).then_some(id)
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((key, value)) if key == name => Some(value),
        _ => None,
    })
}

/// Host part of an absolute or scheme-less URL, lowercased, without port.
fn host(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();
    authority
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Whether the link is on a YouTube host and carries a full video id.
pub fn is_youtube_link(url: &str) -> bool {
    let url = url.trim();
    let host = host(url);
    let on_youtube =
        host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com");
    on_youtube
        && extract_video_id(url)
            .is_some_and(|id| id.len() == ID_LEN && id.chars().all(is_id_char))
}

/// Embeddable player URL for a YouTube link.
pub fn embed_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}
