//! `/etc/os-release` parsing.

/// Read a field from os-release content, stripping surrounding quotes.
pub fn field(content: &str, name: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        (key == name).then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    })
}

/// Distribution identifiers in priority order: `ID`, then each `ID_LIKE` token.
pub fn distribution_ids(content: &str) -> Vec<String> {
    let mut ids = Vec::new();

    if let Some(id) = field(content, "ID") {
        ids.push(id.to_lowercase());
    }
    if let Some(like) = field(content, "ID_LIKE") {
        ids.extend(like.split_whitespace().map(str::to_lowercase));
    }

    ids.retain(|id| !id.is_empty());
    ids
}
