use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("./") {
        Some(stripped) => stripped.to_owned(),
        None => path,
    }
}

/// Lower-cased extension of the final path segment, without the dot.
/// Dotfiles such as `.gitignore` have none.
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Normalizes user-typed extensions: `.RS`, `rs` and ` rs ` all become `rs`.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Trims the content and drops every line that is blank after trimming.
pub fn strip_blank_lines(content: &str) -> String {
    content
        .trim()
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
