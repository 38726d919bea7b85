//! String-path helpers for carrier paths.
//!
//! Carriers hold plain forward-slash strings, not `PathBuf`s: they are
//! project-relative identifiers that must compare and key identically on
//! every platform. These helpers keep all normalization in one place.

/// Normalize separators and strip any trailing slash.
fn normalize(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized.trim_end_matches('/').to_string()
}

/// Pure join: `base` + `/` + `relative`, with separator normalization.
/// Does not resolve `..` segments.
pub fn join_path(base: &str, relative: &str) -> String {
    let base = normalize(base);
    let relative = relative.trim_start_matches('/');
    format!("{base}/{relative}")
}

/// Directory portion of a path; `"."` for bare names, `"/"` for root files.
pub fn dirname(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    match normalized.rfind('/') {
        None => ".".to_string(),
        Some(0) => "/".to_string(),
        Some(i) => normalized[..i].to_string(),
    }
}

/// Resolve a relative path (`.`, `./x`, `../x`) against a base directory.
pub fn resolve_relative(base: &str, relative: &str) -> String {
    let base = normalize(base);
    if relative == "." {
        return base;
    }

    let mut segments: Vec<&str> = base.split('/').collect();
    let relative = relative.replace('\\', "/");
    for seg in relative.trim_start_matches("./").split('/') {
        match seg {
            ".." => {
                segments.pop();
            }
            "" | "." => {}
            _ => segments.push(seg),
        }
    }
    segments.join("/")
}

/// The portion of `to` below directory `from`; `to` unchanged when it is
/// not under `from`.
pub fn relative_path(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = to.replace('\\', "/");
    match to.strip_prefix(&format!("{from}/")) {
        Some(rest) => rest.to_string(),
        None => to,
    }
}

/// Boundary-safe containment: is `file` at or under `location`?
///
/// Uses `/` boundaries so `src/domain-extensions/x` does not match the
/// location `src/domain`.
pub fn is_file_in(file: &str, location: &str) -> bool {
    let file = file.replace('\\', "/");
    let location = normalize(location);
    file == location || file.starts_with(&format!("{location}/"))
}
