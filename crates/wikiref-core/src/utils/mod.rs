/// Normalize a path string for comparison.
///
/// Converts backslashes to forward slashes, drops empty and `.` segments and
/// folds `..` into its parent. A leading `/` is kept. `..` that would climb
/// above the start is kept as is.
///
/// # Examples
///
/// ```
/// use wikiref_core::normalize_path;
///
/// assert_eq!(normalize_path("docs/./sub/../a.md"), "docs/a.md");
/// assert_eq!(normalize_path("/docs//a.md"), "/docs/a.md");
/// assert_eq!(normalize_path("../a.md"), "../a.md");
/// assert_eq!(normalize_path("docs\\a.md"), "docs/a.md");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Everything up to and including the last `/`, or empty
///
/// ```
/// use wikiref_core::parent_dir;
///
/// assert_eq!(parent_dir("docs/a.md"), "docs/");
/// assert_eq!(parent_dir("a.md"), "");
/// ```
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..=pos],
        None => "",
    }
}

/// Resolve `relative` against the directory `dir` and normalize the result
pub fn join_relative(dir: &str, relative: &str) -> String {
    if relative.starts_with('/') || dir.is_empty() {
        return normalize_path(relative);
    }
    normalize_path(&format!("{}/{}", dir.trim_end_matches('/'), relative))
}

/// Relative link from the directory `from_dir` to the file `to`.
///
/// ```
/// use wikiref_core::relative_path;
///
/// assert_eq!(relative_path("docs/", "docs/sub/b.md"), "sub/b.md");
/// assert_eq!(relative_path("docs/sub/", "docs/b.md"), "../b.md");
/// assert_eq!(relative_path("", "b.md"), "b.md");
/// ```
pub fn relative_path(from_dir: &str, to: &str) -> String {
    let from = normalize_path(from_dir);
    let to = normalize_path(to);
    let from_parts: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_parts.len() - common];
    parts.extend(&to_parts[common..]);
    parts.join("/")
}
