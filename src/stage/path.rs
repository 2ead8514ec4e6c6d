use crate::error::StageError;

/// Checks that `path` is an absolute prim path such as `/World/Cup`.
///
/// The pseudo-root `/` itself is rejected since no prim can be defined there.
///
/// # Errors
///
/// Returns [`StageError::InvalidPath`] when the path is relative, ends with a
/// separator, or contains an empty or whitespace-bearing segment.
pub fn validate(path: &str) -> Result<(), StageError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(StageError::InvalidPath(path.to_owned()));
    };
    if rest.is_empty() {
        return Err(StageError::InvalidPath(path.to_owned()));
    }
    let valid = rest
        .split('/')
        .all(|seg| !seg.is_empty() && !seg.chars().any(char::is_whitespace));
    if valid {
        Ok(())
    } else {
        Err(StageError::InvalidPath(path.to_owned()))
    }
}

/// Returns the parent path, or `None` for a top-level prim.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(0) | None => None,
        Some(idx) => Some(&path[..idx]),
    }
}

/// Returns the last segment of the path.
#[must_use]
pub fn name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Appends a child segment to `path`.
#[must_use]
pub fn child(path: &str, name: &str) -> String {
    format!("{path}/{name}")
}

/// Returns the sibling path `<parent>/<name>`, or `/<name>` for a top-level prim.
#[must_use]
pub fn sibling(path: &str, name: &str) -> String {
    match parent(path) {
        Some(p) => child(p, name),
        None => format!("/{name}"),
    }
}

/// Whether `path` equals `root` or lies beneath it.
#[must_use]
pub fn is_within(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}
