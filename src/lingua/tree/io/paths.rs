//! Lexical path helpers for cross-references between artifacts.
//!
//! Nothing here touches the filesystem: references are derived from the
//! paths the pipeline itself constructs.

use std::path::{Component, Path, PathBuf};

/// Computes `path` relative to `base`, inserting `..` where `path` leaves
/// `base`. Both paths are normalised lexically first.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// Renders a relative path as a module specifier: forward slashes, with a
/// leading `./` unless the path already climbs out with `..`.
pub fn to_reference(relative: &Path) -> String {
    let joined = forward_slashes(relative);
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Joins the path components with `/` regardless of the host separator.
pub fn forward_slashes(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
