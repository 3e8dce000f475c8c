//! The root boundary every path in a session is checked against.
//!
//! All checks are lexical: `.` and `..` are folded without touching the
//! filesystem and symbolic links are not followed.

use std::path::{Component, Path, PathBuf};

use super::commands::CommandError;

/// Folds `.` and `..` components. `..` at the filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                let tail = normalized.components().next_back();
                let can_pop = matches!(tail, Some(Component::Normal(_)));
                let at_top = matches!(tail, Some(Component::RootDir | Component::Prefix(_)));

                if can_pop {
                    normalized.pop();
                } else if !at_top {
                    normalized.push("..");
                }
            }
            Component::Normal(name) => normalized.push(name),
        }
    }

    normalized
}

/// True when `candidate` is `root` itself or lies below it.
///
/// Comparison is per path component, so `/home/user2` is not inside `/home/user`.
pub fn is_within_root(candidate: &Path, root: &Path) -> bool {
    normalize(candidate).starts_with(normalize(root))
}

#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, path: &Path) -> bool {
        is_within_root(path, &self.root)
    }

    /// Resolves a user-supplied path against `cursor`.
    ///
    /// `~` and `~/...` expand against the root. The result is absolute and
    /// normalized, or `OutsideRoot` if it would leave the boundary.
    pub fn resolve(&self, cursor: &Path, arg: &str) -> Result<PathBuf, CommandError> {
        let expanded = self.expand_tilde(arg);
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            cursor.join(expanded)
        };
        let resolved = normalize(&joined);

        if self.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(CommandError::OutsideRoot(resolved))
        }
    }

    fn expand_tilde(&self, arg: &str) -> PathBuf {
        if arg == "~" {
            return self.root.clone();
        }
        match arg.strip_prefix("~/") {
            Some(rest) => self.root.join(rest),
            // "~name" is an ordinary relative name
            None => PathBuf::from(arg),
        }
    }
}
