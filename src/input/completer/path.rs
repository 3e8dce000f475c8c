use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

use crate::core::sandbox::Sandbox;

/// Completes paths relative to the shell cursor rather than the process directory.
/// Directories outside the sandbox root are never listed.
#[derive(Clone)]
pub struct PathCompleter {
    sandbox: Sandbox,
    cwd: PathBuf,
}

impl PathCompleter {
    pub fn new(root: &Path, cwd: impl Into<PathBuf>) -> Self {
        Self {
            sandbox: Sandbox::new(root),
            cwd: cwd.into(),
        }
    }

    pub fn set_cwd(&mut self, cwd: &Path) {
        self.cwd = cwd.to_path_buf();
    }

    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (typed_dir, file_prefix) = Self::split_input(incomplete);
        let search_dir = if typed_dir.is_empty() {
            self.cwd.clone()
        } else {
            match self.sandbox.resolve(&self.cwd, &typed_dir) {
                Ok(dir) => dir,
                Err(_) => return Vec::new(),
            }
        };

        let mut matches: Vec<Pair> = match fs::read_dir(&search_dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter_map(|entry| {
                    let name = entry.file_name().to_str()?.to_string();
                    if !name.starts_with(&file_prefix) {
                        return None;
                    }
                    let is_dir = entry.path().is_dir();
                    Some(Self::pair(&typed_dir, &name, is_dir))
                })
                .collect(),
            Err(_) => Vec::new(),
        };

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }

    /// Splits what was typed into the directory part (as typed) and the name prefix.
    fn split_input(incomplete: &str) -> (String, String) {
        match incomplete.rfind('/') {
            Some(slash) => (
                incomplete[..=slash].to_string(),
                incomplete[slash + 1..].to_string(),
            ),
            None => (String::new(), incomplete.to_string()),
        }
    }

    fn pair(typed_dir: &str, name: &str, is_dir: bool) -> Pair {
        let shown = format!("{typed_dir}{name}");
        if is_dir {
            Pair {
                display: format!("{shown}/"),
                replacement: format!("{shown}/"),
            }
        } else {
            Pair {
                display: shown.clone(),
                replacement: format!("{shown} "),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_relative_to_cwd() -> Result<(), std::io::Error> {
        let temp = tempfile::tempdir()?;
        fs::create_dir(temp.path().join("docs"))?;
        fs::write(temp.path().join("docs").join("draft.txt"), b"")?;
        fs::write(temp.path().join("data.bin"), b"")?;

        let completer = PathCompleter::new(temp.path(), temp.path());

        let top: Vec<String> = completer
            .complete_path("d")
            .into_iter()
            .map(|p| p.replacement)
            .collect();
        assert_eq!(top, vec!["data.bin ", "docs/"]);

        let nested: Vec<String> = completer
            .complete_path("docs/dr")
            .into_iter()
            .map(|p| p.replacement)
            .collect();
        assert_eq!(nested, vec!["docs/draft.txt "]);
        Ok(())
    }

    #[test]
    fn test_missing_dir_yields_nothing() {
        let missing = Path::new("/nonexistent/homefm");
        let completer = PathCompleter::new(missing, missing);
        assert!(completer.complete_path("x").is_empty());
    }

    #[test]
    fn test_never_lists_outside_root() -> Result<(), std::io::Error> {
        let outer = tempfile::tempdir()?;
        let home = outer.path().join("home");
        fs::create_dir(&home)?;
        fs::write(outer.path().join("secret.txt"), b"")?;
        fs::write(home.join("shared.txt"), b"")?;

        let completer = PathCompleter::new(&home, &home);

        assert!(completer.complete_path("../").is_empty());
        assert!(completer.complete_path("../s").is_empty());
        let absolute = format!("{}/", outer.path().display());
        assert!(completer.complete_path(&absolute).is_empty());

        let tilde: Vec<String> = completer
            .complete_path("~/sh")
            .into_iter()
            .map(|p| p.replacement)
            .collect();
        assert_eq!(tilde, vec!["~/shared.txt "]);
        Ok(())
    }
}
