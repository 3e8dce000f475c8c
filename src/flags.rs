use std::path::PathBuf;

use clap::Parser;

use crate::core::sandbox;
use crate::error::ShellError;

/// homefm - interactive file manager confined to one directory tree
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "homefm", version, about)]
pub struct Flags {
    /// Name shown in the greeting and farewell
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,

    /// Directory the session starts in and may not leave (defaults to $HOME)
    #[arg(long, env = "HOMEFM_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Flags {
    /// The username, with an empty `--username=` treated as absent.
    pub fn username(&self) -> Option<String> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }

    /// Absolute, normalized root directory for this run.
    pub fn resolve_root(&self) -> Result<PathBuf, ShellError> {
        let root = match &self.root {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => std::env::current_dir()?.join(dir),
            None => dirs::home_dir().ok_or(ShellError::HomeDirNotFound)?,
        };
        let root = sandbox::normalize(&root);

        if !root.is_dir() {
            return Err(ShellError::InvalidRoot(root));
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_equals_syntax() {
        let flags = Flags::parse_from(["homefm", "--username=alice"]);
        assert_eq!(flags.username(), Some("alice".to_string()));
    }

    #[test]
    fn test_empty_username_is_unset() {
        let flags = Flags::parse_from(["homefm", "--username="]);
        assert_eq!(flags.username(), None);

        let flags = Flags::parse_from(["homefm"]);
        assert_eq!(flags.username(), None);
    }

    #[test]
    fn test_debug_and_quiet_conflict() {
        assert!(Flags::try_parse_from(["homefm", "--debug", "--quiet"]).is_err());
    }

    #[test]
    fn test_resolve_root_rejects_missing_dir() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        let flags = Flags {
            root: Some(temp.path().join("missing")),
            ..Flags::default()
        };
        assert!(matches!(flags.resolve_root(), Err(ShellError::InvalidRoot(_))));
        Ok(())
    }

    #[test]
    fn test_resolve_root_normalizes() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        std::fs::create_dir(temp.path().join("a"))?;
        let flags = Flags {
            root: Some(temp.path().join("a").join("..").join("a")),
            ..Flags::default()
        };
        assert_eq!(flags.resolve_root()?, temp.path().join("a"));
        Ok(())
    }
}
