use std::path::{Path, PathBuf};

use super::sandbox::Sandbox;

const ANONYMOUS: &str = "Anonymous";

/// Identity shown to the user for one run. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    username: Option<String>,
}

impl Session {
    pub fn new(username: Option<String>) -> Self {
        Self { username }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(ANONYMOUS)
    }

    pub fn greeting(&self) -> String {
        format!("Welcome to the File Manager, {}!", self.display_name())
    }

    pub fn farewell(&self) -> String {
        format!(
            "Thank you for using File Manager, {}, goodbye!",
            self.display_name()
        )
    }

    pub fn clear(&mut self) {
        self.username = None;
    }
}

/// Mutable state owned by one run of the command loop.
///
/// The cursor is only ever assigned through [`ShellState::set_cursor`], which
/// refuses anything outside the sandbox root.
#[derive(Debug, Clone)]
pub struct ShellState {
    session: Session,
    sandbox: Sandbox,
    cursor: PathBuf,
}

impl ShellState {
    /// Starts a session with the cursor at the sandbox root.
    pub fn new(root: impl Into<PathBuf>, session: Session) -> Self {
        let sandbox = Sandbox::new(root);
        let cursor = sandbox.root().to_path_buf();
        Self {
            session,
            sandbox,
            cursor,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    pub fn cursor(&self) -> &Path {
        &self.cursor
    }

    /// Moves the cursor. Returns false and leaves it unchanged if `path` is outside the root.
    pub fn set_cursor(&mut self, path: PathBuf) -> bool {
        if !self.sandbox.contains(&path) {
            return false;
        }
        self.cursor = path;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_defaults_to_anonymous() {
        let session = Session::default();
        assert_eq!(session.display_name(), "Anonymous");
        assert_eq!(session.greeting(), "Welcome to the File Manager, Anonymous!");
    }

    #[test]
    fn test_farewell_and_clear() {
        let mut session = Session::new(Some("alice".to_string()));
        assert_eq!(
            session.farewell(),
            "Thank you for using File Manager, alice, goodbye!"
        );
        session.clear();
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_cursor_starts_at_root() {
        let state = ShellState::new("/home/u", Session::default());
        assert_eq!(state.cursor(), Path::new("/home/u"));
        assert_eq!(state.root(), Path::new("/home/u"));
    }

    #[test]
    fn test_set_cursor_refuses_outside_root() {
        let mut state = ShellState::new("/home/u", Session::default());

        assert!(state.set_cursor(PathBuf::from("/home/u/docs")));
        assert_eq!(state.cursor(), Path::new("/home/u/docs"));

        assert!(!state.set_cursor(PathBuf::from("/home/u2")));
        assert_eq!(state.cursor(), Path::new("/home/u/docs"));
    }
}
