use rustyline::completion::Pair;

use crate::core::commands::COMMAND_NAMES;

const OS_FLAGS: &[&str] = &["--EOL", "--cpus", "--homedir", "--username", "--architecture"];

#[derive(Clone, Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_command(&self, input: &str) -> Vec<Pair> {
        Self::matches(COMMAND_NAMES, input.trim(), " ")
    }

    pub fn complete_os_flag(&self, input: &str) -> Vec<Pair> {
        Self::matches(OS_FLAGS, input, "")
    }

    fn matches(candidates: &[&str], input: &str, suffix: &str) -> Vec<Pair> {
        candidates
            .iter()
            .filter(|candidate| candidate.starts_with(input))
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: format!("{candidate}{suffix}"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::OsFlag;

    #[test]
    fn test_prefix_matches() {
        let completer = CommandCompleter::new();
        let names: Vec<String> = completer
            .complete_command("c")
            .into_iter()
            .map(|p| p.display)
            .collect();
        assert_eq!(names, vec!["cd", "cat", "cp", "compress"]);
    }

    #[test]
    fn test_exit_completes() {
        let completer = CommandCompleter::new();
        let pairs = completer.complete_command(".");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, ".exit ");
    }

    #[test]
    fn test_os_flags_parse() {
        for flag in OS_FLAGS {
            assert!(flag.parse::<OsFlag>().is_ok());
        }
    }
}
