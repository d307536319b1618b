//! Tab completion for the interactive prompt

use super::commands::COMMANDS;
use crate::utils::text::common_prefix;
use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::error::CustomUserError;

/// Completes the first word against command names and any later word
/// against the names in the current directory.
#[derive(Debug, Clone, Default)]
pub struct NameCompleter {
    names: Vec<String>,
}

impl NameCompleter {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Full candidate lines for `input`
    pub fn candidates(&self, input: &str) -> Vec<String> {
        match input.rfind(char::is_whitespace) {
            Some(split) => {
                let (head, word) = input.split_at(split + 1);
                self.names
                    .iter()
                    .filter(|name| name.starts_with(word))
                    .map(|name| format!("{}{}", head, name))
                    .collect()
            }
            None => COMMANDS
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| !input.is_empty() && name.starts_with(input))
                .map(|name| format!("{} ", name))
                .collect(),
        }
    }
}

impl Autocomplete for NameCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.candidates(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        if highlighted_suggestion.is_some() {
            return Ok(highlighted_suggestion);
        }

        let prefix = common_prefix(&self.candidates(input));
        Ok((prefix.len() > input.len()).then_some(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> NameCompleter {
        NameCompleter::new(vec![
            "notes.txt".to_string(),
            "projects".to_string(),
            "project-x".to_string(),
        ])
    }

    #[test]
    fn test_argument_completion() {
        let completer = completer();
        assert_eq!(completer.candidates("cd proj"), vec!["cd projects", "cd project-x"]);
        assert_eq!(completer.candidates("delete n"), vec!["delete notes.txt"]);
        assert_eq!(completer.candidates("cd ").len(), 3);
        assert!(completer.candidates("cd zzz").is_empty());
    }

    #[test]
    fn test_command_completion() {
        let completer = completer();
        assert_eq!(completer.candidates("se"), vec!["search "]);
        assert_eq!(completer.candidates("e"), vec!["edit ", "exit "]);
        assert!(completer.candidates("").is_empty());
    }

    #[test]
    fn test_get_completion_extends_common_prefix() {
        let mut completer = completer();
        assert_eq!(
            completer.get_completion("cd pro", None).unwrap(),
            Some("cd project".to_string())
        );
        assert_eq!(
            completer.get_completion("cd n", None).unwrap(),
            Some("cd notes.txt".to_string())
        );
        assert_eq!(completer.get_completion("cd project", None).unwrap(), None);
        assert_eq!(
            completer
                .get_completion("cd p", Some("cd projects".to_string()))
                .unwrap(),
            Some("cd projects".to_string())
        );
    }
}
