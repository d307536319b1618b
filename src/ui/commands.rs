//! Shell command parsing

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Cd(String),
    Ls,
    Search(String),
    Create { filename: String, content: String },
    Edit { filename: String, content: String },
    Delete(String),
    Help(Option<String>),
    Exit,
    /// A known command with missing arguments; carries the usage line
    Usage(&'static str),
    /// Anything that is not a command
    Question(String),
    Empty,
}

/// Commands and their help text, in display order
pub const COMMANDS: &[(&str, &str)] = &[
    ("cd", "Change directory: cd <directory>"),
    ("ls", "List contents of current directory"),
    ("search", "Search for files containing a query: search <query>"),
    ("create", "Create a new file: create <filename> <content>"),
    ("edit", "Edit an existing file: edit <filename> <new_content>"),
    ("delete", "Delete a file: delete <filename>"),
    ("help", "List available commands: help [command]"),
    ("exit", "Exit the program"),
];

impl ShellCommand {
    /// Parse one input line.
    ///
    /// The command word is the leading run of identifier characters and the
    /// argument is the rest of the line with surrounding whitespace removed,
    /// so `cd..` means `cd ..`. A leading `?` means `help`. Any line whose
    /// first word is not a command is a question.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ShellCommand::Empty;
        }

        let (word, arg) = match line.strip_prefix('?') {
            Some(rest) => ("help", rest.trim()),
            None => {
                let end = line
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(line.len());
                (&line[..end], line[end..].trim())
            }
        };

        match word {
            "cd" => ShellCommand::Cd(arg.to_string()),
            "ls" => ShellCommand::Ls,
            "search" => ShellCommand::Search(arg.to_string()),
            "create" => match split_pair(arg) {
                Some((filename, content)) => ShellCommand::Create { filename, content },
                None => ShellCommand::Usage("Usage: create <filename> <content>"),
            },
            "edit" => match split_pair(arg) {
                Some((filename, content)) => ShellCommand::Edit { filename, content },
                None => ShellCommand::Usage("Usage: edit <filename> <new_content>"),
            },
            "delete" => ShellCommand::Delete(arg.to_string()),
            "help" => ShellCommand::Help((!arg.is_empty()).then(|| arg.to_string())),
            "exit" => ShellCommand::Exit,
            _ => ShellCommand::Question(line.to_string()),
        }
    }
}

/// Help text for one command
pub fn describe(command: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, help)| *help)
}

/// Split `filename content...` at the first whitespace run
fn split_pair(arg: &str) -> Option<(String, String)> {
    let (filename, content) = arg.split_once(char::is_whitespace)?;
    let content = content.trim_start();
    if filename.is_empty() || content.is_empty() {
        return None;
    }
    Some((filename.to_string(), content.to_string()))
}
