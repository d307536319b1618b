//! Interactive shell over a session
//!
//! Reads one line at a time, dispatches shell commands to the session and
//! sends everything else to the question answerer. Command output goes to
//! stdout; warnings and errors are logged.

pub mod commands;
pub mod completion;

pub use commands::ShellCommand;
pub use completion::NameCompleter;

use crate::answer::QuestionAnswerer;
use crate::context::FileKind;
use crate::session::Session;
use crate::Result;
use colored::*;
use inquire::ui::{RenderConfig, Styled};
use inquire::{InquireError, Text};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{error, info, warn};

pub const WELCOME: &str = "Welcome to BrainAI. Type 'help' for a list of commands or 'exit' to quit.";

/// What the loop does after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    session: Session,
    answerer: QuestionAnswerer,
}

impl Shell {
    pub fn new(session: Session, answerer: QuestionAnswerer) -> Self {
        Self { session, answerer }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until `exit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        let interactive = io::stdin().is_terminal();

        println!("{}", WELCOME.bright_green().bold());

        loop {
            let line = if interactive {
                self.read_interactive()?
            } else {
                self.read_piped()?
            };

            let Some(line) = line else {
                info!("Goodbye!");
                break;
            };

            if self.execute(&line).await == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Handle one input line
    pub async fn execute(&mut self, line: &str) -> Flow {
        match ShellCommand::parse(line) {
            ShellCommand::Empty => {}
            ShellCommand::Cd(target) => report(self.session.change_directory(&target)),
            ShellCommand::Ls => self.show_listing(),
            ShellCommand::Search(query) => self.show_search(&query),
            ShellCommand::Create { filename, content } => {
                report(self.session.create_file(&filename, &content))
            }
            ShellCommand::Edit { filename, content } => {
                report(self.session.edit_file(&filename, &content))
            }
            ShellCommand::Delete(filename) => report(self.session.delete_file(&filename)),
            ShellCommand::Help(topic) => show_help(topic.as_deref()),
            ShellCommand::Usage(usage) => warn!("{}", usage),
            ShellCommand::Exit => {
                info!("Goodbye!");
                return Flow::Exit;
            }
            ShellCommand::Question(question) => {
                let answer = self.answerer.ask(&self.session, &question).await;
                println!("{}", answer.response);
            }
        }
        Flow::Continue
    }

    fn prompt(&self) -> String {
        format!("{}>", self.session.relative_current())
    }

    /// Prompt with tab completion; `None` on Ctrl-C / Ctrl-D
    fn read_interactive(&self) -> Result<Option<String>> {
        let prompt = self.prompt();
        let completer = NameCompleter::new(self.session.completions(""));
        let render_config = RenderConfig::default().with_prompt_prefix(Styled::new(""));

        match Text::new(&prompt)
            .with_autocomplete(completer)
            .with_render_config(render_config)
            .prompt()
        {
            Ok(line) => Ok(Some(line)),
            Err(InquireError::OperationCanceled) => Ok(Some(String::new())),
            Err(InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Plain line reading for scripted use; `None` at end of input
    fn read_piped(&self) -> Result<Option<String>> {
        print!("{} ", self.prompt());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn show_listing(&self) {
        let entries = match self.session.list_directory() {
            Ok(entries) => entries,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        println!("Contents of {}:", self.session.relative_current());
        for entry in entries {
            if entry.is_dir {
                println!("📁 {}", entry.name.bright_blue().bold());
            } else {
                println!("📄 {}", entry.name);
            }
        }
    }

    fn show_search(&self, query: &str) {
        match self.session.search(query) {
            Ok(results) => {
                println!("Search results for '{}':", query);
                for path in results {
                    println!("- {}", path.bright_cyan());
                }
            }
            Err(e) => warn!("Invalid search pattern '{}': {}", query, e),
        }
    }
}

/// Log a failed command at the level its error calls for
fn report(result: Result<()>) {
    if let Err(e) = result {
        if e.is_warning() {
            warn!(category = e.category(), "{}", e);
        } else {
            error!(category = e.category(), "{}", e);
        }
    }
}

fn show_help(topic: Option<&str>) {
    if let Some(topic) = topic {
        match commands::describe(topic) {
            Some(help) => println!("{}", help),
            None => println!("*** No help on {}", topic),
        }
        return;
    }

    println!();
    println!("{}", "Available commands:".bright_cyan().bold());
    for (name, help) in commands::COMMANDS {
        println!("  {:<8} {}", name.bright_yellow(), help);
    }
    println!();
    println!("{}", "Anything else is asked as a question about the current directory.".dimmed());
    let extensions: Vec<String> = FileKind::supported_extensions()
        .map(|ext| format!(".{}", ext))
        .collect();
    println!("{} {}", "Files read into context:".dimmed(), extensions.join(" ").dimmed());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tests::ScriptedModel;
    use crate::vfs::MemoryTree;
    use std::path::Path;

    fn shell() -> Shell {
        let tree = MemoryTree::new()
            .with_file("/brain/notes.txt", "hello world")
            .with_dir("/brain/projects");
        let session = Session::new(Box::new(tree), "/brain").unwrap();
        Shell::new(session, QuestionAnswerer::new(Box::new(ScriptedModel::replying("ok"))))
    }

    #[tokio::test]
    async fn test_navigation_updates_prompt() {
        let mut shell = shell();
        assert_eq!(shell.prompt(), ".>");

        assert_eq!(shell.execute("cd projects").await, Flow::Continue);
        assert_eq!(shell.prompt(), "projects>");

        shell.execute("cd ..").await;
        assert_eq!(shell.prompt(), ".>");

        // Rejected without leaving the root
        assert_eq!(shell.execute("cd ..").await, Flow::Continue);
        assert_eq!(shell.prompt(), ".>");
    }

    #[tokio::test]
    async fn test_file_commands_round_trip() {
        let mut shell = shell();
        shell.execute("create todo.txt buy milk").await;
        assert!(shell.session().tree().exists(Path::new("/brain/todo.txt")));

        shell.execute("edit todo.txt buy oat milk").await;
        assert_eq!(
            shell.session().tree().read(Path::new("/brain/todo.txt")).unwrap(),
            b"buy oat milk"
        );

        shell.execute("create todo.txt").await;
        shell.execute("delete todo.txt").await;
        assert!(!shell.session().tree().exists(Path::new("/brain/todo.txt")));
    }

    #[tokio::test]
    async fn test_questions_and_exit() {
        let mut shell = shell();
        assert_eq!(shell.execute("What is in my notes?").await, Flow::Continue);
        assert_eq!(shell.execute("search (").await, Flow::Continue);
        assert_eq!(shell.execute("help").await, Flow::Continue);
        assert_eq!(shell.execute("").await, Flow::Continue);
        assert_eq!(shell.execute("exit").await, Flow::Exit);
    }
}
