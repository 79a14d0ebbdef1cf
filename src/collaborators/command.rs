//! Collaborators backed by an external command
//!
//! The transcript is written to the command's stdin; the answer is read from stdout.

use super::{GrammarChecker, SentimentAnalyzer};
use crate::error::CollaboratorError;
use std::io::Write;
use std::process::{Command, Stdio};

/// A program plus arguments, split on whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Parse `"python3 vader.py --compound"`; `None` for a blank string
    pub fn parse(cmd: &str) -> Option<Self> {
        let mut parts = cmd.split_whitespace();
        let program = parts.next()?.to_string();
        Some(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    pub fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run with `input` on stdin and return trimmed stdout
    pub fn run(&self, input: &str) -> Result<String, CollaboratorError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CollaboratorError::Spawn {
                command: self.describe(),
                source,
            })?;

        // stdin is written on its own thread while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(input.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = output.map_err(|source| CollaboratorError::Spawn {
            command: self.describe(),
            source,
        })?;

        match written {
            // the command exited without reading all of its input
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(source) => {
                return Err(CollaboratorError::Spawn {
                    command: self.describe(),
                    source,
                })
            }
            Ok(()) => {}
        }

        if !output.status.success() {
            return Err(CollaboratorError::CommandFailed {
                command: self.describe(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Grammar checker that prints an issue count, or a JSON array of issues
pub struct CommandGrammarChecker {
    command: ExternalCommand,
}

impl CommandGrammarChecker {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }

    fn parse_count(output: &str) -> Result<usize, CollaboratorError> {
        if let Ok(count) = output.parse::<usize>() {
            return Ok(count);
        }
        match serde_json::from_str::<serde_json::Value>(output) {
            Ok(serde_json::Value::Array(items)) => Ok(items.len()),
            _ => Err(CollaboratorError::InvalidOutput {
                output: output.to_string(),
                expected: "an issue count or a JSON array",
            }),
        }
    }
}

impl GrammarChecker for CommandGrammarChecker {
    fn describe(&self) -> String {
        format!("grammar-cmd:{}", self.command.describe())
    }

    fn check(&self, text: &str) -> Result<usize, CollaboratorError> {
        let output = self.command.run(text)?;
        Self::parse_count(&output)
    }
}

/// Sentiment analyzer that prints a compound polarity
pub struct CommandSentimentAnalyzer {
    command: ExternalCommand,
}

impl CommandSentimentAnalyzer {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

impl SentimentAnalyzer for CommandSentimentAnalyzer {
    fn describe(&self) -> String {
        format!("sentiment-cmd:{}", self.command.describe())
    }

    fn polarity(&self, text: &str) -> Result<f64, CollaboratorError> {
        let output = self.command.run(text)?;
        output
            .parse::<f64>()
            .map_err(|_| CollaboratorError::InvalidOutput {
                output,
                expected: "a compound polarity",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cmd = ExternalCommand::parse("python3  score.py --compound").unwrap();
        assert_eq!(cmd.describe(), "python3 score.py --compound");
        assert!(ExternalCommand::parse("").is_none());
        assert!(ExternalCommand::parse("  \t").is_none());
    }

    #[test]
    fn test_grammar_output_forms() {
        assert_eq!(CommandGrammarChecker::parse_count("4").unwrap(), 4);
        assert_eq!(
            CommandGrammarChecker::parse_count(r#"[{"rule":"a"},{"rule":"b"}]"#).unwrap(),
            2
        );
        assert!(CommandGrammarChecker::parse_count("four").is_err());
        assert!(CommandGrammarChecker::parse_count(r#"{"matches":[]}"#).is_err());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = ExternalCommand::parse("vaanimeter-no-such-program-xyz").unwrap();
        let err = CommandSentimentAnalyzer::new(cmd).polarity("hi").unwrap_err();
        assert!(matches!(err, CollaboratorError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_reads_stdin() {
        // `wc -w` counts the words we pipe in
        let cmd = ExternalCommand::parse("wc -w").unwrap();
        let checker = CommandGrammarChecker::new(cmd);
        assert_eq!(checker.check("one two three").unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_large_transcript_through_echoing_command() {
        // `cat` answers while still reading; the output is far larger than a pipe buffer
        let transcript = "word ".repeat(100_000);
        let cmd = ExternalCommand::parse("cat").unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let input = transcript.clone();
        std::thread::spawn(move || {
            let _ = tx.send(cmd.run(&input));
        });
        let output = rx
            .recv_timeout(std::time::Duration::from_secs(30))
            .expect("command did not finish")
            .unwrap();
        assert_eq!(output, transcript.trim());
    }

    #[cfg(unix)]
    #[test]
    fn test_large_json_array_from_grammar_command() {
        // `cat` echoes a 200 KB issue array back while reading it
        let issues = format!("[{}]", vec![r#"{"rule":"x"}"#; 16_000].join(","));
        assert!(issues.len() > 200_000);
        let checker = CommandGrammarChecker::new(ExternalCommand::parse("cat").unwrap());
        assert_eq!(checker.check(&issues).unwrap(), 16_000);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_command_failed() {
        let cmd = ExternalCommand::parse("false").unwrap();
        let err = CommandSentimentAnalyzer::new(cmd).polarity("x").unwrap_err();
        assert!(matches!(err, CollaboratorError::CommandFailed { .. }));
    }
}
