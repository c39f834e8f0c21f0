use std::io::{self, BufRead, Write};

use zerobot_core::core_api::{EditorHost, NoticeKind};

/// Host backed by stdin/stdout. Questions go to stderr so piped stdout stays
/// clean.
pub struct TerminalHost<R> {
    input: R,
    assume_yes: bool,
}

impl TerminalHost<io::StdinLock<'static>> {
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), assume_yes)
    }
}

impl<R: BufRead> TerminalHost<R> {
    pub fn new(input: R, assume_yes: bool) -> Self {
        Self { input, assume_yes }
    }

    fn read_answer(&mut self, question: &str) -> Option<String> {
        eprint!("{question}");
        let _ = io::stderr().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead> EditorHost for TerminalHost<R> {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => eprintln!("Error: {message}"),
            NoticeKind::Success | NoticeKind::Info => println!("{message}"),
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.read_answer(&format!("{prompt} [y/N] "))
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn prompt_text(&mut self, prompt: &str, default: &str) -> Option<String> {
        let answer = self.read_answer(&format!("{prompt} [{default}] "))?;
        if answer.trim().is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }
}
