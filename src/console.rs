use std::io::{self, BufRead, Write};

#[cfg(test)]
use std::collections::VecDeque;

/// Where status lines go and where interactive answers come from.
pub(crate) trait Console {
    fn write_line(&mut self, line: &str);
    fn read_line(&mut self) -> Result<Option<String>, String>;

    fn say(&mut self, text: &str) {
        self.write_line(text);
    }

    fn say_error(&mut self, text: &str) {
        self.write_line(&format!(" ⚡ {}", text));
    }

    fn say_okay(&mut self, text: &str) {
        self.write_line(&format!(" ✓ {}", text));
    }

    fn say_note(&mut self, text: &str) {
        self.write_line(&format!(" ❗ {}", text));
    }

    fn say_todo(&mut self, text: &str) {
        self.write_line(&format!(" ☐ {}", text));
    }

    fn say_info(&mut self, text: &str) {
        self.write_line(&format!(" > {}", text));
    }
}

#[derive(Debug, Default)]
pub(crate) struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }

    fn read_line(&mut self) -> Result<Option<String>, String> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| format!("Failed to read input: {}", err))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct TestConsole {
    inputs: VecDeque<String>,
    pub(crate) lines: Vec<String>,
}

#[cfg(test)]
impl TestConsole {
    pub(crate) fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            lines: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

#[cfg(test)]
impl Console for TestConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn read_line(&mut self) -> Result<Option<String>, String> {
        Ok(self.inputs.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_prefix_each_severity() {
        let mut console = TestConsole::default();
        console.say("plain");
        console.say_error("boom");
        console.say_okay("git fetch");
        console.say_note("uncommitted changes");
        console.say_todo("git commit");
        console.say_info("joining mob session");

        assert_eq!(
            console.lines,
            vec![
                "plain",
                " ⚡ boom",
                " ✓ git fetch",
                " ❗ uncommitted changes",
                " ☐ git commit",
                " > joining mob session",
            ]
        );
    }
}
