use crate::console::Console;
use crate::session::{quit, Quit, Session};
use crate::shell::Runner;

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl<R: Runner, C: Console> Session<R, C> {
    /// Asks for `label`; empty input or end of input keeps `current`.
    fn prompt_value(&mut self, label: &str, current: &str) -> Result<Option<String>, Quit> {
        self.console
            .say_info(&format!("Enter the {} [default = {}]:", label, current));
        let answer = match self.console.read_line() {
            Ok(answer) => answer,
            Err(err) => {
                self.console.say_error(&err);
                return Err(quit(&self.logger, &err, 1));
            }
        };
        Ok(answer
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    fn prompt_text(&mut self, label: &str, current: &str) -> Result<String, Quit> {
        match self.prompt_value(label, current)? {
            Some(value) => {
                self.console.say_okay(&format!("{} set to {}", label, value));
                Ok(value)
            }
            None => {
                self.console
                    .say_okay(&format!("{} keeps the value {}", label, current));
                Ok(current.to_string())
            }
        }
    }

    pub(crate) fn setup(&mut self) -> Result<(), Quit> {
        self.logger.transition("setup");
        let wip = self.config.wip_branch.clone();
        self.config.wip_branch = self.prompt_text("wip branch name", &wip)?;
        let base = self.config.base_branch.clone();
        self.config.base_branch = self.prompt_text("base branch name", &base)?;
        let remote = self.config.remote_name.clone();
        self.config.remote_name = self.prompt_text("remote name", &remote)?;

        let current = self.config.mob_next_stay.to_string();
        match self.prompt_value("next stay value", &current)? {
            Some(raw) => match parse_flag(&raw) {
                Some(value) => {
                    self.config.mob_next_stay = value;
                    self.console
                        .say_okay(&format!("next stay value set to {}", value));
                }
                None => {
                    self.console.say_note(&format!(
                        "'{}' is not a yes/no answer, next stay value keeps the value {}",
                        raw, current
                    ));
                }
            },
            None => {
                self.console
                    .say_okay(&format!("next stay value keeps the value {}", current));
            }
        }

        if self.work_branch_is_base() {
            return Ok(());
        }

        self.setup_work_branch()?;
        self.write_config_file()?;
        self.console.say_info("done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_understands_common_answers() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("N"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
