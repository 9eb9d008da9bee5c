use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use serde_json::json;

use crate::branches::{has_changes, is_current, listing_contains, parse_authors};
use crate::config::{save_config, MobConfig};
use crate::console::Console;
use crate::handover::next_typist;
use crate::logger::Logger;
use crate::screenshare::share_plan;
use crate::shell::{render_args, CommandResult, Runner};
use crate::timer::{finish_time, parse_minutes, timer_script};

pub(crate) const START_COMMIT_MESSAGE: &str = "mob started";

#[derive(Debug)]
pub(crate) struct Quit {
    pub(crate) code: i32,
    #[allow(dead_code)]
    pub(crate) reason: String,
}

impl Quit {
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code as u8)
    }
}

pub(crate) fn quit(logger: &Logger, reason: &str, code: i32) -> Quit {
    if reason.trim().is_empty() {
        logger.quit("unknown", code);
    } else {
        logger.quit(reason, code);
    }
    Quit {
        code,
        reason: reason.to_string(),
    }
}

/// How `start` gets onto the work branch, from (local exists, remote exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BranchSetup {
    Rejoin,
    Create,
    Join,
    Recreate,
}

impl BranchSetup {
    pub(crate) fn decide(has_local: bool, has_remote: bool) -> Self {
        match (has_local, has_remote) {
            (true, true) => Self::Rejoin,
            (false, false) => Self::Create,
            (false, true) => Self::Join,
            (true, false) => Self::Recreate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StartOptions {
    pub(crate) timer: Option<String>,
    pub(crate) branch: Option<String>,
    pub(crate) share: bool,
}

impl StartOptions {
    /// `[minutes] [branch] [share]`; `share` may appear in either trailing slot.
    pub(crate) fn parse(params: &[String]) -> Self {
        let mut options = Self {
            timer: params.first().cloned(),
            ..Self::default()
        };
        for param in params.iter().skip(1) {
            if param == "share" {
                options.share = true;
            } else if options.branch.is_none() {
                options.branch = Some(param.clone());
            }
        }
        options
    }
}

pub(crate) struct Session<R: Runner, C: Console> {
    pub(crate) config: MobConfig,
    pub(crate) config_path: PathBuf,
    pub(crate) runner: R,
    pub(crate) console: C,
    pub(crate) logger: Logger,
}

impl<R: Runner, C: Console> Session<R, C> {
    pub(crate) fn new(
        config: MobConfig,
        config_path: PathBuf,
        runner: R,
        console: C,
        logger: Logger,
    ) -> Self {
        Self {
            config,
            config_path,
            runner,
            console,
            logger,
        }
    }

    fn invoke(&mut self, args: &[&str]) -> Result<(String, CommandResult), Quit> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let rendered = render_args(&args);
        if self.config.debug {
            self.console.say(&format!("git {}", rendered));
        }
        let result = match self.runner.git(&args) {
            Ok(result) => result,
            Err(err) => {
                self.logger.git_error(&args, &err);
                self.console.say_error(&err);
                return Err(quit(&self.logger, &err, 1));
            }
        };
        self.logger.git(&args, result.exit_code);
        if self.config.debug && !result.output.is_empty() {
            self.console.say(result.output.trim_end());
        }
        Ok((rendered, result))
    }

    /// Runs a git command that changes the repository; failure ends the process.
    pub(crate) fn git(&mut self, args: &[&str]) -> Result<String, Quit> {
        let (rendered, result) = self.invoke(args)?;
        if !result.success() {
            self.console.say_error(&format!("git {}", rendered));
            self.console.say_error(result.output.trim_end());
            return Err(quit(&self.logger, &format!("git_failed:{}", rendered), 1));
        }
        self.console.say_okay(&format!("git {}", rendered));
        Ok(result.output)
    }

    /// Runs a read-only git query; failure still ends the process.
    pub(crate) fn silent_git(&mut self, args: &[&str]) -> Result<String, Quit> {
        let (rendered, result) = self.invoke(args)?;
        if !result.success() {
            self.console.say(result.output.trim_end());
            self.console
                .say_error(&format!("git {} exited with {}", rendered, result.exit_code));
            return Err(quit(&self.logger, &format!("git_failed:{}", rendered), 1));
        }
        Ok(result.output)
    }

    pub(crate) fn has_uncommitted_changes(&mut self) -> Result<bool, Quit> {
        let output = self.silent_git(&["status", "--short"])?;
        Ok(has_changes(&output))
    }

    pub(crate) fn has_local_work_branch(&mut self) -> Result<bool, Quit> {
        let output = self.silent_git(&["branch"])?;
        Ok(listing_contains(&output, &self.config.wip_branch))
    }

    pub(crate) fn has_remote_work_branch(&mut self) -> Result<bool, Quit> {
        let output = self.silent_git(&["branch", "--remotes"])?;
        let remote = self.config.remote_branch(&self.config.wip_branch);
        Ok(listing_contains(&output, &remote))
    }

    pub(crate) fn is_on_work_branch(&mut self) -> Result<bool, Quit> {
        let output = self.silent_git(&["branch"])?;
        Ok(is_current(&output, &self.config.wip_branch))
    }

    fn git_user_name(&mut self) -> Result<Option<String>, Quit> {
        let (_, result) = self.invoke(&["config", "--get", "user.name"])?;
        let name = result.output.trim();
        if !result.success() || name.is_empty() {
            return Ok(None);
        }
        Ok(Some(name.to_string()))
    }

    fn work_range(&self) -> String {
        format!("{}..{}", self.config.base_branch, self.config.wip_branch)
    }

    pub(crate) fn start(&mut self, params: &[String]) -> Result<(), Quit> {
        self.logger.transition("start");
        if self.has_uncommitted_changes()? {
            self.console.say_note("uncommitted changes");
            return Ok(());
        }

        let options = StartOptions::parse(params);
        if let Some(branch) = &options.branch {
            self.config.wip_branch = branch.clone();
        }
        if self.work_branch_is_base() {
            return Ok(());
        }

        self.git(&["fetch", "--prune"])?;
        if self.is_on_work_branch()? && !self.has_remote_work_branch()? {
            // The upstream was pruned, so `pull` has nothing to merge.
            let remote = self.config.remote_branch(&self.config.wip_branch);
            self.console
                .say_error(&format!("{} is gone, the mob session already ended", remote));
            self.console
                .say_todo("run mob done or mob reset, then start again");
            return Ok(());
        }
        self.git(&["pull", "--ff-only"])?;

        self.setup_work_branch()?;

        if let Some(minutes) = &options.timer {
            self.start_timer(minutes);
        }
        if options.share {
            self.start_screenshare();
        }

        if !self.config_path.is_file() {
            self.write_config_file()?;
        }
        Ok(())
    }

    /// Reports a configuration whose work branch is the base branch.
    pub(crate) fn work_branch_is_base(&mut self) -> bool {
        if self.config.wip_branch != self.config.base_branch {
            return false;
        }
        self.console.say_error(&format!(
            "work branch and base branch are both '{}'",
            self.config.base_branch
        ));
        true
    }

    pub(crate) fn setup_work_branch(&mut self) -> Result<(), Quit> {
        let has_local = self.has_local_work_branch()?;
        let has_remote = self.has_remote_work_branch()?;
        let wip = self.config.wip_branch.clone();
        let upstream = format!("--set-upstream-to={}", self.config.remote_branch(&wip));

        match BranchSetup::decide(has_local, has_remote) {
            BranchSetup::Rejoin => {
                self.console.say_info("rejoining mob session");
                if !self.is_on_work_branch()? {
                    self.git(&["branch", "-D", &wip])?;
                    self.git(&["checkout", &wip])?;
                    self.git(&["branch", &upstream, &wip])?;
                }
            }
            BranchSetup::Create => {
                self.console.say_info(&format!(
                    "create {} from {}",
                    wip, self.config.base_branch
                ));
                self.create_work_branch()?;
            }
            BranchSetup::Join => {
                self.console.say_info("joining mob session");
                self.git(&["checkout", &wip])?;
                self.git(&["branch", &upstream, &wip])?;
            }
            BranchSetup::Recreate => {
                self.console.say_info(&format!(
                    "purging local branch and start new {} branch from {}",
                    wip, self.config.base_branch
                ));
                // Only `setup` gets here while on the work branch; `start` stops earlier.
                if self.is_on_work_branch()? {
                    let base = self.config.base_branch.clone();
                    self.git(&["checkout", &base])?;
                }
                self.git(&["branch", "-D", &wip])?;
                self.create_work_branch()?;
            }
        }
        Ok(())
    }

    fn create_work_branch(&mut self) -> Result<(), Quit> {
        let wip = self.config.wip_branch.clone();
        let base = self.config.base_branch.clone();
        let remote = self.config.remote_name.clone();
        let remote_base = self.config.remote_branch(&base);

        self.git(&["checkout", &base])?;
        self.git(&["merge", &remote_base, "--ff-only"])?;
        self.git(&["branch", &wip])?;
        self.git(&["checkout", &wip])?;
        self.git(&["push", "--set-upstream", &remote, &wip])?;
        Ok(())
    }

    pub(crate) fn write_config_file(&mut self) -> Result<(), Quit> {
        self.console.say_info("creating mob config file...");
        if let Err(err) = save_config(&self.config_path, &self.config) {
            self.console.say_error(&err);
            return Err(quit(&self.logger, &err, 1));
        }
        let path = self.config_path.display().to_string();
        let pending = self.silent_git(&["status", "--short", "--", &path])?;
        if !has_changes(&pending) {
            self.console.say_okay("mob config file unchanged");
            return Ok(());
        }
        self.git(&["add", "--", &path])?;
        self.git(&["commit", "--message", START_COMMIT_MESSAGE, "--no-verify"])?;
        self.console.say_okay("mob config file created");
        Ok(())
    }

    pub(crate) fn next(&mut self) -> Result<(), Quit> {
        self.logger.transition("next");
        if self.work_branch_is_base() {
            return Ok(());
        }
        if !self.is_on_work_branch()? {
            self.console.say_error("you aren't mobbing");
            return Ok(());
        }

        if !self.has_uncommitted_changes()? {
            self.console.say_info("nothing was done, so nothing to commit");
        } else {
            let message = self.config.wip_commit_message.clone();
            let remote = self.config.remote_name.clone();
            let wip = self.config.wip_branch.clone();
            self.git(&["add", "--all"])?;
            self.git(&["commit", "--message", &message, "--no-verify"])?;
            let changes = self.silent_git(&["diff", "HEAD^1", "HEAD", "--stat"])?;
            self.git(&["push", &remote, &wip])?;
            self.console.say(changes.trim());
        }

        self.show_next()?;

        if !self.config.mob_next_stay {
            let base = self.config.base_branch.clone();
            self.git(&["checkout", &base])?;
        }
        Ok(())
    }

    fn show_next(&mut self) -> Result<(), Quit> {
        if self.config.debug {
            self.console
                .say("determining next person based on previous changes");
        }
        let range = self.work_range();
        let log = self.silent_git(&[
            "--no-pager",
            "log",
            &range,
            "--pretty=format:%an",
            "--abbrev-commit",
        ])?;
        let authors = parse_authors(&log);
        if self.config.debug {
            self.console
                .say(&format!("there have been {} changes", authors.len()));
        }
        let Some(me) = self.git_user_name()? else {
            return Ok(());
        };
        if self.config.debug {
            self.console
                .say(&format!("current git user.name is '{}'", me));
        }
        if let Some(handover) = next_typist(&authors, &me) {
            self.console.say_info(&format!(
                "Committers after your last commit: {}",
                handover.history()
            ));
            self.console
                .say_info(&format!("***{}*** is (probably) next.", handover.next));
        }
        Ok(())
    }

    pub(crate) fn done(&mut self) -> Result<(), Quit> {
        self.logger.transition("done");
        if self.work_branch_is_base() {
            return Ok(());
        }
        if !self.is_on_work_branch()? {
            self.console.say_error("you aren't mobbing");
            return Ok(());
        }

        self.git(&["fetch", "--prune"])?;

        let wip = self.config.wip_branch.clone();
        let base = self.config.base_branch.clone();
        let remote = self.config.remote_name.clone();

        if self.has_remote_work_branch()? {
            if self.has_uncommitted_changes()? {
                let message = self.config.wip_commit_message.clone();
                self.git(&["add", "--all"])?;
                self.git(&["commit", "--message", &message, "--no-verify"])?;
            }
            self.git(&["push", &remote, &wip])?;

            let remote_base = self.config.remote_branch(&base);
            self.git(&["checkout", &base])?;
            self.git(&["merge", &remote_base, "--ff-only"])?;
            self.git(&["merge", "--squash", "--ff", &wip])?;

            self.git(&["branch", "-D", &wip])?;
            self.git(&["push", &remote, "--delete", &wip])?;

            let staged = self.silent_git(&["diff", "--cached", "--stat"])?;
            self.console.say(staged.trim());
            self.console.say_todo("git commit -m 'describe the changes'");
        } else {
            self.git(&["checkout", &base])?;
            self.git(&["branch", "-D", &wip])?;
            self.console
                .say_info("someone else already ended your mob session");
        }

        self.remove_config_file()
    }

    fn remove_config_file(&mut self) -> Result<(), Quit> {
        let path = self.config_path.display().to_string();
        self.git(&["rm", "--force", "--ignore-unmatch", "--quiet", "--", &path])?;
        if self.config_path.exists() {
            if let Err(err) = fs::remove_file(&self.config_path) {
                let message = format!("Failed to remove {}: {}", path, err);
                self.console.say_error(&message);
                return Err(quit(&self.logger, &message, 1));
            }
        }
        self.console.say_info("mob config file removed");
        Ok(())
    }

    pub(crate) fn reset(&mut self) -> Result<(), Quit> {
        self.logger.transition("reset");
        if self.work_branch_is_base() {
            return Ok(());
        }
        let wip = self.config.wip_branch.clone();
        let base = self.config.base_branch.clone();
        let remote = self.config.remote_name.clone();

        self.git(&["fetch", "--prune"])?;
        self.git(&["checkout", &base])?;
        if self.has_local_work_branch()? {
            self.git(&["branch", "-D", &wip])?;
        }
        if self.has_remote_work_branch()? {
            self.git(&["push", &remote, "--delete", &wip])?;
        }
        Ok(())
    }

    pub(crate) fn status(&mut self) -> Result<(), Quit> {
        if self.is_on_work_branch()? {
            self.console.say_info("mobbing in progress");
            let range = self.work_range();
            let output = self.silent_git(&[
                "--no-pager",
                "log",
                &range,
                "--pretty=format:%h %cr <%an>",
                "--abbrev-commit",
            ])?;
            self.console.say(output.trim_end());
        } else {
            self.console.say_info("you aren't mobbing right now");
        }

        if !self.has_voice_command() {
            self.console.say_note(&format!(
                "text-to-speech disabled because '{}' not found",
                self.config.voice_command
            ));
        }
        Ok(())
    }

    fn has_voice_command(&self) -> bool {
        self.config
            .voice_command
            .split_whitespace()
            .next()
            .map(|program| self.runner.command_exists(program))
            .unwrap_or(false)
    }

    pub(crate) fn start_timer(&mut self, minutes: &str) {
        if self.config.debug {
            self.console
                .say(&format!("Starting timer for {} minutes", minutes));
        }
        let minutes = match parse_minutes(minutes) {
            Ok(minutes) => minutes,
            Err(err) => {
                self.console.say_error(&err);
                return;
            }
        };
        let script = timer_script(&self.config.voice_command, minutes);
        if self.config.debug {
            self.console.say(&format!("sh -c {}", script));
        }
        self.logger
            .record("timer", json!({ "minutes": minutes, "script": &script }));
        match self.runner.spawn_shell(&script) {
            Ok(()) => {
                self.console.say_okay(&format!(
                    "{} minutes timer started (finishes at approx. {})",
                    minutes,
                    finish_time(Local::now(), minutes)
                ));
            }
            Err(err) => {
                self.console
                    .say_error("timer couldn't be started... (timer only works on OSX)");
                self.console.say_error(&err);
            }
        }
    }

    pub(crate) fn start_screenshare(&mut self) {
        let plan = share_plan(std::env::consts::OS);
        if self.config.debug {
            self.console.say(&format!("sh -c {}", plan.script));
        }
        self.logger
            .record("screenshare", json!({ "os": std::env::consts::OS }));
        match self.runner.spawn_shell(plan.script) {
            Ok(()) => {
                self.console.say_okay(&format!(
                    "Sharing screen with zoom (requires the global shortcut {})",
                    plan.shortcut
                ));
            }
            Err(err) => {
                self.console.say_error(
                    "screenshare couldn't be started... (screenshare only works on OSX or Linux with xdotool installed)",
                );
                self.console.say_error(&err);
            }
        }
    }
}
