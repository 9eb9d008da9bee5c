use shell_escape::unix::escape;
use std::env;
use std::process::{Command, Stdio};

pub(crate) fn render_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| escape(arg.into()).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandResult {
    /// stdout followed by stderr.
    pub(crate) output: String,
    pub(crate) exit_code: i32,
}

impl CommandResult {
    pub(crate) fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the session logic and the processes it drives.
pub(crate) trait Runner {
    /// Runs git to completion with the given arguments.
    fn git(&mut self, args: &[String]) -> Result<CommandResult, String>;

    /// Launches `sh -c script` without waiting for it.
    fn spawn_shell(&mut self, script: &str) -> Result<(), String>;

    fn command_exists(&self, name: &str) -> bool {
        command_exists(name)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SystemRunner;

impl Runner for SystemRunner {
    fn git(&mut self, args: &[String]) -> Result<CommandResult, String> {
        let output = Command::new("git")
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| format!("Failed to run git {}: {}", render_args(args), err))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandResult {
            output: combined,
            exit_code: output.status.code().unwrap_or(1),
        })
    }

    fn spawn_shell(&mut self, script: &str) -> Result<(), String> {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|err| format!("Failed to launch sh: {}", err))
    }
}

pub(crate) fn command_exists(name: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|path| {
        let full = path.join(name);
        full.is_file() || full.is_symlink()
    })
}
