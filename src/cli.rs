use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "mob",
    about = "Fast git handover for mob programming.",
    long_about = "mob keeps a shared work-in-progress branch on the remote and hands the keyboard from one typist to the next.\n\nRun without a command to see the session status.",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub(crate) struct Cli {
    /// Stay on the work branch after `next`.
    #[arg(
        short = 's',
        long = "stay",
        global = true,
        help = "Stay on the work branch after handing over."
    )]
    pub(crate) stay: bool,

    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum CliCommand {
    #[command(visible_alias = "s", about = "Start mobbing as typist.")]
    Start {
        /// `[minutes] [branch] [share]`
        #[arg(value_name = "PARAM")]
        params: Vec<String>,
    },
    #[command(visible_alias = "n", about = "Hand over to the next typist.")]
    Next,
    #[command(visible_aliases = ["d", "end", "e"], about = "Finish the mob session.")]
    Done,
    #[command(visible_alias = "r", about = "Throw away any unfinished mob session.")]
    Reset,
    #[command(visible_alias = "t", about = "Start a handover timer.")]
    Timer {
        #[arg(value_name = "MINUTES")]
        minutes: Option<String>,
    },
    #[command(about = "Start zoom screen sharing.")]
    Share,
    #[command(about = "Show the status of the mob session.")]
    Status,
    #[command(about = "Interactively write the mob config file.")]
    Setup,
    #[command(visible_alias = "h", about = "Print usage.")]
    Help,
    #[command(visible_alias = "v", about = "Print the version.")]
    Version,
}

impl CliCommand {
    pub(crate) fn needs_repository(&self) -> bool {
        !matches!(self, Self::Help | Self::Version)
    }
}

pub(crate) fn usage() -> &'static str {
    "usage
\tmob [s]tart [minutes] [branch] [share] \t# start mobbing as typist
\tmob [-s][--stay] [n]ext \t# hand over to next typist
\tmob [d]one \t# finish mob session
\tmob [r]eset \t# resets any unfinished mob session
\tmob [t]imer <minutes> \t# start a handover timer
\tmob status \t# show status of mob session
\tmob share \t# start screenshare with zoom
\tmob setup \t# write the mob config file interactively
\tmob help \t# prints this help
\tmob version \t# prints the version

examples
\tmob start 10 \t# start 10 min session
\tmob start 10 share \t# start 10 min session with zoom screenshare
\tmob next \t# after 10 minutes work ...
\tmob done \t# after the work is done"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mob").chain(args.iter().copied()))
            .expect("parse cli")
    }

    #[test]
    fn no_command_defaults_to_none() {
        let cli = parse(&[]);
        assert_eq!(cli.command, None);
        assert!(!cli.stay);
    }

    #[test]
    fn aliases_map_to_commands() {
        assert_eq!(parse(&["n"]).command, Some(CliCommand::Next));
        assert_eq!(parse(&["end"]).command, Some(CliCommand::Done));
        assert_eq!(parse(&["e"]).command, Some(CliCommand::Done));
        assert_eq!(parse(&["d"]).command, Some(CliCommand::Done));
        assert_eq!(parse(&["r"]).command, Some(CliCommand::Reset));
        assert_eq!(parse(&["v"]).command, Some(CliCommand::Version));
        assert_eq!(
            parse(&["t", "5"]).command,
            Some(CliCommand::Timer {
                minutes: Some("5".to_string())
            })
        );
    }

    #[test]
    fn start_collects_parameters() {
        let cli = parse(&["s", "10", "share"]);
        assert_eq!(
            cli.command,
            Some(CliCommand::Start {
                params: vec!["10".to_string(), "share".to_string()]
            })
        );
    }

    #[test]
    fn stay_flag_before_or_after_verb() {
        assert!(parse(&["-s", "next"]).stay);
        assert!(parse(&["next", "--stay"]).stay);
    }

    #[test]
    fn help_and_version_work_outside_repositories() {
        assert!(!CliCommand::Help.needs_repository());
        assert!(!CliCommand::Version.needs_repository());
        assert!(CliCommand::Status.needs_repository());
    }
}
