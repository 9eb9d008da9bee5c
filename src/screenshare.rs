#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SharePlan {
    pub(crate) script: &'static str,
    pub(crate) shortcut: &'static str,
}

const MACOS_SCRIPT: &str = "(osascript -e 'tell application \"System Events\" to keystroke \"S\" using {shift down, command down}')";
const LINUX_SCRIPT: &str = "(xdotool windowactivate $(xdotool search --name --onlyvisible 'zoom meeting') && xdotool keydown Alt s)";

/// Keystroke automation that toggles zoom screen sharing on `os`.
pub(crate) fn share_plan(os: &str) -> SharePlan {
    match os {
        "linux" => SharePlan {
            script: LINUX_SCRIPT,
            shortcut: "ALT+S",
        },
        _ => SharePlan {
            script: MACOS_SCRIPT,
            shortcut: "SHIFT+COMMAND+S",
        },
    }
}
