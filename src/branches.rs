use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BranchEntry {
    pub(crate) name: String,
    pub(crate) current: bool,
}

fn branch_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `* ` current, `+ ` checked out in another worktree, `  ` anything else.
    // Remote listings may carry a symbolic `origin/HEAD -> origin/main` entry.
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<marker>[*+ ]) (?P<name>\S+)(?: -> \S+)?\s*$").expect("valid regex")
    })
}

/// Parses `git branch` / `git branch --remotes` output.
pub(crate) fn parse_branch_listing(output: &str) -> Vec<BranchEntry> {
    output
        .lines()
        .filter_map(|line| branch_line_pattern().captures(line))
        .map(|caps| BranchEntry {
            name: caps["name"].to_string(),
            current: &caps["marker"] == "*",
        })
        .collect()
}

pub(crate) fn listing_contains(output: &str, branch: &str) -> bool {
    parse_branch_listing(output)
        .iter()
        .any(|entry| entry.name == branch)
}

pub(crate) fn is_current(output: &str, branch: &str) -> bool {
    parse_branch_listing(output)
        .iter()
        .any(|entry| entry.current && entry.name == branch)
}

/// `git status --short` prints nothing for a clean tree.
pub(crate) fn has_changes(status_output: &str) -> bool {
    !status_output.trim().is_empty()
}

/// Author names from a `%an` formatted log, newest first.
pub(crate) fn parse_authors(log_output: &str) -> Vec<String> {
    log_output
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = "  main\n* mob-session\n  mob-session-old\n+ elsewhere\n";
    const REMOTE: &str = "  origin/HEAD -> origin/main\n  origin/main\n  origin/mob-session\n";

    #[test]
    fn parses_markers_and_names() {
        let entries = parse_branch_listing(LOCAL);
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[1],
            BranchEntry {
                name: "mob-session".to_string(),
                current: true
            }
        );
        assert!(!entries[3].current);
    }

    #[test]
    fn branch_match_is_exact() {
        assert!(listing_contains(LOCAL, "mob-session"));
        assert!(!listing_contains(LOCAL, "mob"));
        assert!(!listing_contains("  mob-session-old\n", "mob-session"));
    }

    #[test]
    fn remote_listing_handles_symbolic_head() {
        assert!(listing_contains(REMOTE, "origin/mob-session"));
        assert!(listing_contains(REMOTE, "origin/HEAD"));
        assert!(!listing_contains(REMOTE, "upstream/mob-session"));
    }

    #[test]
    fn current_branch_detection() {
        assert!(is_current(LOCAL, "mob-session"));
        assert!(!is_current(LOCAL, "main"));
        assert!(!is_current("* (HEAD detached at 1a2b3c4)\n  main\n", "main"));
    }

    #[test]
    fn status_whitespace_counts_as_clean() {
        assert!(!has_changes(""));
        assert!(!has_changes("\n  \n"));
        assert!(has_changes("?? notes.txt\n"));
    }

    #[test]
    fn authors_skip_blank_lines() {
        assert_eq!(
            parse_authors("Ana\r\nBo\n\nCy\n"),
            vec!["Ana".to_string(), "Bo".to_string(), "Cy".to_string()]
        );
        assert!(parse_authors("").is_empty());
    }
}
