#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Handover {
    pub(crate) next: String,
    /// Everyone who committed after your previous turn, newest first.
    pub(crate) committers: Vec<String>,
}

impl Handover {
    pub(crate) fn history(&self) -> String {
        self.committers.join(", ")
    }
}

/// Guesses who types next from the work branch authors (newest first).
///
/// Your newest run of commits is the handover you are making now, so the
/// search for your previous turn starts after that run. Whoever took over
/// right after that turn is expected to follow you again.
pub(crate) fn next_typist(authors: &[String], me: &str) -> Option<Handover> {
    let current_turn = authors
        .iter()
        .take_while(|author| author.as_str() == me)
        .count()
        .max(1);
    let position = authors
        .iter()
        .enumerate()
        .skip(current_turn)
        .find(|(_, author)| author.as_str() == me)
        .map(|(index, _)| index)?;

    let next = &authors[position - 1];
    let committers: Vec<String> = authors[..position]
        .iter()
        .filter(|author| author.as_str() != me)
        .cloned()
        .collect();
    if next == me || committers.is_empty() {
        return None;
    }
    Some(Handover {
        next: next.clone(),
        committers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn rotation_of_three_announces_the_one_after_you() {
        let handover = next_typist(&authors(&["A", "B", "C", "A"]), "A").expect("handover");
        assert_eq!(handover.next, "C");
        assert_eq!(handover.history(), "B, C");
    }

    #[test]
    fn single_commit_announces_nothing() {
        assert_eq!(next_typist(&authors(&["A"]), "A"), None);
    }

    #[test]
    fn empty_history_announces_nothing() {
        assert_eq!(next_typist(&[], "A"), None);
    }

    #[test]
    fn unknown_user_announces_nothing() {
        assert_eq!(next_typist(&authors(&["B", "C", "B"]), "A"), None);
    }

    #[test]
    fn most_recent_previous_turn_wins() {
        let handover =
            next_typist(&authors(&["A", "D", "A", "B", "C", "A"]), "A").expect("handover");
        assert_eq!(handover.next, "D");
        assert_eq!(handover.history(), "D");
    }

    #[test]
    fn pair_hands_back_and_forth() {
        let handover = next_typist(&authors(&["A", "B", "A"]), "A").expect("handover");
        assert_eq!(handover.next, "B");
        assert_eq!(handover.history(), "B");
    }

    #[test]
    fn first_handover_after_start_announces_nothing() {
        assert_eq!(next_typist(&authors(&["A", "A"]), "A"), None);
    }

    #[test]
    fn own_consecutive_commits_count_as_one_turn() {
        let handover = next_typist(&authors(&["A", "A", "B", "A"]), "A").expect("handover");
        assert_eq!(handover.next, "B");
        assert_eq!(handover.history(), "B");
    }

    #[test]
    fn handover_without_your_newest_commit_still_looks_back() {
        let handover = next_typist(&authors(&["B", "A"]), "A").expect("handover");
        assert_eq!(handover.next, "B");
        assert_eq!(handover.history(), "B");
    }
}
