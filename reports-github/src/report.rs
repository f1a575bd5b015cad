//! Plain-text summaries printed by the command line tool.

use std::io::{self, Write};

use crate::models::Event;

/// Counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    rows: Vec<(String, usize)>,
}

impl Tally {
    pub fn add(&mut self, label: &str) {
        match self.rows.iter_mut().find(|(name, _)| name == label) {
            Some((_, count)) => *count += 1,
            None => self.rows.push((label.to_owned(), 1)),
        }
    }

    pub fn rows(&self) -> &[(String, usize)] {
        &self.rows
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for label in iter {
            tally.add(label);
        }
        tally
    }
}

/// Number of events per event type.
pub fn activity_summary(events: &[Event]) -> Tally {
    events.iter().map(|event| event.kind.as_str()).collect()
}

/// Number of pushes per repository.
pub fn push_summary(events: &[Event]) -> Tally {
    events
        .iter()
        .filter(|event| event.kind == "PushEvent")
        .map(|event| event.repo_name.as_str())
        .collect()
}

/// Prints a titled two-column table:
///
/// ```text
/// Activity Summary
/// PushEvent   3
/// WatchEvent  1
/// -------------
/// Total       4
/// ```
pub fn print_table<W: Write>(out: &mut W, title: &str, tally: &Tally, total: bool) -> io::Result<()> {
    writeln!(out, "{title}")?;

    let total_count = tally.total().to_string();
    let label_width = tally
        .rows()
        .iter()
        .map(|(name, _)| name.len())
        .chain(total.then_some("Total".len()))
        .max()
        .unwrap_or_default();
    let count_width = tally
        .rows()
        .iter()
        .map(|(_, count)| count.to_string().len())
        .chain(total.then_some(total_count.len()))
        .max()
        .unwrap_or_default();

    for (name, count) in tally.rows() {
        writeln!(out, "{name:<label_width$}  {count:>count_width$}")?;
    }
    if total {
        writeln!(out, "{}", "-".repeat(label_width + 2 + count_width))?;
        writeln!(out, "{:<label_width$}  {total_count:>count_width$}", "Total")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: &str, repo: &str) -> Event {
        Event {
            kind: kind.to_owned(),
            repo_name: repo.to_owned(),
        }
    }

    #[test]
    fn test_summaries_keep_first_seen_order() {
        let events = vec![
            event("PushEvent", "octocat/b"),
            event("WatchEvent", "octocat/a"),
            event("PushEvent", "octocat/a"),
            event("PushEvent", "octocat/b"),
        ];

        let activity = activity_summary(&events);
        assert_eq!(
            activity.rows(),
            &[("PushEvent".to_owned(), 3), ("WatchEvent".to_owned(), 1)]
        );
        assert_eq!(activity.total(), 4);

        let pushes = push_summary(&events);
        assert_eq!(
            pushes.rows(),
            &[("octocat/b".to_owned(), 2), ("octocat/a".to_owned(), 1)]
        );
    }

    #[test]
    fn test_table_layout() {
        let tally: Tally = ["PushEvent", "WatchEvent", "PushEvent"].into_iter().collect();
        let mut out = Vec::new();

        print_table(&mut out, "Activity Summary", &tally, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Activity Summary\nPushEvent   2\nWatchEvent  1\n-------------\nTotal       3\n"
        );
    }

    #[test]
    fn test_empty_table_without_total() {
        let mut out = Vec::new();
        print_table(&mut out, "Project Push Summary", &Tally::default(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Project Push Summary\n");
    }
}
