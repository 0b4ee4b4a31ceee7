//! Subtask list queries for the task detail view, independent of the parent
//! task pipeline.

use crate::model::Subtask;

/// Sort order for the subtask list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtaskSort {
    #[default]
    Newest,
    Oldest,
    /// Priority rank descending: High, Medium, Low.
    Priority,
}

/// Case-insensitive substring filter over title and description, then sort.
/// Stable, so equal keys keep their stored order.
pub fn visible_subtasks<'a>(
    subtasks: &'a [Subtask],
    search: &str,
    sort: SubtaskSort,
) -> Vec<&'a Subtask> {
    let needle = search.trim().to_lowercase();
    let mut out: Vec<&Subtask> = subtasks
        .iter()
        .filter(|sub| {
            needle.is_empty()
                || sub.title.to_lowercase().contains(&needle)
                || sub.description.to_lowercase().contains(&needle)
        })
        .collect();

    match sort {
        SubtaskSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SubtaskSort::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SubtaskSort::Priority => out.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status, SubtaskId};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    fn sub(id: &str, title: &str, priority: Priority, age_days: i64) -> Subtask {
        Subtask {
            id: SubtaskId::from(id),
            title: title.to_string(),
            description: String::new(),
            status: Status::Todo,
            priority,
            due_date: None,
            created_at: now() - Duration::days(age_days),
            updated_at: now() - Duration::days(age_days),
        }
    }

    fn ids(subs: &[&Subtask]) -> Vec<String> {
        subs.iter().map(|s| s.id.0.clone()).collect()
    }

    #[test]
    fn search_covers_title_and_description() {
        let mut a = sub("a", "Write intro", Priority::Low, 1);
        a.description = "cover the backstory".into();
        let b = sub("b", "Review", Priority::Low, 2);
        let subs = [a, b];

        assert_eq!(
            ids(&visible_subtasks(&subs, "BACKstory", SubtaskSort::Newest)),
            vec!["a"]
        );
        assert_eq!(visible_subtasks(&subs, "", SubtaskSort::Newest).len(), 2);
    }

    #[test]
    fn newest_and_oldest_sort_by_creation() {
        let subs = [
            sub("old", "x", Priority::Low, 5),
            sub("new", "x", Priority::Low, 1),
        ];
        assert_eq!(
            ids(&visible_subtasks(&subs, "", SubtaskSort::Newest)),
            vec!["new", "old"]
        );
        assert_eq!(
            ids(&visible_subtasks(&subs, "", SubtaskSort::Oldest)),
            vec!["old", "new"]
        );
    }

    #[test]
    fn priority_sort_ranks_high_first() {
        let subs = [
            sub("m", "x", Priority::Medium, 1),
            sub("h", "x", Priority::High, 2),
            sub("l", "x", Priority::Low, 3),
        ];
        assert_eq!(
            ids(&visible_subtasks(&subs, "", SubtaskSort::Priority)),
            vec!["h", "m", "l"]
        );
    }
}
