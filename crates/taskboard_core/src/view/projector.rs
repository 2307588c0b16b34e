//! Search/filter projection of the task collection into board columns.
//!
//! # Responsibility
//! - Decide which tasks match the current search and filter controls.
//! - Partition matches into the three status columns.
//!
//! # Invariants
//! - Relative collection order is preserved inside every column.
//! - Empty search with `all`/`all` filters selects every task.

use crate::model::task::{ParseEnumError, Priority, Task, TaskStatus};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const FILTER_ALL: &str = "all";

/// Status filter select box value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == FILTER_ALL {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(FILTER_ALL),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Priority filter select box value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == FILTER_ALL {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl Display for PriorityFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(FILTER_ALL),
            Self::Only(priority) => write!(f, "{priority}"),
        }
    }
}

/// Current search and filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardQuery {
    /// Free text; matched case-insensitively against title and description.
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl BoardQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    /// Whether `task` passes all three controls.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task.status)
            && self.priority.matches(task.priority)
            && matches_search(task, &self.search.to_lowercase())
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty()
        || task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

/// One status column of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl BoardColumn<'_> {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// Filtered collection split into To Do / In Progress / Completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    columns: [BoardColumn<'a>; 3],
}

impl<'a> BoardView<'a> {
    /// Columns in board order.
    pub fn columns(&self) -> &[BoardColumn<'a>] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> &BoardColumn<'a> {
        &self.columns[status.index()]
    }

    /// Number of tasks that passed the filters.
    pub fn total(&self) -> usize {
        self.columns.iter().map(BoardColumn::count).sum()
    }
}

/// Tasks matching `query`, in collection order.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &BoardQuery) -> Vec<&'a Task> {
    tasks.iter().filter(|task| query.matches(task)).collect()
}

/// Filters `tasks` and partitions the result by status.
pub fn project<'a>(tasks: &'a [Task], query: &BoardQuery) -> BoardView<'a> {
    let mut columns = TaskStatus::ALL.map(|status| BoardColumn {
        status,
        tasks: Vec::new(),
    });
    for task in filter_tasks(tasks, query) {
        columns[task.status.index()].tasks.push(task);
    }
    BoardView { columns }
}

/// True when `due_date` is set and falls on a day before `today`.
pub fn is_overdue(due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_date.is_some_and(|due| due < today)
}

/// Short US display form, e.g. `Oct 19, 2026`.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        filter_tasks, format_due_date, is_overdue, project, BoardQuery, PriorityFilter,
        StatusFilter,
    };
    use crate::model::task::{Priority, Task, TaskDraft, TaskId, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(id: &str, title: &str, description: &str, priority: Priority, status: TaskStatus) -> Task {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let mut task = Task::from_draft(
            TaskId::from(id),
            TaskDraft::new(title).description(description).priority(priority),
            now,
        );
        task.status = status;
        task
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Buy milk", "", Priority::Low, TaskStatus::Todo),
            task("2", "Walk dog", "around the PARK", Priority::Medium, TaskStatus::InProgress),
            task("3", "File taxes", "", Priority::High, TaskStatus::Todo),
            task("4", "Call mom", "ask about milk", Priority::High, TaskStatus::Completed),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.id.to_string()).collect()
    }

    #[test]
    fn default_query_returns_everything_in_order() {
        let tasks = sample();
        let filtered = filter_tasks(&tasks, &BoardQuery::default());
        assert_eq!(ids(&filtered), ["1", "2", "3", "4"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, &BoardQuery::search("MILK"))), ["1", "4"]);
        assert_eq!(ids(&filter_tasks(&tasks, &BoardQuery::search("park"))), ["2"]);
        assert!(filter_tasks(&tasks, &BoardQuery::search("zebra")).is_empty());
    }

    #[test]
    fn filters_combine_with_search() {
        let tasks = sample();
        let query = BoardQuery {
            search: "milk".to_string(),
            status: StatusFilter::Only(TaskStatus::Completed),
            priority: PriorityFilter::Only(Priority::High),
        };
        assert_eq!(ids(&filter_tasks(&tasks, &query)), ["4"]);

        let high_only = BoardQuery {
            priority: PriorityFilter::Only(Priority::High),
            ..BoardQuery::default()
        };
        assert_eq!(ids(&filter_tasks(&tasks, &high_only)), ["3", "4"]);
    }

    #[test]
    fn filtering_twice_gives_the_same_result() {
        let tasks = sample();
        let query = BoardQuery {
            search: "l".to_string(),
            status: StatusFilter::Only(TaskStatus::Todo),
            priority: PriorityFilter::All,
        };
        let once: Vec<Task> = filter_tasks(&tasks, &query).into_iter().cloned().collect();
        let twice = filter_tasks(&once, &query);
        assert_eq!(ids(&twice), once.iter().map(|t| t.id.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn project_partitions_by_status_preserving_order() {
        let tasks = sample();
        let view = project(&tasks, &BoardQuery::default());

        assert_eq!(ids(&view.column(TaskStatus::Todo).tasks), ["1", "3"]);
        assert_eq!(ids(&view.column(TaskStatus::InProgress).tasks), ["2"]);
        assert_eq!(ids(&view.column(TaskStatus::Completed).tasks), ["4"]);
        assert_eq!(view.total(), 4);

        let titles: Vec<_> = view.columns().iter().map(|c| c.title()).collect();
        assert_eq!(titles, ["To Do", "In Progress", "Completed"]);
    }

    #[test]
    fn status_filter_empties_other_columns() {
        let tasks = sample();
        let query = BoardQuery {
            status: StatusFilter::Only(TaskStatus::InProgress),
            ..BoardQuery::default()
        };
        let view = project(&tasks, &query);
        assert_eq!(view.column(TaskStatus::Todo).count(), 0);
        assert_eq!(view.column(TaskStatus::InProgress).count(), 1);
        assert_eq!(view.column(TaskStatus::Completed).count(), 0);
    }

    #[test]
    fn filters_parse_select_values() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "in-progress".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TaskStatus::InProgress)
        );
        assert_eq!(
            "high".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert!("urgent".parse::<PriorityFilter>().is_err());
        assert_eq!(StatusFilter::All.to_string(), "all");
    }

    #[test]
    fn overdue_only_for_days_strictly_before_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(is_overdue(NaiveDate::from_ymd_opt(2026, 10, 18), today));
        assert!(!is_overdue(Some(today), today));
        assert!(!is_overdue(NaiveDate::from_ymd_opt(2026, 10, 20), today));
        assert!(!is_overdue(None, today));
    }

    #[test]
    fn due_date_formats_in_short_us_style() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_due_date(date), "Mar 5, 2026");
    }
}
