// Task Entity - planning checklist items

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require_text, Draft, Entity, EntityKind, Patch};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "title", &self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn assign(mut self, who: impl Into<String>) -> Self {
        self.assigned_to = Some(who.into());
        self
    }
}

impl Draft for NewTask {
    type Entity = Task;

    fn into_entity(self, id: String) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.unwrap_or_default(),
            due_date: self.due_date,
            category: self.category.map(|c| c.trim().to_string()).unwrap_or_default(),
            assigned_to: self.assigned_to.unwrap_or_default(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(done: bool) -> Self {
        TaskPatch {
            completed: Some(done),
            ..Default::default()
        }
    }
}

impl Patch for TaskPatch {
    type Entity = Task;

    fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(category) = self.category {
            task.category = category.trim().to_string();
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_task_not_completed() {
        let task = NewTask::new("Book the DJ", "vendors")
            .due(date(2026, 9, 1))
            .into_entity("t1".to_string());

        assert!(!task.completed);
        assert_eq!(task.category, "vendors");
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_missing_title_rejected() {
        let task = NewTask::default().into_entity("t1".to_string());
        assert_eq!(task.validate().unwrap_err().field, "title");
    }

    #[test]
    fn test_overdue() {
        let mut task = NewTask::new("Send invitations", "planning")
            .due(date(2026, 9, 20))
            .into_entity("t1".to_string());

        assert!(task.is_overdue(date(2026, 10, 1)));
        assert!(!task.is_overdue(date(2026, 9, 20)));

        TaskPatch::completed(true).apply_to(&mut task);
        assert!(!task.is_overdue(date(2026, 10, 1)));
    }
}
