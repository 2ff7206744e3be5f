use askama::Template;

use super::Layout;
use crate::models::{format_display_datetime, Task, TaskForm};

/// A task as listed on a contract page
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: i32,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub rate: i32,
    pub url: String,
    pub edit_url: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            description: task.description.clone(),
            start_time: format_display_datetime(task.start_time),
            end_time: format_display_datetime(task.end_time),
            duration: task.formatted_duration(),
            rate: task.rate,
            url: format!("/tasks/{}", task.id),
            edit_url: format!("/tasks/{}/edit", task.id),
        }
    }
}

/// Field values for the task form partial
#[derive(Debug, Clone)]
pub struct TaskFormView {
    pub action_url: String,
    pub submit_label: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub rate: String,
}

impl TaskFormView {
    pub fn new(action_url: String, submit_label: &str, form: &TaskForm) -> Self {
        Self {
            action_url,
            submit_label: submit_label.to_string(),
            description: form.description.clone(),
            start_time: form.start_time.clone(),
            end_time: form.end_time.clone(),
            duration: form.duration.clone(),
            rate: form.rate.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "tasks/show.html")]
pub struct TaskShowView {
    pub layout: Layout,
    pub task: TaskRow,
    pub contract_url: String,
}

#[derive(Template)]
#[template(path = "tasks/edit.html")]
pub struct TaskEditView {
    pub layout: Layout,
    pub form: TaskFormView,
    pub errors: Vec<String>,
    pub contract_url: String,
}
