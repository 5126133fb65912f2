//! Domain DTOs and wire types for the todo API.
//!
//! # Design
//! These types mirror the remote API's schema but are defined independently
//! from the mock-server crate; integration tests catch schema drift. Response
//! envelopes are decoded strictly — a shape mismatch is an error, never a
//! silent default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Todo priority. Wire format is the uppercase name (`"HIGH"` etc.), both in
/// JSON bodies and in the `priority` query parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub priority: Priority,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub priority: Priority,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Account record returned alongside a token on login/register.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The `data` payload of a successful `/auth/login` or `/auth/register`
/// response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// The envelope every API response is wrapped in:
/// `{ success, message, data }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

/// The `data` payload of `GET /todos`: one page of todos plus pagination
/// metadata.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total_todos: u64,
    pub has_next_page: bool,
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// Field to sort a listing by. Declared for API parity but not part of the
/// list query contract; see [`TodoFilters::query_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Completed,
    Date,
    Priority,
}

/// Sort direction for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filter and pagination parameters for `GET /todos`. All fields are
/// optional; absent fields produce no query parameter at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoFilters {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub date_gte: Option<DateTime<Utc>>,
    pub date_lte: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl TodoFilters {
    /// Serialize the filters into a query string, without a leading `?`.
    ///
    /// Only `completed`, `priority`, `page`, `limit` and `order` are wired
    /// into the list query; `sort`, `date_gte` and `date_lte` are declared
    /// in the filter type but are not part of the list endpoint's contract.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(completed) = self.completed {
            pairs.push(format!("completed={completed}"));
        }
        if let Some(priority) = self.priority {
            pairs.push(format!("priority={}", priority.as_str()));
        }
        if let Some(page) = self.page {
            pairs.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={limit}"));
        }
        if let Some(order) = self.order {
            pairs.push(format!("order={}", order.as_str()));
        }
        pairs.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_uses_uppercase_wire_format() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), r#""HIGH""#);
        let back: Priority = serde_json::from_str(r#""LOW""#).unwrap();
        assert_eq!(back, Priority::Low);
    }

    #[test]
    fn todo_deserializes_from_documented_shape() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":"7","title":"x","completed":true,"date":"2024-01-01T00:00:00Z","priority":"HIGH"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, "7");
        assert!(todo.completed);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(
            r#"{"title":"New","date":"2024-01-01T00:00:00Z","priority":"LOW"}"#,
        )
        .unwrap();
        assert!(!input.completed);
    }

    #[test]
    fn update_todo_omits_absent_fields() {
        let input = UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        };
        let json: serde_json::Value = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }

    #[test]
    fn todo_page_decodes_camel_case_metadata() {
        let page: TodoPage = serde_json::from_str(
            r#"{"todos":[],"totalTodos":12,"hasNextPage":true,"nextPage":2}"#,
        )
        .unwrap();
        assert_eq!(page.total_todos, 12);
        assert!(page.has_next_page);
        assert_eq!(page.next_page, Some(2));
    }

    #[test]
    fn todo_page_next_page_is_optional() {
        let page: TodoPage =
            serde_json::from_str(r#"{"todos":[],"totalTodos":0,"hasNextPage":false}"#).unwrap();
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn envelope_missing_data_is_an_error() {
        let result: Result<Envelope<TodoPage>, _> =
            serde_json::from_str(r#"{"success":true,"message":"ok"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn query_string_empty_filters_produce_no_parameters() {
        assert_eq!(TodoFilters::default().query_string(), "");
    }

    #[test]
    fn query_string_includes_only_present_fields() {
        let filters = TodoFilters {
            priority: Some(Priority::Medium),
            limit: Some(5),
            ..TodoFilters::default()
        };
        assert_eq!(filters.query_string(), "priority=MEDIUM&limit=5");
    }

    #[test]
    fn query_string_full_scenario() {
        let filters = TodoFilters {
            completed: Some(true),
            priority: Some(Priority::High),
            page: Some(1),
            limit: Some(10),
            order: Some(SortOrder::Asc),
            ..TodoFilters::default()
        };
        assert_eq!(
            filters.query_string(),
            "completed=true&priority=HIGH&page=1&limit=10&order=asc"
        );
    }

    #[test]
    fn query_string_never_serializes_sort_or_date_bounds() {
        let filters = TodoFilters {
            date_gte: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            date_lte: Some("2024-12-31T00:00:00Z".parse().unwrap()),
            sort: Some(SortField::Date),
            order: Some(SortOrder::Desc),
            ..TodoFilters::default()
        };
        assert_eq!(filters.query_string(), "order=desc");
    }
}
