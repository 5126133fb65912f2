//! In-memory mock of the todo API's documented contract.
//!
//! Implements `/auth/register`, `/auth/login` and the bearer-token-guarded
//! `/todos` CRUD routes, wrapping every response in the
//! `{ success, message, data }` envelope. Todos are scoped to the
//! authenticated user. Used by the core crate's integration tests over real
//! HTTP and runnable standalone via the binary.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub priority: Priority,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub priority: Priority,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

#[derive(Deserialize)]
pub struct Register {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order: Option<String>,
}

struct UserRecord {
    id: String,
    name: String,
    email: String,
    password: String,
}

struct OwnedTodo {
    owner: String,
    todo: Todo,
}

#[derive(Default)]
pub struct MockState {
    users: HashMap<String, UserRecord>,
    sessions: HashMap<String, String>,
    todos: Vec<OwnedTodo>,
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockState::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn envelope(message: &str, data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

fn failure(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "message": message }))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Option<String> {
    let token = bearer_token(headers)?;
    db.read().await.sessions.get(&token).cloned()
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Register>,
) -> (StatusCode, Json<Value>) {
    let mut state = db.write().await;
    if state.users.contains_key(&input.email) {
        return (StatusCode::CONFLICT, failure("Email already registered"));
    }

    let user_id = Uuid::new_v4().to_string();
    state.users.insert(
        input.email.clone(),
        UserRecord {
            id: user_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            password: input.password,
        },
    );
    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), user_id.clone());

    (
        StatusCode::CREATED,
        envelope(
            "User registered",
            json!({
                "token": token,
                "user": { "id": user_id, "name": input.name, "email": input.email },
            }),
        ),
    )
}

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> (StatusCode, Json<Value>) {
    let mut state = db.write().await;
    let user = match state.users.get(&input.email) {
        Some(user) if user.password == input.password => {
            (user.id.clone(), user.name.clone(), user.email.clone())
        }
        _ => return (StatusCode::UNAUTHORIZED, failure("Invalid email or password")),
    };

    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), user.0.clone());

    (
        StatusCode::OK,
        envelope(
            "Login successful",
            json!({
                "token": token,
                "user": { "id": user.0, "name": user.1, "email": user.2 },
            }),
        ),
    )
}

async fn list_todos(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = authorize(&db, &headers).await else {
        return (StatusCode::UNAUTHORIZED, failure("Authentication required"));
    };

    let state = db.read().await;
    let mut todos: Vec<Todo> = state
        .todos
        .iter()
        .filter(|t| t.owner == user_id)
        .filter(|t| params.completed.map_or(true, |c| t.todo.completed == c))
        .filter(|t| params.priority.map_or(true, |p| t.todo.priority == p))
        .map(|t| t.todo.clone())
        .collect();

    todos.sort_by_key(|t| t.date);
    if params.order.as_deref() == Some("desc") {
        todos.reverse();
    }

    let total = todos.len();
    let page = params.page.unwrap_or(1).max(1) as usize;
    let limit = params.limit.unwrap_or(10).max(1) as usize;
    let items: Vec<Todo> = todos
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();
    let has_next = page.saturating_mul(limit) < total;

    let mut data = json!({
        "todos": items,
        "totalTodos": total,
        "hasNextPage": has_next,
    });
    if has_next {
        data["nextPage"] = json!(page + 1);
    }

    (StatusCode::OK, envelope("Todos fetched", data))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = authorize(&db, &headers).await else {
        return (StatusCode::UNAUTHORIZED, failure("Authentication required"));
    };

    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        completed: input.completed,
        date: input.date,
        priority: input.priority,
    };
    db.write().await.todos.push(OwnedTodo {
        owner: user_id,
        todo: todo.clone(),
    });

    (StatusCode::CREATED, envelope("Todo created", json!(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateTodo>,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = authorize(&db, &headers).await else {
        return (StatusCode::UNAUTHORIZED, failure("Authentication required"));
    };

    let mut state = db.write().await;
    let Some(owned) = state
        .todos
        .iter_mut()
        .find(|t| t.todo.id == id && t.owner == user_id)
    else {
        return (StatusCode::NOT_FOUND, failure("Todo not found"));
    };

    if let Some(title) = input.title {
        owned.todo.title = title;
    }
    if let Some(completed) = input.completed {
        owned.todo.completed = completed;
    }
    if let Some(date) = input.date {
        owned.todo.date = date;
    }
    if let Some(priority) = input.priority {
        owned.todo.priority = priority;
    }

    (StatusCode::OK, envelope("Todo updated", json!(owned.todo.clone())))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = authorize(&db, &headers).await else {
        return (StatusCode::UNAUTHORIZED, failure("Authentication required"));
    };

    let mut state = db.write().await;
    let Some(position) = state
        .todos
        .iter()
        .position(|t| t.todo.id == id && t.owner == user_id)
    else {
        return (StatusCode::NOT_FOUND, failure("Todo not found"));
    };
    let removed = state.todos.remove(position);

    (StatusCode::OK, envelope("Todo deleted", json!(removed.todo)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_wire_field_names() {
        let todo = Todo {
            id: "t1".to_string(),
            title: "Test".to_string(),
            completed: false,
            date: "2024-01-01T00:00:00Z".parse().unwrap(),
            priority: Priority::High,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["completed"], false);
        let date: DateTime<Utc> = json["date"].as_str().unwrap().parse().unwrap();
        assert_eq!(date, todo.date);
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
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> =
            serde_json::from_str(r#"{"date":"2024-01-01T00:00:00Z","priority":"LOW"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
        assert!(input.date.is_none());
        assert!(input.priority.is_none());
    }
}
