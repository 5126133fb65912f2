//! Authenticated CRUD calls against the `/todos` resource.
//!
//! Every operation unwraps the documented response envelope and propagates
//! client errors unchanged — no retries, no local state.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{CreateTodo, Envelope, Todo, TodoFilters, TodoPage, UpdateTodo};

pub struct TodoAccess {
    client: ApiClient,
}

impl TodoAccess {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /todos` with the present filter fields as query parameters.
    pub fn list(&self, filters: &TodoFilters, token: &str) -> Result<TodoPage, ApiError> {
        let query = filters.query_string();
        let endpoint = if query.is_empty() {
            "/todos".to_string()
        } else {
            format!("/todos?{query}")
        };
        let envelope: Envelope<TodoPage> = self.client.get(&endpoint, Some(token))?;
        Ok(envelope.data)
    }

    /// `POST /todos`; returns the created todo.
    pub fn create(&self, input: &CreateTodo, token: &str) -> Result<Todo, ApiError> {
        let envelope: Envelope<Todo> = self.client.post("/todos", input, Some(token))?;
        Ok(envelope.data)
    }

    /// `PUT /todos/{id}` with a partial payload; returns the updated todo.
    pub fn update(&self, id: &str, changes: &UpdateTodo, token: &str) -> Result<Todo, ApiError> {
        let envelope: Envelope<Todo> =
            self.client.put(&format!("/todos/{id}"), changes, Some(token))?;
        Ok(envelope.data)
    }

    /// `DELETE /todos/{id}`; returns the server's confirmation payload (the
    /// deleted todo).
    pub fn delete(&self, id: &str, token: &str) -> Result<Todo, ApiError> {
        let envelope: Envelope<Todo> = self.client.delete(&format!("/todos/{id}"), Some(token))?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
    use crate::types::{Priority, SortOrder};

    struct StubTransport {
        seen: Arc<Mutex<Vec<HttpRequest>>>,
        response: HttpResponse,
    }

    impl Transport for StubTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn access_with(body: &str) -> (TodoAccess, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = StubTransport {
            seen: Arc::clone(&seen),
            response: HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: body.to_string(),
            },
        };
        let client = ApiClient::with_transport("http://localhost:3001", Box::new(transport));
        (TodoAccess::new(client), seen)
    }

    const ONE_TODO_PAGE: &str = r#"{
        "success": true,
        "message": "ok",
        "data": {
            "todos": [
                {"id":"7","title":"x","completed":true,"date":"2024-01-01T00:00:00Z","priority":"HIGH"}
            ],
            "totalTodos": 1,
            "hasNextPage": false
        }
    }"#;

    #[test]
    fn list_serializes_present_filters_into_the_query() {
        let (access, seen) = access_with(ONE_TODO_PAGE);
        let filters = TodoFilters {
            completed: Some(true),
            priority: Some(Priority::High),
            page: Some(1),
            limit: Some(10),
            order: Some(SortOrder::Asc),
            ..TodoFilters::default()
        };

        let page = access.list(&filters, "tok-123").unwrap();

        assert_eq!(page.todos.len(), 1);
        assert_eq!(page.todos[0].id, "7");
        let requests = seen.lock().unwrap();
        assert_eq!(
            requests[0].url,
            "http://localhost:3001/todos?completed=true&priority=HIGH&page=1&limit=10&order=asc"
        );
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer tok-123".to_string())));
    }

    #[test]
    fn list_with_empty_filters_has_no_query() {
        let (access, seen) = access_with(ONE_TODO_PAGE);
        access.list(&TodoFilters::default(), "tok-123").unwrap();
        assert_eq!(seen.lock().unwrap()[0].url, "http://localhost:3001/todos");
    }

    #[test]
    fn list_with_unexpected_envelope_shape_is_malformed() {
        let (access, _) = access_with(r#"{"success":true,"message":"ok","data":{}}"#);
        let err = access.list(&TodoFilters::default(), "tok-123").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn update_puts_to_the_id_scoped_endpoint() {
        let (access, seen) = access_with(
            r#"{"success":true,"message":"ok","data":{"id":"7","title":"x","completed":true,"date":"2024-01-01T00:00:00Z","priority":"HIGH"}}"#,
        );
        let changes = UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        };

        let updated = access.update("7", &changes, "tok-123").unwrap();

        assert!(updated.completed);
        let requests = seen.lock().unwrap();
        assert_eq!(requests[0].url, "http://localhost:3001/todos/7");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"completed":true}"#));
    }

    #[test]
    fn delete_returns_the_confirmation_payload() {
        let (access, seen) = access_with(
            r#"{"success":true,"message":"Todo deleted","data":{"id":"7","title":"x","completed":true,"date":"2024-01-01T00:00:00Z","priority":"HIGH"}}"#,
        );
        let deleted = access.delete("7", "tok-123").unwrap();
        assert_eq!(deleted.id, "7");
        assert_eq!(seen.lock().unwrap()[0].url, "http://localhost:3001/todos/7");
    }
}
