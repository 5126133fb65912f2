//! In-memory working set of todos and its fetch/mutation lifecycle.
//!
//! # Design
//! The controller owns the only mutable copy of the collection. Fetching is
//! split into `begin_refresh` (bump the generation, flag loading) and
//! `complete_refresh` (commit an outcome), with [`TodoController::refresh`]
//! composing the two for the common blocking case. The generation counter
//! makes stale completions inert: a response from a superseded refresh is
//! discarded wholesale instead of overwriting newer state. Mutations are
//! independent of the fetch lifecycle and never touch `is_loading`.

use crate::error::ApiError;
use crate::store::TokenStore;
use crate::todos::TodoAccess;
use crate::types::{CreateTodo, SortOrder, Todo, TodoFilters, TodoPage, UpdateTodo};

/// Handle for one in-flight refresh. Only the ticket from the most recent
/// [`TodoController::begin_refresh`] can still commit.
#[derive(Debug)]
pub struct RefreshTicket {
    generation: u64,
}

pub struct TodoController {
    access: TodoAccess,
    store: TokenStore,
    todos: Vec<Todo>,
    is_loading: bool,
    error: Option<String>,
    filters: TodoFilters,
    generation: u64,
}

impl TodoController {
    /// Controller with the default listing parameters: first page, ten
    /// items, ascending.
    pub fn new(access: TodoAccess, store: TokenStore) -> Self {
        Self::with_filters(
            access,
            store,
            TodoFilters {
                page: Some(1),
                limit: Some(10),
                order: Some(SortOrder::Asc),
                ..TodoFilters::default()
            },
        )
    }

    pub fn with_filters(access: TodoAccess, store: TokenStore, filters: TodoFilters) -> Self {
        Self {
            access,
            store,
            todos: Vec::new(),
            is_loading: false,
            error: None,
            filters,
            generation: 0,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &TodoFilters {
        &self.filters
    }

    /// Full re-fetch with the current filters, blocking until the round-trip
    /// completes.
    pub fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let outcome = self.fetch();
        self.complete_refresh(ticket, outcome);
    }

    /// Replace the filter state and re-fetch. Filter changes always hit the
    /// server; there is no local re-filter.
    pub fn set_filters(&mut self, filters: TodoFilters) {
        self.filters = filters;
        self.refresh();
    }

    /// Start a refresh: supersede any in-flight ticket, flag loading, clear
    /// the previous error.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// The fetch half of a refresh, for callers that run the round-trip on
    /// their own thread between `begin_refresh` and `complete_refresh`.
    /// Requires a stored token; fails locally, without touching the network,
    /// when there is none.
    pub fn fetch(&self) -> Result<TodoPage, ApiError> {
        let token = self.auth_token()?;
        self.access.list(&self.filters, &token)
    }

    /// Commit a refresh outcome. A ticket that is no longer current is
    /// ignored entirely — its response arrived after a newer refresh began.
    /// On error the message is recorded, the collection empties, and an
    /// authentication failure additionally evicts the stored token (the
    /// caller decides whether to redirect; nothing here is fatal).
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, outcome: Result<TodoPage, ApiError>) {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale refresh result (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return;
        }
        self.is_loading = false;
        match outcome {
            Ok(page) => {
                self.todos = page.todos;
            }
            Err(err) => {
                if err.is_auth_failure() {
                    log::warn!("evicting stored token after authentication failure");
                    self.store.remove_token();
                }
                self.error = Some(err.to_string());
                self.todos.clear();
            }
        }
    }

    /// Create a todo and prepend it to the working set. No re-fetch.
    pub fn add(&mut self, input: &CreateTodo) -> bool {
        match self
            .auth_token()
            .and_then(|token| self.access.create(input, &token))
        {
            Ok(created) => {
                self.todos.insert(0, created);
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Update a todo and replace the matching element in place; order is
    /// preserved.
    pub fn update_item(&mut self, id: &str, changes: &UpdateTodo) -> bool {
        match self
            .auth_token()
            .and_then(|token| self.access.update(id, changes, &token))
        {
            Ok(updated) => {
                if let Some(slot) = self.todos.iter_mut().find(|todo| todo.id == id) {
                    *slot = updated;
                }
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Delete a todo and drop it from the working set.
    pub fn remove(&mut self, id: &str) -> bool {
        match self
            .auth_token()
            .and_then(|token| self.access.delete(id, &token))
        {
            Ok(_) => {
                self.todos.retain(|todo| todo.id != id);
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    fn auth_token(&self) -> Result<String, ApiError> {
        self.store
            .token()
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::AuthRequired)
    }
}
