//! Todo Synchronization
//!
//! Reconciles the local todo cache with the remote collection.
//!
//! Every action runs in three steps: a synchronous `begin` on the state
//! (guards, entry flags, generation stamp), one API call, then a
//! synchronous `settle` that folds the outcome back in. Both steps run to
//! completion on the UI thread, so state is only ever written by whole
//! steps even while several calls are in flight. Responses are applied in
//! arrival order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

use crate::api::{ApiError, TodoApi};
use crate::config::ConfigError;
use crate::models::{Todo, TodoId, TodoPatch};
use crate::store::TodoState;

/// What to do with a response that arrives after a newer request on the
/// same entity was dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Apply every response as it arrives
    #[default]
    ApplyAll,
    /// Drop responses superseded by a later request on the same entity
    DiscardSuperseded,
}

impl FromStr for StalePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "apply-all" => Ok(StalePolicy::ApplyAll),
            "discard-superseded" => Ok(StalePolicy::DiscardSuperseded),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// A user intent
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Load,
    /// Create from the current draft title
    Add,
    Toggle(TodoId),
    Delete(TodoId),
    Rename(TodoId, String),
    MarkCompleted(TodoId),
}

impl Intent {
    /// Text shown when this intent fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Intent::Load => "Failed to load todos",
            Intent::Add => "Failed to add todo",
            Intent::Toggle(_) => "Failed to toggle todo",
            Intent::Delete(_) => "Failed to delete todo",
            Intent::Rename(..) => "Failed to update todo",
            Intent::MarkCompleted(_) => "Failed to mark as completed",
        }
    }
}

/// The single API call an intent resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    List,
    Create(String),
    Toggle(TodoId),
    Delete(TodoId),
    Update(TodoId, TodoPatch),
    MarkCompleted(TodoId),
}

impl Request {
    fn entity(&self) -> Option<Entity> {
        match self {
            Request::List => Some(Entity::Collection),
            Request::Create(_) => None,
            Request::Toggle(id)
            | Request::Delete(id)
            | Request::Update(id, _)
            | Request::MarkCompleted(id) => Some(Entity::Item(id.clone())),
        }
    }
}

/// Successful API result
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Listed(Vec<Todo>),
    Created(Todo),
    Updated(Todo),
    Deleted,
}

/// An action between `begin` and `settle`
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub intent: Intent,
    pub request: Request,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Entity {
    Collection,
    Item(TodoId),
}

/// Generation stamps of dispatched requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLedger {
    next: u64,
    latest: HashMap<Entity, u64>,
}

impl RequestLedger {
    fn issue(&mut self, entity: Option<Entity>) -> u64 {
        self.next += 1;
        if let Some(entity) = entity {
            self.latest.insert(entity, self.next);
        }
        self.next
    }

    fn is_superseded(&self, pending: &Pending) -> bool {
        pending
            .request
            .entity()
            .and_then(|entity| self.latest.get(&entity))
            .is_some_and(|&latest| latest > pending.generation)
    }
}

impl TodoState {
    pub fn set_draft(&mut self, title: impl Into<String>) {
        self.draft_title = title.into();
    }

    pub fn dismiss_error(&mut self) {
        self.error_message.clear();
    }

    /// Start an action. `None` means nothing should be sent.
    pub fn begin(&mut self, intent: Intent) -> Option<Pending> {
        let request = match &intent {
            Intent::Load => {
                self.is_loading = true;
                self.error_message.clear();
                Request::List
            }
            Intent::Add => {
                let title = self.draft_title.trim();
                if title.is_empty() {
                    return None;
                }
                Request::Create(title.to_string())
            }
            Intent::Toggle(id) => Request::Toggle(id.clone()),
            Intent::Delete(id) => Request::Delete(id.clone()),
            Intent::Rename(id, title) => Request::Update(id.clone(), TodoPatch::title(title.clone())),
            Intent::MarkCompleted(id) => Request::MarkCompleted(id.clone()),
        };
        let generation = self.ledger.issue(request.entity());
        log::debug!("dispatch #{} {:?}", generation, request);
        Some(Pending {
            intent,
            request,
            generation,
        })
    }

    /// Fold the outcome of `pending` into the state
    pub fn settle(&mut self, pending: Pending, outcome: Result<Response, ApiError>) -> Settled {
        // A confirmed delete is server truth whatever was sent after it
        let confirmed_delete = matches!(
            (&pending.request, &outcome),
            (Request::Delete(_), Ok(Response::Deleted))
        );
        if self.stale_policy == StalePolicy::DiscardSuperseded
            && !confirmed_delete
            && self.ledger.is_superseded(&pending)
        {
            log::debug!("discard superseded #{} {:?}", pending.generation, pending.request);
            return Settled::Discarded;
        }

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                log::warn!("#{} {:?} failed: {}", pending.generation, pending.request, err);
                if pending.intent == Intent::Load {
                    self.is_loading = false;
                }
                self.error_message = pending.intent.failure_message().to_string();
                return Settled::Applied;
            }
        };

        match (pending.request, response) {
            (Request::List, Response::Listed(todos)) => {
                self.items = todos;
                self.is_loading = false;
            }
            (Request::Create(_), Response::Created(todo)) => {
                if !self.replace(&todo.id.clone(), todo.clone()) {
                    self.items.insert(0, todo);
                }
                self.draft_title.clear();
            }
            (Request::Toggle(id), Response::Updated(todo))
            | (Request::Update(id, _), Response::Updated(todo))
            | (Request::MarkCompleted(id), Response::Updated(todo)) => {
                self.replace(&id, todo);
            }
            (Request::Delete(id), Response::Deleted) => {
                let before = self.items.len();
                self.items.retain(|todo| todo.id != id);
                if self.items.len() == before {
                    log::debug!("delete of absent todo {}", id);
                }
            }
            (request, response) => {
                log::error!("mismatched response {:?} for {:?}", response, request);
            }
        }
        Settled::Applied
    }

    /// Cached record for `id`
    pub fn entry(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Replace the entry with `id` wholesale. Absent ids are left absent.
    fn replace(&mut self, id: &TodoId, todo: Todo) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                *item = todo;
                true
            }
            None => {
                log::debug!("replace of absent todo {}", id);
                false
            }
        }
    }
}

/// Run the API call for `request`
pub async fn perform<A: TodoApi + ?Sized>(api: &A, request: &Request) -> Result<Response, ApiError> {
    match request {
        Request::List => api.list().await.map(Response::Listed),
        Request::Create(title) => api.create(title).await.map(Response::Created),
        Request::Toggle(id) => api.toggle(id).await.map(Response::Updated),
        Request::Delete(id) => api.delete(id).await.map(|()| Response::Deleted),
        Request::Update(id, patch) => api.update(id, patch).await.map(Response::Updated),
        Request::MarkCompleted(id) => api.mark_completed(id).await.map(Response::Updated),
    }
}

/// Somewhere a `TodoState` can be borrowed mutably for one step
pub trait StateHandle {
    fn with_state<R>(&self, f: impl FnOnce(&mut TodoState) -> R) -> R;
}

impl StateHandle for RefCell<TodoState> {
    fn with_state<R>(&self, f: impl FnOnce(&mut TodoState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Begin, call, settle. Returns `None` when the intent was a no-op.
pub async fn dispatch<H, A>(state: &H, api: &A, intent: Intent) -> Option<Settled>
where
    H: StateHandle + ?Sized,
    A: TodoApi + ?Sized,
{
    let pending = state.with_state(|s| s.begin(intent))?;
    let outcome = perform(api, &pending.request).await;
    Some(state.with_state(|s| s.settle(pending, outcome)))
}
