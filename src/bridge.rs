//! Typed request/response channel between the display layer and the process
//! that owns the store. Every action the display layer may invoke is one
//! `Request` variant, routed by action name through a handler table. The
//! push half (`on`/`emit`) and fire-and-forget `send` complete the contract
//! but are not used by the store actions themselves.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::database::question::{Category, Question, QuestionDraft};
use crate::database::store::{CategoryStore, QuestionStore, Store, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    GetCategories,
    AddCategory { name: String },
    DeleteCategory { id: i64 },
    GetQuestions,
    AddQuestion { draft: QuestionDraft },
    UpdateQuestion { id: i64, draft: QuestionDraft },
    DeleteQuestion { id: i64 },
    GetRandomQuestion,
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetCategories => "get-categories",
            Request::AddCategory { .. } => "add-category",
            Request::DeleteCategory { .. } => "delete-category",
            Request::GetQuestions => "get-questions",
            Request::AddQuestion { .. } => "add-question",
            Request::UpdateQuestion { .. } => "update-question",
            Request::DeleteQuestion { .. } => "delete-question",
            Request::GetRandomQuestion => "get-random-question",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Categories(Vec<Category>),
    /// `None` when the category already existed.
    CategoryAdded(Option<i64>),
    CategoryDeleted(bool),
    Questions(Vec<Question>),
    QuestionAdded(i64),
    QuestionUpdated(bool),
    QuestionDeleted(bool),
    RandomQuestion(Option<Question>),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no handler registered for action '{0}'")]
    UnknownAction(String),
    #[error("request payload does not belong to action '{0}'")]
    PayloadMismatch(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Handler = Arc<dyn Fn(Request) -> BoxFuture<Result<Response, BridgeError>> + Send + Sync>;
type Listener = Box<dyn Fn(&Value) + Send + Sync>;

#[derive(Default)]
pub struct Bridge {
    handlers: HashMap<&'static str, Handler>,
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for one action name. A later registration under
    /// the same name replaces the earlier one.
    pub fn handle<F, Fut>(&mut self, action: &'static str, handler: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, BridgeError>> + Send + 'static,
    {
        self.handlers.insert(
            action,
            Arc::new(move |request| -> BoxFuture<Result<Response, BridgeError>> {
                Box::pin(handler(request))
            }),
        );
    }

    /// Request/response: routes by the request's action name and returns
    /// whatever the handler produced. A failing handler rejects the call.
    pub async fn invoke(&self, request: Request) -> Result<Response, BridgeError> {
        let action = request.action();
        let handler = self
            .handlers
            .get(action)
            .ok_or_else(|| BridgeError::UnknownAction(action.to_owned()))?;
        handler(request).await
    }

    /// Fire-and-forget: the handler runs on its own task, its outcome is
    /// logged and dropped. Requires a running tokio runtime.
    pub fn send(&self, request: Request) {
        let action = request.action();
        match self.handlers.get(action) {
            Some(handler) => {
                let handler = Arc::clone(handler);
                tokio::spawn(async move {
                    if let Err(error) = handler(request).await {
                        warn!(action, %error, "send failed");
                    }
                });
            }
            None => warn!(action, "dropping send for unknown action"),
        }
    }

    /// Registers a listener for host-pushed notifications under an action
    /// name.
    pub fn on(&self, action: impl Into<String>, listener: impl Fn(&Value) + Send + Sync + 'static) {
        let mut listeners = self.listeners.write().expect("listener registry poisoned");
        listeners
            .entry(action.into())
            .or_default()
            .push(Box::new(listener));
    }

    /// Pushes a notification to every listener registered under the action
    /// name. No-op when nobody listens.
    pub fn emit(&self, action: &str, payload: &Value) {
        let listeners = self.listeners.read().expect("listener registry poisoned");
        if let Some(registered) = listeners.get(action) {
            for listener in registered {
                listener(payload);
            }
        }
    }
}

/// Wires all eight store actions into a bridge, one handler per action.
pub fn store_bridge(store: Arc<Store>) -> Bridge {
    let mut bridge = Bridge::new();

    let s = Arc::clone(&store);
    bridge.handle("get-categories", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::GetCategories => Ok(Response::Categories(store.categories().await?)),
                _ => Err(BridgeError::PayloadMismatch("get-categories")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("add-category", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::AddCategory { name } => {
                    Ok(Response::CategoryAdded(store.add_category(&name).await?))
                }
                _ => Err(BridgeError::PayloadMismatch("add-category")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("delete-category", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::DeleteCategory { id } => {
                    Ok(Response::CategoryDeleted(store.delete_category(id).await?))
                }
                _ => Err(BridgeError::PayloadMismatch("delete-category")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("get-questions", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::GetQuestions => Ok(Response::Questions(store.questions().await?)),
                _ => Err(BridgeError::PayloadMismatch("get-questions")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("add-question", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::AddQuestion { draft } => {
                    Ok(Response::QuestionAdded(store.add_question(&draft).await?))
                }
                _ => Err(BridgeError::PayloadMismatch("add-question")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("update-question", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::UpdateQuestion { id, draft } => Ok(Response::QuestionUpdated(
                    store.update_question(id, &draft).await?,
                )),
                _ => Err(BridgeError::PayloadMismatch("update-question")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("delete-question", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::DeleteQuestion { id } => {
                    Ok(Response::QuestionDeleted(store.delete_question(id).await?))
                }
                _ => Err(BridgeError::PayloadMismatch("delete-question")),
            }
        }
    });

    let s = Arc::clone(&store);
    bridge.handle("get-random-question", move |request| {
        let store = Arc::clone(&s);
        async move {
            match request {
                Request::GetRandomQuestion => {
                    Ok(Response::RandomQuestion(store.random_question().await?))
                }
                _ => Err(BridgeError::PayloadMismatch("get-random-question")),
            }
        }
    });

    bridge
}
