// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed single-event channel with ordered dispatch

use futures::future::{join_all, BoxFuture};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Error produced by a failing handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EmitError {
    /// A handler returned an error. For `emit` this aborts the remaining
    /// handlers of the pass; for `emit_async` it is surfaced after all
    /// started handlers have settled.
    #[error("handler failed: {0}")]
    Handler(HandlerError),
    /// `emit` reached an async registration outside a tokio runtime context.
    #[error("async handler requires a tokio runtime")]
    NoRuntime,
}

/// Token identifying a single registration, returned by `on`/`once`.
///
/// Ids are process-unique, so an id minted by one event matches nothing on
/// any other event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(0);

impl HandlerId {
    fn next() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type SyncHandler<A> = Arc<dyn Fn(A) -> Result<(), HandlerError> + Send + Sync>;
type AsyncHandler<A> =
    Arc<dyn Fn(A) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

enum Callback<A> {
    Sync(SyncHandler<A>),
    Async(AsyncHandler<A>),
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(f) => Self::Sync(Arc::clone(f)),
            Self::Async(f) => Self::Async(Arc::clone(f)),
        }
    }
}

struct Registration<A> {
    id: HandlerId,
    once: bool,
    callback: Callback<A>,
}

impl<A> Clone for Registration<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            callback: self.callback.clone(),
        }
    }
}

/// A single-event pub/sub channel with a typed payload.
///
/// Each instance multiplexes exactly one logical event. Handlers receive a
/// clone of the emitted payload and are invoked in registration order.
/// Typically owned as a field of the type that fires the event:
///
/// ```
/// use tev_core::TypedEvent;
///
/// struct Downloader {
///     progress: TypedEvent<u8>,
/// }
///
/// let dl = Downloader { progress: TypedEvent::new() };
/// dl.progress.on(|pct| {
///     println!("{pct}%");
///     Ok(())
/// });
/// dl.progress.emit(50).unwrap();
/// ```
pub struct TypedEvent<A> {
    handlers: RwLock<Vec<Registration<A>>>,
}

impl<A> TypedEvent<A> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a handler invoked on every future emission until removed.
    ///
    /// Registrations are distinct even for equivalent closures; registering
    /// twice means being invoked twice per emission.
    pub fn on<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register(false, Callback::Sync(Arc::new(handler)))
    }

    /// Register a handler invoked on exactly the next emission.
    ///
    /// The registration is removed before invocation; no later emission
    /// sees it.
    pub fn once<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.register(true, Callback::Sync(Arc::new(handler)))
    }

    /// Register an async handler invoked on every future emission.
    ///
    /// Under `emit_async` the returned future is awaited alongside all other
    /// handlers; under `emit` it is spawned fire-and-forget on the current
    /// tokio runtime.
    pub fn on_async<F, Fut>(&self, handler: F) -> HandlerId
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.register(false, Callback::Async(boxed(handler)))
    }

    /// Register an async handler invoked on exactly the next emission.
    pub fn once_async<F, Fut>(&self, handler: F) -> HandlerId
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.register(true, Callback::Async(boxed(handler)))
    }

    /// Remove the registration with the given id. Unknown ids are a no-op.
    pub fn off(&self, id: HandlerId) {
        self.remove(id);
    }

    /// Clear all registrations, both `on`-style and pending `once`-style.
    pub fn remove_all_listeners(&self) {
        self.write().clear();
    }

    /// Number of live registrations.
    pub fn handler_count(&self) -> usize {
        self.read().len()
    }

    fn register(&self, once: bool, callback: Callback<A>) -> HandlerId {
        let id = HandlerId::next();
        self.write().push(Registration { id, once, callback });
        id
    }

    fn remove(&self, id: HandlerId) -> bool {
        let mut handlers = self.write();
        let before = handlers.len();
        handlers.retain(|r| r.id != id);
        handlers.len() != before
    }

    fn contains(&self, id: HandlerId) -> bool {
        self.read().iter().any(|r| r.id == id)
    }

    /// Dispatch operates over a snapshot: handlers added during a pass are
    /// not invoked by it.
    fn snapshot(&self) -> Vec<Registration<A>> {
        self.read().clone()
    }

    /// A registration fires only while still live. `once` registrations are
    /// removed before invocation, so a racing emission never fires them twice.
    fn claim(&self, reg: &Registration<A>) -> bool {
        if reg.once {
            self.remove(reg.id)
        } else {
            self.contains(reg.id)
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Registration<A>>> {
        self.handlers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Registration<A>>> {
        self.handlers.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<A: Clone> TypedEvent<A> {
    /// Invoke every registered handler synchronously, in registration order.
    ///
    /// The first handler error aborts the remaining invocations of this pass
    /// and propagates; handlers that already ran are unaffected. Async
    /// registrations are started fire-and-forget on the current tokio
    /// runtime; their failures are logged, not returned. Emitting with zero
    /// registrations is a no-op.
    pub fn emit(&self, args: A) -> Result<(), EmitError> {
        let snapshot = self.snapshot();
        tracing::trace!(handlers = snapshot.len(), "emit");
        for reg in snapshot {
            if !self.claim(&reg) {
                continue;
            }
            match reg.callback {
                Callback::Sync(f) => f(args.clone()).map_err(EmitError::Handler)?,
                Callback::Async(f) => {
                    let handle = tokio::runtime::Handle::try_current()
                        .map_err(|_| EmitError::NoRuntime)?;
                    let fut = f(args.clone());
                    handle.spawn(async move {
                        if let Err(e) = fut.await {
                            tracing::warn!(error = %e, "async handler failed");
                        }
                    });
                }
            }
        }
        Ok(())
    }

    /// Invoke every registered handler, starting all of them before awaiting
    /// any, and resolve once all started work has settled.
    ///
    /// Start order equals registration order; completion order is whatever
    /// each handler's own latency dictates. If any handler failed, the first
    /// failure is returned after all handlers have settled.
    pub async fn emit_async(&self, args: A) -> Result<(), EmitError> {
        let snapshot = self.snapshot();
        tracing::trace!(handlers = snapshot.len(), "emit_async");
        let mut completed: Vec<Result<(), HandlerError>> = Vec::new();
        let mut started: Vec<BoxFuture<'static, Result<(), HandlerError>>> = Vec::new();
        for reg in snapshot {
            if !self.claim(&reg) {
                continue;
            }
            match reg.callback {
                Callback::Sync(f) => completed.push(f(args.clone())),
                Callback::Async(f) => started.push(f(args.clone())),
            }
        }
        completed.extend(join_all(started).await);
        for result in completed {
            result.map_err(EmitError::Handler)?;
        }
        Ok(())
    }
}

fn boxed<A, F, Fut>(handler: F) -> AsyncHandler<A>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(move |args| -> BoxFuture<'static, Result<(), HandlerError>> {
        Box::pin(handler(args))
    })
}

impl<A> Default for TypedEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for TypedEvent<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEvent")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
