// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named-event composition: a uniform subscription surface over a host type
//!
//! A host type declares where each named event lives via [`HasEvent`]
//! (usually generated by `add_events!`). The blanket [`Subscribe`] trait
//! then resolves a marker to the live [`TypedEvent`] at call time and
//! delegates, so subscribers never need to know whether events are direct
//! fields, inherited through an embedded composition, or nested inside a
//! sub-object.

use crate::event::{HandlerError, HandlerId, TypedEvent};
use std::future::Future;
use thiserror::Error;

/// Subscription against an event name that did not resolve to a live value.
///
/// Raised on the first subscription attempt, not deferred to emission time.
/// The message format is fixed; consumers pattern-match on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Event \"{path}\" is not defined")]
pub struct UndefinedEventError {
    /// Full dotted location of the missing event.
    pub path: String,
}

/// A declared event name with its handler payload type.
///
/// Markers are unit types, passed by value at subscription call sites. The
/// set of markers a host type declares is its event registry: names and
/// handler shapes are checked at compile time, while the concrete
/// `TypedEvent` is looked up on the live instance at call time.
pub trait EventName: 'static {
    /// Payload passed to handlers on emission.
    type Args: Clone + Send + 'static;
    /// Logical name, used in diagnostics.
    const NAME: &'static str;
}

/// Where a declared event lives on a host type.
///
/// Generated by `add_events!` for the common placements; hand-written impls
/// can step through containers that may be absent at runtime by returning
/// `None` from [`resolve`](Self::resolve).
pub trait HasEvent<N: EventName> {
    /// Dotted path prefix when the event lives on a nested container.
    const PATH: Option<&'static str> = None;

    /// Locate the live event. `None` when an intermediate container is
    /// absent.
    fn resolve(&self) -> Option<&TypedEvent<N::Args>>;
}

/// The full declared event set of a host type, own and inherited.
pub trait EventSet {
    /// Clear all handlers for every reachable declared event, including
    /// events declared by embedded compositions and events under a
    /// configured path. Events whose container is absent are skipped.
    fn remove_all_listeners(&self);
}

/// Uniform subscription surface over named events.
///
/// Blanket-implemented; bringing the trait into scope adds `on`, `once`,
/// `on_async`, `once_async`, and `off` to any type with [`HasEvent`]
/// declarations. Each method resolves the marker on the live instance and
/// delegates to the underlying [`TypedEvent`].
pub trait Subscribe: Sized {
    /// Invoke `handler` whenever the named event fires.
    fn on<N, F>(&self, _event: N, handler: F) -> Result<HandlerId, UndefinedEventError>
    where
        N: EventName,
        Self: HasEvent<N>,
        F: Fn(N::Args) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Ok(locate::<N, Self>(self)?.on(handler))
    }

    /// Invoke `handler` the next time the named event fires, at most once.
    fn once<N, F>(&self, _event: N, handler: F) -> Result<HandlerId, UndefinedEventError>
    where
        N: EventName,
        Self: HasEvent<N>,
        F: Fn(N::Args) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Ok(locate::<N, Self>(self)?.once(handler))
    }

    /// Invoke an async `handler` whenever the named event fires.
    fn on_async<N, F, Fut>(&self, _event: N, handler: F) -> Result<HandlerId, UndefinedEventError>
    where
        N: EventName,
        Self: HasEvent<N>,
        F: Fn(N::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Ok(locate::<N, Self>(self)?.on_async(handler))
    }

    /// Invoke an async `handler` the next time the named event fires, at
    /// most once.
    fn once_async<N, F, Fut>(
        &self,
        _event: N,
        handler: F,
    ) -> Result<HandlerId, UndefinedEventError>
    where
        N: EventName,
        Self: HasEvent<N>,
        F: Fn(N::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Ok(locate::<N, Self>(self)?.once_async(handler))
    }

    /// Remove a registration from the named event. Unknown ids are a no-op,
    /// but an unresolvable event name is still an error.
    fn off<N>(&self, _event: N, id: HandlerId) -> Result<(), UndefinedEventError>
    where
        N: EventName,
        Self: HasEvent<N>,
    {
        locate::<N, Self>(self)?.off(id);
        Ok(())
    }
}

impl<T> Subscribe for T {}

fn locate<N, T>(host: &T) -> Result<&TypedEvent<N::Args>, UndefinedEventError>
where
    N: EventName,
    T: HasEvent<N>,
{
    host.resolve().ok_or_else(|| UndefinedEventError {
        path: full_path::<N, T>(),
    })
}

fn full_path<N, T>() -> String
where
    N: EventName,
    T: HasEvent<N>,
{
    match T::PATH {
        Some(prefix) => format!("{prefix}.{}", N::NAME),
        None => N::NAME.to_string(),
    }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
