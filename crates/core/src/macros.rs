// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declaration and composition macros for named events

/// Declare event marker types.
///
/// Each entry produces a unit struct implementing
/// [`EventName`](crate::EventName). Multiple payload types become a tuple;
/// an empty list means a `()` payload.
///
/// ```
/// tev_core::events! {
///     /// Connection established; carries the peer id.
///     pub Opened(u64) => "opened";
///     pub Moved(i32, i32) => "moved";
/// }
/// ```
#[macro_export]
macro_rules! events {
    ($( $(#[$meta:meta])* $vis:vis $marker:ident ( $($args:ty),* $(,)? ) => $name:literal ; )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis struct $marker;

            impl $crate::EventName for $marker {
                type Args = ( $($args),* );
                const NAME: &'static str = $name;
            }
        )+
    };
}

/// Attach declared events to a host type.
///
/// Generates one [`HasEvent`](crate::HasEvent) impl per `Marker => field`
/// entry plus the [`EventSet`](crate::EventSet) impl clearing the whole set.
/// One invocation per host type. Forms:
///
/// Direct fields:
///
/// ```ignore
/// add_events! { ChatSocket { Opened => opened, Closed => closed } }
/// ```
///
/// A fixed nested path (events live on `self.container.deeper`):
///
/// ```ignore
/// add_events! { Widget { path: container.deeper, Attached => attached } }
/// ```
///
/// A declared path with a runtime-fallible accessor, for containers that
/// may be absent; subscription then fails with
/// `Event "container.deeper.attached" is not defined`:
///
/// ```ignore
/// add_events! { Widget {
///     path("container.deeper"): |w| w.container.as_ref(),
///     Attached => attached,
/// } }
/// ```
///
/// Stacked composition over an embedded composed value; the named ancestor
/// events stay subscribable on the outer type, and `remove_all_listeners`
/// clears the embedded set too:
///
/// ```ignore
/// add_events! { Child { inherit base: Parent { Opened, Closed }, Extra => extra } }
/// ```
#[macro_export]
macro_rules! add_events {
    // Events behind a declared path and a runtime-fallible accessor.
    ($host:ty { path ( $path:literal ) : $accessor:expr, $($marker:ty => $field:ident),+ $(,)? }) => {
        $(
            impl $crate::HasEvent<$marker> for $host {
                const PATH: ::core::option::Option<&'static str> =
                    ::core::option::Option::Some($path);

                fn resolve(
                    &self,
                ) -> ::core::option::Option<&$crate::TypedEvent<<$marker as $crate::EventName>::Args>>
                {
                    // `__bind` pins the accessor's parameter to `&Self` and
                    // links the returned reference's lifetime to it, so the
                    // user-supplied closure needs no explicit annotations.
                    fn __bind<H: ?::core::marker::Sized, T: ?::core::marker::Sized, F>(f: F) -> F
                    where
                        F: ::core::ops::Fn(&H) -> ::core::option::Option<&T>,
                    {
                        f
                    }
                    let accessor = __bind::<$host, _, _>($accessor);
                    let root = accessor(self)?;
                    ::core::option::Option::Some(&root.$field)
                }
            }
        )+

        $crate::__event_set! { $host { $($marker),+ } }
    };

    // Events on a nested container reached by a fixed field path.
    ($host:ty { path : $proot:ident $(. $pseg:ident)*, $($marker:ty => $field:ident),+ $(,)? }) => {
        // Forward the fixed path to a helper as single parenthesized token
        // trees so the path segments are not nested under the per-marker
        // repetition below (which would otherwise force conflicting repeat
        // counts between `$pseg` and `$marker`).
        $crate::__fixed_path_events! {
            $host,
            ( | __host: &$host | & __host . $proot $(. $pseg)* ),
            ( ::core::concat!(::core::stringify!($proot) $(, ".", ::core::stringify!($pseg))*) ),
            $($marker => $field),+
        }
    };

    // Stacked composition plus own direct-field events.
    ($host:ty { inherit $pfield:ident : $parent:ty { $($pmarker:ty),+ $(,)? }, $($marker:ty => $field:ident),+ $(,)? }) => {
        $crate::__inherit_events! { $host { $pfield : $parent { $($pmarker),+ } } }

        $(
            impl $crate::HasEvent<$marker> for $host {
                fn resolve(
                    &self,
                ) -> ::core::option::Option<&$crate::TypedEvent<<$marker as $crate::EventName>::Args>>
                {
                    ::core::option::Option::Some(&self.$field)
                }
            }
        )+

        impl $crate::EventSet for $host {
            fn remove_all_listeners(&self) {
                $crate::EventSet::remove_all_listeners(&self.$pfield);
                $(
                    if let ::core::option::Option::Some(ev) =
                        $crate::HasEvent::<$marker>::resolve(self)
                    {
                        ev.remove_all_listeners();
                    }
                )+
            }
        }
    };

    // Stacked composition with no events of its own.
    ($host:ty { inherit $pfield:ident : $parent:ty { $($pmarker:ty),+ $(,)? } $(,)? }) => {
        $crate::__inherit_events! { $host { $pfield : $parent { $($pmarker),+ } } }

        impl $crate::EventSet for $host {
            fn remove_all_listeners(&self) {
                $crate::EventSet::remove_all_listeners(&self.$pfield);
            }
        }
    };

    // Events as direct fields of the host.
    ($host:ty { $($marker:ty => $field:ident),+ $(,)? }) => {
        $(
            impl $crate::HasEvent<$marker> for $host {
                fn resolve(
                    &self,
                ) -> ::core::option::Option<&$crate::TypedEvent<<$marker as $crate::EventName>::Args>>
                {
                    ::core::option::Option::Some(&self.$field)
                }
            }
        )+

        $crate::__event_set! { $host { $($marker),+ } }
    };
}

/// Forwarding impls for events declared on an embedded composed value.
/// Internal to `add_events!`.
#[doc(hidden)]
#[macro_export]
macro_rules! __inherit_events {
    ($host:ty { $pfield:ident : $parent:ty { $($pmarker:ty),+ } }) => {
        $(
            impl $crate::HasEvent<$pmarker> for $host {
                const PATH: ::core::option::Option<&'static str> =
                    <$parent as $crate::HasEvent<$pmarker>>::PATH;

                fn resolve(
                    &self,
                ) -> ::core::option::Option<&$crate::TypedEvent<<$pmarker as $crate::EventName>::Args>>
                {
                    $crate::HasEvent::<$pmarker>::resolve(&self.$pfield)
                }
            }
        )+
    };
}

/// Fixed-path `HasEvent`/`EventSet` impls for a container reached by a
/// statically known field path. Internal to `add_events!`. The `$base` and
/// `$path` arguments arrive as single parenthesized token trees so the path
/// segments are not captured under the per-marker repetition.
#[doc(hidden)]
#[macro_export]
macro_rules! __fixed_path_events {
    ($host:ty, $accessor:tt, $path:tt, $($marker:ty => $field:ident),+ $(,)?) => {
        $(
            impl $crate::HasEvent<$marker> for $host {
                const PATH: ::core::option::Option<&'static str> =
                    ::core::option::Option::Some $path;

                fn resolve(
                    &self,
                ) -> ::core::option::Option<&$crate::TypedEvent<<$marker as $crate::EventName>::Args>>
                {
                    // `__bind` links the returned reference's lifetime to the
                    // `&Self` argument so the generated accessor closure type
                    // checks without explicit lifetime annotations.
                    fn __bind<H: ?::core::marker::Sized, T: ?::core::marker::Sized, F>(f: F) -> F
                    where
                        F: ::core::ops::Fn(&H) -> &T,
                    {
                        f
                    }
                    let accessor = __bind::<$host, _, _>($accessor);
                    ::core::option::Option::Some(&accessor(self).$field)
                }
            }
        )+

        $crate::__event_set! { $host { $($marker),+ } }
    };
}

/// `EventSet` impl over a list of declared markers. Internal to
/// `add_events!`.
#[doc(hidden)]
#[macro_export]
macro_rules! __event_set {
    ($host:ty { $($marker:ty),+ }) => {
        impl $crate::EventSet for $host {
            fn remove_all_listeners(&self) {
                $(
                    if let ::core::option::Option::Some(ev) =
                        $crate::HasEvent::<$marker>::resolve(self)
                    {
                        ev.remove_all_listeners();
                    }
                )+
            }
        }
    };
}
