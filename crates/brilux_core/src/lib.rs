//! BriLux Core
//!
//! Foundational primitives shared by the BriLux landing page crates:
//!
//! - **Geometry**: vectors, sizes, rectangles and colors
//! - **Root margins**: CSS-style viewport margins used by visibility observers
//! - **Scoped events**: listener registration that is released on drop
//! - **State machines**: typed transition tables for small UI states
//!
//! # Example
//!
//! ```rust
//! use brilux_core::events::EventSource;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let scroll = EventSource::<f32>::new();
//! let last = Rc::new(Cell::new(0.0));
//!
//! let seen = last.clone();
//! let guard = scroll.subscribe(move |y| seen.set(*y));
//!
//! scroll.emit(&120.0);
//! assert_eq!(last.get(), 120.0);
//!
//! // Dropping the guard deregisters the listener
//! drop(guard);
//! assert_eq!(scroll.listener_count(), 0);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod margin;

pub use events::{EventSource, ListenerGuard, ListenerId};
pub use fsm::{StateMachine, StateTransitions};
pub use geometry::{Color, Rect, Size, Vec2, Vec3};
pub use margin::{MarginLength, MarginParseError, RootMargin};
