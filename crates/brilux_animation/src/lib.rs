//! BriLux Animation
//!
//! Declarative, variant-driven animation for the landing page:
//!
//! - **Variants**: named visual targets per lifecycle stage ([`VariantSet`])
//! - **Transitions**: eased tweens with repeats, or spring physics
//! - **Stagger**: document-order delays for the children of a container
//! - **Viewport triggers**: play once, or replay on every entry
//! - **Orchestration**: a deterministic clock over the whole element tree
//!
//! # Example
//!
//! ```rust
//! use brilux_animation::{presets, AnimationOrchestrator, ViewportTrigger};
//! use brilux_core::RootMargin;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let mut orch = AnimationOrchestrator::new();
//! let section = orch
//!     .mount_with_trigger(
//!         Rc::new(presets::stagger_container()),
//!         None,
//!         ViewportTrigger::once(RootMargin::ZERO),
//!     )
//!     .unwrap();
//! let heading = orch.mount(Rc::new(presets::fade_in_up()), Some(section)).unwrap();
//!
//! orch.set_in_view(section, true).unwrap();
//! assert_eq!(orch.scheduled_start(heading), Some(Duration::from_millis(300)));
//!
//! orch.advance(Duration::from_secs(2));
//! assert_eq!(orch.sample(heading).unwrap().opacity, 1.0);
//! ```

pub mod easing;
pub mod error;
pub mod orchestrator;
pub mod playback;
pub mod presets;
pub mod spring;
pub mod stagger;
pub mod trigger;
pub mod variant;

pub use easing::Easing;
pub use error::AnimationError;
pub use orchestrator::{AnimationOrchestrator, ElementId};
pub use playback::{Playback, Sample};
pub use spring::{spring_progress, Spring, SpringConfig};
pub use stagger::StaggerGroup;
pub use trigger::{InViewState, TriggerAction, TriggerState, ViewportTrigger};
pub use variant::{
    LifecycleTag, Property, PropertyValue, Repeat, RepeatType, Transition, TransitionKind, Variant,
    VariantSet, VisualState, VisualTarget,
};
