//! gridflip - FLIP layout animations for grids.
//!
//! When items of a container move because its layout changed (filtering,
//! sorting, resizing), gridflip makes them glide from where they were to
//! where they now are instead of jumping. It records every item's position,
//! lets the layout engine apply the change, then animates a transform from
//! the old position back to identity.
//!
//! The engine is host-agnostic: elements are reached through the
//! [`Element`] trait and every frame-related effect goes through a
//! [`FrameScheduler`]. [`HeadlessElement`] and [`FrameLoop`] implement both
//! in memory, which the `gridflip simulate` command and the tests rely on.

// Engine
pub mod animation;
pub mod element;
pub mod geometry;
pub mod grid;
pub mod reconcile;
pub mod sync;

// Configuration and errors
pub mod config;
pub mod error;

// Hosts
pub mod cli;
pub mod headless;

pub use animation::{ItemId, Motion};
pub use config::{EasingType, GridOptions, Stagger};
pub use element::{ChangeKind, ChangeRecord, Element};
pub use error::{GridError, GridResult};
pub use geometry::{Coords, Rect};
pub use grid::{GridAnimator, GridAnimatorBuilder, wrap_grid};
pub use headless::{HeadlessElement, HeadlessGrid, StyleWrite};
pub use reconcile::PassReport;
pub use sync::{CancelHandle, FrameLoop, FrameScheduler, Phase};
