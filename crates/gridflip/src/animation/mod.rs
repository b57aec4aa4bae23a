//! FLIP animation: position cache, transform writes and tween scheduling.
//!
//! # Architecture
//!
//! The animation system is split into several submodules:
//! - `easing` - Time-based easing curves (linear, quadratic, circular, back)
//! - `state` - Item identity, cached geometry and motion lifecycle
//! - `transform` - Transform writes for items and their child wrapper
//! - `scheduler` - FLIP jump, tween to identity and staggered starts
//!
//! # Usage
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use gridflip::{ChangeRecord, FrameLoop, GridOptions, HeadlessGrid, wrap_grid};
//!
//! let frame_loop = Rc::new(FrameLoop::new());
//! let grid = HeadlessGrid::new(6, 3, 100.0, 8.0);
//! let animator = wrap_grid(grid.container().clone(), GridOptions::default(), frame_loop.clone())?;
//!
//! grid.reverse();
//! animator.notify_mutations(&[ChangeRecord::child_list(1, 1)])?;
//! frame_loop.run_until_idle(std::time::Duration::from_millis(16), 100);
//! # Ok::<(), gridflip::GridError>(())
//! ```

pub mod easing;
pub mod scheduler;
pub mod state;
pub mod transform;

pub use easing::{apply_easing, lerp};
pub use scheduler::PendingAnimation;
pub use state::{ItemId, Motion, PositionCache, PositionEntry};
pub use transform::{WriteMode, apply_coords, clear_transforms};
