//! Change reconciliation: decides which items must animate after a change.
//!
//! A pass measures the container, interrupts every item still in motion,
//! re-measures all children and diffs them against the position cache.
//! Items seen for the first time are recorded but never animated, so newly
//! inserted content appears in place. Items whose geometry is unchanged are
//! left alone. Everything else goes to the animation scheduler.

use std::rc::Rc;

use crate::animation::scheduler::{PendingAnimation, start_animations};
use crate::animation::state::ItemId;
use crate::animation::transform::clear_transforms;
use crate::element::{ChangeRecord, Element, batch_affects_layout};
use crate::error::{GridError, GridResult};
use crate::geometry::{Rect, container_relative};
use crate::grid::Shared;
use crate::sync::FrameScheduler;

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Whether the pass bypassed the change filter.
    pub forced: bool,
    /// Children with a layout box.
    pub measured: usize,
    /// Children recorded for the first time.
    pub first_sightings: usize,
    /// In-flight motions cancelled by this pass.
    pub interrupted: usize,
    /// Items handed to the scheduler, in container order.
    pub animated: Vec<ItemId>,
}

/// Runs a pass if `records` contains a layout-relevant change.
///
/// # Errors
///
/// See [`reconcile_forced`].
pub(crate) fn reconcile<E: Element + 'static>(
    shared: &Shared<E>,
    scheduler: &Rc<dyn FrameScheduler>,
    records: &[ChangeRecord],
) -> GridResult<Option<PassReport>> {
    if !batch_affects_layout(records) {
        tracing::trace!(records = records.len(), "no layout-relevant change");
        return Ok(None);
    }
    run_pass(shared, scheduler, false).map(Some)
}

/// Runs a pass unconditionally.
///
/// # Errors
///
/// Returns [`GridError::MultipleChildWrappers`] if an item that moved has
/// more than one direct child. No animation starts in that case.
pub(crate) fn reconcile_forced<E: Element + 'static>(
    shared: &Shared<E>,
    scheduler: &Rc<dyn FrameScheduler>,
) -> GridResult<PassReport> {
    run_pass(shared, scheduler, true)
}

fn run_pass<E: Element + 'static>(
    shared: &Shared<E>,
    scheduler: &Rc<dyn FrameScheduler>,
    forced: bool,
) -> GridResult<PassReport> {
    let mut report = PassReport { forced, ..PassReport::default() };

    let container = shared.borrow().container.clone();
    let Some(container_rect) = container.bounding_rect() else {
        tracing::debug!(forced, "container has no layout box, skipping pass");
        return Ok(report);
    };
    let children = container.children();

    let interrupted = interrupt_motions(shared, &children);
    for element in &interrupted {
        clear_transforms(element);
    }
    report.interrupted = interrupted.len();

    let measured: Vec<(E, Rect)> = children
        .into_iter()
        .filter_map(|element| {
            let rect = element.bounding_rect()?;
            Some((element, container_relative(container_rect, rect)))
        })
        .collect();
    report.measured = measured.len();

    let mut pending = Vec::new();
    {
        let mut state = shared.borrow_mut();
        for (element, last) in measured {
            let cached = state
                .cache
                .id_of(&element)
                .and_then(|id| state.cache.lookup(id).map(|entry| (id, entry.rect)));
            match cached {
                None => {
                    let id = state.cache.identify(&element);
                    state.cache.store(id, last, container_rect);
                    report.first_sightings += 1;
                    tracing::trace!(item = %id, "first sighting");
                }
                Some((id, first)) if first.same_geometry(&last) => {
                    tracing::trace!(item = %id, "unchanged");
                }
                Some((id, first)) => pending.push(PendingAnimation { element, id, first, last }),
            }
        }
    }

    for item in &pending {
        let children = item.element.children().len();
        if children > 1 {
            return Err(GridError::MultipleChildWrappers { item: item.id, children });
        }
    }

    report.animated = pending.iter().map(|item| item.id).collect();
    tracing::debug!(
        forced,
        measured = report.measured,
        first_sightings = report.first_sightings,
        interrupted = report.interrupted,
        animated = report.animated.len(),
        "layout pass"
    );

    if pending.is_empty() {
        return Ok(report);
    }

    let on_start = shared.borrow().on_start.clone();
    if let Some(on_start) = on_start {
        let elements: Vec<E> = pending.iter().map(|item| item.element.clone()).collect();
        on_start(&elements);
    }

    start_animations(shared, scheduler, container_rect, pending);
    Ok(report)
}

/// Cancels the motion of every child still animating and returns them.
fn interrupt_motions<E: Element>(shared: &Shared<E>, children: &[E]) -> Vec<E> {
    let mut state = shared.borrow_mut();
    let mut interrupted = Vec::new();
    for element in children {
        if let Some(id) = state.cache.id_of(element)
            && state.cache.cancel_and_clear(id)
        {
            tracing::trace!(item = %id, "interrupted");
            interrupted.push(element.clone());
        }
    }
    interrupted
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animation::state::Motion;
    use crate::config::{EasingType, GridOptions};
    use crate::geometry::Coords;
    use crate::grid::{GridAnimator, wrap_grid};
    use crate::headless::{HeadlessElement, HeadlessGrid, StyleWrite};
    use crate::sync::FrameLoop;

    const fn ms(value: u64) -> Duration { Duration::from_millis(value) }

    fn wrap(grid: &HeadlessGrid, options: GridOptions) -> (Rc<FrameLoop>, GridAnimator<HeadlessElement>) {
        let frame_loop = Rc::new(FrameLoop::new());
        let animator = wrap_grid(grid.container().clone(), options, frame_loop.clone()).unwrap();
        (frame_loop, animator)
    }

    #[test]
    fn test_unchanged_layout_animates_nothing() {
        let grid = HeadlessGrid::new(4, 2, 100.0, 10.0);
        let (frame_loop, animator) = wrap(&grid, GridOptions::default());

        let report = animator.force_animation().unwrap();
        assert!(report.forced);
        assert_eq!(report.measured, 4);
        assert!(report.animated.is_empty());
        assert!(!frame_loop.has_pending_work());
    }

    #[test]
    fn test_filtered_batch_runs_no_pass() {
        let grid = HeadlessGrid::new(2, 2, 100.0, 0.0);
        let (_, animator) = wrap(&grid, GridOptions::default());
        grid.reverse();

        let report = animator.notify_mutations(&[ChangeRecord::attribute("style")]).unwrap();
        assert_eq!(report, None);
        let report = animator.notify_mutations(&[ChangeRecord::class_change()]).unwrap().unwrap();
        assert!(!report.forced);
        assert_eq!(report.animated.len(), 2);
    }

    #[test]
    fn test_first_sighting_is_recorded_not_animated() {
        let grid = HeadlessGrid::new(2, 3, 100.0, 0.0);
        let (_, animator) = wrap(&grid, GridOptions::default());

        let newcomer = grid.container().append_child(HeadlessElement::new("new", Rect::zero()));
        newcomer.append_child(HeadlessElement::new("new/content", Rect::zero()));
        grid.reflow();

        let report = animator.notify_mutations(&[ChangeRecord::child_list(1, 0)]).unwrap().unwrap();
        assert_eq!(report.first_sightings, 1);
        assert!(report.animated.is_empty());
        assert!(newcomer.writes().is_empty());
        assert_eq!(animator.cached_rect(&newcomer), Some(Rect::new(200.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_unmeasurable_children_are_skipped() {
        let grid = HeadlessGrid::new(2, 2, 100.0, 0.0);
        let (_, animator) = wrap(&grid, GridOptions::default());
        grid.container().append_child(HeadlessElement::unmeasurable("text"));

        let report = animator.force_animation().unwrap();
        assert_eq!(report.measured, 2);
        assert_eq!(report.first_sightings, 0);
        assert_eq!(animator.tracked_items(), 2);
    }

    #[test]
    fn test_flip_jump_is_written_immediately() {
        let grid = HeadlessGrid::new(3, 3, 100.0, 0.0);
        let (_, animator) = wrap(&grid, GridOptions::default().with_easing(EasingType::Linear));
        let first = grid.remove(0).unwrap();
        let moved = grid.items()[0].clone();

        let report = animator.notify_mutations(&[ChangeRecord::child_list(0, 1)]).unwrap().unwrap();
        let expected: Vec<ItemId> = grid.items().iter().filter_map(|el| animator.item_id(el)).collect();
        assert_eq!(report.animated, expected);
        assert!(first.writes().is_empty());

        assert_eq!(moved.transform(), Some(Coords::new(100.0, 0.0, 1.0, 1.0)));
        assert!(moved.has_top_left_origin());
        assert!(matches!(animator.motion(&moved), Some(Motion::Animating(_))));
        // visually still in the old cell
        assert_eq!(moved.bounding_rect(), Some(Rect::new(100.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_interrupted_item_is_cleared_before_new_jump() {
        let grid = HeadlessGrid::new(2, 2, 100.0, 0.0);
        let (frame_loop, animator) = wrap(&grid, GridOptions::default());
        grid.reverse();
        animator.force_animation().unwrap();
        frame_loop.tick(ms(16));
        frame_loop.tick(ms(80));

        let item = grid.items()[0].clone();
        let Some(Motion::Animating(handle)) = animator.motion(&item) else {
            panic!("expected an animating item");
        };
        item.clear_writes();

        grid.reverse();
        let report = animator.force_animation().unwrap();
        assert_eq!(report.interrupted, 2);
        assert_eq!(handle.cancel_count(), 1);

        let writes = item.writes();
        assert_eq!(writes[0], StyleWrite::Transform(None));
        assert!(matches!(writes.last(), Some(StyleWrite::Transform(Some(_)))));
    }

    #[test]
    fn test_multiple_child_wrappers_rejected() {
        let grid = HeadlessGrid::new(2, 2, 100.0, 0.0);
        let (frame_loop, animator) = wrap(&grid, GridOptions::default());
        let item = grid.items()[1].clone();
        item.append_child(HeadlessElement::new("extra", Rect::zero()));
        grid.reverse();

        let err = animator.force_animation().unwrap_err();
        assert!(matches!(err, GridError::MultipleChildWrappers { children: 2, .. }));
        assert!(grid.items().iter().all(|el| el.transform().is_none()));
        assert!(!frame_loop.has_pending_work());
    }

    #[test]
    fn test_container_without_layout_box() {
        let container = HeadlessElement::unmeasurable("grid");
        let frame_loop = Rc::new(FrameLoop::new());
        let animator = wrap_grid(container, GridOptions::default(), frame_loop).unwrap();
        let report = animator.force_animation().unwrap();
        assert_eq!(report, PassReport { forced: true, ..PassReport::default() });
        assert!(animator.container().bounding_rect().is_none());
    }
}
