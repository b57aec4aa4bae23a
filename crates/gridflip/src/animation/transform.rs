//! Transform writes for items and their single child wrapper.

use crate::element::Element;
use crate::geometry::Coords;
use crate::sync::{FrameScheduler, Phase};

/// When a style write happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Synchronously, before the next paint.
    Immediate,
    /// In the render phase of the next frame.
    Scheduled,
}

/// Writes `coords` to `element` and the inverse scale to its child wrapper.
///
/// The identity transform clears both transforms instead of writing a no-op
/// transform, so a finished item is back to its natural rendering context.
pub fn apply_coords<E>(element: &E, coords: Coords, mode: WriteMode, scheduler: &dyn FrameScheduler)
where E: Element + 'static
{
    let (own, child) = if coords.is_identity() {
        (None, None)
    } else {
        (Some(coords), Some(coords.inverse_scale()))
    };

    write(element, own, mode, scheduler);
    if let Some(first_child) = element.children().into_iter().next() {
        write(&first_child, child, mode, scheduler);
    }
}

/// Immediately removes the transforms of `element` and its child wrapper.
pub fn clear_transforms<E: Element>(element: &E) {
    element.set_transform(None);
    if let Some(first_child) = element.children().into_iter().next() {
        first_child.set_transform(None);
    }
}

fn write<E>(element: &E, transform: Option<Coords>, mode: WriteMode, scheduler: &dyn FrameScheduler)
where E: Element + 'static
{
    match mode {
        WriteMode::Immediate => element.set_transform(transform),
        WriteMode::Scheduled => {
            let element = element.clone();
            scheduler.schedule(Phase::Render, Box::new(move || element.set_transform(transform)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::geometry::Rect;
    use crate::headless::{HeadlessElement, StyleWrite};
    use crate::sync::FrameLoop;

    fn item_with_child() -> (HeadlessElement, HeadlessElement) {
        let item = HeadlessElement::new("item", Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = item.append_child(HeadlessElement::new("child", Rect::new(0.0, 0.0, 100.0, 100.0)));
        (item, child)
    }

    #[test]
    fn test_immediate_write_applies_now() {
        let frame_loop = FrameLoop::new();
        let (item, child) = item_with_child();
        let coords = Coords::new(-200.0, 0.0, 2.0, 0.5);

        apply_coords(&item, coords, WriteMode::Immediate, &frame_loop);

        assert_eq!(item.transform(), Some(coords));
        assert_eq!(child.transform(), Some(Coords::new(0.0, 0.0, 0.5, 2.0)));
        assert!(!frame_loop.has_pending_work());
    }

    #[test]
    fn test_scheduled_write_waits_for_render() {
        let frame_loop = FrameLoop::new();
        let (item, child) = item_with_child();
        let coords = Coords::new(10.0, 20.0, 1.0, 1.0);

        apply_coords(&item, coords, WriteMode::Scheduled, &frame_loop);
        assert_eq!(item.transform(), None);

        frame_loop.tick(Duration::from_millis(16));
        assert_eq!(item.transform(), Some(coords));
        assert_eq!(child.transform(), Some(Coords::IDENTITY));
    }

    #[test]
    fn test_identity_clears_instead_of_writing() {
        let frame_loop = FrameLoop::new();
        let (item, child) = item_with_child();
        apply_coords(&item, Coords::new(5.0, 0.0, 1.0, 1.0), WriteMode::Immediate, &frame_loop);
        apply_coords(&item, Coords::IDENTITY, WriteMode::Immediate, &frame_loop);

        assert_eq!(item.transform(), None);
        assert_eq!(child.transform(), None);
        assert_eq!(item.writes().last(), Some(&StyleWrite::Transform(None)));
    }

    #[test]
    fn test_item_without_child() {
        let frame_loop = FrameLoop::new();
        let item = HeadlessElement::new("item", Rect::zero());
        apply_coords(&item, Coords::new(1.0, 1.0, 1.0, 1.0), WriteMode::Immediate, &frame_loop);
        assert_eq!(item.writes().len(), 1);
    }

    #[test]
    fn test_clear_transforms() {
        let frame_loop = FrameLoop::new();
        let (item, child) = item_with_child();
        apply_coords(&item, Coords::new(5.0, 5.0, 2.0, 2.0), WriteMode::Immediate, &frame_loop);

        clear_transforms(&item);
        assert_eq!(item.transform(), None);
        assert_eq!(child.transform(), None);
    }
}
