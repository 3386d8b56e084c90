//! Wheel frame builder
//!
//! Pure function of `(items, rotation, size, icon cache)`: produces the
//! triangle mesh for sectors and chrome plus placement records for the text
//! labels and reward icons, which the host draws with its own text and
//! image facilities.

use std::borrow::Cow;

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, sector_color};
use crate::consts::*;
use crate::images::ImageCache;
use crate::polar_to_cartesian;
use crate::wheel::sectors;

/// Font family used for labels
pub const LABEL_FONT_FAMILY: &str = "Inter";

/// Where a label goes. Coordinates are in the label's rotated frame: origin
/// at the wheel center, +x along the sector's mid-angle.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub index: usize,
    pub text: String,
    /// Mid-angle of the sector (radians, canvas convention)
    pub angle: f32,
    /// Right edge of the text along the rotated x axis
    pub anchor_x: f32,
    pub font_px: f32,
    pub color: [f32; 4],
}

impl LabelPlacement {
    /// CSS font shorthand, e.g. `bold 16px Inter`
    pub fn css_font(&self) -> String {
        format!("bold {}px {}", self.font_px, LABEL_FONT_FAMILY)
    }
}

/// Where a reward icon goes, in the same rotated frame as its label
#[derive(Debug, Clone, PartialEq)]
pub struct IconPlacement {
    pub index: usize,
    /// Cache key
    pub label: String,
    pub angle: f32,
    /// Left edge along the rotated x axis
    pub x: f32,
    /// Square side length
    pub size: f32,
}

impl IconPlacement {
    /// Icon center in surface pixels
    pub fn center(&self, wheel_center: Vec2) -> Vec2 {
        wheel_center + polar_to_cartesian(self.x + self.size / 2.0, self.angle)
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, Default)]
pub struct WheelFrame {
    pub size: u32,
    pub center: Vec2,
    pub radius: f32,
    pub vertices: Vec<Vertex>,
    pub labels: Vec<LabelPlacement>,
    pub icons: Vec<IconPlacement>,
}

impl WheelFrame {
    /// No sectors were drawn
    pub fn is_degenerate(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Wheel radius for a surface of `size` pixels
#[inline]
pub fn wheel_radius(size: u32) -> f32 {
    (size as f32 / 2.0 - WHEEL_MARGIN).max(1.0)
}

/// Label font size for a wheel with `count` items
#[inline]
pub fn font_px(count: usize) -> f32 {
    if count > DENSE_ITEM_THRESHOLD {
        LABEL_FONT_PX_DENSE
    } else {
        LABEL_FONT_PX
    }
}

/// Shorten labels longer than 20 chars to 17 chars plus `...`
pub fn truncate_label(label: &str) -> Cow<'_, str> {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_TRUNCATED_CHARS).collect();
        Cow::Owned(format!("{head}..."))
    } else {
        Cow::Borrowed(label)
    }
}

/// Build the frame for `items` at `rotation`
pub fn draw_wheel<T: AsRef<str>, I>(
    items: &[T],
    rotation: f64,
    size: u32,
    icons: &ImageCache<I>,
) -> WheelFrame {
    let center = Vec2::splat(size as f32 / 2.0);
    let radius = wheel_radius(size);
    let mut frame = WheelFrame {
        size,
        center,
        radius,
        ..Default::default()
    };

    if items.is_empty() {
        frame
            .vertices
            .extend(shapes::circle_stroke(center, radius, 2.0, colors::EMPTY_RING));
        return frame;
    }

    let count = items.len();
    let font = font_px(count);

    for sector in sectors(count, rotation) {
        let start = sector.theta_start as f32;
        let span = sector.span as f32;
        frame
            .vertices
            .extend(shapes::sector(center, radius, start, span, sector_color(sector.index)));
    }

    // Borders go on top of every fill so neighbours can't paint over them
    for sector in sectors(count, rotation) {
        if count > 1 {
            let edge = center + polar_to_cartesian(radius, sector.theta_start as f32);
            frame
                .vertices
                .extend(shapes::line(center, edge, SECTOR_BORDER_WIDTH, colors::SECTOR_BORDER));
        }

        let label = items[sector.index].as_ref();
        let angle = sector.mid_angle() as f32;
        let anchor_x = if icons.contains(label) {
            let icon_size = font * 2.0;
            frame.icons.push(IconPlacement {
                index: sector.index,
                label: label.to_string(),
                angle,
                x: radius - 40.0 - icon_size,
                size: icon_size,
            });
            radius - 45.0 - icon_size
        } else {
            radius - 30.0
        };

        frame.labels.push(LabelPlacement {
            index: sector.index,
            text: truncate_label(label).into_owned(),
            angle,
            anchor_x,
            font_px: font,
            color: colors::LABEL,
        });
    }

    draw_chrome(&mut frame);
    frame
}

/// Rings, hub and pointer; depends only on the surface size
fn draw_chrome(frame: &mut WheelFrame) {
    let WheelFrame {
        center,
        radius,
        vertices,
        ..
    } = frame;
    let (center, radius) = (*center, *radius);

    // Outer border ring
    vertices.extend(shapes::circle_stroke(
        center,
        radius,
        OUTER_RING_WIDTH,
        colors::OUTER_RING,
    ));
    // Inner glow ring
    vertices.extend(shapes::circle_stroke(
        center,
        radius - INNER_RING_INSET,
        INNER_RING_WIDTH,
        colors::INNER_RING,
    ));

    // Center hub
    vertices.extend(shapes::gradient_disc(
        center,
        HUB_RADIUS,
        colors::HUB_CENTER,
        colors::HUB_EDGE,
    ));
    vertices.extend(shapes::circle_stroke(
        center,
        HUB_RADIUS,
        HUB_STROKE_WIDTH,
        colors::HUB_STROKE,
    ));
    vertices.extend(shapes::circle(
        center + Vec2::new(-8.0, -8.0),
        4.0,
        colors::HUB_HIGHLIGHT,
    ));

    // Pointer: downward triangle above the wheel top
    let tip = Vec2::new(center.x, center.y - radius + 16.0);
    let half = 14.0;
    let base_y = (tip.y - 34.0).max(0.0);
    vertices.extend(shapes::triangle(
        Vec2::new(tip.x - half - 3.0, base_y),
        Vec2::new(tip.x + half + 3.0, base_y),
        tip + Vec2::new(0.0, 4.0),
        colors::POINTER_OUTLINE,
    ));
    vertices.extend(shapes::triangle(
        Vec2::new(tip.x - half, base_y + 2.0),
        Vec2::new(tip.x + half, base_y + 2.0),
        tip,
        colors::POINTER,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn no_icons() -> ImageCache<()> {
        ImageCache::new()
    }

    #[test]
    fn test_empty_items_degenerate_ring() {
        let items: [&str; 0] = [];
        let frame = draw_wheel(&items, 0.0, 600, &no_icons());
        assert!(frame.is_degenerate());
        assert!(frame.icons.is_empty());
        assert!(!frame.vertices.is_empty());
        assert!(frame.vertices.iter().all(|v| v.color == colors::EMPTY_RING));
    }

    #[test]
    fn test_one_label_per_item() {
        let items = ["A", "B", "C", "D"];
        let frame = draw_wheel(&items, 0.0, 600, &no_icons());
        assert_eq!(frame.labels.len(), 4);
        assert_eq!(frame.radius, 290.0);
        let l = &frame.labels[2];
        assert_eq!(l.text, "C");
        assert!((l.angle - 5.0 * std::f32::consts::FRAC_PI_4).abs() < 1e-5);
        assert_eq!(l.anchor_x, 260.0);
        assert_eq!(l.css_font(), "bold 16px Inter");
    }

    #[test]
    fn test_rotation_shifts_labels() {
        let items = ["A", "B"];
        let frame = draw_wheel(&items, 1.0, 600, &no_icons());
        assert!((frame.labels[0].angle - (std::f32::consts::FRAC_PI_2 + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_dense_font() {
        let items: Vec<String> = (0..31).map(|i| i.to_string()).collect();
        let frame = draw_wheel(&items, 0.0, 600, &no_icons());
        assert!(frame.labels.iter().all(|l| l.font_px == 10.0));
        assert_eq!(font_px(30), 16.0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(
            truncate_label("this label is far too long"),
            "this label is far..."
        );
        // Counts chars, not bytes
        let emoji = "🎉".repeat(21);
        assert_eq!(truncate_label(&emoji).chars().count(), 20);
    }

    #[test]
    fn test_icon_placement_for_cached_label() {
        let mut cache = ImageCache::new();
        cache.apply(vec![crate::images::LoadEvent::Loaded {
            label: "99".into(),
            image: (),
        }]);
        let items = ["Ana", "99"];
        let frame = draw_wheel(&items, 0.0, 600, &cache);
        assert_eq!(frame.icons.len(), 1);
        let icon = &frame.icons[0];
        assert_eq!(icon.index, 1);
        assert_eq!(icon.size, 32.0);
        assert_eq!(icon.x, 290.0 - 40.0 - 32.0);
        assert_eq!(frame.labels[1].anchor_x, 290.0 - 45.0 - 32.0);
        assert_eq!(frame.labels[0].anchor_x, 260.0);
    }

    #[test]
    fn test_duplicate_labels_each_drawn() {
        let frame = draw_wheel(&["X", "X", "X"], 0.0, 300, &no_icons());
        let indices: Vec<usize> = frame.labels.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_truncated_never_exceeds_twenty(label in "\\PC{0,60}") {
            prop_assert!(truncate_label(&label).chars().count() <= 20);
        }

        #[test]
        fn prop_draw_never_panics(count in 0usize..80, rotation in 0.0f64..std::f64::consts::TAU, size in 64u32..1200) {
            let items: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
            let frame = draw_wheel(&items, rotation, size, &no_icons());
            prop_assert_eq!(frame.labels.len(), count);
            prop_assert_eq!(frame.vertices.len() % 3, 0);
        }
    }
}
