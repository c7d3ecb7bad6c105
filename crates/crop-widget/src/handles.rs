//! The tagged elements a host lays over the crop rectangle, and hit testing
//! against them.

use crop_types::{Orientation, Rect, Vec2};

/// Bars run along a whole edge; handles are small squares on corners and
/// edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Bar,
    Handle,
}

impl HandleKind {
    fn class_suffix(self) -> &'static str {
        match self {
            HandleKind::Bar => "drag-bar",
            HandleKind::Handle => "drag-handle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleSpec {
    pub kind: HandleKind,
    pub orientation: Orientation,
}

impl HandleSpec {
    /// `"{base}__drag-bar ord-n"`, `"{base}__drag-handle ord-se"`, ...
    pub fn class_name(&self, base: &str) -> String {
        format!(
            "{base}__{} ord-{}",
            self.kind.class_suffix(),
            self.orientation.tag()
        )
    }

    /// Value of the `data-ord` attribute the controller reads back on press.
    pub fn data_ord(&self) -> &'static str {
        self.orientation.tag()
    }
}

const BAR_ORDER: [Orientation; 4] = [
    Orientation::North,
    Orientation::East,
    Orientation::South,
    Orientation::West,
];

const HANDLE_ORDER: [Orientation; 8] = [
    Orientation::NorthWest,
    Orientation::North,
    Orientation::NorthEast,
    Orientation::East,
    Orientation::SouthEast,
    Orientation::South,
    Orientation::SouthWest,
    Orientation::West,
];

/// Every tagged element in document order: bars first, then handles.
pub fn handle_specs(include_bars: bool) -> Vec<HandleSpec> {
    let bars = BAR_ORDER
        .iter()
        .filter(|_| include_bars)
        .map(|&orientation| HandleSpec {
            kind: HandleKind::Bar,
            orientation,
        });

    let handles = HANDLE_ORDER.iter().map(|&orientation| HandleSpec {
        kind: HandleKind::Handle,
        orientation,
    });

    bars.chain(handles).collect()
}

/// Where a handle for `orientation` sits on the (normalized) rectangle.
pub fn anchor(rect: Rect, orientation: Orientation) -> Vec2 {
    let rect = rect.normalize();
    let center = rect.center();

    let x = if orientation.has_west() {
        rect.x
    } else if orientation.has_east() {
        rect.right()
    } else {
        center.x
    };

    let y = if orientation.has_north() {
        rect.y
    } else if orientation.has_south() {
        rect.bottom()
    } else {
        center.y
    };

    Vec2::new(x, y)
}

/// What a press at a given point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(Orientation),
    Body,
    Outside,
}

impl HitTarget {
    /// The orientation to start a drag with. Body presses move the rectangle.
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            HitTarget::Handle(orientation) => Some(orientation),
            HitTarget::Body | HitTarget::Outside => None,
        }
    }
}

fn point_in_handle(point: Vec2, handle_center: Vec2, hit_size: f32) -> bool {
    let half = hit_size / 2.0;
    (point.x - handle_center.x).abs() <= half && (point.y - handle_center.y).abs() <= half
}

fn point_on_bar(rect: Rect, point: Vec2, orientation: Orientation, hit_size: f32) -> bool {
    let half = hit_size / 2.0;
    let spans_x = point.x >= rect.x - half && point.x <= rect.right() + half;
    let spans_y = point.y >= rect.y - half && point.y <= rect.bottom() + half;

    match orientation {
        Orientation::North => spans_x && (point.y - rect.y).abs() <= half,
        Orientation::South => spans_x && (point.y - rect.bottom()).abs() <= half,
        Orientation::West => spans_y && (point.x - rect.x).abs() <= half,
        Orientation::East => spans_y && (point.x - rect.right()).abs() <= half,
        _ => false,
    }
}

/// Resolves a press position to a handle, the body, or nothing.
///
/// Corners win over edge handles, which win over bars.
pub fn hit_test(rect: Rect, point: Vec2, hit_size: f32, include_bars: bool) -> HitTarget {
    let rect = rect.normalize();

    let corners = HANDLE_ORDER.iter().filter(|o| o.is_corner());
    let edges = HANDLE_ORDER.iter().filter(|o| !o.is_corner());

    for &orientation in corners.chain(edges) {
        if point_in_handle(point, anchor(rect, orientation), hit_size) {
            return HitTarget::Handle(orientation);
        }
    }

    if include_bars {
        for &orientation in &BAR_ORDER {
            if point_on_bar(rect, point, orientation, hit_size) {
                return HitTarget::Handle(orientation);
            }
        }
    }

    if rect.contains(point) {
        HitTarget::Body
    } else {
        HitTarget::Outside
    }
}
