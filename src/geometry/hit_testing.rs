use egui::{Pos2, Rect};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{DrawableObject, Element, ObjectId};

/// How a pointer position is matched against objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitMode {
    /// Anywhere inside the (slightly expanded) bounding box
    #[default]
    BoundingBox,
    /// Only on the actual geometry: filled interior or near an outline
    Precision,
}

/// Hit mode plus tolerances, already converted to document units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestOptions {
    pub mode: HitMode,
    /// Bounding-box expansion
    pub tolerance: f32,
    /// Stroke proximity tolerance for precision tests
    pub precision_tolerance: f32,
}

impl HitTestOptions {
    /// Convert the screen-space tolerances of `config` at the given zoom
    pub fn from_config(config: &EditorConfig, zoom: f32, mode: HitMode) -> Self {
        let zoom = zoom.max(f32::EPSILON);
        Self {
            mode,
            tolerance: config.hit_tolerance_px / zoom,
            precision_tolerance: config.precision_tolerance_px.min(config.hit_tolerance_px) / zoom,
        }
    }

    pub fn bounding_box(tolerance: f32) -> Self {
        Self {
            mode: HitMode::BoundingBox,
            tolerance,
            precision_tolerance: tolerance,
        }
    }

    pub fn precision(tolerance: f32) -> Self {
        Self {
            mode: HitMode::Precision,
            tolerance,
            precision_tolerance: tolerance,
        }
    }
}

/// Default selection test: inside the bounds grown by `tolerance`, so thin
/// lines and connectors stay easy to click
pub fn bbox_hit(object: &DrawableObject, pos: Pos2, tolerance: f32) -> bool {
    object.bounds().expand(tolerance).contains(pos)
}

/// Geometry-accurate test.
///
/// Gated on the bounding-box test with the same tolerance, so a precision hit
/// always implies a bounding-box hit.
pub fn precision_hit(object: &DrawableObject, pos: Pos2, tolerance: f32) -> bool {
    bbox_hit(object, pos, tolerance) && object.precision_hit(pos, tolerance)
}

pub fn hit_test(object: &DrawableObject, pos: Pos2, options: &HitTestOptions) -> bool {
    match options.mode {
        HitMode::BoundingBox => bbox_hit(object, pos, options.tolerance),
        HitMode::Precision => precision_hit(object, pos, options.precision_tolerance),
    }
}

/// Every object under `pos`, topmost first
pub fn hits_at(document: &Document, pos: Pos2, options: &HitTestOptions) -> Vec<ObjectId> {
    document
        .objects()
        .iter()
        .rev()
        .filter(|object| hit_test(object, pos, options))
        .map(Element::id)
        .collect()
}

/// The object that a click at `pos` selects
pub fn topmost_at<'a>(
    document: &'a Document,
    pos: Pos2,
    options: &HitTestOptions,
) -> Option<&'a DrawableObject> {
    document
        .objects()
        .iter()
        .rev()
        .find(|object| hit_test(object, pos, options))
}

/// Objects whose bounds intersect `rect`, bottom to top
pub fn objects_in_rect(document: &Document, rect: Rect) -> Vec<ObjectId> {
    document
        .objects()
        .iter()
        .filter(|object| object.bounds().intersects(rect))
        .map(Element::id)
        .collect()
}

/// Union of the bounds of several objects
pub fn combined_bounds<'a>(objects: impl IntoIterator<Item = &'a DrawableObject>) -> Rect {
    objects
        .into_iter()
        .map(Element::bounds)
        .fold(Rect::NOTHING, |acc, bounds| acc.union(bounds))
}
