use std::fmt;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;
mod connector;
mod shapes;
mod stroke;

pub use common::{
    MIN_ELEMENT_SIZE, Style, closest_point_on_ellipse, distance_to_segment, project_onto_segment,
    rotate_about,
};
pub use connector::{AttachRole, Binding, Connector, ConnectorEnd};
pub use shapes::{Circle, Ellipse, Rectangle};
pub use stroke::{Line, Path};

/// Stable identity of an object within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag of a drawable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Circle,
    Ellipse,
    Rectangle,
    Line,
    Path,
    Connector,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Circle => "circle",
            ObjectKind::Ellipse => "ellipse",
            ObjectKind::Rectangle => "rectangle",
            ObjectKind::Line => "line",
            ObjectKind::Path => "path",
            ObjectKind::Connector => "connector",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract every document object satisfies.
///
/// `bounds`, `center` and `precision_hit` have no default implementation: an
/// object kind that does not provide them does not compile, so no object can
/// end up unselectable.
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> ObjectId;

    fn kind(&self) -> ObjectKind;

    fn style(&self) -> &Style;

    /// Axis-aligned bounds in document coordinates, including the stroke
    fn bounds(&self) -> Rect;

    /// Pivot for rotation and grouping
    fn center(&self) -> Pos2;

    /// Exact geometry test: inside a filled area, or within the stroke plus
    /// `tolerance` of an outline. Rotation is taken into account.
    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);

    /// Scale the element so that the `from` frame maps onto `to`
    fn resize(&mut self, from: Rect, to: Rect);

    /// Current rotation in radians about `center()`
    fn rotation(&self) -> f32 {
        0.0
    }

    fn rotate_by(&mut self, angle: f32);
}

/// Enumeration of all element types in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawableObject {
    Circle(Circle),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Line(Line),
    Path(Path),
    Connector(Connector),
}

impl DrawableObject {
    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            DrawableObject::Connector(connector) => Some(connector),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match self {
            DrawableObject::Connector(connector) => Some(connector),
            _ => None,
        }
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, DrawableObject::Connector(_))
    }

    fn as_element(&self) -> &dyn Element {
        match self {
            DrawableObject::Circle(c) => c,
            DrawableObject::Ellipse(e) => e,
            DrawableObject::Rectangle(r) => r,
            DrawableObject::Line(l) => l,
            DrawableObject::Path(p) => p,
            DrawableObject::Connector(c) => c,
        }
    }

    fn as_element_mut(&mut self) -> &mut dyn Element {
        match self {
            DrawableObject::Circle(c) => c,
            DrawableObject::Ellipse(e) => e,
            DrawableObject::Rectangle(r) => r,
            DrawableObject::Line(l) => l,
            DrawableObject::Path(p) => p,
            DrawableObject::Connector(c) => c,
        }
    }
}

impl Element for DrawableObject {
    fn id(&self) -> ObjectId {
        self.as_element().id()
    }

    fn kind(&self) -> ObjectKind {
        self.as_element().kind()
    }

    fn style(&self) -> &Style {
        self.as_element().style()
    }

    fn bounds(&self) -> Rect {
        self.as_element().bounds()
    }

    fn center(&self) -> Pos2 {
        self.as_element().center()
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        self.as_element().precision_hit(pos, tolerance)
    }

    fn translate(&mut self, delta: Vec2) {
        self.as_element_mut().translate(delta);
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        self.as_element_mut().resize(from, to);
    }

    fn rotation(&self) -> f32 {
        self.as_element().rotation()
    }

    fn rotate_by(&mut self, angle: f32) {
        self.as_element_mut().rotate_by(angle);
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for DrawableObject {
                fn from(value: $kind) -> Self {
                    DrawableObject::$kind(value)
                }
            }
        )*
    };
}

impl_from_kind!(Circle, Ellipse, Rectangle, Line, Path, Connector);

/// Factory functions for creating elements with the default style
pub mod factory {
    use super::*;

    pub fn create_circle(center: Pos2, radius: f32, style: Style) -> DrawableObject {
        Circle::new(center, radius, style).into()
    }

    pub fn create_ellipse(center: Pos2, radii: Vec2, style: Style) -> DrawableObject {
        Ellipse::new(center, radii, style).into()
    }

    pub fn create_rectangle(rect: Rect, style: Style) -> DrawableObject {
        Rectangle::new(rect, style).into()
    }

    pub fn create_line(start: Pos2, end: Pos2, style: Style) -> DrawableObject {
        Line::new(start, end, style).into()
    }

    pub fn create_path(points: Vec<Pos2>, style: Style) -> DrawableObject {
        Path::new(points, style).into()
    }
}
