use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, CURVE_SEGMENTS, MIN_ELEMENT_SIZE, Style, rotate_about};
use super::{Element, ObjectId, ObjectKind};

/// Which end of a connector, and therefore which attachment policy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachRole {
    Source,
    Target,
}

impl AttachRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachRole::Source => "source",
            AttachRole::Target => "target",
        }
    }
}

/// Logical link between a connector end and the object it is attached to.
///
/// `anchor_offset` is the raw click point relative to the host's center, so the
/// attachment point can be recomputed whenever the host moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub host: ObjectId,
    pub role: AttachRole,
    pub anchor_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorEnd {
    /// Current attachment point in document coordinates
    pub point: Pos2,
    pub binding: Option<Binding>,
}

impl ConnectorEnd {
    pub fn free(point: Pos2) -> Self {
        Self { point, binding: None }
    }

    pub fn bound(point: Pos2, binding: Binding) -> Self {
        Self {
            point,
            binding: Some(binding),
        }
    }

    pub fn host(&self) -> Option<ObjectId> {
        self.binding.map(|binding| binding.host)
    }
}

/// A link drawn between two endpoints, optionally curved through a control point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    id: ObjectId,
    pub source: ConnectorEnd,
    pub target: ConnectorEnd,
    /// Quadratic Bézier control point; `None` draws a straight segment
    pub control: Option<Pos2>,
    pub style: Style,
}

impl Connector {
    pub fn new(source: ConnectorEnd, target: ConnectorEnd, style: Style) -> Self {
        let mut connector = Self {
            id: ObjectId::new(),
            source,
            target,
            control: None,
            style,
        };
        connector.clamp_length();
        connector
    }

    pub fn end(&self, role: AttachRole) -> &ConnectorEnd {
        match role {
            AttachRole::Source => &self.source,
            AttachRole::Target => &self.target,
        }
    }

    pub fn end_mut(&mut self, role: AttachRole) -> &mut ConnectorEnd {
        match role {
            AttachRole::Source => &mut self.source,
            AttachRole::Target => &mut self.target,
        }
    }

    pub fn is_attached_to(&self, host: ObjectId) -> bool {
        self.source.host() == Some(host) || self.target.host() == Some(host)
    }

    /// Where the curve handle sits: the control point, or the midpoint of a straight connector
    pub fn curve_handle(&self) -> Pos2 {
        self.control
            .unwrap_or_else(|| self.source.point.lerp(self.target.point, 0.5))
    }

    /// The drawn path, sampled into straight segments
    pub fn path_points(&self) -> Vec<Pos2> {
        match self.control {
            Some(control) => {
                common::sample_quadratic(self.source.point, control, self.target.point, CURVE_SEGMENTS)
            }
            None => vec![self.source.point, self.target.point],
        }
    }

    /// Replace both attachment points, keeping the connector from collapsing
    pub(crate) fn set_end_points(&mut self, source: Pos2, target: Pos2) {
        self.source.point = source;
        self.target.point = target;
        self.clamp_length();
    }

    fn clamp_length(&mut self) {
        let offset = self.target.point - self.source.point;
        if offset.length() >= MIN_ELEMENT_SIZE {
            return;
        }
        let direction = if offset.length_sq() > 0.0 { offset.normalized() } else { Vec2::X };
        self.target.point = self.source.point + direction * MIN_ELEMENT_SIZE;
    }
}

impl Element for Connector {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Connector
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        common::calculate_bounds(&self.path_points(), self.style.half_width())
    }

    fn center(&self) -> Pos2 {
        common::calculate_bounds(&self.path_points(), 0.0).center()
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        common::distance_to_polyline(pos, &self.path_points()) <= self.style.half_width() + tolerance
    }

    // Bound ends snap back to their hosts on the next refresh
    fn translate(&mut self, delta: Vec2) {
        self.source.point += delta;
        self.target.point += delta;
        if let Some(control) = &mut self.control {
            *control += delta;
        }
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        self.source.point = common::map_point(self.source.point, from, to);
        self.target.point = common::map_point(self.target.point, from, to);
        self.control = self.control.map(|control| common::map_point(control, from, to));
        self.clamp_length();
    }

    fn rotate_by(&mut self, angle: f32) {
        let center = self.center();
        self.source.point = rotate_about(self.source.point, center, angle);
        self.target.point = rotate_about(self.target.point, center, angle);
        self.control = self.control.map(|control| rotate_about(control, center, angle));
    }
}
