use std::any::Any;

use egui::{CursorIcon, Pos2, Rect, Vec2};

use super::{Preview, SelectionUpdate, Tool, ToolContext, ToolError, ToolResponse};
use crate::command::Command;
use crate::element::{AttachRole, Connector, ConnectorEnd, DrawableObject, Element, ObjectId};
use crate::geometry::{
    Handle, HitTestOptions, bind_end, handle_at, hits_at, is_on_rotation_handle, objects_in_rect,
};
use crate::state::InteractionState;

/// Rotations smaller than this are treated as a click on the handle
const MIN_ROTATION: f32 = 1e-3;

/// The drag the select tool is in the middle of
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectState {
    #[default]
    Idle,
    Moving {
        /// Snapshots of the dragged objects at press time
        objects: Vec<DrawableObject>,
        origin: Pos2,
        current: Pos2,
    },
    Resizing {
        original: DrawableObject,
        handle: Handle,
        bounds: Rect,
        current: Pos2,
    },
    Rotating {
        original: DrawableObject,
        center: Pos2,
        start_angle: f32,
        current: Pos2,
    },
    BoxSelecting {
        origin: Pos2,
        current: Pos2,
        additive: bool,
    },
    DraggingEndpoint {
        original: Connector,
        role: AttachRole,
        current: Pos2,
    },
    DraggingControl {
        original: Connector,
        current: Pos2,
    },
}

/// Selection plus direct manipulation of what is selected.
///
/// Press priority: connector endpoint and curve handles of a single selected
/// connector, then the rotation handle, then resize handles, then the object
/// under the cursor, then empty space (rubber-band selection).
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    state: SelectState,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectState {
        &self.state
    }

    fn begin_handle_drag(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> Option<InteractionState> {
        let id = ctx.selection.single()?;
        let object = ctx.document.get(id)?;
        let radius = ctx.handle_radius();

        if let Some(connector) = object.as_connector() {
            for role in [AttachRole::Source, AttachRole::Target] {
                if connector.end(role).point.distance(pos) <= radius {
                    self.state = SelectState::DraggingEndpoint {
                        original: connector.clone(),
                        role,
                        current: pos,
                    };
                    return Some(InteractionState::DraggingConnectorEndpoint);
                }
            }
            if connector.curve_handle().distance(pos) <= radius {
                self.state = SelectState::DraggingControl {
                    original: connector.clone(),
                    current: pos,
                };
                return Some(InteractionState::DraggingCurveControlPoint);
            }
            return None;
        }

        let bounds = object.bounds();
        let config = ctx.config;
        if is_on_rotation_handle(
            bounds,
            pos,
            config.rotate_handle_offset_px,
            config.handle_radius_px,
            ctx.zoom,
        ) {
            let center = object.center();
            self.state = SelectState::Rotating {
                original: object.clone(),
                center,
                start_angle: (pos - center).angle(),
                current: pos,
            };
            return Some(InteractionState::Rotating);
        }

        let handle = handle_at(bounds, pos, config.handle_radius_px, ctx.zoom)?;
        self.state = SelectState::Resizing {
            original: object.clone(),
            handle,
            bounds,
            current: pos,
        };
        // Resizing is a drag of a single object
        Some(InteractionState::DraggingObject)
    }

    fn begin_object_drag(&mut self, pos: Pos2, hit: &DrawableObject, ctx: &ToolContext<'_>) -> ToolResponse {
        let id = hit.id();

        if ctx.modifiers.shift {
            return ToolResponse::none().with_selection(SelectionUpdate::Toggle(id));
        }

        // Pressing on an already selected object keeps the group for a joint move
        let (ids, update) = if ctx.selection.contains(id) {
            (ctx.selection.ids().to_vec(), None)
        } else {
            (vec![id], Some(SelectionUpdate::Replace(vec![id])))
        };

        let objects: Vec<DrawableObject> = ids
            .iter()
            .filter_map(|id| ctx.document.get(*id).cloned())
            .collect();
        let state = if objects.len() > 1 {
            InteractionState::DraggingSelection
        } else {
            InteractionState::DraggingObject
        };
        self.state = SelectState::Moving {
            objects,
            origin: pos,
            current: pos,
        };

        let response = ToolResponse::transition(state);
        match update {
            Some(update) => response.with_selection(update),
            None => response,
        }
    }

    /// Host under `pos` for a dragged connector end, skipping the connector itself
    fn endpoint_host<'d>(pos: Pos2, connector: ObjectId, ctx: &ToolContext<'d>) -> Option<&'d DrawableObject> {
        let document = ctx.document;
        let options = HitTestOptions::bounding_box(ctx.hit_tolerance());
        hits_at(document, pos, &options)
            .into_iter()
            .filter(|id| *id != connector)
            .filter_map(|id| document.get(id))
            .find(|object| !object.is_connector())
    }

    fn finish(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        let state = std::mem::take(&mut self.state);
        let response = ToolResponse::transition(InteractionState::Idle);
        let moved = |origin: Pos2| pos.distance(origin) >= ctx.drag_threshold();

        match state {
            SelectState::Idle => ToolResponse::none(),

            SelectState::Moving { objects, origin, .. } => {
                if !moved(origin) {
                    return response;
                }
                let ids = objects.iter().map(Element::id).collect();
                response.with_command(Command::move_objects(ids, pos - origin))
            }

            SelectState::Resizing {
                original,
                handle,
                bounds,
                ..
            } => {
                let resized = handle.resize(bounds, pos, ctx.config.min_shape_size);
                if resized == bounds {
                    return response;
                }
                let mut after = original.clone();
                after.resize(bounds, resized);
                response.with_command(Command::modify(original, after))
            }

            SelectState::Rotating {
                original,
                center,
                start_angle,
                ..
            } => {
                let angle = (pos - center).angle() - start_angle;
                if angle.abs() < MIN_ROTATION {
                    return response;
                }
                let mut after = original.clone();
                after.rotate_by(angle);
                response.with_command(Command::modify(original, after))
            }

            SelectState::BoxSelecting { origin, additive, .. } => {
                let rect = Rect::from_two_pos(origin, pos);
                let ids = if moved(origin) {
                    objects_in_rect(ctx.document, rect)
                } else {
                    Vec::new()
                };
                let update = if additive {
                    SelectionUpdate::Add(ids)
                } else {
                    SelectionUpdate::Replace(ids)
                };
                response.with_selection(update)
            }

            SelectState::DraggingEndpoint { original, role, .. } => {
                if !moved(original.end(role).point) {
                    return response;
                }
                let end = match Self::endpoint_host(pos, original.id(), ctx) {
                    Some(host) => bind_end(host, pos, role),
                    None => ConnectorEnd::free(pos),
                };
                let mut after = original.clone();
                *after.end_mut(role) = end;
                after.set_end_points(after.source.point, after.target.point);
                response.with_command(Command::modify(original.into(), after.into()))
            }

            SelectState::DraggingControl { original, .. } => {
                if !moved(original.curve_handle()) {
                    return response;
                }
                let mut after = original.clone();
                after.control = Some(pos);
                response.with_command(Command::modify(original.into(), after.into()))
            }
        }
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "select"
    }

    fn on_activate(&mut self) {
        self.state = SelectState::Idle;
    }

    fn on_deactivate(&mut self) -> Result<(), ToolError> {
        self.state = SelectState::Idle;
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if let Some(state) = self.begin_handle_drag(pos, ctx) {
            return ToolResponse::transition(state);
        }

        if let Some(hit) = hit {
            return self.begin_object_drag(pos, hit, ctx);
        }

        let additive = ctx.modifiers.shift;
        self.state = SelectState::BoxSelecting {
            origin: pos,
            current: pos,
            additive,
        };
        let response = ToolResponse::transition(InteractionState::DrawingSelectionBox);
        if additive {
            response
        } else {
            response.with_selection(SelectionUpdate::Clear)
        }
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Moving { current, .. }
            | SelectState::Resizing { current, .. }
            | SelectState::Rotating { current, .. }
            | SelectState::BoxSelecting { current, .. }
            | SelectState::DraggingEndpoint { current, .. }
            | SelectState::DraggingControl { current, .. } => *current = pos,
        }
        ToolResponse::none()
    }

    fn on_pointer_up(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        self.finish(pos, ctx)
    }

    fn preview(&self) -> Option<Preview> {
        match &self.state {
            SelectState::Idle => None,

            SelectState::Moving { objects, origin, current } => {
                let delta: Vec2 = *current - *origin;
                let ghosts = objects
                    .iter()
                    .map(|object| {
                        let mut ghost = object.clone();
                        ghost.translate(delta);
                        ghost
                    })
                    .collect();
                Some(Preview::Objects(ghosts))
            }

            SelectState::Resizing {
                original,
                handle,
                bounds,
                current,
            } => {
                let mut ghost = original.clone();
                ghost.resize(*bounds, handle.resize(*bounds, *current, 0.0));
                Some(Preview::Object(ghost))
            }

            SelectState::Rotating {
                original,
                center,
                start_angle,
                current,
            } => {
                let mut ghost = original.clone();
                ghost.rotate_by((*current - *center).angle() - start_angle);
                Some(Preview::Object(ghost))
            }

            SelectState::BoxSelecting { origin, current, .. } => {
                Some(Preview::SelectionBox(Rect::from_two_pos(*origin, *current)))
            }

            SelectState::DraggingEndpoint {
                original,
                role,
                current,
            } => {
                let mut ghost = original.clone();
                ghost.end_mut(*role).point = *current;
                Some(Preview::Object(ghost.into()))
            }

            SelectState::DraggingControl { original, current } => {
                let mut ghost = original.clone();
                ghost.control = Some(*current);
                Some(Preview::Object(ghost.into()))
            }
        }
    }

    fn is_idle(&self) -> bool {
        self.state == SelectState::Idle
    }

    fn cursor(&self) -> CursorIcon {
        match &self.state {
            SelectState::Idle | SelectState::BoxSelecting { .. } => CursorIcon::Default,
            SelectState::Moving { .. } => CursorIcon::Move,
            SelectState::Resizing { handle, .. } => handle.cursor_icon(),
            SelectState::Rotating { .. } => CursorIcon::Alias,
            SelectState::DraggingEndpoint { .. } | SelectState::DraggingControl { .. } => {
                CursorIcon::Grabbing
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
