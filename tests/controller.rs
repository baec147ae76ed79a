use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use diagram_editor::config::EditorConfig;
use diagram_editor::controller::EditorController;
use diagram_editor::element::{AttachRole, Connector, DrawableObject, Element, ObjectId, Style, factory};
use diagram_editor::error::ToolError;
use diagram_editor::event::EditorEvent;
use diagram_editor::geometry::bind_end;
use diagram_editor::state::InteractionState;
use diagram_editor::tools::{Tool, ToolContext, ToolManager, ToolResponse};
use egui::{Color32, Key, Modifiers, Pos2, Rect, pos2, vec2};

/// Filled, strokeless, so bounds equal the geometry
fn flat() -> Style {
    Style {
        stroke_width: 0.0,
        ..Style::filled(Color32::WHITE)
    }
}

fn square(min: Pos2, size: f32) -> DrawableObject {
    factory::create_rectangle(Rect::from_min_size(min, vec2(size, size)), flat())
}

fn drag(controller: &mut EditorController, from: Pos2, to: Pos2) {
    controller.pointer_down(from);
    controller.pointer_move(from.lerp(to, 0.5));
    controller.pointer_move(to);
    controller.pointer_up(to);
}

fn click(controller: &mut EditorController, pos: Pos2) {
    controller.pointer_down(pos);
    controller.pointer_up(pos);
}

/// Square A, circle B and a connector from A's right edge to B's left edge
fn linked_document() -> (Vec<DrawableObject>, ObjectId, ObjectId, ObjectId) {
    let a = square(pos2(0.0, 0.0), 40.0);
    let b = factory::create_circle(pos2(150.0, 20.0), 20.0, flat());
    let connector: DrawableObject = Connector::new(
        bind_end(&a, pos2(40.0, 20.0), AttachRole::Source),
        bind_end(&b, pos2(130.0, 20.0), AttachRole::Target),
        Style::default(),
    )
    .into();
    let ids = (a.id(), b.id(), connector.id());
    (vec![a, b, connector], ids.0, ids.1, ids.2)
}

fn connector_of(controller: &EditorController, id: ObjectId) -> Connector {
    controller
        .document()
        .get(id)
        .and_then(DrawableObject::as_connector)
        .cloned()
        .unwrap()
}

#[test]
fn test_draw_undo_redo() {
    let mut controller = EditorController::default();
    assert!(controller.select_tool("rectangle"));
    drag(&mut controller, pos2(10.0, 10.0), pos2(60.0, 40.0));

    assert_eq!(controller.document().len(), 1);
    assert_eq!(controller.state(), InteractionState::Idle);
    assert_eq!(controller.undo_label().as_deref(), Some("Add rectangle"));

    assert!(controller.undo());
    assert!(controller.document().is_empty());
    assert!(controller.can_redo());
    assert!(!controller.can_undo());

    assert!(controller.redo());
    assert_eq!(controller.document().len(), 1);
    assert!(!controller.redo());
}

#[test]
fn test_keyboard_shortcuts_drive_history() {
    let mut controller = EditorController::default();
    assert!(controller.select_tool("circle"));
    drag(&mut controller, pos2(50.0, 50.0), pos2(70.0, 50.0));
    assert_eq!(controller.document().len(), 1);

    controller.key_down(Key::Z, Modifiers::COMMAND);
    assert!(controller.document().is_empty());
    controller.key_down(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT);
    assert_eq!(controller.document().len(), 1);
    controller.key_down(Key::Z, Modifiers::COMMAND);
    controller.key_down(Key::Y, Modifiers::COMMAND);
    assert_eq!(controller.document().len(), 1);
}

#[test]
fn test_drag_moves_object_in_one_step() {
    let rect = square(pos2(0.0, 0.0), 40.0);
    let id = rect.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![rect]);

    controller.pointer_down(pos2(20.0, 20.0));
    assert_eq!(controller.state(), InteractionState::DraggingObject);
    assert_eq!(controller.selection().ids(), &[id]);
    controller.pointer_move(pos2(30.0, 25.0));
    controller.pointer_up(pos2(30.0, 25.0));

    assert_eq!(controller.state(), InteractionState::Idle);
    assert_eq!(controller.document().get(id).unwrap().bounds().min, pos2(10.0, 5.0));
    assert_eq!(controller.history().undo_len(), 1);
    assert_eq!(controller.undo_label().as_deref(), Some("Move object"));

    assert!(controller.undo());
    assert_eq!(controller.document().get(id).unwrap().bounds().min, pos2(0.0, 0.0));
}

#[test]
fn test_click_without_drag_records_nothing() {
    let mut controller = EditorController::default();
    controller.load_document(vec![square(pos2(0.0, 0.0), 40.0)]);

    controller.pointer_down(pos2(20.0, 20.0));
    controller.pointer_up(pos2(21.0, 20.0));
    assert!(!controller.can_undo());
    assert_eq!(controller.selection().len(), 1);
}

#[test]
fn test_group_drag_moves_whole_selection() {
    let a = square(pos2(0.0, 0.0), 20.0);
    let b = square(pos2(100.0, 0.0), 20.0);
    let (a_id, b_id) = (a.id(), b.id());
    let mut controller = EditorController::default();
    controller.load_document(vec![a, b]);

    click(&mut controller, pos2(10.0, 10.0));
    controller.set_modifiers(Modifiers::SHIFT);
    click(&mut controller, pos2(110.0, 10.0));
    controller.set_modifiers(Modifiers::NONE);
    assert_eq!(controller.selection().ids(), &[a_id, b_id]);

    controller.pointer_down(pos2(10.0, 10.0));
    assert_eq!(controller.state(), InteractionState::DraggingSelection);
    controller.pointer_up(pos2(10.0, 60.0));

    assert_eq!(controller.document().get(a_id).unwrap().bounds().min, pos2(0.0, 50.0));
    assert_eq!(controller.document().get(b_id).unwrap().bounds().min, pos2(100.0, 50.0));
    assert_eq!(controller.undo_label().as_deref(), Some("Move 2 objects"));
}

#[test]
fn test_shift_click_toggles_membership() {
    let a = square(pos2(0.0, 0.0), 20.0);
    let a_id = a.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![a]);

    controller.set_modifiers(Modifiers::SHIFT);
    click(&mut controller, pos2(10.0, 10.0));
    assert_eq!(controller.selection().ids(), &[a_id]);
    click(&mut controller, pos2(10.0, 10.0));
    assert!(controller.selection().is_empty());
    assert_eq!(controller.state(), InteractionState::Idle);
}

#[test]
fn test_resize_through_corner_handle() {
    let rect = square(pos2(0.0, 0.0), 40.0);
    let id = rect.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![rect]);
    click(&mut controller, pos2(20.0, 20.0));

    controller.pointer_down(pos2(40.0, 40.0));
    assert_eq!(controller.state(), InteractionState::DraggingObject);
    controller.pointer_move(pos2(60.0, 50.0));
    controller.pointer_up(pos2(60.0, 50.0));

    let bounds = controller.document().get(id).unwrap().bounds();
    assert_eq!(bounds, Rect::from_min_max(pos2(0.0, 0.0), pos2(60.0, 50.0)));
    assert_eq!(controller.undo_label().as_deref(), Some("Edit rectangle"));

    controller.undo();
    let bounds = controller.document().get(id).unwrap().bounds();
    assert_eq!(bounds, Rect::from_min_max(pos2(0.0, 0.0), pos2(40.0, 40.0)));
}

#[test]
fn test_rubber_band_selects_touched_objects() {
    let inside = square(pos2(10.0, 10.0), 20.0);
    let outside = square(pos2(300.0, 300.0), 20.0);
    let inside_id = inside.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![inside, outside]);

    controller.pointer_down(pos2(0.0, 0.0));
    assert_eq!(controller.state(), InteractionState::DrawingSelectionBox);
    controller.pointer_move(pos2(50.0, 50.0));
    controller.pointer_up(pos2(50.0, 50.0));

    assert_eq!(controller.selection().ids(), &[inside_id]);
    assert_eq!(controller.state(), InteractionState::Idle);
}

#[test]
fn test_connector_follows_moved_host() {
    let (objects, a, _, connector) = linked_document();
    let mut controller = EditorController::default();
    controller.load_document(objects);

    drag(&mut controller, pos2(20.0, 20.0), pos2(20.0, 50.0));
    assert_eq!(controller.document().get(a).unwrap().bounds().min, pos2(0.0, 30.0));

    let moved = connector_of(&controller, connector);
    assert!(moved.source.point.distance(pos2(40.0, 50.0)) < 1e-3);
    assert!(moved.target.point.distance(pos2(130.0, 20.0)) < 1e-3);

    controller.undo();
    let restored = connector_of(&controller, connector);
    assert!(restored.source.point.distance(pos2(40.0, 20.0)) < 1e-3);
}

#[test]
fn test_delete_removes_attached_connectors_as_one_step() {
    let (objects, a, b, connector) = linked_document();
    let mut controller = EditorController::default();
    controller.load_document(objects);

    click(&mut controller, pos2(20.0, 20.0));
    controller.key_down(Key::Delete, Modifiers::NONE);

    let remaining: Vec<ObjectId> = controller.document().objects().iter().map(Element::id).collect();
    assert_eq!(remaining, vec![b]);
    assert!(controller.selection().is_empty());
    assert_eq!(controller.history().undo_len(), 1);

    controller.undo();
    let restored: Vec<ObjectId> = controller.document().objects().iter().map(Element::id).collect();
    assert_eq!(restored, vec![a, b, connector]);
    assert_eq!(connector_of(&controller, connector).source.host(), Some(a));
}

#[test]
fn test_dragging_connector_endpoint_rebinds() {
    let (objects, a, b, connector) = linked_document();
    let c = factory::create_circle(pos2(150.0, 120.0), 20.0, flat());
    let c_id = c.id();
    let mut controller = EditorController::default();
    controller.load_document(objects.into_iter().chain([c]).collect());

    // Select the connector on its midpoint, then drag its target onto C
    click(&mut controller, pos2(85.0, 20.0));
    assert_eq!(controller.selection().ids(), &[connector]);
    controller.pointer_down(pos2(130.0, 20.0));
    assert_eq!(controller.state(), InteractionState::DraggingConnectorEndpoint);
    controller.pointer_up(pos2(150.0, 110.0));

    let rebound = connector_of(&controller, connector);
    assert_eq!(rebound.source.host(), Some(a));
    assert_eq!(rebound.target.host(), Some(c_id));
    assert!((rebound.target.point.distance(pos2(150.0, 120.0)) - 20.0).abs() < 1e-3);

    controller.undo();
    assert_eq!(connector_of(&controller, connector).target.host(), Some(b));
}

#[test]
fn test_load_document_resets_everything() {
    let mut controller = EditorController::default();
    controller.load_document(vec![square(pos2(0.0, 0.0), 40.0)]);
    click(&mut controller, pos2(20.0, 20.0));
    drag(&mut controller, pos2(20.0, 20.0), pos2(40.0, 40.0));
    assert!(controller.can_undo());

    // Leave a drag in flight
    controller.pointer_down(pos2(30.0, 30.0));
    assert_ne!(controller.state(), InteractionState::Idle);

    controller.load_document(vec![square(pos2(100.0, 100.0), 10.0)]);
    assert_eq!(controller.state(), InteractionState::Idle);
    assert!(controller.tools().current().is_idle());
    assert!(controller.selection().is_empty());
    assert!(!controller.can_undo());
    assert!(!controller.can_redo());
    assert_eq!(controller.document().len(), 1);
}

#[test]
fn test_undo_mid_drag_cancels_interaction() {
    let mut controller = EditorController::default();
    assert!(controller.select_tool("line"));
    drag(&mut controller, pos2(0.0, 0.0), pos2(30.0, 0.0));

    controller.pointer_down(pos2(50.0, 50.0));
    assert_eq!(controller.state(), InteractionState::Drawing);
    assert!(controller.undo());

    assert_eq!(controller.state(), InteractionState::Idle);
    assert!(controller.tools().current().is_idle());
    controller.pointer_up(pos2(80.0, 50.0));
    assert!(controller.document().is_empty());
}

/// Asks for `Drawing`, then for `Panning`, which `Drawing` does not allow
struct JumpyTool {
    presses: usize,
    deactivations: Rc<Cell<usize>>,
}

impl Tool for JumpyTool {
    fn name(&self) -> &'static str {
        "jumpy"
    }

    fn on_deactivate(&mut self) -> Result<(), ToolError> {
        self.presses = 0;
        self.deactivations.set(self.deactivations.get() + 1);
        Ok(())
    }

    fn on_pointer_down(&mut self, pos: Pos2, _: Option<&DrawableObject>, _: &ToolContext<'_>) -> ToolResponse {
        self.presses += 1;
        if self.presses == 1 {
            return ToolResponse::transition(InteractionState::Drawing);
        }
        ToolResponse::transition(InteractionState::Panning)
            .with_commit(factory::create_circle(pos, 5.0, Style::default()))
            .with_pan(vec2(5.0, 5.0))
    }

    fn on_pointer_move(&mut self, _: Pos2, _: Option<&DrawableObject>, _: &ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    fn on_pointer_up(&mut self, _: Pos2, _: Option<&DrawableObject>, _: &ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    fn is_idle(&self) -> bool {
        self.presses == 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_rejected_transition_cancels_tool_and_drops_response() {
    let deactivations = Rc::new(Cell::new(0));
    let tools = ToolManager::new(Box::new(JumpyTool {
        presses: 0,
        deactivations: deactivations.clone(),
    }));
    let mut controller = EditorController::with_tools(EditorConfig::default(), tools);

    controller.pointer_down(pos2(10.0, 10.0));
    assert_eq!(controller.state(), InteractionState::Drawing);
    controller.pointer_down(pos2(20.0, 20.0));

    assert_eq!(controller.state(), InteractionState::Idle);
    assert_eq!(controller.state_machine().rejected_transitions(), 1);
    assert_eq!(deactivations.get(), 1);
    assert!(controller.tools().current().is_idle());
    assert!(controller.document().is_empty());
    assert_eq!(controller.viewport().pan, vec2(0.0, 0.0));
}

#[test]
fn test_events_report_state_tool_and_history() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut controller = EditorController::default();
    let sink = events.clone();
    controller.subscribe(move |event: &EditorEvent| sink.borrow_mut().push(event.clone()));

    assert!(controller.select_tool("rectangle"));
    drag(&mut controller, pos2(0.0, 0.0), pos2(20.0, 20.0));

    let events = events.borrow();
    assert_eq!(
        events[0],
        EditorEvent::ToolChanged {
            old: "select",
            new: "rectangle"
        }
    );
    assert!(events.contains(&EditorEvent::StateChanged {
        old: InteractionState::Idle,
        new: InteractionState::Drawing,
    }));
    assert!(events.contains(&EditorEvent::StateChanged {
        old: InteractionState::Drawing,
        new: InteractionState::Idle,
    }));
    assert_eq!(
        events.last(),
        Some(&EditorEvent::HistoryChanged {
            can_undo: true,
            can_redo: false
        })
    );
}

#[test]
fn test_zoom_keeps_tolerances_in_screen_pixels() {
    let line = factory::create_line(pos2(0.0, 0.0), pos2(100.0, 0.0), Style::outline(Color32::BLACK, 0.0));
    let mut controller = EditorController::default();
    controller.load_document(vec![line]);

    assert_eq!(controller.hits_at(pos2(50.0, 3.0)).len(), 1);
    controller.set_zoom(4.0);
    assert!(controller.hits_at(pos2(50.0, 3.0)).is_empty());
    assert_eq!(controller.hits_at(pos2(50.0, 0.5)).len(), 1);
}

#[test]
fn test_dragging_selected_line_from_middle_moves_it() {
    let line = factory::create_line(pos2(0.0, 50.0), pos2(100.0, 50.0), Style::default());
    let id = line.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![line]);
    click(&mut controller, pos2(50.0, 50.0));
    assert_eq!(controller.selection().ids(), &[id]);

    drag(&mut controller, pos2(50.0, 50.0), pos2(80.0, 50.0));

    assert_eq!(controller.document().get(id).unwrap().bounds().min, pos2(29.0, 49.0));
    assert_eq!(controller.undo_label().as_deref(), Some("Move object"));
    assert_eq!(controller.history().undo_len(), 1);
}

#[test]
fn test_circle_edge_handle_grows_radius() {
    let circle = factory::create_circle(pos2(50.0, 50.0), 10.0, flat());
    let id = circle.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![circle]);
    click(&mut controller, pos2(50.0, 50.0));

    drag(&mut controller, pos2(60.0, 50.0), pos2(80.0, 50.0));

    let circle = controller.document().get(id).unwrap();
    assert_eq!(circle.center(), pos2(60.0, 50.0));
    assert_eq!(circle.bounds(), Rect::from_min_max(pos2(40.0, 30.0), pos2(80.0, 70.0)));
}

#[test]
fn test_resizing_rotated_rectangle_follows_screen_axis() {
    let mut rect = factory::create_rectangle(Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 20.0)), flat());
    rect.rotate_by(std::f32::consts::FRAC_PI_2);
    let id = rect.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![rect]);
    click(&mut controller, pos2(50.0, 10.0));

    // Right handle of the upright 20x100 box
    drag(&mut controller, pos2(60.0, 10.0), pos2(80.0, 10.0));

    let bounds = controller.document().get(id).unwrap().bounds();
    assert!((bounds.width() - 40.0).abs() < 1e-3, "{bounds:?}");
    assert!((bounds.height() - 100.0).abs() < 1e-3, "{bounds:?}");
    assert!((bounds.min.x - 40.0).abs() < 1e-3, "{bounds:?}");
}

#[test]
fn test_rotation_handle_drag_rotates_and_undoes() {
    let rect = square(pos2(0.0, 0.0), 40.0);
    let id = rect.id();
    let mut controller = EditorController::default();
    controller.load_document(vec![rect]);
    click(&mut controller, pos2(20.0, 20.0));

    // Handle sits 24px above the top edge; swing it a quarter turn clockwise
    controller.pointer_down(pos2(20.0, -24.0));
    assert_eq!(controller.state(), InteractionState::Rotating);
    controller.pointer_move(pos2(64.0, 20.0));
    controller.pointer_up(pos2(64.0, 20.0));

    assert_eq!(controller.state(), InteractionState::Idle);
    let rotation = controller.document().get(id).unwrap().rotation();
    assert!((rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    assert_eq!(controller.undo_label().as_deref(), Some("Edit rectangle"));

    assert!(controller.undo());
    assert_eq!(controller.document().get(id).unwrap().rotation(), 0.0);
}

#[test]
fn test_curve_handle_drag_bends_connector() {
    let (objects, _, _, connector) = linked_document();
    let mut controller = EditorController::default();
    controller.load_document(objects);
    click(&mut controller, pos2(85.0, 20.0));
    assert_eq!(controller.selection().ids(), &[connector]);

    controller.pointer_down(pos2(85.0, 20.0));
    assert_eq!(controller.state(), InteractionState::DraggingCurveControlPoint);
    controller.pointer_move(pos2(85.0, 60.0));
    controller.pointer_up(pos2(85.0, 60.0));

    let bent = connector_of(&controller, connector);
    assert_eq!(bent.control, Some(pos2(85.0, 60.0)));
    assert!(bent.source.point.distance(pos2(40.0, 20.0)) < 1e-3);

    controller.undo();
    assert_eq!(connector_of(&controller, connector).control, None);
}
