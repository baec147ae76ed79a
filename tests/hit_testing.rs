use diagram_editor::config::EditorConfig;
use diagram_editor::controller::EditorController;
use diagram_editor::document::Document;
use diagram_editor::element::{
    AttachRole, Connector, DrawableObject, Element, Style, factory,
};
use diagram_editor::geometry::{
    HitMode, HitTestOptions, bbox_hit, bind_end, hits_at, topmost_at,
};
use egui::{Color32, Modifiers, Rect, pos2, vec2};

fn sample_objects() -> Vec<DrawableObject> {
    let mut rotated = factory::create_rectangle(
        Rect::from_min_size(pos2(10.0, 10.0), vec2(40.0, 20.0)),
        Style::filled(Color32::LIGHT_BLUE),
    );
    rotated.rotate_by(0.6);
    let mut ellipse = factory::create_ellipse(pos2(60.0, 60.0), vec2(30.0, 12.0), Style::default());
    ellipse.rotate_by(-0.4);

    let host_a = factory::create_circle(pos2(20.0, 80.0), 10.0, Style::default());
    let host_b = factory::create_circle(pos2(90.0, 20.0), 10.0, Style::default());
    let mut connector = Connector::new(
        bind_end(&host_a, pos2(30.0, 80.0), AttachRole::Source),
        bind_end(&host_b, pos2(80.0, 20.0), AttachRole::Target),
        Style::default(),
    );
    connector.control = Some(pos2(70.0, 90.0));

    vec![
        rotated,
        ellipse,
        host_a,
        host_b,
        factory::create_circle(pos2(40.0, 40.0), 15.0, Style::filled(Color32::RED)),
        factory::create_line(pos2(0.0, 100.0), pos2(100.0, 0.0), Style::outline(Color32::BLACK, 1.0)),
        factory::create_path(
            vec![pos2(5.0, 5.0), pos2(25.0, 40.0), pos2(60.0, 10.0)],
            Style::default(),
        ),
        connector.into(),
    ]
}

#[test]
fn test_bbox_accepts_superset_of_precision() {
    for object in sample_objects() {
        for ix in -10..=120 {
            for iy in -10..=120 {
                let pos = pos2(ix as f32, iy as f32);
                if object.precision_hit(pos, 1.0) {
                    assert!(
                        bbox_hit(&object, pos, 4.0),
                        "{} hit precisely at {:?} but not by its bounding box",
                        object.kind(),
                        pos
                    );
                }
            }
        }
    }
}

/// Rectangle underneath a filled circle of the same extent
fn overlap_document() -> (Document, DrawableObject, DrawableObject) {
    let rect = factory::create_rectangle(
        Rect::from_min_max(pos2(40.0, 40.0), pos2(60.0, 60.0)),
        Style::filled(Color32::GRAY),
    );
    let circle = factory::create_circle(pos2(50.0, 50.0), 10.0, Style::filled(Color32::GOLD));
    let document = Document::from_objects(vec![rect.clone(), circle.clone()]);
    (document, rect, circle)
}

#[test]
fn test_topmost_wins_in_bounding_box_mode() {
    let (document, rect, circle) = overlap_document();
    let options = HitTestOptions::from_config(&EditorConfig::default(), 1.0, HitMode::BoundingBox);

    assert_eq!(hits_at(&document, pos2(50.0, 50.0), &options), vec![circle.id(), rect.id()]);
    assert_eq!(topmost_at(&document, pos2(50.0, 50.0), &options).map(Element::id), Some(circle.id()));
    // The circle's box covers the corner too
    assert_eq!(topmost_at(&document, pos2(41.0, 41.0), &options).map(Element::id), Some(circle.id()));
}

#[test]
fn test_precision_mode_sees_through_the_circle_corner() {
    let (document, rect, circle) = overlap_document();
    let options = HitTestOptions::from_config(&EditorConfig::default(), 1.0, HitMode::Precision);

    assert_eq!(topmost_at(&document, pos2(50.0, 50.0), &options).map(Element::id), Some(circle.id()));
    assert_eq!(topmost_at(&document, pos2(41.0, 41.0), &options).map(Element::id), Some(rect.id()));
}

#[test]
fn test_precision_modifier_switches_controller_hit_mode() {
    let (document, rect, circle) = overlap_document();
    let mut controller = EditorController::default();
    controller.load_document(document.objects().to_vec());

    controller.pointer_down(pos2(41.0, 41.0));
    controller.pointer_up(pos2(41.0, 41.0));
    assert_eq!(controller.selection().ids(), &[circle.id()]);

    // Click empty space first so the corner resize handle is out of the way
    controller.pointer_down(pos2(200.0, 200.0));
    controller.pointer_up(pos2(200.0, 200.0));
    assert!(controller.selection().is_empty());

    controller.set_modifiers(Modifiers::ALT);
    controller.pointer_down(pos2(41.0, 41.0));
    controller.pointer_up(pos2(41.0, 41.0));
    assert_eq!(controller.selection().ids(), &[rect.id()]);
}

#[test]
fn test_tolerance_is_screen_space() {
    let line = factory::create_line(pos2(0.0, 0.0), pos2(100.0, 0.0), Style::outline(Color32::BLACK, 0.0));
    let document = Document::from_objects(vec![line]);
    let config = EditorConfig::default();
    let pos = pos2(50.0, 3.0);

    let zoomed_out = HitTestOptions::from_config(&config, 1.0, HitMode::BoundingBox);
    let zoomed_in = HitTestOptions::from_config(&config, 2.0, HitMode::BoundingBox);
    assert_eq!(hits_at(&document, pos, &zoomed_out).len(), 1);
    assert!(hits_at(&document, pos, &zoomed_in).is_empty());
}

#[test]
fn test_cycle_has_period_of_overlap_count() {
    let objects: Vec<DrawableObject> = (0..3)
        .map(|i| factory::create_circle(pos2(50.0 + i as f32, 50.0), 20.0, Style::default()))
        .collect();
    let ids: Vec<_> = objects.iter().map(Element::id).collect();
    let mut controller = EditorController::default();
    controller.load_document(objects);

    controller.pointer_down(pos2(50.0, 50.0));
    controller.pointer_up(pos2(50.0, 50.0));
    assert_eq!(controller.selection().ids(), &[ids[2]]);

    assert_eq!(controller.cycle_selection(), Some(ids[1]));
    assert_eq!(controller.cycle_selection(), Some(ids[0]));
    assert_eq!(controller.cycle_selection(), Some(ids[2]));
    assert_eq!(controller.selection().ids(), &[ids[2]]);
}

#[test]
fn test_document_change_invalidates_cycle() {
    let objects: Vec<DrawableObject> = (0..2)
        .map(|_| factory::create_circle(pos2(50.0, 50.0), 20.0, Style::default()))
        .collect();
    let mut controller = EditorController::default();
    controller.load_document(objects);

    controller.pointer_down(pos2(50.0, 50.0));
    controller.pointer_up(pos2(50.0, 50.0));
    controller
        .execute(diagram_editor::Command::add(factory::create_line(
            pos2(0.0, 0.0),
            pos2(10.0, 10.0),
            Style::default(),
        )))
        .unwrap();

    assert_eq!(controller.cycle_selection(), None);
}

#[test]
fn test_precision_hit_uses_rotated_frame() {
    // 100x20 bar turned upright about its center (50,10)
    let mut bar = factory::create_rectangle(
        Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 20.0)),
        Style {
            stroke_width: 0.0,
            ..Style::filled(Color32::GRAY)
        },
    );
    bar.rotate_by(std::f32::consts::FRAC_PI_2);
    let document = Document::from_objects(vec![bar.clone()]);
    let options = HitTestOptions::from_config(&EditorConfig::default(), 1.0, HitMode::Precision);

    // Inside the upright bar, outside where it lay before turning
    assert!(bar.precision_hit(pos2(50.0, 50.0), 1.0));
    assert_eq!(topmost_at(&document, pos2(50.0, 50.0), &options).map(Element::id), Some(bar.id()));
    // Inside the unturned footprint only
    assert!(!bar.precision_hit(pos2(10.0, 10.0), 1.0));
    assert!(topmost_at(&document, pos2(10.0, 10.0), &options).is_none());
}
