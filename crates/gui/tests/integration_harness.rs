//! Integration tests for the overlay driven through TestHarness.

use std::f32::consts::TAU;

use egui::pos2;
use glam::Vec3;

use shared::IssueId;

use pinview_gui_lib::fixtures::{issue, issues_with_statuses, many_issues};
use pinview_gui_lib::harness::TestHarness;
use pinview_gui_lib::issues::IssueListState;
use pinview_gui_lib::lifecycle::{ListenerRole, ISSUE_OVERLAY, PUSHPIN_OVERLAY};
use pinview_gui_lib::state::marker::Placement;
use pinview_gui_lib::state::{AddModePolicy, ClickedMarker, InteractionState, OverlaySettings};
use pinview_gui_lib::viewer::{Camera, EventKind, ListenerTarget, RenderObject, Viewer, ViewerEvent};
use pinview_gui_lib::viewport::layout::ring_center;
use pinview_gui_lib::viewport::picking::pick;
use pinview_gui_lib::OverlayExtension;

const STATUSES: [&str; 5] = ["Open", "Closed", "In Progress", "Resolved", "Critical"];

fn three_pins(h: &mut TestHarness) -> Vec<String> {
    [(400.0, 300.0), (300.0, 300.0), (500.0, 200.0)]
        .into_iter()
        .map(|(x, y)| h.place_pushpin(x, y).unwrap())
        .collect()
}

// ── Selection ─────────────────────────────────────────────────

#[test]
fn test_single_selection() {
    let mut h = TestHarness::new();
    let ids = three_pins(&mut h);
    assert_eq!(h.pushpin_count(), 3);

    for id in &ids {
        assert!(h.select(id));
        assert_eq!(h.overlay.registry().selected_ids(), vec![id.clone()]);
        assert_eq!(h.overlay.selected(), Some(id));
    }

    let palette = OverlaySettings::default().palette;
    assert_eq!(h.color_of(&ids[2]), Some(palette.pin_selected));
    assert_eq!(h.color_of(&ids[0]), Some(palette.pin));
    assert_eq!(h.color_of(&ids[1]), Some(palette.pin));
}

#[test]
fn test_select_unknown_keeps_selection() {
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.select(&id);
    assert!(!h.select("pin-missing"));
    assert_eq!(h.overlay.selected(), Some(&id));
}

#[test]
fn test_remove_selected() {
    let mut h = TestHarness::new();
    let ids = three_pins(&mut h);
    h.select(&ids[1]);
    assert_eq!(h.overlay.remove_selected(), Some(ids[1].clone()));
    assert_eq!(h.pushpin_count(), 2);
    assert_eq!(h.viewer().objects_in(PUSHPIN_OVERLAY), 2);
    assert!(h.overlay.selected().is_none());
    // nothing selected now
    assert!(h.overlay.remove_selected().is_none());
    assert_eq!(h.pushpin_count(), 2);
}

// ── Clear / teardown ──────────────────────────────────────────

#[test]
fn test_clear_all_idempotent() {
    let mut h = TestHarness::new();
    three_pins(&mut h);
    h.load_issues(many_issues(2)).unwrap();

    assert_eq!(h.clear_all(), 5);
    assert_eq!(h.clear_all(), 0);
    assert_eq!(h.marker_count(), 0);
    assert_eq!(h.viewer().object_count(), 0);
    assert_eq!(h.viewer().stale_removals, 0);
    assert_eq!(h.viewer().double_detach, 0);
    // re-initialized and usable
    assert!(h.overlay.is_live());
    assert_eq!(h.viewer().listener_count(), 2);
    assert!(h.place_pushpin(400.0, 300.0).is_some());
}

fn assert_nothing_left(h: &TestHarness) {
    let v = h.viewer();
    assert_eq!(v.listener_count(), 0, "listeners leaked");
    assert_eq!(v.double_detach, 0, "listener detached twice");
    assert_eq!(v.object_count(), 0);
    assert!(v.scenes().is_empty());
    assert_eq!(h.state(), InteractionState::Idle);
}

#[test]
fn test_teardown_from_every_state() {
    // Idle
    let mut h = TestHarness::new();
    h.place_pushpin(400.0, 300.0);
    h.teardown();
    assert_nothing_left(&h);

    // AddMode
    let mut h = TestHarness::new();
    h.overlay.enable_add_mode();
    assert_eq!(h.state(), InteractionState::AddMode);
    h.teardown();
    assert_nothing_left(&h);

    // Dragging
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.pointer_down(400.0, 300.0);
    assert_eq!(h.state(), InteractionState::Dragging(id));
    assert_eq!(h.viewer().listener_count(), 4);
    h.teardown();
    assert_nothing_left(&h);

    // SectionPick
    let mut h = TestHarness::new();
    h.overlay.enable_section_pick();
    h.teardown();
    assert_nothing_left(&h);
    assert_eq!(h.teardown(), 0);
    assert_eq!(h.viewer().double_detach, 0);
}

#[test]
fn test_events_after_teardown_are_ignored() {
    let mut h = TestHarness::new();
    h.overlay.enable_add_mode();
    let listener = h.overlay.listeners().ids_for(EventKind::Click)[0];
    h.teardown();

    h.overlay.handle_event(listener, ViewerEvent::Click(pos2(400.0, 300.0)));
    h.click(400.0, 300.0);
    assert_eq!(h.marker_count(), 0);
    assert!(!h.overlay.enable_add_mode());
    assert!(h.load_issues(many_issues(1)).is_err());
}

// ── Add mode ──────────────────────────────────────────────────

#[test]
fn test_add_mode_miss_stays_armed() {
    let mut h = TestHarness::new();
    assert!(h.overlay.enable_add_mode());
    h.click(2.0, 2.0);
    assert_eq!(h.marker_count(), 0);
    assert_eq!(h.state(), InteractionState::AddMode);

    // retry hits
    h.click(400.0, 300.0);
    assert_eq!(h.pushpin_count(), 1);
    assert_eq!(h.state(), InteractionState::Idle);
}

#[test]
fn test_add_mode_hit_anchors_at_hit_point() {
    let mut h = TestHarness::new();
    let p = h.viewer().hit_test(pos2(450.0, 280.0)).unwrap();
    let id = h.place_pushpin(450.0, 280.0).unwrap();
    assert_eq!(h.marker_count(), 1);
    assert_eq!(h.world_of(&id), Some(p));
    assert_eq!(h.state(), InteractionState::Idle);
    // one-shot click listener released
    assert_eq!(h.viewer().listener_count(), 2);
}

#[test]
fn test_stale_add_mode_listener_is_noop() {
    let mut h = TestHarness::new();
    h.overlay.enable_add_mode();
    let listener = h.overlay.listeners().ids_for(EventKind::Click)[0];
    h.click(400.0, 300.0);
    assert_eq!(h.pushpin_count(), 1);

    h.overlay.handle_event(listener, ViewerEvent::Click(pos2(300.0, 300.0)));
    assert_eq!(h.pushpin_count(), 1);
}

#[test]
fn test_enable_add_mode_twice_keeps_one_listener() {
    let mut h = TestHarness::new();
    assert!(h.overlay.enable_add_mode());
    assert!(!h.overlay.enable_add_mode());
    assert_eq!(h.overlay.listeners().ids_for(EventKind::Click).len(), 1);
}

#[test]
fn test_seed_grid_policy() {
    let settings = OverlaySettings {
        add_mode: AddModePolicy::SeedGrid {
            rows: 2,
            cols: 2,
            spacing_px: 40.0,
        },
        ..Default::default()
    };
    let mut h = TestHarness::with_settings(settings);
    h.overlay.enable_add_mode();
    h.click(400.0, 300.0);
    assert_eq!(h.pushpin_count(), 4);

    // grid only seeds an empty overlay
    h.overlay.enable_add_mode();
    h.click(300.0, 300.0);
    assert_eq!(h.pushpin_count(), 5);
}

// ── Drag ──────────────────────────────────────────────────────

#[test]
fn test_drag_preserves_identity() {
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.place_pushpin(300.0, 300.0).unwrap();

    h.pointer_down(400.0, 300.0);
    assert_eq!(h.state(), InteractionState::Dragging(id.clone()));
    assert_eq!(h.overlay.listeners().count_role(ListenerRole::DragMove), 1);
    assert_eq!(h.viewer().listeners_of(ListenerTarget::Window, EventKind::PointerUp), 1);
    for step in 1..=10 {
        h.pointer_move(400.0 + step as f32 * 10.0, 300.0);
    }
    h.pointer_up(500.0, 300.0);

    assert_eq!(h.state(), InteractionState::Idle);
    assert_eq!(h.pushpin_count(), 2);
    let ids = h.overlay.registry().pushpin_ids();
    assert_eq!(ids.iter().filter(|i| **i == id).count(), 1);

    let world = h.world_of(&id).unwrap();
    assert!((world.x - 1.38).abs() < 0.01, "x = {}", world.x);
    assert!(world.y.abs() < 1e-4);
    let screen = h.screen_of(&id).unwrap();
    assert!((screen.x - 500.0).abs() < 0.5);
    // drag listeners released
    assert_eq!(h.viewer().listener_count(), 2);
    assert_eq!(h.viewer().listeners_of(ListenerTarget::Window, EventKind::PointerMove), 0);
}

#[test]
fn test_drag_miss_keeps_last_anchor() {
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.pointer_down(400.0, 300.0);
    h.pointer_move(450.0, 300.0);
    let before = h.world_of(&id).unwrap();
    h.pointer_move(2.0, 2.0);
    assert_eq!(h.world_of(&id), Some(before));
    h.pointer_up(2.0, 2.0);
    assert_eq!(h.state(), InteractionState::Idle);
}

#[test]
fn test_pointer_down_on_pushpin_notifies() {
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.pointer_down(404.0, 303.0);
    h.pointer_up(404.0, 303.0);
    match h.clicked().as_slice() {
        [ClickedMarker::Pushpin { id: clicked, position }] => {
            assert_eq!(clicked, &id);
            assert!(position.length() < 1e-4);
        }
        other => panic!("unexpected notifications {other:?}"),
    }
}

#[test]
fn test_pointer_down_on_empty_space() {
    let mut h = TestHarness::new();
    h.place_pushpin(400.0, 300.0).unwrap();
    h.pointer_down(100.0, 100.0);
    assert_eq!(h.state(), InteractionState::Idle);
    assert!(h.overlay.selected().is_none());
    assert!(h.clicked().is_empty());
}

// ── Issues ────────────────────────────────────────────────────

#[test]
fn test_five_status_scenario() {
    let mut h = TestHarness::new();
    assert_eq!(h.load_issues(issues_with_statuses(&STATUSES)).unwrap(), 5);
    assert_eq!(h.issue_count(), 5);

    let palette = OverlaySettings::default().palette;
    let expected = [
        [0xff, 0x4d, 0x4d],
        [0x4c, 0xaf, 0x50],
        [0xff, 0x98, 0x00],
        [0x21, 0x96, 0xf3],
        [0xe9, 0x1e, 0x63],
    ];
    for (i, rgb) in expected.iter().enumerate() {
        let id = format!("issue-{}", i + 1);
        assert_eq!(h.color_of(&id), Some(*rgb), "{id}");
        assert_ne!(*rgb, palette.unknown);
    }

    let id = "issue-3";
    let screen = h.screen_of(id).unwrap();
    let v = h.viewer();
    let picked = pick(
        screen,
        h.overlay.registry(),
        &v.camera(),
        v.viewport(),
        h.overlay.settings(),
    );
    assert_eq!(picked.as_deref(), Some(id));
}

#[test]
fn test_issue_ring_follows_camera() {
    let mut h = TestHarness::new();
    h.load_issues(many_issues(6)).unwrap();

    let camera = Camera::looking_at(Vec3::new(8.0, 6.0, 12.0), Vec3::ZERO, Vec3::Y);
    h.set_camera(camera);

    let center = ring_center(&camera, 5.0);
    let ids = h.overlay.registry().issue_ids();
    for (i, id) in ids.iter().enumerate() {
        let d = h.world_of(id).unwrap() - center;
        assert!((d.length() - 2.0).abs() < 1e-4);
        let angle = d.dot(camera.up_axis()).atan2(d.dot(camera.right())).rem_euclid(TAU);
        let expected = i as f32 * TAU / ids.len() as f32;
        let diff = (angle - expected).abs();
        assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "{id}: {angle} vs {expected}");
    }
}

#[test]
fn test_issue_ring_top_down_camera() {
    let mut h = TestHarness::new();
    h.load_issues(many_issues(4)).unwrap();
    // host up is the view direction
    let camera = Camera::new(Vec3::new(0.0, 20.0, 0.0), -Vec3::Y, Vec3::Y);
    h.set_camera(camera);

    let ids = h.overlay.registry().issue_ids();
    let screens: Vec<_> = ids.iter().map(|id| h.screen_of(id).unwrap()).collect();
    for id in &ids {
        assert!((h.world_of(id).unwrap().y - 15.0).abs() < 1e-4, "{id} left the ring plane");
    }
    for (i, a) in screens.iter().enumerate() {
        for b in &screens[i + 1..] {
            assert!(a.distance(*b) > 50.0, "{a:?} and {b:?} overlap");
        }
    }
    for id in &ids {
        let screen = h.screen_of(id).unwrap();
        let picked = pick(
            screen,
            h.overlay.registry(),
            &camera,
            h.viewer().viewport(),
            h.overlay.settings(),
        );
        assert_eq!(picked.as_ref(), Some(id));
    }
}

fn layout_snapshot(h: &TestHarness) -> Vec<(String, Placement, Option<RenderObject>)> {
    h.overlay
        .registry()
        .all()
        .map(|m| (m.id.clone(), m.placement, h.viewer().object(m.handle).copied()))
        .collect()
}

#[test]
fn test_repeated_camera_ticks_overwrite_same_values() {
    let mut h = TestHarness::new();
    h.load_issues(many_issues(3)).unwrap();
    let pin = h.place_pushpin(400.0, 300.0).unwrap();
    h.set_camera(Camera::looking_at(Vec3::new(3.0, 2.0, 10.0), Vec3::ZERO, Vec3::Y));

    let at = h.screen_of(&pin).unwrap();
    h.pointer_down(at.x, at.y);
    assert_eq!(h.state(), InteractionState::Dragging(pin.clone()));
    h.pointer_move(at.x + 40.0, at.y);

    h.overlay.dispatch(ViewerEvent::CameraChanged);
    let first = layout_snapshot(&h);
    h.overlay.dispatch(ViewerEvent::CameraChanged);
    assert_eq!(layout_snapshot(&h), first);

    // drag step and camera tick in the same frame, repeated
    h.pointer_move(at.x + 40.0, at.y);
    h.overlay.dispatch(ViewerEvent::CameraChanged);
    assert_eq!(layout_snapshot(&h), first);
    h.overlay.on_camera_change();
    assert_eq!(layout_snapshot(&h), first);

    assert_eq!(first.len(), 4);
    assert!(first.iter().all(|(_, _, object)| object.is_some()));
    assert_eq!(h.state(), InteractionState::Dragging(pin));
}

#[test]
fn test_issue_click_selects_without_drag() {
    let mut h = TestHarness::new();
    h.load_issues(issues_with_statuses(&STATUSES)).unwrap();
    let screen = h.screen_of("issue-2").unwrap();
    h.pointer_down(screen.x, screen.y);

    assert_eq!(h.state(), InteractionState::Idle);
    assert_eq!(h.overlay.selected().map(String::as_str), Some("issue-2"));
    match h.clicked().as_slice() {
        [ClickedMarker::Issue(issue)] => assert_eq!(issue.status, "Closed"),
        other => panic!("unexpected notifications {other:?}"),
    }
}

#[test]
fn test_reload_replaces_issue_markers() {
    let mut h = TestHarness::new();
    h.place_pushpin(400.0, 300.0);
    h.load_issues(many_issues(5)).unwrap();
    h.select("issue-5");
    h.load_issues(many_issues(2)).unwrap();

    assert_eq!(h.issue_count(), 2);
    assert_eq!(h.pushpin_count(), 1);
    assert_eq!(h.viewer().objects_in(ISSUE_OVERLAY), 2);
    assert!(h.overlay.selected().is_none());
}

#[test]
fn test_empty_issue_list() {
    let mut h = TestHarness::new();
    assert_eq!(h.load_issues(Vec::new()).unwrap(), 0);
    assert_eq!(
        h.overlay.issue_list().summary(),
        "No issues found with matching properties"
    );
}

#[test]
fn test_display_cap() {
    let mut settings = OverlaySettings::default();
    settings.issues.max_markers = 3;
    let mut h = TestHarness::with_settings(settings);
    assert_eq!(h.load_issues(many_issues(5)).unwrap(), 3);
    assert_eq!(h.issue_count(), 3);
    let list = h.overlay.issue_list();
    assert_eq!(list.summary(), "Found 5 issues");
    assert_eq!(list.overflow_notice().as_deref(), Some("...and 2 more"));
    // the list keeps every record, markers stop at the cap
    assert_eq!(list.issues().len(), 5);
    assert!(h.overlay.registry().contains("issue-3"));
    assert!(!h.overlay.registry().contains("issue-4"));
}

#[test]
fn test_duplicate_issue_id_skipped() {
    let mut h = TestHarness::new();
    let created = h.load_issues(vec![issue(1, "Open"), issue(1, "Closed")]).unwrap();
    assert_eq!(created, 1);
    assert_eq!(h.viewer().objects_in(ISSUE_OVERLAY), 1);
    assert_eq!(h.color_of("issue-1"), Some([0xff, 0x4d, 0x4d]));
}

#[test]
fn test_numeric_and_text_ids_share_a_marker() {
    let mut h = TestHarness::new();
    let mut text = issue(1, "Closed");
    text.id = IssueId::Text("1".into());
    let created = h.load_issues(vec![issue(1, "Open"), text]).unwrap();
    assert_eq!(created, 1);
    assert_eq!(h.issue_count(), 1);
    assert_eq!(h.color_of("issue-1"), Some([0xff, 0x4d, 0x4d]));
    assert_eq!(h.overlay.issue_list().issues().len(), 2);
}

#[test]
fn test_external_issue_load() {
    let mut h = TestHarness::new();
    let tx = h.overlay.begin_external_issue_load().unwrap();
    assert_eq!(*h.overlay.issue_list(), IssueListState::Loading);
    assert!(!h.overlay.poll_issue_load());

    tx.send(Ok(many_issues(4))).unwrap();
    assert!(h.overlay.poll_issue_load());
    assert_eq!(h.issue_count(), 4);
    assert!(!h.overlay.is_loading_issues());
}

#[test]
fn test_failed_issue_load_leaves_pushpins_usable() {
    let mut h = TestHarness::new();
    let tx = h.overlay.begin_external_issue_load().unwrap();
    drop(tx);
    assert!(h.overlay.poll_issue_load());
    assert_eq!(
        *h.overlay.issue_list(),
        IssueListState::Failed("Error fetching issues".into())
    );
    assert!(h.place_pushpin(400.0, 300.0).is_some());
}

#[test]
fn test_late_load_after_teardown_is_noop() {
    let mut h = TestHarness::new();
    let tx = h.overlay.begin_external_issue_load().unwrap();
    h.teardown();

    assert!(tx.send(Ok(many_issues(3))).is_err());
    assert!(!h.overlay.poll_issue_load());
    assert_eq!(h.marker_count(), 0);
    assert_eq!(h.viewer().object_count(), 0);
}

// ── Section ───────────────────────────────────────────────────

#[test]
fn test_section_pick_sets_cut_planes() {
    let mut h = TestHarness::new();
    assert!(h.overlay.enable_section_pick());
    h.click(2.0, 2.0);
    assert_eq!(h.state(), InteractionState::SectionPick);
    assert!(h.viewer().cut_planes().is_empty());

    h.click(400.0, 300.0);
    assert_eq!(h.state(), InteractionState::Idle);
    let planes = h.viewer().cut_planes();
    assert_eq!(planes.len(), 6);
    assert_eq!(planes[0], glam::Vec4::new(1.0, 0.0, 0.0, -5.0));
    assert!((planes[4].w + 2.5).abs() < 1e-4);
    assert!((planes[5].w + 2.5).abs() < 1e-4);

    assert!(h.overlay.set_section_range(1.0));
    assert!((h.viewer().cut_planes()[4].w + 0.5).abs() < 1e-4);

    // rejected ranges leave the active section untouched
    for bad in [0.0, -2.0, f32::NAN] {
        assert!(!h.overlay.set_section_range(bad));
        assert_eq!(h.overlay.section().range(), 1.0);
        assert!((h.viewer().cut_planes()[4].w + 0.5).abs() < 1e-4);
    }

    h.overlay.clear_section();
    assert!(h.viewer().cut_planes().is_empty());
}

#[test]
fn test_section_pick_toggles() {
    let mut h = TestHarness::new();
    assert!(h.overlay.enable_section_pick());
    assert!(!h.overlay.enable_section_pick());
    assert_eq!(h.state(), InteractionState::Idle);
    assert_eq!(h.viewer().listener_count(), 2);
    assert!(h.overlay.enable_add_mode());
    assert!(!h.overlay.enable_section_pick());
    assert_eq!(h.state(), InteractionState::AddMode);
}

#[test]
fn test_camera_change_hook() {
    let mut h = TestHarness::new();
    let id = h.place_pushpin(400.0, 300.0).unwrap();
    h.overlay.viewer_mut().camera =
        Camera::new(Vec3::new(0.0, 0.0, 20.0), -Vec3::Z, Vec3::Y);
    h.overlay.on_camera_change();
    let marker = h.overlay.registry().get(&id).unwrap();
    // scale 100/20 clamps at 2
    assert_eq!(marker.placement.size, 24.0);
    assert!(marker.world_position().length() < 1e-4);
}
