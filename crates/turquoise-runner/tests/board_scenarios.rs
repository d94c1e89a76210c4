use glam::Vec2;
use serde_json::json;
use turquoise_core::{keys, BoardError, BoardEvent, BorderId, BoxId, BoxState, Occupant, Side};
use turquoise_runner::BoardRunner;

const FRAME: f32 = 1.0 / 60.0;

/// Tick `frames` frames and collect every exported event.
fn run(runner: &mut BoardRunner, frames: usize) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        runner.tick(FRAME);
        let batch: &[BoardEvent] = bytemuck::cast_slice(runner.event_floats());
        events.extend_from_slice(batch);
    }
    events
}

/// `p` on the left, `o` (highlighted) on its right.
fn glide_pair(extra: serde_json::Value) -> String {
    let mut level = json!({
        "boxes": [
            { "pos": [0, 0], "label": "p" },
            { "pos": [30, 0] }
        ],
        "start_box": 1
    });
    if let (Some(level), Some(extra)) = (level.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            level.insert(k.clone(), v.clone());
        }
    }
    level.to_string()
}

#[test]
fn glide_into_goal_scores() {
    let level = glide_pair(json!({ "goal": { "center": [200, 0], "size": [30, 30] } }));
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    run(&mut runner, 3);

    let board = runner.board();
    assert_eq!(board.get(BoxId(2)).unwrap().neighbor_box(Side::Left), Some(BoxId(1)));

    runner.key_down(keys::O);
    let events = run(&mut runner, 40);

    assert_eq!(runner.score(), 1);
    assert!(!runner.halted());
    assert!(runner.board().get(BoxId(2)).is_none());
    assert_eq!(runner.board().registry().currently_highlighted(), Some(BoxId(1)));
    assert!(runner.board().get(BoxId(1)).unwrap().is_highlighted());
    assert!(events.contains(&BoardEvent::score(1, BoxId(2))));
    assert!(events.contains(&BoardEvent::highlight(BoxId(1), Some(BoxId(2)))));
}

#[test]
fn glide_stops_at_wall() {
    let level = glide_pair(json!({
        "borders": [{ "center": [300, 0], "size": [10, 300], "orientation": "vertical" }]
    }));
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    run(&mut runner, 3);
    runner.key_down(keys::O);
    run(&mut runner, 60);

    let b = runner.board().get(BoxId(2)).unwrap();
    assert_eq!(b.state(), BoxState::Stationary);
    assert!((b.position().x - 280.0).abs() < 1e-3);
    assert_eq!(b.start_position(), b.position());
    assert_eq!(b.neighbor(Side::Right), Some(Occupant::Border(BorderId(0))));
    assert!(!b.occupied(Side::Left));
    assert_eq!(runner.score(), 0);
}

#[test]
fn glide_refused_when_path_is_blocked() {
    let level = json!({
        "boxes": [
            { "pos": [0, 0], "label": "p" },
            { "pos": [30, 0] },
            { "pos": [60, 0] }
        ],
        "start_box": 1
    })
    .to_string();
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    run(&mut runner, 3);
    runner.key_down(keys::O);
    run(&mut runner, 10);

    let b = runner.board().get(BoxId(2)).unwrap();
    assert_eq!(b.label(), "o");
    assert_eq!(b.state(), BoxState::Stationary);
    assert_eq!(b.position(), Vec2::new(30.0, 0.0));
}

#[test]
fn simple_variant_never_glides() {
    let config = r#"{ "glide_rules": [] }"#;
    let mut runner = BoardRunner::from_json(config, &glide_pair(json!({}))).unwrap();
    run(&mut runner, 3);
    runner.key_down(keys::O);
    run(&mut runner, 10);
    let b = runner.board().get(BoxId(2)).unwrap();
    assert_eq!(b.state(), BoxState::Stationary);
    assert_eq!(b.position(), Vec2::new(30.0, 0.0));
}

#[test]
fn last_box_reaching_goal_halts_runner() {
    let level = json!({
        "boxes": [{ "pos": [0, 0] }],
        "goal": { "center": [0, 60], "size": [30, 30] }
    })
    .to_string();
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    runner.key_down(keys::W);
    run(&mut runner, 20);

    assert!(runner.halted());
    assert!(matches!(runner.take_error(), Some(BoardError::EmptyBoard)));
    assert!(runner.take_error().is_none());
    assert!(runner.halted());
}

#[test]
fn click_then_move_the_clicked_box() {
    let level = json!({
        "boxes": [{ "pos": [0, 0] }, { "pos": [100, 0] }]
    })
    .to_string();
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    run(&mut runner, 1);

    runner.pointer_down(Vec2::new(100.0, 10.0));
    runner.key_down(keys::W);
    let events = run(&mut runner, 10);

    assert_eq!(events[0], BoardEvent::highlight(BoxId(2), Some(BoxId(1))));
    let moved = runner.board().get(BoxId(2)).unwrap();
    assert_eq!(moved.state(), BoxState::Floating);
    assert!((moved.position().y - 45.0).abs() <= 0.05);
    assert_eq!(runner.board().get(BoxId(1)).unwrap().position(), Vec2::ZERO);
}

#[test]
fn stack_settles_against_box_above() {
    // Box 1 moves up two tiers into box 2, which sits 60 above
    let level = json!({
        "boxes": [{ "pos": [0, 0] }, { "pos": [0, 60] }]
    })
    .to_string();
    let mut runner = BoardRunner::from_json("{}", &level).unwrap();
    runner.key_down(keys::SHIFT);
    runner.key_down(keys::W);
    run(&mut runner, 20);

    let b = runner.board().get(BoxId(1)).unwrap();
    assert_eq!(b.state(), BoxState::Stationary);
    assert!((b.position().y - 30.0).abs() < 1e-3);
    assert_eq!(b.neighbor_box(Side::Above), Some(BoxId(2)));
    assert_eq!(runner.board().get(BoxId(2)).unwrap().position(), Vec2::new(0.0, 60.0));
}

#[test]
fn bad_inputs_fail_to_load() {
    assert!(matches!(
        BoardRunner::from_json(r#"{ "fixed_dt": 0 }"#, &glide_pair(json!({}))),
        Err(BoardError::Config(_))
    ));
    assert!(matches!(
        BoardRunner::from_json("{}", r#"{ "boxes": [] }"#),
        Err(BoardError::Level(_))
    ));
}
