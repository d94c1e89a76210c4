//! The board host loop.
//!
//! `Board` wires the pieces together and fixes the order of one tick:
//!
//! 1. pointer selection and key commands for the highlighted box,
//! 2. every box advances in spawn order,
//! 3. contacts are detected and delivered to both participants,
//! 4. boxes overlapping the goal score and leave play.

use glam::Vec2;

use crate::api::config::{BoardConfig, SideResolution};
use crate::api::error::BoardError;
use crate::api::types::{BoardEvent, BorderId, BorderOrientation, BoxId, Occupant};
use crate::contacts::{BodyKind, ContactEvent, ContactGeometry, ContactPair, ContactTracker, Hitbox};
use crate::core::box_entity::BoxEntity;
use crate::core::registry::BoardRegistry;
use crate::core::rng::Rng;
use crate::input::queue::{keys, InputEvent};
use crate::input::translator::InputTranslator;
use crate::level::LevelDesc;
use crate::visual::HighlightVisual;

/// A static level edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub id: BorderId,
    pub center: Vec2,
    pub size: Vec2,
    pub orientation: BorderOrientation,
}

impl Border {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(Occupant::Border(self.id), self.center, self.size)
    }

    /// Point on the centre line facing `pos`, clamped to the border's extent.
    fn facing_point(&self, pos: Vec2) -> Vec2 {
        let half = self.size * 0.5;
        match self.orientation {
            BorderOrientation::Horizontal => Vec2::new(
                pos.x.clamp(self.center.x - half.x, self.center.x + half.x),
                self.center.y,
            ),
            BorderOrientation::Vertical => Vec2::new(
                self.center.x,
                pos.y.clamp(self.center.y - half.y, self.center.y + half.y),
            ),
        }
    }
}

/// Region that scores a point for every box whose footprint enters it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRegion {
    pub center: Vec2,
    pub size: Vec2,
}

impl GoalRegion {
    fn overlaps(&self, entity: &BoxEntity) -> bool {
        let goal = Hitbox::new(Occupant::Border(BorderId(u32::MAX)), self.center, self.size);
        goal.overlaps(&footprint(entity))
    }
}

fn footprint(entity: &BoxEntity) -> Hitbox {
    Hitbox::new(Occupant::Box(entity.id()), entity.position(), entity.size())
}

/// What the contact pass knows about a body at detection time.
#[derive(Debug, Clone, Copy)]
struct BodySnapshot {
    hitbox: Hitbox,
    footprint: Vec2,
    kind: BodyKind,
    border: Option<Border>,
}

/// One board: boxes, borders, goal, contacts, input and highlight.
pub struct Board<V: HighlightVisual = ()> {
    config: BoardConfig,
    registry: BoardRegistry,
    borders: Vec<Border>,
    goal: Option<GoalRegion>,
    tracker: ContactTracker,
    translator: InputTranslator,
    rng: Rng,
    visual: V,
    shift_held: bool,
    score: u32,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Create an empty headless board.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        Board::with_visual(config, ())
    }

    /// Build a headless board from a level layout.
    pub fn from_level(config: BoardConfig, level: &LevelDesc) -> Result<Self, BoardError> {
        Board::from_level_with_visual(config, level, ())
    }
}

impl<V: HighlightVisual> Board<V> {
    pub fn with_visual(config: BoardConfig, visual: V) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self {
            registry: BoardRegistry::new(config.glide_rules.clone()),
            translator: InputTranslator::new(&config),
            rng: Rng::new(config.seed),
            config,
            borders: Vec::new(),
            goal: None,
            tracker: ContactTracker::new(),
            visual,
            shift_held: false,
            score: 0,
            events: Vec::with_capacity(8),
        })
    }

    /// Spawn the level's boxes in order, add its borders and goal, and
    /// highlight the start box.
    pub fn from_level_with_visual(
        config: BoardConfig,
        level: &LevelDesc,
        visual: V,
    ) -> Result<Self, BoardError> {
        level.validate()?;
        let mut board = Self::with_visual(config, visual)?;
        let ids: Vec<BoxId> = level
            .boxes
            .iter()
            .map(|b| board.spawn_box(b.pos, &b.label))
            .collect::<Result<_, _>>()?;
        for border in &level.borders {
            board.add_border(border.center, border.size, border.orientation);
        }
        if let Some(goal) = &level.goal {
            board.set_goal(goal.center, goal.size);
        }
        board.first_highlight(ids[level.start_box])?;
        log::info!(
            "level loaded: {} boxes, {} borders, goal: {}",
            ids.len(),
            board.borders.len(),
            board.goal.is_some()
        );
        Ok(board)
    }

    // -- Setup --

    pub fn spawn_box(&mut self, pos: Vec2, label: &str) -> Result<BoxId, BoardError> {
        let id = self.registry.next_id();
        let entity = BoxEntity::new(id, pos)
            .with_label(label)
            .with_tuning(self.config.tuning());
        self.registry.register_spawn(entity)?;
        Ok(id)
    }

    pub fn add_border(
        &mut self,
        center: Vec2,
        size: Vec2,
        orientation: BorderOrientation,
    ) -> BorderId {
        let id = BorderId(self.borders.len() as u32);
        self.borders.push(Border {
            id,
            center,
            size,
            orientation,
        });
        id
    }

    pub fn set_goal(&mut self, center: Vec2, size: Vec2) {
        self.goal = Some(GoalRegion { center, size });
    }

    pub fn first_highlight(&mut self, id: BoxId) -> Result<(), BoardError> {
        self.registry.first_highlight(id, &mut self.visual)?;
        self.events.push(BoardEvent::highlight(id, None));
        Ok(())
    }

    /// Move the highlight to `id` and emit a `HIGHLIGHT` event.
    pub fn highlight(&mut self, id: BoxId) -> Result<(), BoardError> {
        self.registry.highlight(id, &mut self.visual)?;
        self.events
            .push(BoardEvent::highlight(id, self.registry.previously_highlighted()));
        Ok(())
    }

    // -- Accessors --

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn registry(&self) -> &BoardRegistry {
        &self.registry
    }

    pub fn get(&self, id: BoxId) -> Option<&BoxEntity> {
        self.registry.get(id)
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }

    pub fn goal(&self) -> Option<&GoalRegion> {
        self.goal.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Tick --

    /// One full tick: input, then [`Board::step`].
    pub fn tick(&mut self, dt: f32, input: &[InputEvent]) -> Result<(), BoardError> {
        self.apply_input(input)?;
        self.step(dt)
    }

    /// Apply pointer selection and key commands.
    pub fn apply_input(&mut self, input: &[InputEvent]) -> Result<(), BoardError> {
        for event in input {
            match *event {
                InputEvent::KeyDown { key_code: keys::SHIFT } => self.shift_held = true,
                InputEvent::KeyUp { key_code: keys::SHIFT } => self.shift_held = false,
                InputEvent::KeyUp { .. } => {}
                InputEvent::KeyDown { key_code } => {
                    if let Some(command) = self.translator.translate(key_code, self.shift_held) {
                        let id = self.translator.apply(command, &mut self.registry)?;
                        log::debug!("key {} -> {:?} on box {:?}", key_code, command, id);
                    }
                }
                InputEvent::PointerDown { x, y } => {
                    if self.translator.button_lock() {
                        continue;
                    }
                    let Some(id) = self.registry.box_at(Vec2::new(x, y)) else {
                        continue;
                    };
                    if self.registry.currently_highlighted() != Some(id) {
                        self.highlight(id)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Advance boxes, resolve contacts, then score.
    pub fn step(&mut self, dt: f32) -> Result<(), BoardError> {
        for entity in self.registry.iter_mut() {
            entity.advance(dt);
        }
        self.resolve_contacts();
        self.check_goal()
    }

    fn snapshot(&self) -> Vec<BodySnapshot> {
        let boxes = self.registry.iter().map(|b| BodySnapshot {
            hitbox: Hitbox::new(Occupant::Box(b.id()), b.position(), b.collider_size()),
            footprint: b.size(),
            kind: BodyKind::Box,
            border: None,
        });
        let borders = self.borders.iter().map(|border| BodySnapshot {
            hitbox: border.hitbox(),
            footprint: border.size,
            kind: BodyKind::Border(border.orientation),
            border: Some(*border),
        });
        boxes.chain(borders).collect()
    }

    fn resolve_contacts(&mut self) {
        let bodies = self.snapshot();
        let hitboxes: Vec<Hitbox> = bodies.iter().map(|b| b.hitbox).collect();
        let pairs = self.tracker.step(&hitboxes);

        for pair in pairs {
            self.deliver(&bodies, pair.a, pair.b, pair);
            self.deliver(&bodies, pair.b, pair.a, pair);
        }
    }

    /// Hand `pair` to `receiver` if it is a box, as seen from its side.
    fn deliver(
        &mut self,
        bodies: &[BodySnapshot],
        receiver: Occupant,
        other: Occupant,
        pair: ContactPair,
    ) {
        let Some(me_id) = receiver.as_box() else {
            return;
        };
        let find = |body: Occupant| bodies.iter().find(|b| b.hitbox.body == body);
        let (Some(me), Some(them)) = (find(receiver), find(other)) else {
            return;
        };

        let my_pos = me.hitbox.center;
        let other_pos = match them.border {
            Some(border) => border.facing_point(my_pos),
            None => them.hitbox.center,
        };
        let geometry = match self.config.side_resolution {
            SideResolution::PositionDelta => ContactGeometry::Delta(other_pos - my_pos),
            SideResolution::ContactNormal => {
                ContactGeometry::Normal(me.hitbox.contact_normal(&them.hitbox))
            }
        };
        let event = ContactEvent {
            other,
            phase: pair.phase,
            geometry,
            other_pos,
            other_size: them.footprint,
            other_kind: them.kind,
        };

        if let Some(entity) = self.registry.get_mut(me_id) {
            let response = entity.on_contact(&event);
            log::trace!("contact {:?} {:?}/{:?}: {:?}", pair.phase, receiver, other, response);
        }
    }

    fn check_goal(&mut self) -> Result<(), BoardError> {
        let Some(goal) = self.goal else {
            return Ok(());
        };
        let arrived: Vec<BoxId> = self
            .registry
            .iter()
            .filter(|b| goal.overlaps(b))
            .map(BoxEntity::id)
            .collect();

        for id in arrived {
            let removed = self
                .registry
                .unregister_and_pick_next(id, &mut self.rng, &mut self.visual)?;
            self.tracker.forget(Occupant::Box(removed.id()));
            self.score += 1;
            log::info!("box {:?} reached the goal, score {}", id, self.score);
            self.events.push(BoardEvent::score(self.score, id));
            if let Some(current) = self.registry.currently_highlighted() {
                self.events
                    .push(BoardEvent::highlight(current, self.registry.previously_highlighted()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Side;
    use crate::core::state::BoxState;
    use crate::visual::MarkerLog;

    const DT: f32 = 1.0 / 60.0;

    fn run(board: &mut Board<impl HighlightVisual>, ticks: usize) {
        for _ in 0..ticks {
            board.step(DT).unwrap();
        }
    }

    fn press(key_code: u32) -> InputEvent {
        InputEvent::KeyDown { key_code }
    }

    #[test]
    fn neighbours_link_on_first_contact() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        let b = board.spawn_box(Vec2::new(30.0, 0.0), "").unwrap();
        board.first_highlight(a).unwrap();
        run(&mut board, 2);

        assert_eq!(board.get(a).unwrap().neighbor_box(Side::Right), Some(b));
        assert_eq!(board.get(b).unwrap().neighbor_box(Side::Left), Some(a));
        assert_eq!(board.get(a).unwrap().state(), BoxState::Stationary);
        assert_eq!(board.get(a).unwrap().position(), Vec2::ZERO);
    }

    #[test]
    fn diagonal_boxes_do_not_link() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        board.spawn_box(Vec2::new(30.0, 30.0), "").unwrap();
        board.first_highlight(a).unwrap();
        run(&mut board, 3);
        let entity = board.get(a).unwrap();
        assert!(Side::ALL.iter().all(|&s| !entity.occupied(s)));
    }

    #[test]
    fn move_up_is_blocked_by_box_above() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        board.spawn_box(Vec2::new(0.0, 30.0), "").unwrap();
        board.first_highlight(a).unwrap();
        run(&mut board, 2);

        board.tick(DT, &[press(keys::W)]).unwrap();
        run(&mut board, 10);
        let entity = board.get(a).unwrap();
        assert_eq!(entity.state(), BoxState::Stationary);
        assert_eq!(entity.position(), Vec2::ZERO);
    }

    #[test]
    fn move_up_then_return() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        board.first_highlight(a).unwrap();

        board.tick(DT, &[press(keys::W)]).unwrap();
        run(&mut board, 10);
        let entity = board.get(a).unwrap();
        assert_eq!(entity.state(), BoxState::Floating);
        assert!((entity.position().y - 45.0).abs() <= 0.05);
        assert_eq!(entity.label(), "w");

        board.tick(DT, &[press(keys::BACKSPACE)]).unwrap();
        run(&mut board, 10);
        let entity = board.get(a).unwrap();
        assert!(entity.state().is_resting());
        assert!(entity.position().abs().max_element() <= 0.1);
        assert_eq!(entity.label(), "");
    }

    #[test]
    fn shift_selects_second_tier() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        board.first_highlight(a).unwrap();
        board
            .tick(
                DT,
                &[
                    press(keys::SHIFT),
                    press(keys::S),
                    InputEvent::KeyUp { key_code: keys::SHIFT },
                ],
            )
            .unwrap();
        run(&mut board, 20);
        assert!((board.get(a).unwrap().position().y + 90.0).abs() <= 0.05);
    }

    #[test]
    fn moving_box_stops_against_floor() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        let floor = Vec2::new(0.0, -45.0);
        board.add_border(floor, Vec2::new(300.0, 10.0), BorderOrientation::Horizontal);
        board.first_highlight(a).unwrap();

        board.tick(DT, &[press(keys::S)]).unwrap();
        run(&mut board, 15);
        let entity = board.get(a).unwrap();
        assert_eq!(entity.state(), BoxState::Stationary);
        assert!((entity.position().y - (-45.0 + 20.0)).abs() < 1e-3);
        assert_eq!(entity.neighbor(Side::Below), Some(Occupant::Border(BorderId(0))));
    }

    #[test]
    fn lands_on_floor_from_any_offset() {
        for start_y in [0.0, -2.5, -5.0, -7.5, 4.0] {
            let mut board = Board::new(BoardConfig::default()).unwrap();
            let a = board.spawn_box(Vec2::new(0.0, start_y), "").unwrap();
            let floor = Vec2::new(0.0, -45.0);
            board.add_border(floor, Vec2::new(300.0, 10.0), BorderOrientation::Horizontal);
            board.first_highlight(a).unwrap();

            board.tick(DT, &[press(keys::S)]).unwrap();
            run(&mut board, 20);
            let entity = board.get(a).unwrap();
            assert_eq!(entity.state(), BoxState::Stationary, "start {start_y}");
            assert!((entity.position().y + 25.0).abs() < 1e-3, "start {start_y}");
            assert_eq!(
                entity.neighbor(Side::Below),
                Some(Occupant::Border(BorderId(0))),
                "start {start_y}"
            );
        }
    }

    #[test]
    fn pointer_moves_highlight() {
        let mut board = Board::with_visual(BoardConfig::default(), MarkerLog::new()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        let b = board.spawn_box(Vec2::new(100.0, 0.0), "").unwrap();
        board.first_highlight(a).unwrap();
        board.drain_events();

        board.tick(DT, &[InputEvent::PointerDown { x: 95.0, y: 5.0 }]).unwrap();
        assert_eq!(board.registry().currently_highlighted(), Some(b));
        assert_eq!(board.visual().marked(), Some(b));
        assert_eq!(board.events(), &[BoardEvent::highlight(b, Some(a))]);

        // Clicking the highlighted box again changes nothing
        board.drain_events();
        board.tick(DT, &[InputEvent::PointerDown { x: 100.0, y: 0.0 }]).unwrap();
        assert!(board.events().is_empty());
    }

    #[test]
    fn goal_scores_and_passes_highlight() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        let b = board.spawn_box(Vec2::new(200.0, 0.0), "").unwrap();
        board.set_goal(Vec2::new(0.0, 60.0), Vec2::new(30.0, 30.0));
        board.first_highlight(a).unwrap();
        board.drain_events();

        board.tick(DT, &[press(keys::W)]).unwrap();
        run(&mut board, 10);
        assert_eq!(board.score(), 1);
        assert!(board.get(a).is_none());
        assert_eq!(board.registry().currently_highlighted(), Some(b));
        assert!(board.get(b).unwrap().is_highlighted());
        let events = board.drain_events();
        assert_eq!(events[0], BoardEvent::score(1, a));
        assert_eq!(events[1], BoardEvent::highlight(b, Some(a)));
    }

    #[test]
    fn last_box_in_goal_is_empty_board() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        board.set_goal(Vec2::new(0.0, 60.0), Vec2::new(30.0, 30.0));
        board.first_highlight(a).unwrap();

        board.tick(DT, &[press(keys::W)]).unwrap();
        let mut result = Ok(());
        for _ in 0..10 {
            result = board.step(DT);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(BoardError::EmptyBoard)));
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn contact_normal_resolution_links_the_same_way() {
        let config = BoardConfig {
            side_resolution: SideResolution::ContactNormal,
            ..BoardConfig::default()
        };
        let mut board = Board::new(config).unwrap();
        let a = board.spawn_box(Vec2::ZERO, "").unwrap();
        let b = board.spawn_box(Vec2::new(0.0, -30.0), "").unwrap();
        board.first_highlight(a).unwrap();
        run(&mut board, 2);
        assert_eq!(board.get(a).unwrap().neighbor_box(Side::Below), Some(b));
        assert_eq!(board.get(b).unwrap().neighbor_box(Side::Above), Some(a));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BoardConfig {
            box_size: -1.0,
            ..BoardConfig::default()
        };
        assert!(matches!(Board::new(config), Err(BoardError::Config(_))));
    }
}
