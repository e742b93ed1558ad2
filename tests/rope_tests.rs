use approx::assert_abs_diff_eq;
use tether::{
    ConstraintKind, ConstraintSystem, NoOpStepObserver, PointMass, Rope, RopeConfig, RopeError,
    RopeState, StepContext, StepObserver, Vec2,
};

fn vertical_rope() -> Rope<f32> {
    Rope::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 200.0), 200.0, RopeConfig::new()).unwrap()
}

/// Rest length of each point's exact link to its predecessor, from index 1.
fn link_lengths(rope: &Rope<f32>) -> Vec<f32> {
    let ids = rope.point_ids();
    (1..ids.len())
        .map(|i| {
            rope.point(i)
                .and_then(|p| p.rest_length_to(ids[i - 1]))
                .unwrap_or(f32::NAN)
        })
        .collect()
}

fn at_most_caps(rope: &Rope<f32>, index: usize) -> Vec<f32> {
    rope.point(index)
        .unwrap()
        .constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::AtMost)
        .map(|c| c.rest_length)
        .collect()
}

#[test]
fn construction_lays_out_whole_segments() {
    let rope = vertical_rope();
    assert_eq!(rope.len(), 11);
    assert_eq!(rope.segment_count(), 10);
    for len in link_lengths(&rope) {
        assert_abs_diff_eq!(len, 20.0, epsilon = 1e-5);
    }
    assert_abs_diff_eq!(rope.current_length(), 200.0, epsilon = 1e-3);
    assert_eq!(rope.anchor_id(), rope.point_ids()[0]);
    assert_eq!(rope.tail_id(), *rope.point_ids().last().unwrap());
    assert_eq!(rope.tail().weight, 1.0);
}

/// A pinned anchor shared with a level object, already carrying a link the
/// rope must not inherit.
fn level_anchor() -> PointMass<f32> {
    let mut level: ConstraintSystem<f32> = ConstraintSystem::new();
    let post = level.push(PointMass::new(Vec2::new(-50.0, 0.0), 1.0));
    let mut anchor = PointMass::pinned(Vec2::new(0.0, 0.0), 0.2);
    anchor.add_constraint(post, 50.0, ConstraintKind::Exact);
    anchor
}

fn rope_from_level_anchor() -> Rope<f32> {
    let tail = PointMass::new(Vec2::new(0.0, 200.0), 0.3);
    Rope::with_points(level_anchor(), tail, 200.0, RopeConfig::new()).unwrap()
}

#[test]
fn with_points_keeps_pin_and_resets_the_rest() {
    let mut rope = rope_from_level_anchor();

    assert!(rope.anchor().is_pinned());
    assert!(rope.anchor().constraints.is_empty());
    assert_eq!(rope.anchor().weight, 0.5);
    assert_eq!(rope.tail().weight, 1.0);
    assert_eq!(rope.len(), 11);
    for len in link_lengths(&rope) {
        assert_abs_diff_eq!(len, 20.0, epsilon = 1e-5);
    }

    // The inherited pin is enough to reinforce.
    assert!(rope.reinforce());
    assert!(rope.is_reinforced());
}

#[test]
fn unpinned_anchor_cannot_be_reinforced() {
    let mut rope = rope_from_level_anchor();
    rope.unpin_anchor();
    assert!(!rope.anchor().is_pinned());
    assert!(!rope.reinforce());
    assert!(!rope.is_reinforced());
}

#[test]
fn non_finite_edits_are_ignored() {
    let mut rope = vertical_rope();
    rope.extend(f32::INFINITY, Vec2::new(0.0, 1.0));
    rope.extend(f32::NAN, Vec2::new(0.0, 1.0));
    assert_eq!(rope.len(), 11);
    assert_abs_diff_eq!(rope.current_length(), 200.0, epsilon = 1e-3);

    assert_eq!(rope.retract(f32::INFINITY), f32::INFINITY);
    assert_eq!(rope.len(), 11);
    assert_abs_diff_eq!(rope.current_length(), 200.0, epsilon = 1e-3);
}

#[test]
fn retract_removes_a_point_and_shrinks_tail_link() {
    let mut rope = vertical_rope();
    let leftover = rope.retract(25.0);
    assert_eq!(leftover, 0.0);
    assert_eq!(rope.len(), 10);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 15.0, epsilon = 1e-5);
    assert_abs_diff_eq!(rope.current_length(), 175.0, epsilon = 1e-3);
}

#[test]
fn retract_folds_instead_of_leaving_a_sliver() {
    let mut rope = vertical_rope();
    rope.retract(5.0);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 15.0, epsilon = 1e-5);
    // 15 - 14.5 would leave half a unit; a point goes instead.
    rope.retract(14.5);
    assert_eq!(rope.len(), 10);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 20.5, epsilon = 1e-4);
    assert_abs_diff_eq!(rope.current_length(), 180.5, epsilon = 1e-3);
}

#[test]
fn extend_grows_tail_link_then_spills_into_a_new_segment() {
    let mut rope = vertical_rope();
    rope.retract(15.0);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 5.0, epsilon = 1e-5);

    rope.extend(10.0, Vec2::zero());
    assert_eq!(rope.len(), 11);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 15.0, epsilon = 1e-5);

    rope.extend(12.0, Vec2::zero());
    assert_eq!(rope.len(), 12);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 7.0, epsilon = 1e-4);
    let links = link_lengths(&rope);
    for len in &links[..links.len() - 1] {
        assert_abs_diff_eq!(*len, 20.0, epsilon = 1e-5);
    }
}

#[test]
fn extend_places_points_at_neighbour_plus_offset() {
    let mut rope = vertical_rope();
    let neighbour = rope.point(rope.len() - 2).unwrap().position;
    rope.extend(20.0, Vec2::new(3.0, 4.0));
    let inserted = rope.point(rope.len() - 2).unwrap();
    assert_eq!(inserted.position, neighbour + Vec2::new(3.0, 4.0));
    assert_eq!(inserted.weight, rope.config().point_weight);
}

#[test]
fn extend_then_retract_round_trips() {
    let mut rope = vertical_rope();
    rope.retract(7.0);
    let count = rope.len();
    let links = link_lengths(&rope);

    rope.extend(47.3, Vec2::new(0.0, 1.0));
    assert!(rope.len() > count);
    assert_eq!(rope.retract(47.3), 0.0);

    assert_eq!(rope.len(), count);
    for (a, b) in links.iter().zip(link_lengths(&rope)) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-3);
    }
}

#[test]
fn retract_reports_what_it_could_not_take() {
    let mut rope = vertical_rope();
    let leftover = rope.retract(500.0);
    assert_eq!(rope.len(), 2);
    assert_abs_diff_eq!(rope.tail_rest_length().unwrap(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(leftover, 500.0 - 199.0, epsilon = 1e-3);
}

#[test]
fn reinforce_needs_a_pinned_anchor() {
    let mut rope = vertical_rope();
    let weights: Vec<f32> = (0..rope.len()).map(|i| rope.point(i).unwrap().weight).collect();

    assert!(!rope.reinforce());
    assert!(!rope.is_reinforced());
    for i in 0..rope.len() {
        assert!(at_most_caps(&rope, i).is_empty());
        assert_eq!(rope.point(i).unwrap().weight, weights[i]);
    }
}

#[test]
fn reinforce_caps_every_point_to_the_anchor() {
    let mut rope = vertical_rope();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    assert!(rope.reinforce());
    assert!(!rope.reinforce(), "second call is a no-op");

    assert!(at_most_caps(&rope, 0).is_empty());
    for i in 1..rope.len() {
        let caps = at_most_caps(&rope, i);
        assert_eq!(caps.len(), 1);
        assert_abs_diff_eq!(caps[0], i as f32 * 23.0, epsilon = 1e-4);
        let c = rope.point(i).unwrap().constraints.iter().find(|c| c.kind == ConstraintKind::AtMost).unwrap();
        assert_eq!(c.other, rope.anchor_id());
    }
    for i in 0..rope.len() - 1 {
        assert_eq!(rope.point(i).unwrap().weight, 0.9);
    }
    assert_eq!(rope.tail().weight, 1.0);
}

#[test]
fn tail_caps_follow_winding() {
    let mut rope = vertical_rope();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    rope.reinforce();

    rope.retract(40.0);
    assert_eq!(rope.len(), 9);
    assert_abs_diff_eq!(at_most_caps(&rope, 8)[0], 8.0 * 23.0, epsilon = 1e-4);

    rope.extend(20.0, Vec2::zero());
    assert_eq!(rope.len(), 10);
    assert_abs_diff_eq!(at_most_caps(&rope, 9)[0], 9.0 * 23.0, epsilon = 1e-4);
    let inserted = rope.point(8).unwrap();
    assert_eq!(inserted.weight, 0.9);
    assert_abs_diff_eq!(at_most_caps(&rope, 8)[0], 8.0 * 23.0, epsilon = 1e-4);
}

#[test]
fn cut_splices_in_a_frozen_stand_in() {
    let mut rope = vertical_rope();
    let before: Vec<_> = rope.point_ids().to_vec();
    let frozen = rope.config().frozen_weight;

    rope.cut(3).unwrap();
    assert_eq!(rope.len(), 12);
    assert_eq!(rope.state(), RopeState::Cutting);
    assert_eq!(rope.cut_index(), Some(3));

    let ids = rope.point_ids().to_vec();
    assert_eq!(&ids[..4], &before[..4]);
    assert_eq!(&ids[5..], &before[4..]);
    let stand_in = rope.stand_in().unwrap();
    assert_eq!(ids[4], stand_in);

    // Anchor side keeps its links but freezes.
    for i in 0..4 {
        let p = rope.point(i).unwrap();
        assert_eq!(p.weight, frozen);
        if i > 0 {
            assert_eq!(p.rest_length_to(ids[i - 1]), Some(20.0));
        }
    }

    let stand = rope.point(4).unwrap();
    assert_eq!(stand.weight, frozen);
    assert!(stand.constraints.is_empty());

    // Old successor now hangs from the stand-in, at its old position.
    let next = rope.point(5).unwrap();
    assert_eq!(next.rest_length_to(ids[3]), None);
    assert_eq!(next.rest_length_to(stand_in), Some(20.0));
    assert_eq!(stand.position, next.position);
    assert_eq!(stand.previous_position, next.previous_position);

    for i in 5..11 {
        assert_eq!(rope.point(i).unwrap().weight, rope.config().point_weight);
    }
    assert_eq!(rope.tail().weight, 1.0);
    assert_eq!(rope.segment_count(), 7);
    assert_abs_diff_eq!(rope.current_length(), 140.0, epsilon = 1e-3);
}

#[test]
fn cut_errors() {
    let mut rope = vertical_rope();
    assert_eq!(rope.cut(11), Err(RopeError::PointOutOfBounds { index: 11, count: 11 }));
    rope.cut(5).unwrap();
    assert_eq!(rope.cut(2), Err(RopeError::AlreadyCut));
}

#[test]
fn cut_drops_reinforcement_across_the_cut() {
    let mut rope = vertical_rope();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    rope.reinforce();
    rope.cut(4).unwrap();

    assert!(!rope.is_reinforced());
    assert!(!rope.reinforce());
    for i in 6..rope.len() {
        assert!(at_most_caps(&rope, i).is_empty(), "point {} still capped", i);
    }
    assert_eq!(at_most_caps(&rope, 3).len(), 1);
}

#[test]
fn retract_never_eats_the_stand_in() {
    let mut rope = vertical_rope();
    rope.cut(3).unwrap();
    let stand_in = rope.stand_in().unwrap();

    let leftover = rope.retract(1000.0);
    assert_eq!(rope.len(), 6);
    assert_eq!(rope.point_ids()[4], stand_in);
    assert_eq!(rope.tail().rest_length_to(stand_in), Some(1.0));
    assert_abs_diff_eq!(leftover, 1000.0 - 120.0 - 19.0, epsilon = 1e-3);
}

#[derive(Default)]
struct Recorder {
    integrations: usize,
    passes: usize,
    steps: usize,
    severed: Option<usize>,
}

impl StepObserver for Recorder {
    fn on_integrate(&mut self) {
        self.integrations += 1;
    }
    fn on_constraint_iteration(&mut self, _iteration: usize) {
        self.passes += 1;
    }
    fn on_step_complete(&mut self) {
        self.steps += 1;
    }
    fn on_severed(&mut self, removed: usize) {
        self.severed = Some(removed);
    }
}

#[test]
fn update_runs_configured_passes() {
    let mut rope = vertical_rope();
    let mut rec = Recorder::default();
    rope.update(1.0 / 60.0, &StepContext::new(), &mut rec);
    assert_eq!(rec.integrations, 1);
    assert_eq!(rec.passes, 25);
    assert_eq!(rec.steps, 1);
}

#[test]
fn fade_runs_out_and_severs_anchor_side() {
    let mut rope = vertical_rope();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    rope.cut(3).unwrap();
    let stand_in = rope.stand_in().unwrap();
    let tail = rope.tail_id();

    let mut rec = Recorder::default();
    let ctx = StepContext::earth_like();
    rope.update(0.5, &ctx, &mut rec);
    let alpha = rope.fade_alpha().unwrap();
    assert!(alpha > 0.0 && alpha < 1.0);
    assert_eq!(rec.severed, None);

    for _ in 0..4 {
        rope.update(0.5, &ctx, &mut rec);
    }
    assert_eq!(rope.state(), RopeState::Severed);
    assert_eq!(rec.severed, Some(4));
    assert_eq!(rope.len(), 8);
    assert_eq!(rope.anchor_id(), stand_in);
    assert_eq!(rope.tail_id(), tail);
    assert_eq!(rope.fade_alpha(), None);
    assert!(rope.is_cut());
    assert_abs_diff_eq!(rope.current_length(), 140.0, epsilon = 1e-3);
}

#[test]
fn rope_sags_under_gravity() {
    let mut rope: Rope<f32> =
        Rope::new(Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0), 200.0, RopeConfig::new()).unwrap();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    let ctx = StepContext::earth_like();

    for _ in 0..120 {
        rope.update(1.0 / 60.0, &ctx, &mut NoOpStepObserver);
    }

    let mid = rope.point(5).unwrap().position;
    assert!(mid.y > 0.0, "middle of the rope should drop, got y = {}", mid.y);
    assert_eq!(rope.anchor().position, Vec2::new(0.0, 0.0));
}

#[test]
fn payload_drives_the_tail() {
    let mut rope = vertical_rope();
    rope.pin_anchor(Vec2::new(0.0, 0.0));
    rope.set_tail_position(Vec2::new(30.0, 190.0));
    assert_eq!(rope.tail().position, Vec2::new(30.0, 190.0));
    assert_eq!(rope.tail().previous_position, Vec2::new(0.0, 200.0));
}
