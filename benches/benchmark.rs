use bevy::prelude::{Entity, Transform, Vec2, Vec3};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stride::agent::{smooth_damp, AgentConfig, PlayerAgent, SceneController};
use stride::physics::{overlap_box, step_body, Aabb, Body, BoxCollider, PhysicsParams};
use stride::player::{BodyView, GroundCheck};
use stride::scene::SceneLayout;

const DT: f32 = 1.0 / 50.0;

/// Counts reload requests instead of touching any scene.
#[derive(Default)]
struct CountingScenes(usize);

impl SceneController for CountingScenes {
    fn reload_scene(&mut self, _name: &str) {
        self.0 += 1;
    }
}

/// Static colliders of the built-in level, ids starting at 1.
fn level_statics() -> Vec<(Entity, Aabb)> {
    let layout = SceneLayout::default();
    let boxes = layout
        .platforms
        .iter()
        .map(|p| (p.center, p.size))
        .chain(layout.hazards.iter().map(|h| (h.center, h.size)));
    boxes
        .enumerate()
        .map(|(i, (c, s))| {
            (Entity::from_raw(i as u32 + 1), Aabb::from_center_size(Vec2::new(c.0, c.1), Vec2::new(s.0, s.1)))
        })
        .collect()
}

/// Drive an agent and its body through `steps` fixed ticks on the built-in
/// level, alternating direction and jumping periodically.
fn simulate(steps: usize) -> (PlayerAgent, Transform, Body, usize) {
    let layout = SceneLayout::default();
    let statics = level_statics();
    let params = PhysicsParams::default();
    let player = Entity::from_raw(0);
    let collider = BoxCollider::default();
    let ground_check = GroundCheck::default();

    let mut agent = PlayerAgent::new(AgentConfig::default(), "level_1").expect("default tuning is valid");
    let mut tf = Transform::from_xyz(layout.spawn.0, layout.spawn.1, 0.0)
        .with_scale(Vec3::new(layout.player_size.0, layout.player_size.1, 1.0));
    let mut body = Body::default();
    let mut scenes = CountingScenes::default();

    for i in 0..steps {
        if i % 200 == 0 {
            agent.on_move_input(if (i / 200) % 2 == 0 { 1.0 } else { -1.0 });
        }

        let mut colliders = statics.clone();
        colliders.push((player, Aabb::from_transform(&tf, &collider)));

        {
            let mut view = BodyView::new(player, &tf, &mut body, ground_check, &colliders);
            if i % 75 == 0 {
                agent.on_jump_input(&mut view);
            }
            agent.on_fixed_step(DT, &mut view, &mut scenes);
        }
        step_body(&mut tf, &mut body, &collider, &statics, &params, DT);
    }

    (agent, tf, body, scenes.0)
}

/// Smoothing a single value towards a moving target.
fn bench_smooth_damp(c: &mut Criterion) {
    c.bench_function("smooth_damp_10k", |b| {
        b.iter(|| {
            let mut value = 0.0f32;
            let mut velocity = 0.0f32;
            for i in 0..10_000usize {
                let target = if (i / 500) % 2 == 0 { 12.0 } else { -12.0 };
                value = smooth_damp(value, black_box(target), &mut velocity, 0.3, DT);
            }
            black_box((value, velocity));
        })
    });
}

/// Ground probe queries against the built-in level.
fn bench_overlap_box(c: &mut Criterion) {
    let statics = level_statics();
    c.bench_function("overlap_box_level", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for i in 0..1_000usize {
                let x = (i as f32 * 0.06) - 30.0;
                if overlap_box(black_box(Vec2::new(x, -0.5)), Vec2::new(1.0, 0.001), &statics).is_some() {
                    hits += 1;
                }
            }
            black_box(hits);
        })
    });
}

/// Full agent plus host physics stepping.
fn bench_agent_simulation(c: &mut Criterion) {
    c.bench_function("agent_many_steps", |b| {
        b.iter(|| black_box(simulate(black_box(5_000))))
    });
}

#[test]
fn __bench_smoke_test() {
    // a short run should land the player on the floor at full health
    let (agent, tf, _body, reloads) = simulate(60);
    assert!(agent.is_grounded());
    assert_eq!(reloads, 0);
    assert!(tf.translation.y > -0.5);
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(100);
    targets =
        bench_smooth_damp,
        bench_overlap_box,
        bench_agent_simulation
}
criterion_main!(benches);
