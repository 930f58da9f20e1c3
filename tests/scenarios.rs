//! Scripted runs through the public session API

use ghost_serpent::consts::{FRAME_MS, PLAYER_BASE_SPEED};
use ghost_serpent::sim::{GameEvent, GamePhase, HazardKind, HitSource};
use ghost_serpent::{Controls, Session, StateLabel, Tuning, heading_vector};

/// Put the food where the head will be after the next step
fn bait_food(session: &mut Session) {
    let state = session.state_mut();
    let next = state.player.pos + heading_vector(state.player.angle) * PLAYER_BASE_SPEED;
    state.food.pos = next;
}

fn spawned(events: &[GameEvent], kind: HazardKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::HazardSpawned { kind: k, .. } if *k == kind))
        .count()
}

#[test]
fn mine_joins_at_score_ten_every_run() {
    let mut session = Session::new(11, Tuning::default());
    let mut controls = Controls::default();

    for run in 0..3 {
        session.start();
        session.state_mut().score = 9;
        bait_food(&mut session);

        let hud = session.frame(1000.0 * run as f64, &mut controls);
        let events = session.drain_events();

        assert_eq!(hud.score, 10);
        assert_eq!(session.state().mines.len(), 1);
        assert_eq!(spawned(&events, HazardKind::Mine), 1);
        assert!(session.state().turrets.is_empty());
        // Two base chasers wanted at score 10
        assert_eq!(session.state().base_chaser_count(), 2);

        session.reset();
        assert!(session.state().mines.is_empty());
    }
}

#[test]
fn eating_moves_food_away_from_the_head() {
    let mut session = Session::new(12, Tuning::default());
    let mut controls = Controls::default();
    session.start();
    bait_food(&mut session);

    session.frame(0.0, &mut controls);
    let state = session.state();
    assert_eq!(state.score, 1);
    assert!(state.player.pos.distance(state.food.pos) >= 100.0);
    assert_eq!(state.player.length, Tuning::default().start_length + 10);
}

#[test]
fn driving_into_the_wall_ends_the_run() {
    let tuning = Tuning {
        initial_shield: 1,
        ..Tuning::default()
    };
    let mut session = Session::new(13, tuning);
    let mut controls = Controls::default();
    session.start();
    // Keep the food out of the way
    session.state_mut().food.pos = glam::Vec2::new(60.0, 60.0);

    let mut now = 0.0;
    let mut absorbed = 0;
    let mut reason = None;
    for _ in 0..2000 {
        let hud = session.frame(now, &mut controls);
        now += FRAME_MS;
        for event in session.drain_events() {
            match event {
                GameEvent::ShieldAbsorbed { .. } => absorbed += 1,
                GameEvent::GameOver { reason: r, .. } => reason = Some(r),
                _ => {}
            }
        }
        if hud.state == StateLabel::Ended {
            break;
        }
    }

    assert_eq!(absorbed, 1);
    assert_eq!(reason, Some(HitSource::Wall));
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.summary(now).end_reason, Some(HitSource::Wall));
}

#[test]
fn ghost_button_lasts_two_seconds_of_wall_clock() {
    let mut session = Session::new(14, Tuning::default());
    let mut controls = Controls::default();
    session.start();
    session.state_mut().food.pos = glam::Vec2::new(60.0, 60.0);

    controls.direct.ghost_pressed = true;
    let hud = session.frame(0.0, &mut controls);
    assert_eq!(hud.effects, vec!["Ghost".to_string()]);

    // Slow frames: few ticks, but the clock still runs out
    session.frame(1000.0, &mut controls);
    assert!(session.state().player.ghost);
    session.frame(2000.0, &mut controls);
    assert!(!session.state().player.ghost);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::GhostActivated));
    assert!(events.contains(&GameEvent::GhostExpired));
}
