use rand::rngs::StdRng;
use rand::SeedableRng;
use spin_picker::animation::{AnimationConfig, AnimationStyle, Area};
use spin_picker::clock::ManualClock;
use spin_picker::roster::Roster;
use spin_picker::session::{RevealEvent, RunState, SelectionSession, StartOutcome};
use spin_picker::settings::{load_settings, save_settings, MemoryStore, SetupDraft};
use spin_picker::{Participant, SelectionMode, SelectionSettings};
use std::collections::HashMap;
use std::rc::Rc;

const FRAME_MS: f64 = 16.0;

fn trio() -> Vec<Participant> {
    vec![
        Participant::new(1, "Alice", None),
        Participant::new(2, "Bob", None),
        Participant::new(3, "Cara", None),
    ]
}

/// Drive one run to completion, returning every reveal that fired.
fn run_to_end(
    session: &mut SelectionSession<Rc<ManualClock>>,
    clock: &ManualClock,
    rng: &mut StdRng,
) -> Vec<RevealEvent> {
    let mut reveals = Vec::new();
    match session.start(rng).expect("start") {
        StartOutcome::Immediate(ev) => reveals.push(ev),
        StartOutcome::Animating { .. } => {
            for _ in 0..1_000 {
                clock.advance(FRAME_MS);
                if let Some(ev) = session.tick(rng) {
                    reveals.push(ev);
                }
            }
        }
        StartOutcome::Ignored => {}
    }
    reveals
}

#[test]
fn rigged_bob_wins_every_time() {
    let store = MemoryStore::new();
    let mut draft = SetupDraft::default();
    draft.select_mode(SelectionMode::Rigged);
    draft.preselect(Some(2));
    save_settings(&store, &draft.finish(&trio()).unwrap()).unwrap();

    let settings = load_settings(&store).expect("settings were saved");
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session =
        SelectionSession::new(settings, AnimationConfig::physics(), Rc::clone(&clock));
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..25 {
        let reveals = run_to_end(&mut session, &clock, &mut rng);
        assert_eq!(reveals.len(), 1);
        assert_eq!(reveals[0].participant.name, "Bob");
    }
    assert_eq!(session.reveal_count(), 25);
}

#[test]
fn random_runs_spread_over_the_roster() {
    let clock = Rc::new(ManualClock::new(0.0));
    let config = AnimationConfig::cycling().with_area(Area::new(640.0, 480.0));
    let mut session =
        SelectionSession::new(SelectionSettings::random(trio()), config, Rc::clone(&clock));
    let mut rng = StdRng::seed_from_u64(77);

    let mut wins: HashMap<u64, usize> = HashMap::new();
    for _ in 0..300 {
        let reveals = run_to_end(&mut session, &clock, &mut rng);
        assert_eq!(reveals.len(), 1);
        *wins.entry(reveals[0].participant.id).or_default() += 1;
    }
    for id in 1..=3 {
        let count = wins.get(&id).copied().unwrap_or(0);
        assert!((60..=140).contains(&count), "id {} won {} times", id, count);
    }
}

#[test]
fn empty_roster_never_animates() {
    let roster = Roster::new();
    let settings = SelectionSettings::random(roster.into_participants());
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session =
        SelectionSession::new(settings, AnimationConfig::physics(), Rc::clone(&clock));
    let mut rng = StdRng::seed_from_u64(1);

    assert!(!session.can_start());
    assert!(run_to_end(&mut session, &clock, &mut rng).is_empty());
    assert_eq!(session.state(), &RunState::Idle);
    assert!(session.view().items.is_empty());
}

#[test]
fn reset_then_restart_reveals_once_for_the_new_run() {
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session = SelectionSession::new(
        SelectionSettings::rigged(trio(), 1),
        AnimationConfig::physics(),
        Rc::clone(&clock),
    );
    let mut rng = StdRng::seed_from_u64(5);

    session.start(&mut rng).unwrap();
    for _ in 0..200 {
        clock.advance(FRAME_MS);
        assert_eq!(session.tick(&mut rng), None);
    }
    session.reset();
    assert!(session.can_start());

    let reveals = run_to_end(&mut session, &clock, &mut rng);
    assert_eq!(reveals.len(), 1);
    assert_eq!(reveals[0].run, session.run());
    assert_eq!(session.reveal_count(), 1);
}

#[test]
fn style_switch_between_runs() {
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session = SelectionSession::new(
        SelectionSettings::random(trio()),
        AnimationConfig::physics(),
        Rc::clone(&clock),
    );
    let mut rng = StdRng::seed_from_u64(31);

    assert!(session.set_config(AnimationConfig::for_style(AnimationStyle::Cycling)));
    session.start(&mut rng).unwrap();

    // Cycling finishes in 2s and reveals 0.5s later.
    clock.advance(2_000.0);
    assert_eq!(session.tick(&mut rng), None);
    clock.advance(500.0);
    assert!(session.tick(&mut rng).is_some());
}

#[test]
fn seeded_roster_feeds_the_selection_screen() {
    let store = MemoryStore::new();
    let mut roster = Roster::seeded().unwrap();
    roster.remove(1);
    roster.add("Guest", "", 1_700_000_000_000).unwrap();

    let settings = SelectionSettings::rigged(roster.participants().to_vec(), 1_700_000_000_000);
    save_settings(&store, &settings).unwrap();

    let loaded = load_settings(&store).unwrap();
    assert_eq!(loaded.participants, roster.participants());
    assert_eq!(loaded.participants.len(), 24);
    assert_eq!(loaded.participants.last().map(|p| p.name.as_str()), Some("Guest"));
}
