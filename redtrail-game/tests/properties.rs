//! Rule-level guarantees driven through the public API.

use redtrail_game::{
    AmountRange, Character, Decision, Ending, EventDeck, EventKind, EventOutcome, EventTable,
    GameConfig, GamePhase, GameState, Resource, ResourceDelta, Role, ScriptedRolls, TurnStart,
    resolve_event,
};

fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::default().with_seed(seed, GameConfig::default_config());
    state.start_character_creation();
    state.create_character("Ryder", Role::Sharpshooter);
    state
}

fn deck_event(kind: EventKind) -> redtrail_game::Event {
    EventDeck::from_table(&EventTable::default())
        .get(kind)
        .cloned()
        .unwrap()
}

#[test]
fn ability_unlocks_are_monotonic_and_threshold_exact() {
    let mut character = Character::new("Wren", Role::Archer);

    let mut unlocked_at = Vec::new();
    for count in 0..=25 {
        let before = character.abilities;
        character.unlock_abilities(count);
        if character.abilities != before {
            unlocked_at.push(count);
        }
        // Replaying an older count must never revoke anything.
        character.unlock_abilities(0);
        assert!(character.abilities.tier() >= before.tier());
    }

    assert_eq!(unlocked_at, vec![1, 10, 20]);
}

#[test]
fn clamped_counters_never_go_negative() {
    let mut resources = Resource::starting();
    resources.apply(&ResourceDelta::new(-1_000, -1_000, -1_000));
    assert_eq!(resources.food, 0);
    assert_eq!(resources.ammo, 0);
    assert_eq!(resources.health, 0);

    // The worst bandit outcome cannot push a weak character below zero.
    let mut weak = Character::new("Moss", Role::Pacifist);
    weak.resources = Resource {
        food: 1,
        ammo: 0,
        health: 1,
    };
    let event = deck_event(EventKind::BanditAmbush);
    let mut rolls = ScriptedRolls::new([], [4, 4]);
    let outcome = resolve_event(
        &event,
        &weak,
        Some(Decision::Fight),
        &EventTable::default(),
        &mut rolls,
    );
    weak.resources.apply(&outcome.delta());
    assert!(weak.resources.food >= 0);
    assert!(weak.resources.ammo >= 0);
    assert!(weak.resources.health >= 0);
}

#[test]
fn collapse_fires_exactly_when_a_counter_bottoms_out() {
    // food 1 / health 1 is still a live run
    let mut state = playing_state(31);
    {
        let resources = &mut state.character.as_mut().unwrap().resources;
        resources.food = 1;
        resources.health = 1;
    }
    assert!(matches!(state.begin_turn(), TurnStart::Drawn { .. }));
    assert!(state.ending.is_none());

    // food 0 collapses before the next event is drawn
    let mut starved = playing_state(32);
    starved.character.as_mut().unwrap().resources.food = 0;
    starved.begin_turn();
    assert_eq!(starved.phase, GamePhase::GameOver);
    assert!(matches!(starved.ending, Some(Ending::Collapse { .. })));

    // health 0 does the same
    let mut bled = playing_state(33);
    bled.character.as_mut().unwrap().resources.health = 0;
    bled.begin_turn();
    assert_eq!(bled.phase, GamePhase::GameOver);
}

#[test]
fn victory_lands_exactly_at_the_configured_round_count() {
    let mut state = playing_state(64);
    {
        let resources = &mut state.character.as_mut().unwrap().resources;
        resources.food = 100;
        resources.ammo = 100;
        resources.health = 10;
    }
    state.event_count = 28;

    // round 29: still playing
    if let TurnStart::Drawn { .. } = state.begin_turn() {
        state.resolve_pending(None);
    }
    assert_eq!(state.event_count, 29);
    assert_eq!(state.phase, GamePhase::Playing);

    // round 30: victory
    {
        let resources = &mut state.character.as_mut().unwrap().resources;
        resources.food = 100;
        resources.ammo = 100;
        resources.health = 10;
    }
    if let TurnStart::Drawn { .. } = state.begin_turn() {
        state.resolve_pending(None);
    }
    assert_eq!(state.event_count, 30);
    assert_eq!(state.phase, GamePhase::Ended);
    assert_eq!(state.ending, Some(Ending::Victory));
}

#[test]
fn chest_of_food_forced_draw_of_two_feeds_ten_into_twelve() {
    let mut character = Character::new("Ryder", Role::Melee);
    assert_eq!(character.resources.food, 10);

    let event = deck_event(EventKind::ChestOfFood);
    let mut rolls = ScriptedRolls::new([0.0], [2]);
    let outcome = resolve_event(&event, &character, None, &EventTable::default(), &mut rolls);

    assert_eq!(outcome, EventOutcome::CacheFound { food: 2 });
    character.resources.apply(&outcome.delta());
    assert_eq!(character.resources.food, 12);
}

#[test]
fn save_and_load_preserve_name_role_and_counters() {
    let mut state = playing_state(99);
    {
        let character = state.character.as_mut().unwrap();
        character.resources.food = 37;
        character.resources.ammo = 4;
        character.resources.health = 6;
        character.unlock_abilities(10);
    }
    state.event_count = 10;

    let json = serde_json::to_string_pretty(&state).unwrap();
    let loaded: GameState = serde_json::from_str(&json).unwrap();
    let loaded = loaded.rehydrate(GameConfig::default_config());

    let before = state.character.as_ref().unwrap();
    let after = loaded.character.as_ref().unwrap();
    assert_eq!(after.name, before.name);
    assert_eq!(after.role, before.role);
    assert_eq!(after.resources, before.resources);
    assert_eq!(after.abilities, before.abilities);
    assert_eq!(loaded.event_count, 10);
    assert_eq!(loaded.phase, GamePhase::Playing);

    // the rebuilt deck always carries the full set of kinds
    let deck = loaded.deck.as_ref().unwrap();
    for kind in EventKind::ALL {
        assert!(deck.get(kind).is_some(), "missing {kind}");
    }
}

#[test]
fn hunt_is_blocked_rather_than_spending_phantom_ammo() {
    let mut character = Character::new("Dry", Role::Archer);
    character.resources.ammo = 0;

    let event = deck_event(EventKind::Hunt);
    let mut rolls = ScriptedRolls::new([0.0], [7]);
    let outcome = resolve_event(&event, &character, None, &EventTable::default(), &mut rolls);

    assert_eq!(outcome, EventOutcome::HuntBlocked);
    character.resources.apply(&outcome.delta());
    assert_eq!(character.resources.ammo, 0);
}

#[test]
fn fighting_bandits_with_no_ammo_spends_none_and_hurts() {
    let mut character = Character::new("Dry", Role::Melee);
    character.resources.ammo = 0;

    let event = deck_event(EventKind::BanditAmbush);
    let mut rolls = ScriptedRolls::new([], [3, 2]);
    let outcome = resolve_event(
        &event,
        &character,
        Some(Decision::Fight),
        &EventTable::default(),
        &mut rolls,
    );

    let EventOutcome::Overrun {
        ammo_spent,
        wounds,
        food_stolen,
    } = outcome
    else {
        panic!("expected an overrun, got {outcome:?}");
    };
    assert_eq!(ammo_spent, 0);
    assert_eq!(wounds, 3);
    assert_eq!(food_stolen, 2);
}

#[test]
fn custom_round_count_is_honored() {
    let config = GameConfig::from_json(r#"{ "rounds_to_win": 2 }"#).unwrap();
    config.validate().unwrap();
    let mut state = GameState::default().with_seed(8, config);
    state.start_character_creation();
    state.create_character("Quick", Role::Explorer);
    {
        let resources = &mut state.character.as_mut().unwrap().resources;
        resources.food = 100;
        resources.health = 10;
    }

    for _ in 0..2 {
        if let TurnStart::Drawn { .. } = state.begin_turn() {
            state.resolve_pending(None);
        }
    }
    assert_eq!(state.phase, GamePhase::Ended);
    assert_eq!(state.ending, Some(Ending::Victory));
}

#[test]
fn scripted_amounts_stay_inside_tuning_bounds() {
    let table = EventTable::default();
    let event = deck_event(EventKind::ChestOfFood);
    let character = Character::new("Ryder", Role::Explorer);

    let mut rolls = ScriptedRolls::new([0.0], [-5]);
    let outcome = resolve_event(&event, &character, None, &table, &mut rolls);
    assert_eq!(
        outcome,
        EventOutcome::CacheFound {
            food: table.chest.food.lo
        }
    );

    assert_eq!(table.chest.food, AmountRange::new(1, 6));
}
