//! End-to-end simulation tests driving `Game::tick`.

use engine::config::Config;
use engine::entity::{Cell, Color};
use engine::events::{GameEvent, VictimKind};
use engine::game::{Game, TickInput};
use engine::growth;
use glam::Vec2;

/// Deterministic config with all pools empty; tests opt pools back in
/// as needed.
fn bare_config() -> Config {
    let mut config = Config::default();
    config.seed = Some(42);
    config.arena.food_count = 0;
    config.arena.bot_count = 0;
    config.arena.virus_count = 0;
    config
}

fn game_with(config: Config) -> Game {
    Game::new(config).expect("config should be valid")
}

/// Replace the starting player cell with one at a known position.
fn place_player(game: &mut Game, position: Vec2, radius: f32) {
    game.world.cells.clear();
    let id = game.world.next_id();
    game.world
        .cells
        .push(Cell::new(id, position, radius, Color::new(200, 80, 80), game.tick_count));
}

fn idle() -> TickInput {
    TickInput::default()
}

#[test]
fn eating_one_food_grows_by_the_configured_mass() {
    let mut config = bare_config();
    config.arena.food_count = 1;
    config.food.mass_gain = 50.0;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 30.0);
    game.world.food[0].position = center;

    game.tick(&idle());

    let radius = game.world.cells[0].radius;
    assert!((radius - 30.2646).abs() < 1e-2, "radius = {radius}");
    // One removed, one respawned: the pool size is unchanged.
    assert_eq!(game.world.food.len(), 1);
    assert_eq!(
        game.events(),
        &[GameEvent::FoodEaten { mass_gained: 50.0 }]
    );
}

#[test]
fn near_equal_entities_never_eat_each_other() {
    let mut config = bare_config();
    config.arena.bot_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 100.0);
    game.world.bots[0].position = center + Vec2::new(5.0, 0.0);
    game.world.bots[0].radius = 95.0; // ratio 1.053 < 1.1

    game.tick(&idle());

    assert_eq!(game.world.cells.len(), 1);
    assert_eq!(game.world.bots.len(), 1);
    assert_eq!(game.world.cells[0].radius, 100.0);
    assert_eq!(game.world.bots[0].radius, 95.0);
    assert!(game.events().is_empty());
}

#[test]
fn a_clear_attacker_absorbs_the_victims_full_area() {
    let mut config = bare_config();
    config.arena.bot_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 120.0);
    game.world.bots[0].position = center + Vec2::new(5.0, 0.0);
    game.world.bots[0].radius = 100.0; // ratio 1.2 > 1.1

    game.tick(&idle());

    // sqrt(120^2 + 100^2) = sqrt(24400)
    let radius = game.world.cells[0].radius;
    assert!((radius - 156.2048).abs() < 1e-2, "radius = {radius}");
    // The bot pool respawns immediately.
    assert_eq!(game.world.bots.len(), 1);
    assert!(matches!(
        game.events(),
        [GameEvent::EntityEaten {
            victim: VictimKind::Bot,
            ..
        }]
    ));
}

#[test]
fn split_siblings_cannot_fuse_before_the_merge_delay() {
    let mut config = bare_config();
    config.player.merge_delay_ticks = 120;
    let mut game = game_with(config.clone());

    place_player(&mut game, Vec2::splat(1500.0), 50.0);
    game.tick(&TickInput {
        split: true,
        ..Default::default()
    });
    assert_eq!(game.world.cells.len(), 2);
    let split_tick = game.tick_count;

    // Force the worst case: coincident centers while still Young.
    let p = game.world.cells[0].position;
    game.world.cells[1].position = p;

    while game.tick_count < split_tick + config.player.merge_delay_ticks - 1 {
        game.tick(&idle());
        assert_eq!(
            game.world.cells.len(),
            2,
            "fused too early at tick {}",
            game.tick_count
        );
    }

    // Once mature, the pair is pulled together and fuses within a
    // bounded number of ticks, conserving total area.
    let mut fused_at = None;
    for _ in 0..600 {
        game.tick(&idle());
        if game.world.cells.len() == 1 {
            fused_at = Some(game.tick_count);
            break;
        }
    }
    let fused_at = fused_at.expect("mature siblings should fuse");
    assert!(fused_at >= split_tick + config.player.merge_delay_ticks);
    let radius = game.world.cells[0].radius;
    assert!((radius - 50.0).abs() < 1e-2, "radius = {radius}");
}

#[test]
fn split_never_exceeds_the_cell_cap() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 500.0);

    let input = TickInput {
        split: true,
        ..Default::default()
    };
    for _ in 0..10 {
        game.tick(&input);
        assert!(game.world.cells.len() <= game.config.player.max_cells);
    }
    assert_eq!(game.world.cells.len(), game.config.player.max_cells);
}

#[test]
fn split_conserves_total_area() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 60.0);
    let before = game.world.total_player_mass();

    game.tick(&TickInput {
        split: true,
        ..Default::default()
    });

    assert_eq!(game.world.cells.len(), 2);
    let after = game.world.total_player_mass();
    assert!((after - before).abs() < before * 1e-4);
}

#[test]
fn virus_pop_fragments_into_equal_shares() {
    let mut config = bare_config();
    config.arena.virus_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 100.0);
    game.world.viruses[0].position = center;

    game.tick(&idle());

    // min(8, 16 - 1) pieces plus the surviving original.
    assert_eq!(game.world.cells.len(), 9);
    let total: f32 = game.world.total_player_mass();
    assert!((total - growth::area(100.0)).abs() < total * 1e-3);
    let share = game.world.cells[0].radius;
    for cell in &game.world.cells {
        assert!((cell.radius - share).abs() < 1e-3);
    }
    // The virus pool respawns immediately.
    assert_eq!(game.world.viruses.len(), 1);
    assert!(game
        .events()
        .contains(&GameEvent::VirusPopped { fragments: 8 }));
}

#[test]
fn too_small_cells_do_not_pop_viruses() {
    let mut config = bare_config();
    config.arena.virus_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 75.0); // 75 < 70 * 1.1
    game.world.viruses[0].position = center;

    game.tick(&idle());

    assert_eq!(game.world.cells.len(), 1);
    assert!(game.events().is_empty());
}

#[test]
fn fragmentation_respects_the_cell_cap() {
    let mut config = bare_config();
    config.arena.virus_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 100.0);
    // Fill the roster to two below the cap; only two fragments fit.
    for i in 0..13 {
        let id = game.world.next_id();
        let position = Vec2::new(200.0 + 60.0 * i as f32, 200.0);
        game.world
            .cells
            .push(Cell::new(id, position, 20.0, Color::default(), 0));
    }
    game.world.viruses[0].position = center;

    game.tick(&idle());

    assert_eq!(game.world.cells.len(), 16);
    assert!(game
        .events()
        .contains(&GameEvent::VirusPopped { fragments: 2 }));
}

#[test]
fn losing_the_last_cell_emits_player_died_but_keeps_ticking() {
    let mut config = bare_config();
    config.arena.bot_count = 1;
    let mut game = game_with(config);

    let center = Vec2::splat(1500.0);
    place_player(&mut game, center, 30.0);
    game.world.bots[0].position = center;
    game.world.bots[0].radius = 200.0;

    game.tick(&idle());

    assert!(game.world.cells.is_empty());
    assert!(!game.player_alive());
    assert!(game.events().contains(&GameEvent::PlayerDied));

    // The world stays alive without a player.
    for _ in 0..10 {
        game.tick(&idle());
        assert_eq!(game.world.bots.len(), 1);
    }
    assert!(!game.events().contains(&GameEvent::PlayerDied));

    // A new round restores a controllable cell.
    game.respawn_player();
    assert!(game.player_alive());
    assert_eq!(game.world.cells.len(), 1);
}

#[test]
fn eject_moves_mass_into_a_pellet_without_loss() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 50.0);
    let before = growth::area(50.0);

    game.tick(&TickInput {
        intent: Vec2::new(1.0, 0.0),
        eject: true,
        ..Default::default()
    });

    assert_eq!(game.world.pellets.len(), 1);
    let total = game.world.total_player_mass() + growth::area(game.world.pellets[0].radius);
    assert!((total - before).abs() < before * 1e-3);
}

#[test]
fn eject_respects_the_cooldown() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 80.0);

    let input = TickInput {
        intent: Vec2::new(1.0, 0.0),
        eject: true,
        ..Default::default()
    };
    game.tick(&input);
    game.tick(&input); // one tick later: still cooling down
    assert_eq!(game.world.pellets.len(), 1);
    game.tick(&input);
    assert_eq!(game.world.pellets.len(), 2);
}

#[test]
fn small_cells_cannot_split_or_eject() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 20.0); // below both minimums

    game.tick(&TickInput {
        split: true,
        eject: true,
        ..Default::default()
    });

    assert_eq!(game.world.cells.len(), 1);
    assert_eq!(game.world.cells[0].radius, 20.0);
    assert!(game.world.pellets.is_empty());
}

#[test]
fn a_failed_eject_does_not_start_the_cooldown() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 20.0); // below the eject minimum

    let input = TickInput {
        intent: Vec2::new(1.0, 0.0),
        eject: true,
        ..Default::default()
    };
    game.tick(&input);
    assert!(game.world.pellets.is_empty());

    // Once the cell qualifies, the very next press ejects.
    game.world.cells[0].radius = 80.0;
    game.tick(&input);
    assert_eq!(game.world.pellets.len(), 1);
}

#[test]
fn degenerate_bot_radius_range_spawns_at_the_fixed_radius() {
    let mut config = bare_config();
    config.arena.bot_count = 3;
    config.bot.min_radius = 30.0;
    config.bot.max_radius = 30.0;
    let game = game_with(config);

    assert_eq!(game.world.bots.len(), 3);
    for bot in &game.world.bots {
        assert_eq!(bot.radius, 30.0);
    }
}

#[test]
fn pellets_expire_after_their_ttl() {
    let mut config = bare_config();
    config.eject.pellet_ttl_ticks = 5;
    let mut game = game_with(config);
    place_player(&mut game, Vec2::splat(1500.0), 80.0);

    game.tick(&TickInput {
        intent: Vec2::new(1.0, 0.0),
        eject: true,
        ..Default::default()
    });
    assert_eq!(game.world.pellets.len(), 1);
    // Move the player away so the pellet is not recaptured.
    game.world.cells[0].position = Vec2::splat(300.0);

    for _ in 0..6 {
        game.tick(&idle());
    }
    assert!(game.world.pellets.is_empty());
}

#[test]
fn every_entity_stays_inside_the_arena() {
    let mut config = Config::default();
    config.seed = Some(7);
    let mut game = game_with(config);

    // Drive hard into a corner for a while.
    let input = TickInput {
        intent: Vec2::new(-1.0, -1.0).normalize(),
        ..Default::default()
    };
    for _ in 0..120 {
        game.tick(&input);
    }

    let snapshot = game.snapshot();
    let arena = snapshot.arena;
    for cell in snapshot.cells {
        assert!(arena.contains(cell.position, cell.radius));
    }
    for bot in snapshot.bots {
        assert!(arena.contains(bot.position, bot.radius));
    }
    for food in snapshot.food {
        assert!(arena.contains(food.position, food.radius));
    }
    for virus in snapshot.viruses {
        assert!(arena.contains(virus.position, virus.radius));
    }
}

#[test]
fn pooled_populations_hold_constant() {
    let mut config = Config::default();
    config.seed = Some(11);
    let mut game = game_with(config.clone());
    place_player(&mut game, Vec2::splat(1500.0), 120.0);

    for _ in 0..200 {
        game.tick(&TickInput {
            intent: Vec2::new(0.7, 0.2),
            ..Default::default()
        });
        assert_eq!(game.world.food.len(), config.arena.food_count);
        assert_eq!(game.world.bots.len(), config.arena.bot_count);
        assert_eq!(game.world.viruses.len(), config.arena.virus_count);
    }
}

#[test]
fn non_finite_intent_is_ignored() {
    let mut game = game_with(bare_config());
    place_player(&mut game, Vec2::splat(1500.0), 30.0);
    let before = game.world.cells[0].position;

    game.tick(&TickInput {
        intent: Vec2::new(f32::NAN, f32::INFINITY),
        ..Default::default()
    });

    let cell = &game.world.cells[0];
    assert!(cell.position.is_finite());
    assert_eq!(cell.position, before);
}

#[test]
fn deterministic_given_a_seed() {
    let run = || {
        let mut config = Config::default();
        config.seed = Some(99);
        let mut game = game_with(config);
        place_player(&mut game, Vec2::splat(1500.0), 40.0);
        for i in 0..150 {
            game.tick(&TickInput {
                intent: Vec2::new((i as f32 * 0.1).sin(), 0.5),
                split: i == 40,
                eject: i == 80,
            });
        }
        (
            game.world.cells.len(),
            game.world.total_player_mass(),
            game.world.bots.iter().map(|b| b.position).collect::<Vec<_>>(),
        )
    };

    assert_eq!(run(), run());
}
