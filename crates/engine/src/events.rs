//! Discrete game events.
//!
//! Emitted by the tick as fire-and-forget notifications; progression
//! rewards, audio cues, and game-over UI all hang off these instead
//! of being interleaved with the simulation math.

/// What kind of entity was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimKind {
    /// One of the player's cells.
    Cell,
    /// A bot.
    Bot,
    /// An ejected mass pellet.
    Pellet,
}

/// One discrete event produced during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The player ate a food item.
    FoodEaten { mass_gained: f32 },
    /// A moving entity was consumed, in either direction: the player
    /// eating a bot or pellet, or a bot eating one of the player's
    /// cells. `victim` says which side was lost.
    EntityEaten {
        victim: VictimKind,
        mass_gained: f32,
    },
    /// The player popped a virus and fragmented.
    VirusPopped { fragments: usize },
    /// The player's last cell was consumed; the round is over but the
    /// simulation stays tickable.
    PlayerDied,
}
