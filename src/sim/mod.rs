//! Arena simulation module
//!
//! All gameplay rules live here. This module must stay pure:
//! - Fixed timestep only, time arrives through `TickInput`
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod kinematics;
pub mod progression;
pub mod state;
pub mod tick;

pub use collision::{DamageEvent, Rect, resolve};
pub use state::{
    Bank, BankProjectile, Direction, GameEvent, GameState, Mode, PendingRespawn, Player, Snapshot,
    Soundwave,
};
pub use tick::{TickInput, advance, tick};
