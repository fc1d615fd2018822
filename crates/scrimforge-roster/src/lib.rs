//! Team rosters for Scrimforge.
//!
//! This crate answers "who is allowed to play, and on which side":
//!
//! 1. **Lookup**: turning typed names into player identities
//!    ([`PlayerDirectory`] trait, [`resolve_roster`])
//! 2. **Rosters**: two fixed, disjoint, equally sized teams ([`Roster`])
//! 3. **Enforcement**: reacting to room membership events so nobody sits
//!    on the wrong team or in a room they weren't invited to
//!    ([`TeamEnforcer`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Match layer (above)   ← asks the enforcer what to do on join/team change
//!     ↕
//! Roster layer (this crate)
//!     ↕
//! Protocol layer (below) ← provides PlayerId, Team
//! ```

mod directory;
mod enforcer;
mod error;
mod roster;

pub use directory::{PlayerDirectory, parse_names, resolve_roster};
pub use enforcer::{Enforcement, TeamEnforcer};
pub use error::RosterError;
pub use roster::{MAX_TEAM_SIZE, MIN_TEAM_SIZE, Roster};
