//! Match metadata module
//!
//! Resolves a market's three selections onto the Home/Draw/Away outcome
//! roles and the effective kick-off instant used for triad search.

mod kickoff;
mod roles;

pub use kickoff::{resolve_kickoff, KickoffResolution};
pub use roles::{MarketError, OutcomeRole, RoleMapping, SelectionId, Teams};
