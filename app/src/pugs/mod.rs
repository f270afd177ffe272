//! The PUGs sign-up queue: roster state, expiry timers and the task that owns them.

pub mod queue;
pub mod render;
pub mod service;

pub use queue::{JoinOutcome, ListOutcome, Player, QuitOutcome};
pub use service::{ChannelAnnouncer, PugsHandle, PugsService};
