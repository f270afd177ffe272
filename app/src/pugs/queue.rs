use poise::serenity_prelude::UserId;
use std::collections::HashMap;
use std::time::Duration;

/// Number of sign-ups that starts a game and resets the roster.
pub const ROSTER_CAPACITY: usize = 10;
/// How long a sign-up stays on the roster before it is dropped.
pub const EXPIRY_DELAY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: UserId,
    pub name: String,
}

impl Player {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Falls back to the mention when no usable name was captured.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() || name == "undefined" {
            self.mention()
        } else {
            name.to_string()
        }
    }
}

/// Identifies one scheduled expiry. The ticket changes on every join so a
/// timer that was cancelled after it already fired can be told apart from
/// the one currently registered for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expiry {
    pub player: UserId,
    pub ticket: u64,
}

pub trait TimerService {
    type Handle;

    fn schedule_once(&mut self, expiry: Expiry, delay: Duration) -> Self::Handle;

    /// Cancelling a handle that already fired or was cancelled is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { position: usize },
    AlreadySignedUp,
    /// The join filled the roster. Holds the flushed roster in sign-up order.
    Full(Vec<Player>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum QuitOutcome {
    Removed,
    NotSignedUp,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListOutcome {
    Empty,
    Players(Vec<String>),
}

struct PendingExpiry<H> {
    ticket: u64,
    handle: H,
}

pub struct PugsQueue<T: TimerService> {
    roster: Vec<Player>,
    pending: HashMap<UserId, PendingExpiry<T::Handle>>,
    timers: T,
    next_ticket: u64,
}

impl<T: TimerService> PugsQueue<T> {
    pub fn new(timers: T) -> Self {
        Self {
            roster: Vec::with_capacity(ROSTER_CAPACITY),
            pending: HashMap::new(),
            timers,
            next_ticket: 0,
        }
    }

    pub fn contains(&self, player: UserId) -> bool {
        self.roster.iter().any(|p| p.id == player)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn pending_expiries(&self) -> usize {
        self.pending.len()
    }

    pub fn join(&mut self, player: Player) -> JoinOutcome {
        if self.contains(player.id) {
            return JoinOutcome::AlreadySignedUp;
        }

        let expiry = Expiry {
            player: player.id,
            ticket: self.next_ticket,
        };
        self.next_ticket += 1;

        let handle = self.timers.schedule_once(expiry, EXPIRY_DELAY);
        if let Some(stale) = self.pending.insert(
            player.id,
            PendingExpiry {
                ticket: expiry.ticket,
                handle,
            },
        ) {
            self.timers.cancel(stale.handle);
        }
        self.roster.push(player);

        if self.roster.len() == ROSTER_CAPACITY {
            return JoinOutcome::Full(self.flush());
        }

        JoinOutcome::Joined {
            position: self.roster.len(),
        }
    }

    pub fn quit(&mut self, player: UserId) -> QuitOutcome {
        let Some(index) = self.roster.iter().position(|p| p.id == player) else {
            return QuitOutcome::NotSignedUp;
        };

        self.roster.remove(index);
        if let Some(pending) = self.pending.remove(&player) {
            self.timers.cancel(pending.handle);
        }
        QuitOutcome::Removed
    }

    pub fn list(&self) -> ListOutcome {
        if self.roster.is_empty() {
            return ListOutcome::Empty;
        }
        ListOutcome::Players(self.roster.iter().map(Player::display_name).collect())
    }

    /// Applies a fired expiry. Returns the removed player, or `None` when the
    /// expiry is stale (player quit, roster flushed, or re-joined since).
    pub fn expire(&mut self, expiry: Expiry) -> Option<Player> {
        match self.pending.get(&expiry.player) {
            Some(pending) if pending.ticket == expiry.ticket => {}
            _ => return None,
        }
        self.pending.remove(&expiry.player);

        let index = self.roster.iter().position(|p| p.id == expiry.player)?;
        Some(self.roster.remove(index))
    }

    fn flush(&mut self) -> Vec<Player> {
        for (_, pending) in self.pending.drain() {
            self.timers.cancel(pending.handle);
        }
        std::mem::take(&mut self.roster)
    }
}
