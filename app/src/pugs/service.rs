use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use super::queue::{Expiry, JoinOutcome, ListOutcome, Player, PugsQueue, QuitOutcome, TimerService};
use super::render;
use crate::error::{BotError, Result};
use crate::settings::Settings;

/// Everything that can change the roster, processed one at a time by the
/// queue task.
#[derive(Debug)]
pub enum PugsEvent {
    Join {
        player: Player,
        reply: oneshot::Sender<JoinOutcome>,
    },
    Quit {
        player: UserId,
        reply: oneshot::Sender<QuitOutcome>,
    },
    List {
        reply: oneshot::Sender<ListOutcome>,
    },
    Expire(Expiry),
}

/// Where flush and expiry notices go. Delivery is best-effort.
#[async_trait]
pub trait Announcer: Send + Sync + 'static {
    async fn announce(&self, content: String);
}

/// Posts announcements to the configured PUGs channel.
pub struct ChannelAnnouncer {
    http: Arc<serenity::Http>,
    settings: Arc<RwLock<Settings>>,
}

impl ChannelAnnouncer {
    pub fn new(http: Arc<serenity::Http>, settings: Arc<RwLock<Settings>>) -> Self {
        Self { http, settings }
    }
}

#[async_trait]
impl Announcer for ChannelAnnouncer {
    async fn announce(&self, content: String) {
        let channel = self.settings.read().await.pugs_channel;
        let Some(channel) = channel else {
            warn!("PUGs channel not set, dropping announcement");
            return;
        };
        if let Err(e) = channel.say(&*self.http, content).await {
            error!("Failed to send PUGs announcement to {}: {}", channel, e);
        }
    }
}

/// Expiry timers as tokio tasks that post back into the queue's own channel.
pub struct TokioTimers {
    events: mpsc::WeakUnboundedSender<PugsEvent>,
}

impl TimerService for TokioTimers {
    type Handle = AbortHandle;

    fn schedule_once(&mut self, expiry: Expiry, delay: Duration) -> AbortHandle {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(events) = events.upgrade() {
                let _ = events.send(PugsEvent::Expire(expiry));
            }
        })
        .abort_handle()
    }

    fn cancel(&mut self, handle: AbortHandle) {
        handle.abort();
    }
}

#[derive(Clone, Debug)]
pub struct PugsHandle {
    events: mpsc::UnboundedSender<PugsEvent>,
}

impl PugsHandle {
    pub async fn join(&self, player: Player) -> Result<JoinOutcome> {
        self.request(|reply| PugsEvent::Join { player, reply }).await
    }

    pub async fn quit(&self, player: UserId) -> Result<QuitOutcome> {
        self.request(|reply| PugsEvent::Quit { player, reply }).await
    }

    pub async fn list(&self) -> Result<ListOutcome> {
        self.request(|reply| PugsEvent::List { reply }).await
    }

    async fn request<T>(&self, event: impl FnOnce(oneshot::Sender<T>) -> PugsEvent) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(event(reply))
            .map_err(|_| BotError::QueueClosed)?;
        response.await.map_err(|_| BotError::QueueClosed)
    }
}

/// Owns the roster. Runs until every `PugsHandle` is dropped.
pub struct PugsService {
    events: mpsc::UnboundedReceiver<PugsEvent>,
    timers: TokioTimers,
}

impl PugsService {
    pub fn channel() -> (PugsHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = TokioTimers {
            events: tx.downgrade(),
        };
        (
            PugsHandle { events: tx },
            Self {
                events: rx,
                timers,
            },
        )
    }

    pub async fn run<A: Announcer>(self, announcer: A) {
        let PugsService { mut events, timers } = self;
        let mut queue = PugsQueue::new(timers);
        info!("PUGs queue started");

        while let Some(event) = events.recv().await {
            // Each arm finishes its roster mutation before awaiting the
            // announcer, so the next event always sees a settled roster.
            match event {
                PugsEvent::Join { player, reply } => {
                    let name = player.display_name();
                    let outcome = queue.join(player);
                    let announcement = match &outcome {
                        JoinOutcome::Joined { position } => {
                            debug!("{} joined PUGs at position {}", name, position);
                            None
                        }
                        JoinOutcome::AlreadySignedUp => None,
                        JoinOutcome::Full(roster) => {
                            info!("PUGs roster full, starting with {} players", roster.len());
                            Some(render::start_announcement(roster))
                        }
                    };
                    let _ = reply.send(outcome);
                    if let Some(content) = announcement {
                        announcer.announce(content).await;
                    }
                }
                PugsEvent::Quit { player, reply } => {
                    let outcome = queue.quit(player);
                    debug!(
                        "Quit from {}: {:?}, {} left on the roster",
                        player,
                        outcome,
                        queue.len()
                    );
                    let _ = reply.send(outcome);
                }
                PugsEvent::List { reply } => {
                    let _ = reply.send(queue.list());
                }
                PugsEvent::Expire(expiry) => {
                    if let Some(player) = queue.expire(expiry) {
                        info!(
                            "Sign-up for {} expired, {} pending expiries",
                            player.id,
                            queue.pending_expiries()
                        );
                        announcer.announce(render::expiry_announcement(&player)).await;
                    } else {
                        debug!("Ignoring stale expiry for {}", expiry.player);
                    }
                }
            }
        }

        info!("PUGs queue stopped");
    }
}
