//! Transient, auto-dismissing notifications.
//!
//! Notifications are not queued: each one carries its own expiry and several can
//! be visible at once.

use std::time::{Duration, Instant};

use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self { items: Vec::new(), ttl }
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.push_at(NoticeKind::Success, message.into(), Instant::now())
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.push_at(NoticeKind::Error, message.into(), Instant::now())
    }

    pub fn push_at(&mut self, kind: NoticeKind, message: String, now: Instant) -> Uuid {
        match kind {
            NoticeKind::Success => info!(target: "retos_client", %message, "notification"),
            NoticeKind::Error => error!(target: "retos_client", %message, "notification"),
        }
        let n = Notification { id: Uuid::new_v4(), kind, message, shown_at: now, ttl: self.ttl };
        let id = n.id;
        self.items.push(n);
        id
    }

    /// Drop expired notifications and return the ones still on screen, oldest first.
    pub fn active(&mut self, now: Instant) -> &[Notification] {
        self.items.retain(|n| !n.is_expired(now));
        &self.items
    }

    /// Everything pushed and not yet pruned, expired or not.
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}
