// src/notice.rs
// Transient, dismissible user notices (toasts)

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedNotices = Arc<Mutex<NoticeBoard>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

pub type NoticeId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub level: NoticeLevel,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub dismissed: bool,
}

#[derive(Debug)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    ttl: Duration,
    next_id: NoticeId,
    /// Highest id already handed out by `drain_new`
    drained: NoticeId,
}

impl NoticeBoard {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            notices: Vec::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(5)),
            next_id: 1,
            drained: 0,
        }
    }

    pub fn shared(ttl: std::time::Duration) -> SharedNotices {
        Arc::new(Mutex::new(Self::new(ttl)))
    }

    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) -> NoticeId {
        self.push_at(level, text, Utc::now())
    }

    fn push_at(&mut self, level: NoticeLevel, text: impl Into<String>, now: DateTime<Utc>) -> NoticeId {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            text: text.into(),
            created_at: now,
            dismissed: false,
        });
        id
    }

    pub fn info(&mut self, text: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Info, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Error, text)
    }

    /// Returns false if the notice does not exist or was already dismissed
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        match self.notices.iter_mut().find(|n| n.id == id && !n.dismissed) {
            Some(notice) => {
                notice.dismissed = true;
                true
            }
            None => false,
        }
    }

    fn is_live(&self, notice: &Notice, now: DateTime<Utc>) -> bool {
        !notice.dismissed && now - notice.created_at < self.ttl
    }

    /// Notices still on screen at `now`
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notice> {
        self.notices
            .iter()
            .filter(|n| self.is_live(n, now))
            .cloned()
            .collect()
    }

    /// Notices pushed since the previous call
    pub fn drain_new(&mut self) -> Vec<Notice> {
        let fresh: Vec<Notice> = self
            .notices
            .iter()
            .filter(|n| n.id > self.drained)
            .cloned()
            .collect();
        self.drained = self.next_id - 1;
        fresh
    }

    /// Forget notices that are gone from screen and were already drained
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        let drained = self.drained;
        self.notices
            .retain(|n| n.id > drained || (!n.dismissed && now - n.created_at < ttl));
    }
}
