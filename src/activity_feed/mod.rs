//! ActivityFeed - Dashboard Activity Items (Ring Buffer)
//!
//! ## Responsibilities
//!
//! - Keep the most recent dashboard activity items, newest first
//! - Evict the oldest entry when full (the dashboard shows the last 10)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Activity item severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Warning,
    Info,
}

/// One feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub text: String,
    /// Location tag shown in the item meta line
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Ring buffer for activity items
struct FeedBuffer {
    items: VecDeque<ActivityItem>,
    capacity: usize,
}

impl FeedBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, item: ActivityItem) {
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    fn latest(&self, count: usize) -> Vec<ActivityItem> {
        self.items.iter().rev().take(count).cloned().collect()
    }
}

/// ActivityFeed instance
pub struct ActivityFeed {
    buffer: RwLock<FeedBuffer>,
}

impl ActivityFeed {
    /// Create new ActivityFeed
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RwLock::new(FeedBuffer::new(capacity)),
        }
    }

    /// Append an item, returning it stamped
    pub async fn push(
        &self,
        kind: ActivityKind,
        text: impl Into<String>,
        location: impl Into<String>,
    ) -> ActivityItem {
        let item = ActivityItem {
            kind,
            text: text.into(),
            location: location.into(),
            timestamp: Utc::now(),
        };

        let mut buffer = self.buffer.write().await;
        buffer.push(item.clone());
        tracing::debug!(text = %item.text, "Activity recorded");
        item
    }

    /// Newest items first
    pub async fn latest(&self, count: usize) -> Vec<ActivityItem> {
        let buffer = self.buffer.read().await;
        buffer.latest(count)
    }

    /// Current item count
    pub async fn count(&self) -> usize {
        let buffer = self.buffer.read().await;
        buffer.items.len()
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(10) // The dashboard keeps the last 10 items
    }
}
