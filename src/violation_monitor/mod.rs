//! ViolationMonitor - Challan Statistics and Prediction Handling
//!
//! ## Responsibilities
//!
//! - Classify model prediction text (pure, no presentation attached)
//! - Track issued challans and revenue
//! - Fan the outcome out to the activity feed and connected dashboards

use crate::activity_feed::{ActivityFeed, ActivityKind};
use crate::realtime_hub::{AlertMessage, HubMessage, RealtimeHub};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fine per challan (PKR)
pub const CHALLAN_AMOUNT_PKR: u64 = 2000;

/// Outcome of classifying one prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionDecision {
    pub violation: bool,
    /// User-facing notification text
    pub message: String,
}

/// Decide whether a prediction constitutes a violation
///
/// Pure over the prediction text: anything mentioning a violation, a
/// missing helmet or speeding (case-insensitive) raises a challan, with a
/// dedicated message for the over-speed case.
pub fn classify_prediction(prediction: &str) -> PredictionDecision {
    let lower = prediction.to_lowercase();
    let violation =
        lower.contains("violation") || lower.contains("helmet") || lower.contains("speed");

    if violation {
        let message = if lower.contains("speed") {
            "Over Speed Detected! Please Slow Speed. Challan Issued.".to_string()
        } else {
            format!(
                "Violation Detected: {}. Challan of PKR {} issued.",
                prediction, CHALLAN_AMOUNT_PKR
            )
        };
        PredictionDecision {
            violation: true,
            message,
        }
    } else {
        PredictionDecision {
            violation: false,
            message: format!("No violation detected: {}", prediction),
        }
    }
}

/// Running challan totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViolationStats {
    pub violations: u64,
    pub revenue_pkr: u64,
}

impl Default for ViolationStats {
    fn default() -> Self {
        // Demo baseline the dashboard starts from
        Self {
            violations: 124,
            revenue_pkr: 248_000,
        }
    }
}

/// ViolationMonitor instance
pub struct ViolationMonitor {
    stats: RwLock<ViolationStats>,
    feed: Arc<ActivityFeed>,
    realtime: Arc<RealtimeHub>,
}

impl ViolationMonitor {
    /// Create new ViolationMonitor
    pub fn new(feed: Arc<ActivityFeed>, realtime: Arc<RealtimeHub>) -> Self {
        Self {
            stats: RwLock::new(ViolationStats::default()),
            feed,
            realtime,
        }
    }

    /// Classify a prediction and apply its consequences
    ///
    /// A violation books one challan, appends the feed and notifies the
    /// dashboards (alert + stats). A clean prediction only echoes the
    /// no-violation notification.
    pub async fn process_prediction(&self, prediction: &str) -> PredictionDecision {
        let decision = classify_prediction(prediction);

        if decision.violation {
            let stats = {
                let mut stats = self.stats.write().await;
                stats.violations += 1;
                stats.revenue_pkr += CHALLAN_AMOUNT_PKR;
                *stats
            };

            tracing::warn!(
                prediction = %prediction,
                violations = stats.violations,
                "Violation detected, challan issued"
            );

            let item = self
                .feed
                .push(ActivityKind::Warning, "New Challan Issued", "Automated")
                .await;
            self.realtime.broadcast(HubMessage::Activity(item));
            self.realtime.broadcast(HubMessage::StatsUpdate(stats));
            self.realtime
                .broadcast(HubMessage::ViolationAlert(AlertMessage {
                    kind: ActivityKind::Warning,
                    message: decision.message.clone(),
                    speech: format!("Alert: {}", decision.message),
                }));
        } else {
            self.realtime
                .broadcast(HubMessage::ViolationAlert(AlertMessage {
                    kind: ActivityKind::Info,
                    message: decision.message.clone(),
                    speech: decision.message.clone(),
                }));
        }

        decision
    }

    /// Current totals
    pub async fn stats(&self) -> ViolationStats {
        *self.stats.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_flags_violation_keywords() {
        assert!(classify_prediction("Signal Violation").violation);
        assert!(classify_prediction("no helmet").violation);
        assert!(classify_prediction("OVER SPEED").violation);
        assert!(!classify_prediction("normal traffic").violation);
    }

    #[test]
    fn test_classify_speed_message() {
        let decision = classify_prediction("Speed limit exceeded");
        assert!(decision.violation);
        assert_eq!(
            decision.message,
            "Over Speed Detected! Please Slow Speed. Challan Issued."
        );
    }

    #[test]
    fn test_classify_clean_prediction_passes_through() {
        let decision = classify_prediction("Pedestrian crossing");
        assert!(!decision.violation);
        assert_eq!(decision.message, "No violation detected: Pedestrian crossing");
    }

    #[tokio::test]
    async fn test_violation_books_challan() {
        let feed = Arc::new(ActivityFeed::default());
        let monitor = ViolationMonitor::new(feed.clone(), Arc::new(RealtimeHub::new()));
        let before = monitor.stats().await;

        let decision = monitor.process_prediction("Helmet Violation").await;
        assert!(decision.violation);

        let after = monitor.stats().await;
        assert_eq!(after.violations, before.violations + 1);
        assert_eq!(after.revenue_pkr, before.revenue_pkr + CHALLAN_AMOUNT_PKR);
        assert_eq!(feed.count().await, 1);
    }

    #[tokio::test]
    async fn test_clean_prediction_leaves_stats_alone() {
        let feed = Arc::new(ActivityFeed::default());
        let monitor = ViolationMonitor::new(feed.clone(), Arc::new(RealtimeHub::new()));
        let before = monitor.stats().await;

        monitor.process_prediction("empty road").await;

        let after = monitor.stats().await;
        assert_eq!(after.violations, before.violations);
        assert_eq!(feed.count().await, 0);
    }
}
