//! Order tracking simulation.
//!
//! Every placed order gets a five-milestone delivery timeline. The timeline
//! is a forward-only state machine: exactly one milestone is in progress at
//! a time, completed milestones never reopen, and there is no failure
//! branch. A cosmetic map marker rides along, stepping from the warehouse
//! toward the destination on each tick; it never influences the milestones.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use quickbasket_core::{OrderId, StepStatus};

use crate::storage::{Repository, RepositoryExt, StorageError};

/// Marker start (warehouse) on the simulated 100x100 map.
const MARKER_START: MarkerPosition = MarkerPosition { x: 25.0, y: 25.0 };
/// Marker destination (shipping address) on the simulated map.
const MARKER_DESTINATION: MarkerPosition = MarkerPosition { x: 75.0, y: 75.0 };
/// Distance the marker covers per tick.
const MARKER_STEP: f64 = 5.0;
/// Within this distance of the destination the marker snaps and stops.
const MARKER_EPSILON: f64 = 1.0;

// ============================================================================
// Milestones
// ============================================================================

/// The fixed delivery stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStage {
    OrderPlaced,
    OrderShipped,
    InTransit,
    OutForDelivery,
    Delivered,
}

impl DeliveryStage {
    pub const ALL: [Self; 5] = [
        Self::OrderPlaced,
        Self::OrderShipped,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::OrderPlaced => "Order Placed",
            Self::OrderShipped => "Order Shipped",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::OrderPlaced => "Your order has been confirmed and is being processed.",
            Self::OrderShipped => "Your order has been shipped and is on its way to you.",
            Self::InTransit => "Your package is in transit to the delivery address.",
            Self::OutForDelivery => "Your package is out for delivery and will arrive today.",
            Self::Delivered => "Your package has been delivered.",
        }
    }
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// One entry on the delivery timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub stage: DeliveryStage,
    /// Display label: a timestamp once reached, otherwise
    /// "Expected {estimated delivery}".
    pub date: String,
    pub status: StepStatus,
}

/// Timestamp label shown on reached milestones, e.g.
/// "April 15, 2025 • 09:30 AM".
fn timestamp_label(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y \u{2022} %I:%M %p").to_string()
}

// ============================================================================
// Map marker
// ============================================================================

/// Courier position on the simulated map, in percent coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
}

impl MarkerPosition {
    fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move a fixed-length step toward `dest`, snapping once within
    /// `epsilon`. Already-arrived positions stay put.
    #[must_use]
    fn step_toward(self, dest: Self, step: f64, epsilon: f64) -> Self {
        let distance = self.distance_to(dest);
        if distance <= epsilon || distance <= step {
            return dest;
        }
        let scale = step / distance;
        Self {
            x: self.x + (dest.x - self.x) * scale,
            y: self.y + (dest.y - self.y) * scale,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// The persisted tracking state for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    pub order_id: OrderId,
    /// Single-line shipping address for the map footer.
    pub shipping_address: String,
    pub estimated_delivery: String,
    pub milestones: Vec<Milestone>,
    pub marker: MarkerPosition,
    pub updated_at: DateTime<Utc>,
}

impl TrackingSnapshot {
    /// Initial timeline for a freshly placed order: placement and shipping
    /// already reached, transit in progress, the rest pending.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        shipping_address: String,
        estimated_delivery: String,
        placed_at: DateTime<Utc>,
    ) -> Self {
        let milestones = DeliveryStage::ALL
            .into_iter()
            .enumerate()
            .map(|(index, stage)| {
                let status = match index {
                    0 | 1 => StepStatus::Completed,
                    2 => StepStatus::InProgress,
                    _ => StepStatus::Pending,
                };
                let date = if status == StepStatus::Pending {
                    format!("Expected {estimated_delivery}")
                } else {
                    timestamp_label(placed_at)
                };
                Milestone { stage, date, status }
            })
            .collect();
        Self {
            order_id,
            shipping_address,
            estimated_delivery,
            milestones,
            marker: MARKER_START,
            updated_at: placed_at,
        }
    }

    /// The stage currently in progress, or `Delivered` once terminal.
    #[must_use]
    pub fn current_stage(&self) -> DeliveryStage {
        self.milestones
            .iter()
            .find(|m| m.status == StepStatus::InProgress)
            .map_or(DeliveryStage::Delivered, |m| m.stage)
    }

    /// Terminal once every milestone has completed.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.milestones.iter().all(|m| m.status.is_completed())
    }

    /// Advance the timeline by one transition: complete the in-progress
    /// milestone and, if one remains, promote its successor with a fresh
    /// timestamp label. Returns `false` once terminal.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        let Some(index) = self
            .milestones
            .iter()
            .position(|m| m.status == StepStatus::InProgress)
        else {
            return false;
        };
        self.milestones[index].status = StepStatus::Completed;
        self.milestones[index].date = timestamp_label(now);
        if let Some(next) = self.milestones.get_mut(index + 1) {
            next.status = StepStatus::InProgress;
            next.date = timestamp_label(now);
        }
        self.updated_at = now;
        true
    }

    /// One simulator tick: a single milestone transition plus a marker
    /// step. The marker keeps moving until it arrives even after the
    /// timeline is terminal; once both are done the tick is a fixed point.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.advance(now);
        self.marker = self
            .marker
            .step_toward(MARKER_DESTINATION, MARKER_STEP, MARKER_EPSILON);
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Drives a persisted tracking snapshot forward on a fixed interval until
/// the order is delivered.
pub struct TrackingSimulator {
    repo: Arc<dyn Repository>,
    order_id: OrderId,
    interval: Duration,
}

impl TrackingSimulator {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>, order_id: OrderId, interval: Duration) -> Self {
        Self {
            repo,
            order_id,
            interval,
        }
    }

    /// Tick the snapshot until delivery. Each pass reloads the persisted
    /// state, so concurrent writers see last-write-wins semantics rather
    /// than a stale in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or written.
    pub async fn run(self) -> Result<(), StorageError> {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // the first tick of a tokio interval fires immediately; skip it so
        // the order spends one full period in its initial state
        timer.tick().await;

        loop {
            timer.tick().await;
            let Some(mut snapshot) = self.repo.load_tracking(&self.order_id)? else {
                warn!(order_id = %self.order_id, "tracking snapshot missing, stopping simulator");
                return Ok(());
            };
            if snapshot.is_delivered() {
                info!(order_id = %self.order_id, "order delivered");
                return Ok(());
            }
            snapshot.tick(Utc::now());
            self.repo.save_tracking(&snapshot)?;
            debug!(
                order_id = %self.order_id,
                stage = %snapshot.current_stage(),
                marker_x = snapshot.marker.x,
                marker_y = snapshot.marker.y,
                "tracking advanced"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;

    fn snapshot() -> TrackingSnapshot {
        TrackingSnapshot::new(
            OrderId::new("ORD-123456"),
            "123 Main St, Anytown, State 12345".to_owned(),
            "Tomorrow".to_owned(),
            Utc::now(),
        )
    }

    fn statuses(s: &TrackingSnapshot) -> Vec<StepStatus> {
        s.milestones.iter().map(|m| m.status).collect()
    }

    #[test]
    fn test_initial_timeline() {
        let s = snapshot();
        assert_eq!(
            statuses(&s),
            vec![
                StepStatus::Completed,
                StepStatus::Completed,
                StepStatus::InProgress,
                StepStatus::Pending,
                StepStatus::Pending,
            ]
        );
        assert_eq!(s.current_stage(), DeliveryStage::InTransit);
        assert!(!s.is_delivered());
        assert_eq!(s.milestones[3].date, "Expected Tomorrow");
    }

    #[test]
    fn test_advance_moves_single_token() {
        let mut s = snapshot();
        assert!(s.advance(Utc::now()));
        assert_eq!(
            statuses(&s),
            vec![
                StepStatus::Completed,
                StepStatus::Completed,
                StepStatus::Completed,
                StepStatus::InProgress,
                StepStatus::Pending,
            ]
        );
        assert_eq!(s.current_stage(), DeliveryStage::OutForDelivery);
    }

    #[test]
    fn test_advance_is_monotonic_and_terminal() {
        let mut s = snapshot();
        // two transitions reach the last stage, a third completes it
        assert!(s.advance(Utc::now()));
        assert!(s.advance(Utc::now()));
        assert_eq!(s.current_stage(), DeliveryStage::Delivered);
        assert!(!s.is_delivered());
        assert!(s.advance(Utc::now()));
        assert!(s.is_delivered());

        // terminal: further calls change nothing
        let frozen = statuses(&s);
        assert!(!s.advance(Utc::now()));
        assert_eq!(statuses(&s), frozen);
    }

    #[test]
    fn test_at_most_one_in_progress() {
        let mut s = snapshot();
        for _ in 0..10 {
            let in_progress = s
                .milestones
                .iter()
                .filter(|m| m.status == StepStatus::InProgress)
                .count();
            assert!(in_progress <= 1);
            s.advance(Utc::now());
        }
    }

    #[test]
    fn test_promoted_milestone_gets_timestamp_label() {
        let mut s = snapshot();
        s.advance(Utc::now());
        assert!(!s.milestones[3].date.starts_with("Expected"));
        assert!(s.milestones[3].date.contains('\u{2022}'));
    }

    #[test]
    fn test_marker_reaches_destination_and_stops() {
        let mut s = snapshot();
        let start = s.marker;
        s.tick(Utc::now());
        assert!(s.marker.distance_to(MARKER_DESTINATION) < start.distance_to(MARKER_DESTINATION));

        // plenty of ticks to arrive; distance is ~70.7 at step 5
        for _ in 0..20 {
            s.tick(Utc::now());
        }
        // milestones are long delivered by now, but the marker also stops
        let arrived = s.marker;
        assert!(arrived.distance_to(MARKER_DESTINATION) <= MARKER_EPSILON);
        s.tick(Utc::now());
        assert_eq!(s.marker, arrived);
    }

    #[test]
    fn test_tick_is_fixed_point_once_done() {
        let mut s = snapshot();
        for _ in 0..30 {
            s.tick(Utc::now());
        }
        assert!(s.is_delivered());
        let marker = s.marker;
        let frozen = statuses(&s);
        s.tick(Utc::now());
        assert_eq!(s.marker, marker);
        assert_eq!(statuses(&s), frozen);
    }

    #[test]
    fn test_timestamp_label_format() {
        let at = DateTime::parse_from_rfc3339("2025-04-15T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp_label(at), "April 15, 2025 \u{2022} 09:30 AM");
    }

    #[tokio::test]
    async fn test_simulator_runs_to_delivery() {
        let repo: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
        let s = snapshot();
        let order_id = s.order_id.clone();
        repo.save_tracking(&s).unwrap();

        TrackingSimulator::new(Arc::clone(&repo), order_id.clone(), Duration::from_millis(1))
            .run()
            .await
            .unwrap();

        let done = repo.load_tracking(&order_id).unwrap().unwrap();
        assert!(done.is_delivered());
    }

    #[tokio::test]
    async fn test_simulator_stops_on_missing_snapshot() {
        let repo: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
        TrackingSimulator::new(repo, OrderId::new("ORD-000000"), Duration::from_millis(1))
            .run()
            .await
            .unwrap();
    }
}
