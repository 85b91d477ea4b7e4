// src/ros_interface/subscriber.rs
// Latest-value pose snapshot written by subscription callbacks and read by
// the control loop.

use super::PoseSource;
use crate::core::Pose2D;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

#[derive(Debug, Default)]
struct Snapshot {
    pose: Option<Pose2D>,
    received_at: Option<Instant>,
    samples: u64,
}

/// Shared slot holding the most recent pose.
///
/// Clones refer to the same slot, so one clone can live in a subscription
/// callback while another is handed to the control loop. Only the newest
/// sample is kept.
#[derive(Debug, Clone, Default)]
pub struct LatestPose {
    inner: Arc<Mutex<Snapshot>>,
}

impl LatestPose {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored sample.
    pub fn update(&self, pose: Pose2D) {
        let mut snapshot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.pose = Some(pose);
        snapshot.received_at = Some(Instant::now());
        snapshot.samples += 1;
    }

    /// When the stored sample arrived.
    pub fn last_message_time(&self) -> Option<Instant> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .received_at
    }

    /// Number of samples received so far.
    pub fn sample_count(&self) -> u64 {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).samples
    }
}

impl PoseSource for LatestPose {
    fn latest_pose(&self) -> Option<Pose2D> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_sample() {
        let slot = LatestPose::new();
        assert!(slot.latest_pose().is_none());
        assert!(slot.last_message_time().is_none());

        let writer = slot.clone();
        writer.update(Pose2D::new(1.0, 1.0, 0.0));
        writer.update(Pose2D::new(2.0, 3.0, 0.5));

        assert_eq!(slot.latest_pose(), Some(Pose2D::new(2.0, 3.0, 0.5)));
        assert_eq!(slot.sample_count(), 2);
        assert!(slot.last_message_time().is_some());
    }

    #[test]
    fn updates_cross_threads() {
        let slot = LatestPose::new();
        let writer = slot.clone();
        std::thread::spawn(move || writer.update(Pose2D::new(4.0, 0.0, 0.0)))
            .join()
            .unwrap();
        assert_eq!(slot.latest_pose().map(|p| p.x), Some(4.0));
    }
}
