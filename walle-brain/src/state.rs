//! Behavior states and the robot's mutable state record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior states of the patrol robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Rotate in place scanning for trash; hand over to charging on low battery
    Patrol,
    /// Look for the charging pad in the center of the top camera
    SeekCharger,
    /// Drive onto the pad, correcting on the pad's centroid
    DockAlign,
    /// Back away from something blocking the top camera
    Recover,
    /// Close in on trash with the small camera
    ApproachTarget,
    /// Nudge, pulse the compactor, and disengage
    Compress,
    /// Wait for the compressed cube to show up below the small camera
    ScanAfterCompress,
    /// Rotate with the cube until the basket is in view
    ScanForBasket,
    /// Drive to the basket until it fills the view
    ApproachBasket,
}

impl BehaviorState {
    pub fn name(self) -> &'static str {
        match self {
            BehaviorState::Patrol => "patrol",
            BehaviorState::SeekCharger => "seek_charger",
            BehaviorState::DockAlign => "dock_align",
            BehaviorState::Recover => "recover",
            BehaviorState::ApproachTarget => "approach_target",
            BehaviorState::Compress => "compress",
            BehaviorState::ScanAfterCompress => "scan_after_compress",
            BehaviorState::ScanForBasket => "scan_for_basket",
            BehaviorState::ApproachBasket => "approach_basket",
        }
    }

    /// Whether `self -> next` is an edge of the transition table
    pub fn can_transition_to(self, next: BehaviorState) -> bool {
        use BehaviorState::*;
        if self == next {
            return !matches!(self, SeekCharger | Recover | Compress);
        }
        matches!(
            (self, next),
            (Patrol, SeekCharger)
                | (Patrol, ApproachTarget)
                | (SeekCharger, DockAlign)
                | (SeekCharger, Patrol)
                | (DockAlign, Patrol)
                | (DockAlign, Recover)
                | (Recover, Patrol)
                | (ApproachTarget, Compress)
                | (ApproachTarget, Patrol)
                | (Compress, ScanAfterCompress)
                | (ScanAfterCompress, ScanForBasket)
                | (ScanAfterCompress, Patrol)
                | (ScanForBasket, Patrol)
                | (ScanForBasket, ApproachBasket)
                | (ApproachBasket, Patrol)
        )
    }
}

impl Default for BehaviorState {
    fn default() -> Self {
        BehaviorState::Patrol
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable state owned by the behavior state machine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RobotState {
    pub current: BehaviorState,
    /// Battery percentage from the most recent read, if any
    pub battery_percent: Option<f64>,
    /// Last `(left, right)` pair written to the motors
    pub motor_command: (f64, f64),
    /// Completed ticks spent in `current`
    pub ticks_in_state: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_patrol() {
        let state = RobotState::default();
        assert_eq!(state.current, BehaviorState::Patrol);
        assert_eq!(state.ticks_in_state, 0);
        assert!(state.battery_percent.is_none());
    }

    #[test]
    fn test_transition_table() {
        use BehaviorState::*;
        assert!(Patrol.can_transition_to(SeekCharger));
        assert!(Patrol.can_transition_to(Patrol));
        assert!(!Patrol.can_transition_to(Compress));
        assert!(!Recover.can_transition_to(Recover));
        assert!(!Compress.can_transition_to(Patrol));
        assert!(ScanForBasket.can_transition_to(ApproachBasket));
        assert!(!ApproachBasket.can_transition_to(ScanForBasket));
    }
}
