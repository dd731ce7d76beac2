//! The behavior state machine
//!
//! One call to [`BehaviorStateMachine::step`] is one tick: sample, classify,
//! command the motors (or run a timed maneuver), pick the next state.
//! Every frame is classified only within the tick that captured it.

use crate::error::BrainError;
use crate::state::{BehaviorState, RobotState};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use walle_cns::{
    normalized_offset, Maneuver, ManeuverExecutor, MotorActuator, MotorDevice, SteeringController,
};
use walle_core::thresholds::*;
use walle_core::{battery_percent, SignalBus, WalleConfig};
use walle_eye::{detect, detect_any, dominant, CameraDevice, FrameSampler, ObjectClass, Region};

/// Classes that count as something blocking the top camera while docking
const OBSTRUCTIONS: [ObjectClass; 3] = [
    ObjectClass::Trash,
    ObjectClass::Plant,
    ObjectClass::CompressedTrash,
];

/// Patrol compares these two classes; the order is the tie-break
const PATROL_CANDIDATES: [ObjectClass; 2] = [ObjectClass::Trash, ObjectClass::Plant];

/// Host devices injected into the machine
pub struct Devices {
    pub top_camera: Box<dyn CameraDevice>,
    pub small_camera: Box<dyn CameraDevice>,
    pub left_motor: Box<dyn MotorDevice>,
    pub right_motor: Box<dyn MotorDevice>,
    pub signals: Box<dyn SignalBus>,
}

pub struct BehaviorStateMachine {
    top: FrameSampler,
    small: FrameSampler,
    motors: MotorActuator,
    maneuvers: ManeuverExecutor,
    signals: Box<dyn SignalBus>,
    battery_signal: String,
    compress_signal: String,
    scan_after_compress_limit: Option<u32>,
    state: RobotState,
    /// Set when control comes back from the charging flow; the next patrol
    /// tick scans without re-reading the battery.
    resume_scan: bool,
}

impl BehaviorStateMachine {
    pub fn new(config: &WalleConfig, devices: Devices) -> Self {
        Self {
            top: FrameSampler::new(devices.top_camera),
            small: FrameSampler::new(devices.small_camera),
            motors: MotorActuator::new(devices.left_motor, devices.right_motor),
            maneuvers: ManeuverExecutor::new(),
            signals: devices.signals,
            battery_signal: config.battery_signal.clone(),
            compress_signal: config.compress_signal.clone(),
            scan_after_compress_limit: config.scan_after_compress_limit,
            state: RobotState::default(),
            resume_scan: false,
        }
    }

    pub fn current(&self) -> BehaviorState {
        self.state.current
    }

    pub fn robot_state(&self) -> &RobotState {
        &self.state
    }

    pub fn maneuvers_completed(&self) -> u64 {
        self.maneuvers.completed()
    }

    /// Run one tick and return the state for the next one.
    ///
    /// On error the state is left unchanged and the motors keep their last
    /// command (stopped if the compactor could not be switched on); the
    /// caller decides how to recover.
    pub async fn step(&mut self) -> Result<BehaviorState, BrainError> {
        let next = match self.state.current {
            BehaviorState::Patrol => self.patrol().await?,
            BehaviorState::SeekCharger => self.seek_charger().await?,
            BehaviorState::DockAlign => self.dock_align().await?,
            BehaviorState::Recover => self.recover().await,
            BehaviorState::ApproachTarget => self.approach_target().await?,
            BehaviorState::Compress => self.compress().await?,
            BehaviorState::ScanAfterCompress => self.scan_after_compress().await?,
            BehaviorState::ScanForBasket => self.scan_for_basket().await?,
            BehaviorState::ApproachBasket => self.approach_basket().await?,
        };

        self.transition(next);
        Ok(next)
    }

    /// Stop both motors
    pub fn halt(&mut self) {
        self.motors.stop();
        self.state.motor_command = self.motors.last_command();
    }

    /// Put the machine back into its initial state
    pub fn reset(&mut self) {
        if self.state.current != BehaviorState::Patrol {
            info!("Resetting {} -> {}", self.state.current, BehaviorState::Patrol);
        }
        self.state.current = BehaviorState::Patrol;
        self.state.ticks_in_state = 0;
        self.resume_scan = false;
    }

    fn transition(&mut self, next: BehaviorState) {
        let current = self.state.current;
        debug_assert!(
            current.can_transition_to(next),
            "illegal transition {} -> {}",
            current,
            next
        );

        if next == current {
            self.state.ticks_in_state += 1;
        } else {
            info!("{} -> {}", current, next);
            self.state.current = next;
            self.state.ticks_in_state = 0;
        }
        self.state.motor_command = self.motors.last_command();
    }

    async fn patrol(&mut self) -> Result<BehaviorState, BrainError> {
        if std::mem::take(&mut self.resume_scan) {
            debug!("Resuming patrol scan after charging flow");
        } else {
            let level = battery_percent(&*self.signals, &self.battery_signal)?;
            self.state.battery_percent = Some(level);
            if level < LOW_BATTERY_PERCENT {
                info!("Low battery ({:.1}%), searching for charging area", level);
                return Ok(BehaviorState::SeekCharger);
            }
        }

        let frame = self.top.capture().await?;
        let region = Region::middle_third_columns(&frame);

        if let Some((class, result)) = dominant(&frame, region, &PATROL_CANDIDATES) {
            debug!("Patrol: {} dominant with {} pixels", class, result.match_count);
            if result.match_count > PATROL_MIN_COUNT {
                match class {
                    ObjectClass::Trash => {
                        info!("Trash detected ({} pixels), starting pursuit", result.match_count);
                        self.motors.set_velocity(PURSUIT_ENTRY_SPEED, PURSUIT_ENTRY_SPEED);
                        return Ok(BehaviorState::ApproachTarget);
                    }
                    // Plant handling is not implemented; patrol carries on
                    ObjectClass::Plant => debug!("Plant in view, ignoring"),
                    _ => {}
                }
            }
        }

        self.motors.set_pair(SCAN_ROTATION);
        Ok(BehaviorState::Patrol)
    }

    async fn seek_charger(&mut self) -> Result<BehaviorState, BrainError> {
        let frame = self.top.capture().await?;
        let result = detect(&frame, Region::middle_third_columns(&frame), ObjectClass::ChargingArea);

        if result.match_count > CHARGER_MIN_COUNT {
            info!("Charging area in center ({} pixels), docking", result.match_count);
            return Ok(BehaviorState::DockAlign);
        }

        // A single rotation pulse, then control goes back to patrol
        self.maneuvers.execute(&mut self.motors, &Maneuver::scan_pulse()).await;
        self.resume_scan = true;
        Ok(BehaviorState::Patrol)
    }

    async fn dock_align(&mut self) -> Result<BehaviorState, BrainError> {
        let frame = self.top.capture().await?;
        let controller = SteeringController::docking();

        let strip = detect(&frame, Region::center_column_strip(&frame), ObjectClass::ChargingArea);
        match strip.centroid {
            Some((_, cy)) => {
                let error = normalized_offset(cy, frame.height() as f64);
                self.motors.set_pair(controller.command(error));
            }
            None => self.motors.set_pair(controller.straight()),
        }

        let bottom = detect(
            &frame,
            Region::bottom_rows(&frame, DOCK_BOTTOM_ROWS),
            ObjectClass::ChargingArea,
        );
        if bottom.coverage > DOCKED_COVERAGE {
            info!("Aligned with charging pad ({:.2}), stopping", bottom.coverage);
            self.maneuvers.execute(&mut self.motors, &Maneuver::dock_settle()).await;
            self.resume_scan = true;
            return Ok(BehaviorState::Patrol);
        }

        let blocked = detect_any(&frame, Region::full(&frame), &OBSTRUCTIONS);
        if blocked.coverage > OBSTRUCTION_COVERAGE {
            warn!("Camera likely blocked ({:.2}), reversing", blocked.coverage);
            return Ok(BehaviorState::Recover);
        }

        Ok(BehaviorState::DockAlign)
    }

    async fn recover(&mut self) -> BehaviorState {
        self.maneuvers.execute(&mut self.motors, &Maneuver::recover()).await;
        self.resume_scan = true;
        BehaviorState::Patrol
    }

    async fn approach_target(&mut self) -> Result<BehaviorState, BrainError> {
        let frame = self.small.capture().await?;
        let result = detect(&frame, Region::full(&frame), ObjectClass::Trash);
        debug!("Small camera target coverage: {:.2}", result.coverage);

        if result.coverage > COMPRESS_COVERAGE {
            info!("Target centered and close");
            return Ok(BehaviorState::Compress);
        }

        if result.coverage <= TARGET_LOST_COVERAGE {
            info!("Target lost, back to patrol");
            self.motors.stop();
            return Ok(BehaviorState::Patrol);
        }

        if let Some((cx, _)) = result.centroid {
            let error = normalized_offset(cx, frame.width() as f64);
            self.motors.set_pair(SteeringController::target_pursuit().command(error));
        }
        Ok(BehaviorState::ApproachTarget)
    }

    /// Once the compactor has been switched on the sequence always runs to
    /// the end; a retry would fire it a second time.
    async fn compress(&mut self) -> Result<BehaviorState, BrainError> {
        self.maneuvers.execute(&mut self.motors, &Maneuver::compress_nudge()).await;

        info!("Compressing");
        if let Err(e) = self.signals.set_integer_signal(&self.compress_signal, COMPRESS_ON) {
            self.motors.stop();
            return Err(e.into());
        }
        sleep(COMPRESS_DWELL).await;
        let released = self.signals.set_integer_signal(&self.compress_signal, COMPRESS_OFF);

        self.maneuvers.execute(&mut self.motors, &Maneuver::disengage()).await;

        if let Err(e) = released {
            warn!("Failed to release compactor ({}), retrying", e);
            if let Err(e) = self.signals.set_integer_signal(&self.compress_signal, COMPRESS_OFF) {
                error!("Compactor signal {} may be stuck on: {}", self.compress_signal, e);
            }
        }
        info!("Compression complete");
        Ok(BehaviorState::ScanAfterCompress)
    }

    async fn scan_after_compress(&mut self) -> Result<BehaviorState, BrainError> {
        let frame = self.small.capture().await?;
        let region = Region::lower_middle_third(&frame, COMPRESSED_CROP_FROM_ROW);
        let result = detect(&frame, region, ObjectClass::CompressedTrash);
        debug!("Compressed trash pixels below: {}", result.match_count);

        if result.match_count > COMPRESSED_MIN_COUNT {
            info!("Compressed cube in view, creeping forward");
            self.maneuvers.execute(&mut self.motors, &Maneuver::creep()).await;
            return Ok(BehaviorState::ScanForBasket);
        }

        if let Some(limit) = self.scan_after_compress_limit {
            if self.state.ticks_in_state + 1 >= limit as u64 {
                warn!("No compressed cube after {} ticks, giving up", limit);
                self.motors.stop();
                return Ok(BehaviorState::Patrol);
            }
        }

        Ok(BehaviorState::ScanAfterCompress)
    }

    async fn scan_for_basket(&mut self) -> Result<BehaviorState, BrainError> {
        let small = self.small.capture().await?;
        let cube = detect(&small, Region::full(&small), ObjectClass::CompressedTrash);
        if cube.is_empty() {
            info!("Compressed cube no longer in view");
            self.motors.stop();
            return Ok(BehaviorState::Patrol);
        }

        self.motors.set_pair(SCAN_ROTATION);

        let top = self.top.capture().await?;
        let basket = detect(&top, Region::full(&top), ObjectClass::Basket);
        if basket.match_count > BASKET_MIN_COUNT {
            info!("Basket spotted ({} pixels)", basket.match_count);
            self.motors.stop();
            return Ok(BehaviorState::ApproachBasket);
        }

        Ok(BehaviorState::ScanForBasket)
    }

    async fn approach_basket(&mut self) -> Result<BehaviorState, BrainError> {
        let frame = self.top.capture().await?;
        let result = detect(&frame, Region::full(&frame), ObjectClass::Basket);
        debug!("Basket coverage {:.2}", result.coverage);

        if result.coverage >= DELIVERED_COVERAGE {
            info!("Reached basket, delivery complete");
            self.motors.stop();
            return Ok(BehaviorState::Patrol);
        }

        let controller = SteeringController::basket_approach();
        match result.centroid {
            Some((cx, _)) => {
                let error = normalized_offset(cx, frame.width() as f64);
                self.motors.set_pair(controller.command(error));
            }
            None => self.motors.set_pair(controller.straight()),
        }
        Ok(BehaviorState::ApproachBasket)
    }
}
