//! Shared gesture state, manual overrides and the status line.
//!
//! The detection loop and the render loop both hold a [`GestureCell`].
//! Everything runs on the event-loop thread, so a plain `Rc<Cell<_>>` is
//! enough: last write wins.

use crate::gesture::Gesture;
use std::cell::Cell;
use std::rc::Rc;

/// The current gesture, shared between the detection and render loops.
#[derive(Clone, Debug, Default)]
pub struct GestureCell(Rc<Cell<Gesture>>);

impl GestureCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest gesture.
    #[inline]
    pub fn get(&self) -> Gesture {
        self.0.get()
    }

    /// Overwrite the gesture unconditionally.
    #[inline]
    pub fn set(&self, gesture: Gesture) {
        self.0.set(gesture);
    }

    /// Store `gesture` only if it differs from the current value.
    ///
    /// Returns `true` when the value changed.
    pub fn publish(&self, gesture: Gesture) -> bool {
        if self.0.get() == gesture {
            return false;
        }
        self.0.set(gesture);
        true
    }

    /// Force `gesture`, or clear back to `None` if it is already active.
    ///
    /// Returns the new value.
    pub fn toggle(&self, gesture: Gesture) -> Gesture {
        let next = if self.0.get() == gesture {
            Gesture::None
        } else {
            gesture
        };
        self.0.set(next);
        next
    }
}

/// Manual override buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualControl {
    /// "Force Tree": behaves like a fist.
    ForceTree,
    /// "Force Explode": behaves like an open palm.
    ForceExplode,
}

impl ManualControl {
    /// Gesture this control forces.
    pub fn gesture(self) -> Gesture {
        match self {
            ManualControl::ForceTree => Gesture::Fist,
            ManualControl::ForceExplode => Gesture::Palm,
        }
    }

    /// Whether the control shows as active for the current gesture.
    ///
    /// "Force Tree" also lights up with no gesture, since that shows the tree.
    pub fn is_active(self, current: Gesture) -> bool {
        match self {
            ManualControl::ForceTree => matches!(current, Gesture::Fist | Gesture::None),
            ManualControl::ForceExplode => current == Gesture::Palm,
        }
    }

    /// Apply the control to the shared gesture.
    pub fn apply(self, cell: &GestureCell) -> Gesture {
        let next = cell.toggle(self.gesture());
        log::info!("Manual override {:?}: gesture now {}", self, next);
        next
    }
}

/// Capture pipeline state as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Camera and model are still starting.
    Loading,
    /// Gestures are being detected.
    Active,
    /// Camera could not be opened; manual controls only.
    CameraUnavailable(String),
    /// Hand model failed to load; manual controls only.
    ModelFailed(String),
    /// Capture disabled by configuration.
    ManualOnly,
}

impl CaptureStatus {
    /// Whether automatic detection is off for good.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            CaptureStatus::CameraUnavailable(_) | CaptureStatus::ModelFailed(_) | CaptureStatus::ManualOnly
        )
    }

    /// Persistent notice for degraded modes.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            CaptureStatus::CameraUnavailable(_) => Some("Camera access needed for gestures."),
            CaptureStatus::ModelFailed(_) => Some("Gesture model unavailable. Use manual controls."),
            CaptureStatus::ManualOnly => Some("Manual controls only."),
            CaptureStatus::Loading | CaptureStatus::Active => None,
        }
    }

    /// One-line status for the window title.
    pub fn status_line(&self, gesture: Gesture) -> String {
        let controls = "[T] Force Tree  [E] Force Explode";
        match self {
            CaptureStatus::Loading => format!("Initializing AI Model...  {controls}"),
            CaptureStatus::Active => {
                let label = match gesture {
                    Gesture::None => "Scanning...",
                    other => other.label(),
                };
                format!("{label}  |  Fist / None: Build Tree  Open Palm: Explode  {controls}")
            }
            degraded => format!(
                "{}  {}  |  {controls}",
                degraded.notice().unwrap_or_default(),
                gesture
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_is_shared() {
        let detector_side = GestureCell::new();
        let render_side = detector_side.clone();

        assert_eq!(render_side.get(), Gesture::None);
        detector_side.set(Gesture::Palm);
        assert_eq!(render_side.get(), Gesture::Palm);
    }

    #[test]
    fn test_publish_only_on_change() {
        let cell = GestureCell::new();
        assert!(!cell.publish(Gesture::None));
        assert!(cell.publish(Gesture::Fist));
        assert!(!cell.publish(Gesture::Fist));
        assert!(cell.publish(Gesture::None));
    }

    #[test]
    fn test_toggle_twice_returns_to_none() {
        let cell = GestureCell::new();
        assert_eq!(ManualControl::ForceExplode.apply(&cell), Gesture::Palm);
        assert_eq!(ManualControl::ForceExplode.apply(&cell), Gesture::None);

        assert_eq!(ManualControl::ForceTree.apply(&cell), Gesture::Fist);
        assert_eq!(ManualControl::ForceExplode.apply(&cell), Gesture::Palm);
        assert_eq!(ManualControl::ForceTree.apply(&cell), Gesture::Fist);
        assert_eq!(ManualControl::ForceTree.apply(&cell), Gesture::None);
    }

    #[test]
    fn test_control_active_state() {
        assert!(ManualControl::ForceTree.is_active(Gesture::None));
        assert!(ManualControl::ForceTree.is_active(Gesture::Fist));
        assert!(!ManualControl::ForceTree.is_active(Gesture::Palm));
        assert!(ManualControl::ForceExplode.is_active(Gesture::Palm));
        assert!(!ManualControl::ForceExplode.is_active(Gesture::Pointing));
    }

    #[test]
    fn test_status_lines() {
        assert!(CaptureStatus::Loading.status_line(Gesture::None).starts_with("Initializing"));
        assert!(CaptureStatus::Active.status_line(Gesture::None).starts_with("Scanning..."));
        assert!(CaptureStatus::Active.status_line(Gesture::Palm).starts_with("PALM"));

        let denied = CaptureStatus::CameraUnavailable("denied".into());
        assert!(denied.is_degraded());
        assert!(denied
            .status_line(Gesture::None)
            .starts_with("Camera access needed for gestures."));
        assert!(!CaptureStatus::Active.is_degraded());
        assert_eq!(CaptureStatus::Loading.notice(), None);
    }
}
