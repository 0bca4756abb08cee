//! Hand landmarks and the finger-extension gesture classifier.
//!
//! A detected hand is 21 keypoints in normalized image coordinates
//! (x right, y down). The classifier only looks at the planar (x, y)
//! components; z is carried for backends that supply it.

use crate::error::LandmarkError;
use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of keypoints in a hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

/// A fingertip must be this much farther from the wrist than its knuckle
/// to count as extended.
pub const EXTENSION_RATIO: f32 = 1.2;

/// Thumb tip to index base distance above which the thumb reads as open.
pub const THUMB_OPEN_DISTANCE: f32 = 0.05;

/// Keypoint indices within a hand landmark set.
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_TIP: usize = 20;
}

/// Discrete hand gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    /// No hand, or a hand that matches nothing.
    #[default]
    None,
    /// All four fingers curled.
    Fist,
    /// Four fingers extended.
    Palm,
    /// Only the index finger raised.
    Pointing,
}

impl Gesture {
    /// Whether this gesture asks for the exploded arrangement.
    #[inline]
    pub fn explodes(self) -> bool {
        self == Gesture::Palm
    }

    /// Label as shown in the status overlay.
    pub fn label(self) -> &'static str {
        match self {
            Gesture::None => "NONE",
            Gesture::Fist => "FIST",
            Gesture::Palm => "PALM",
            Gesture::Pointing => "POINTING",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four non-thumb fingers, in landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Index => landmark::INDEX_TIP,
            Finger::Middle => landmark::MIDDLE_TIP,
            Finger::Ring => landmark::RING_TIP,
            Finger::Pinky => landmark::PINKY_TIP,
        }
    }

    /// Landmark index of the base knuckle.
    pub fn knuckle(self) -> usize {
        match self {
            Finger::Index => landmark::INDEX_MCP,
            Finger::Middle => landmark::MIDDLE_MCP,
            Finger::Ring => landmark::RING_MCP,
            Finger::Pinky => landmark::PINKY_MCP,
        }
    }
}

/// One detected hand: exactly 21 finite keypoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f32; 3]>", into = "Vec<[f32; 3]>")]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build a landmark set from 21 points.
    pub fn new(points: &[Vec3]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }
        if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite(bad));
        }
        let mut out = [Vec3::ZERO; LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(Self { points: out })
    }

    /// Build from 2D normalized coordinates (z = 0).
    pub fn from_xy(points: &[[f32; 2]]) -> Result<Self, LandmarkError> {
        let lifted: Vec<Vec3> = points.iter().map(|[x, y]| Vec3::new(*x, *y, 0.0)).collect();
        Self::new(&lifted)
    }

    /// Keypoint at a landmark index.
    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    /// All keypoints.
    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    /// Planar (x, y) distance between two keypoints.
    #[inline]
    pub fn planar_distance(&self, a: usize, b: usize) -> f32 {
        let pa = self.points[a];
        let pb = self.points[b];
        (pa.x - pb.x).hypot(pa.y - pb.y)
    }
}

impl TryFrom<Vec<[f32; 3]>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(raw: Vec<[f32; 3]>) -> Result<Self, Self::Error> {
        let points: Vec<Vec3> = raw.into_iter().map(Vec3::from_array).collect();
        Self::new(&points)
    }
}

impl From<HandLandmarks> for Vec<[f32; 3]> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.iter().map(|p| p.to_array()).collect()
    }
}

/// Intermediate signals the classifier derives from a hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAnalysis {
    /// Extension flag per finger, in [`Finger::ALL`] order.
    pub extended: [bool; 4],
    /// Thumb tip is away from the index base. Not used by the classifier.
    pub thumb_open: bool,
    /// Index tip is above (smaller y than) the index middle joint.
    pub index_raised: bool,
}

impl HandAnalysis {
    /// Number of extended fingers (0-4).
    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|e| **e).count()
    }
}

/// Compute per-finger extension and the auxiliary signals for a hand.
pub fn analyze(hand: &HandLandmarks) -> HandAnalysis {
    let mut extended = [false; 4];
    for (slot, finger) in extended.iter_mut().zip(Finger::ALL) {
        let dist_tip = hand.planar_distance(landmark::WRIST, finger.tip());
        let dist_knuckle = hand.planar_distance(landmark::WRIST, finger.knuckle());
        *slot = dist_tip > dist_knuckle * EXTENSION_RATIO;
    }

    let thumb_open =
        hand.planar_distance(landmark::THUMB_TIP, landmark::INDEX_MCP) > THUMB_OPEN_DISTANCE;
    let index_raised = hand.point(landmark::INDEX_TIP).y < hand.point(landmark::INDEX_PIP).y;

    HandAnalysis {
        extended,
        thumb_open,
        index_raised,
    }
}

/// Classify a hand, or its absence, into a [`Gesture`].
///
/// Pure: the same input always yields the same label.
pub fn classify(hand: Option<&HandLandmarks>) -> Gesture {
    let Some(hand) = hand else {
        return Gesture::None;
    };

    let analysis = analyze(hand);
    match analysis.extended_count() {
        n if n >= 4 => Gesture::Palm,
        0 => Gesture::Fist,
        1 if analysis.index_raised => Gesture::Pointing,
        _ => Gesture::None,
    }
}

/// Synthetic hand poses for tests and demos.
///
/// Wrist at (0.5, 0.9), fingers pointing up the image. Knuckles sit 0.2
/// above the wrist; extended tips 0.45 above, curled tips 0.18 above.
pub mod poses {
    use super::*;

    const WRIST: [f32; 2] = [0.5, 0.9];
    const FINGER_X: [f32; 4] = [0.42, 0.48, 0.54, 0.60];

    /// Build a hand with the given fingers (index, middle, ring, pinky) extended.
    pub fn hand(extended: [bool; 4]) -> HandLandmarks {
        let mut pts = [[0.0f32; 2]; LANDMARK_COUNT];
        pts[landmark::WRIST] = WRIST;

        // Thumb off to the side
        pts[1] = [0.40, 0.85];
        pts[2] = [0.35, 0.80];
        pts[3] = [0.32, 0.76];
        pts[landmark::THUMB_TIP] = [0.30, 0.72];

        for (i, finger) in Finger::ALL.iter().enumerate() {
            let x = FINGER_X[i];
            let mcp = finger.knuckle();
            let (pip_dy, dip_dy, tip_dy) = if extended[i] {
                (0.30, 0.38, 0.45)
            } else {
                (0.24, 0.20, 0.18)
            };
            pts[mcp] = [x, WRIST[1] - 0.20];
            pts[mcp + 1] = [x, WRIST[1] - pip_dy];
            pts[mcp + 2] = [x, WRIST[1] - dip_dy];
            pts[mcp + 3] = [x, WRIST[1] - tip_dy];
        }

        HandLandmarks {
            points: pts.map(|[x, y]| Vec3::new(x, y, 0.0)),
        }
    }

    pub fn open_palm() -> HandLandmarks {
        hand([true; 4])
    }

    pub fn fist() -> HandLandmarks {
        hand([false; 4])
    }

    pub fn pointing() -> HandLandmarks {
        hand([true, false, false, false])
    }

    pub fn peace() -> HandLandmarks {
        hand([true, true, false, false])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hand_is_none() {
        assert_eq!(classify(None), Gesture::None);
    }

    #[test]
    fn test_open_palm() {
        assert_eq!(classify(Some(&poses::open_palm())), Gesture::Palm);
    }

    #[test]
    fn test_fist() {
        let hand = poses::fist();
        assert_eq!(analyze(&hand).extended_count(), 0);
        assert_eq!(classify(Some(&hand)), Gesture::Fist);
    }

    #[test]
    fn test_pointing() {
        assert_eq!(classify(Some(&poses::pointing())), Gesture::Pointing);
    }

    #[test]
    fn test_single_finger_pointing_down_is_none() {
        // Index extended but tip below its middle joint
        let mut pts: Vec<Vec3> = poses::pointing().points().to_vec();
        pts[landmark::WRIST] = Vec3::new(0.5, 0.1, 0.0);
        for p in pts.iter_mut().skip(1) {
            p.y = 1.0 - p.y;
        }
        let hand = HandLandmarks::new(&pts).unwrap();
        assert_eq!(analyze(&hand).extended_count(), 1);
        assert!(!analyze(&hand).index_raised);
        assert_eq!(classify(Some(&hand)), Gesture::None);
    }

    #[test]
    fn test_two_fingers_is_none() {
        assert_eq!(classify(Some(&poses::peace())), Gesture::None);
    }

    #[test]
    fn test_single_non_index_finger_is_none() {
        let hand = poses::hand([false, false, false, true]);
        assert_eq!(classify(Some(&hand)), Gesture::None);
    }

    #[test]
    fn test_three_fingers_is_none() {
        let hand = poses::hand([true, true, true, false]);
        assert_eq!(classify(Some(&hand)), Gesture::None);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for hand in [poses::open_palm(), poses::fist(), poses::pointing(), poses::peace()] {
            assert_eq!(classify(Some(&hand)), classify(Some(&hand)));
        }
    }

    #[test]
    fn test_extension_margin() {
        // Tip just inside the 1.2 margin is not extended
        let mut pts: Vec<Vec3> = poses::fist().points().to_vec();
        let wrist = pts[landmark::WRIST];
        let knuckle_dist = 0.2;
        pts[landmark::INDEX_TIP] = Vec3::new(0.42, wrist.y - knuckle_dist * 1.19, 0.0);
        let hand = HandLandmarks::new(&pts).unwrap();
        assert!(!analyze(&hand).extended[0]);

        pts[landmark::INDEX_TIP] = Vec3::new(0.42, wrist.y - knuckle_dist * 1.3, 0.0);
        let hand = HandLandmarks::new(&pts).unwrap();
        assert!(analyze(&hand).extended[0]);
    }

    #[test]
    fn test_thumb_open_does_not_change_label() {
        let mut pts: Vec<Vec3> = poses::fist().points().to_vec();
        pts[landmark::THUMB_TIP] = pts[landmark::INDEX_MCP];
        let closed_thumb = HandLandmarks::new(&pts).unwrap();

        assert!(!analyze(&closed_thumb).thumb_open);
        assert!(analyze(&poses::fist()).thumb_open);
        assert_eq!(classify(Some(&closed_thumb)), classify(Some(&poses::fist())));
    }

    #[test]
    fn test_landmark_validation() {
        assert_eq!(
            HandLandmarks::new(&[Vec3::ZERO; 5]),
            Err(LandmarkError::WrongCount(5))
        );

        let mut pts = [Vec3::ZERO; LANDMARK_COUNT];
        pts[7] = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(HandLandmarks::new(&pts), Err(LandmarkError::NonFinite(7)));
    }

    #[test]
    fn test_landmarks_json() {
        let hand = poses::pointing();
        let json = serde_json::to_string(&hand).unwrap();
        let back: HandLandmarks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hand);

        let short = "[[0.0, 0.0, 0.0]]";
        assert!(serde_json::from_str::<HandLandmarks>(short).is_err());
    }

    #[test]
    fn test_gesture_labels() {
        assert_eq!(Gesture::default(), Gesture::None);
        assert_eq!(Gesture::Pointing.to_string(), "POINTING");
        assert!(Gesture::Palm.explodes());
        assert!(!Gesture::Fist.explodes());
        assert_eq!(serde_json::to_string(&Gesture::Palm).unwrap(), "\"PALM\"");
    }
}
