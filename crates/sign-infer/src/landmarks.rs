/// Number of keypoints in the handpose landmark format
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A single hand keypoint, normalized to the frame: both coordinates
/// are in [0, 1] when the point lies inside the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Handpose keypoint indices (wrist plus four joints per finger)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl From<LandmarkIndex> for usize {
    fn from(index: LandmarkIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for LandmarkIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        use LandmarkIndex::*;
        const ALL: [LandmarkIndex; HAND_LANDMARK_COUNT] = [
            Wrist, ThumbCmc, ThumbMcp, ThumbIp, ThumbTip, IndexMcp, IndexPip, IndexDip, IndexTip,
            MiddleMcp, MiddlePip, MiddleDip, MiddleTip, RingMcp, RingPip, RingDip, RingTip,
            PinkyMcp, PinkyPip, PinkyDip, PinkyTip,
        ];
        ALL.get(value)
            .copied()
            .ok_or_else(|| format!("Invalid landmark index: {value}. Must be in range 0-20."))
    }
}

/// The landmark set estimated for one frame.
///
/// Empty means no hand was detected this tick; a detected hand carries
/// all 21 points in `LandmarkIndex` order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    /// The "no hand" set.
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Get a point by its semantic index, if the set carries it.
    pub fn point(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.points.get(usize::from(index))
    }

    /// Quality gate: a hand counts as clearly visible only when the set
    /// is non-empty and every point lies inside the normalized frame
    /// bounds. Partially clipped hands fail this and are treated the
    /// same as no hand at all.
    pub fn is_clearly_visible(&self) -> bool {
        if self.points.is_empty() {
            return false;
        }
        self.points
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for i in 0..HAND_LANDMARK_COUNT {
            let index = LandmarkIndex::try_from(i).unwrap();
            assert_eq!(usize::from(index), i);
        }
        assert!(LandmarkIndex::try_from(HAND_LANDMARK_COUNT).is_err());
    }

    #[test]
    fn test_point_lookup() {
        let points: Vec<Landmark> = (0..HAND_LANDMARK_COUNT)
            .map(|i| Landmark {
                x: i as f32 / 21.0,
                y: 0.5,
            })
            .collect();
        let set = HandLandmarks::from_points(points);
        assert_eq!(set.point(LandmarkIndex::Wrist).unwrap().x, 0.0);
        assert_eq!(
            set.point(LandmarkIndex::PinkyTip).unwrap().x,
            20.0 / 21.0
        );
        assert!(HandLandmarks::empty().point(LandmarkIndex::Wrist).is_none());
    }
}
