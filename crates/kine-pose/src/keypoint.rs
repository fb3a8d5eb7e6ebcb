use kine_base::Vec2;

/// Number of keypoints in COCO pose format
pub const COCO_KEYPOINT_COUNT: usize = 17;

/// Coordinate pair sent downstream for a keypoint that was not detected.
pub const UNDETECTED: (f32, f32) = (-1.0, -1.0);

/// A keypoint in source-frame pixels, `None` when not confidently detected.
pub type Keypoint = Option<Vec2<f32>>;

/// COCO keypoint indices for human pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    /// All landmarks in tensor order.
    pub const ALL: [KeypointIndex; COCO_KEYPOINT_COUNT] = [
        KeypointIndex::Nose,
        KeypointIndex::LeftEye,
        KeypointIndex::RightEye,
        KeypointIndex::LeftEar,
        KeypointIndex::RightEar,
        KeypointIndex::LeftShoulder,
        KeypointIndex::RightShoulder,
        KeypointIndex::LeftElbow,
        KeypointIndex::RightElbow,
        KeypointIndex::LeftWrist,
        KeypointIndex::RightWrist,
        KeypointIndex::LeftHip,
        KeypointIndex::RightHip,
        KeypointIndex::LeftKnee,
        KeypointIndex::RightKnee,
        KeypointIndex::LeftAnkle,
        KeypointIndex::RightAnkle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeypointIndex::Nose => "nose",
            KeypointIndex::LeftEye => "left_eye",
            KeypointIndex::RightEye => "right_eye",
            KeypointIndex::LeftEar => "left_ear",
            KeypointIndex::RightEar => "right_ear",
            KeypointIndex::LeftShoulder => "left_shoulder",
            KeypointIndex::RightShoulder => "right_shoulder",
            KeypointIndex::LeftElbow => "left_elbow",
            KeypointIndex::RightElbow => "right_elbow",
            KeypointIndex::LeftWrist => "left_wrist",
            KeypointIndex::RightWrist => "right_wrist",
            KeypointIndex::LeftHip => "left_hip",
            KeypointIndex::RightHip => "right_hip",
            KeypointIndex::LeftKnee => "left_knee",
            KeypointIndex::RightKnee => "right_knee",
            KeypointIndex::LeftAnkle => "left_ankle",
            KeypointIndex::RightAnkle => "right_ankle",
        }
    }
}

impl From<KeypointIndex> for usize {
    fn from(index: KeypointIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for KeypointIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        KeypointIndex::ALL
            .get(value)
            .copied()
            .ok_or_else(|| format!("Invalid keypoint index: {value}. Must be in range 0-16."))
    }
}

/// Connected landmark pairs of the COCO skeleton: face, torso, arms, legs.
pub const SKELETON: [(KeypointIndex, KeypointIndex); 16] = {
    use KeypointIndex::*;
    [
        (Nose, LeftEye),
        (Nose, RightEye),
        (LeftEye, LeftEar),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
    ]
};

/// A skeleton segment whose two endpoints were both detected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub from: KeypointIndex,
    pub to: KeypointIndex,
    pub start: Vec2<f32>,
    pub end: Vec2<f32>,
}

impl Bone {
    pub fn length(&self) -> f32 {
        self.start.distance_to(self.end)
    }
}

/// The tracked subject of one inference cycle.
///
/// Either empty (no subject this cycle) or exactly 17 keypoints in COCO
/// order; anything in between cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseEstimate {
    keypoints: Option<[Keypoint; COCO_KEYPOINT_COUNT]>,
}

impl PoseEstimate {
    /// No subject detected.
    pub const fn empty() -> Self {
        Self { keypoints: None }
    }

    pub fn from_keypoints(keypoints: [Keypoint; COCO_KEYPOINT_COUNT]) -> Self {
        Self {
            keypoints: Some(keypoints),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_none()
    }

    /// 0 or 17.
    pub fn len(&self) -> usize {
        self.keypoints().len()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        match &self.keypoints {
            Some(keypoints) => keypoints,
            None => &[],
        }
    }

    pub fn get(&self, index: KeypointIndex) -> Keypoint {
        self.keypoints.and_then(|k| k[usize::from(index)])
    }

    /// Number of keypoints that were confidently detected.
    pub fn detected_count(&self) -> usize {
        self.keypoints().iter().filter(|k| k.is_some()).count()
    }

    /// `(x, y)` per keypoint with `(-1, -1)` standing in for undetected ones.
    pub fn to_pairs(&self) -> Vec<(f32, f32)> {
        self.keypoints()
            .iter()
            .map(|k| k.map_or(UNDETECTED, |p| (p.x, p.y)))
            .collect()
    }

    /// `x0, y0, x1, y1, ...`, as transmitted to downstream consumers.
    pub fn flatten(&self) -> Vec<f32> {
        self.to_pairs()
            .into_iter()
            .flat_map(|(x, y)| [x, y])
            .collect()
    }

    /// Drawable skeleton segments.
    pub fn bones(&self) -> impl Iterator<Item = Bone> + '_ {
        SKELETON.iter().filter_map(|&(from, to)| {
            Some(Bone {
                from,
                to,
                start: self.get(from)?,
                end: self.get(to)?,
            })
        })
    }
}
