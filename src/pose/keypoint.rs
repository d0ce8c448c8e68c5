/// COCO / MoveNet の 17 キーポイントインデックス
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
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 単一キーポイント（デコード時にピクセル座標へ変換済み）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// X座標（ピクセル）
    pub x: f32,
    /// Y座標（ピクセル）
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0、範囲外もそのまま保持)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値を超えているか（閾値ちょうどは不可）
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            confidence: 0.0,
        }
    }
}

/// 1人分の姿勢。送信側メッセージが途中で切れた場合は
/// キーポイントが 17 個未満になる
#[derive(Debug, Clone)]
pub struct Pose {
    /// 送信側が割り当てる人物ID（フレームをまたいで安定）
    pub id: i32,
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(id: i32, keypoints: Vec<Keypoint>) -> Self {
        Self { id, keypoints }
    }

    /// インデックスでキーポイントを取得（範囲外は None）
    pub fn get(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.keypoints.get(index as usize)
    }

    /// 全キーポイントの平均信頼度
    pub fn average_confidence(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.keypoints.iter().map(|k| k.confidence).sum();
        sum / self.keypoints.len() as f32
    }
}
