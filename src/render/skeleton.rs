use serde::Deserialize;

use crate::pose::{Keypoint, KeypointIndex, Pose};

/// 骨格の接続定義 (開始キーポイント, 終了キーポイント)
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 16] = [
    // 顔
    (KeypointIndex::Nose, KeypointIndex::LeftEar),
    (KeypointIndex::Nose, KeypointIndex::RightEar),
    (KeypointIndex::LeftEye, KeypointIndex::LeftEar),
    (KeypointIndex::RightEye, KeypointIndex::RightEar),
    // 腕
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // 胴体
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // 脚
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

/// 旧バージョン互換の最小プロファイル：
/// 手首→肘→肩→肩→肘→手首の5本の腕チェーン
pub const ARM_CHAIN: [(KeypointIndex, KeypointIndex); 5] = [
    (KeypointIndex::LeftWrist, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
];

/// 最小プロファイルの目と目をつなぐ線
pub const EYE_EDGE: (KeypointIndex, KeypointIndex) =
    (KeypointIndex::LeftEye, KeypointIndex::RightEye);

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0x00FF00; // 緑

/// キーポイントの色 (RGB)
pub const KEYPOINT_COLOR: u32 = 0xFF0000; // 赤

/// 描画する骨格の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkeletonProfile {
    /// 16本の接続テーブル全体（推奨）
    Full,
    /// 腕チェーン＋目の線のみ（旧バージョン互換）
    Minimal,
}

/// 1本の線の両端を返す。どちらかのインデックスがこの姿勢の
/// キーポイント数を超える、または信頼度が閾値を超えない場合は None
pub fn edge_endpoints<'a>(
    pose: &'a Pose,
    a: KeypointIndex,
    b: KeypointIndex,
    threshold: f32,
) -> Option<(&'a Keypoint, &'a Keypoint)> {
    let start = pose.get(a)?;
    let end = pose.get(b)?;
    if start.is_confident(threshold) && end.is_confident(threshold) {
        Some((start, end))
    } else {
        None
    }
}

/// このtickで描画対象となる線の一覧
pub fn visible_edges(
    pose: &Pose,
    profile: SkeletonProfile,
    threshold: f32,
) -> Vec<(&Keypoint, &Keypoint)> {
    match profile {
        SkeletonProfile::Full => SKELETON_CONNECTIONS
            .iter()
            .filter_map(|&(a, b)| edge_endpoints(pose, a, b, threshold))
            .collect(),
        SkeletonProfile::Minimal => {
            let mut edges = Vec::new();

            // 右手首 (10) まで届かない短い姿勢は目の線も含めて一切
            // 描かない（旧実装の挙動に合わせる）
            if pose.keypoints.len() <= KeypointIndex::RightWrist as usize {
                return edges;
            }

            // 腕チェーンは全関節が閾値を超えたときだけ全体を描く
            if arm_chain_visible(pose, threshold) {
                for &(a, b) in ARM_CHAIN.iter() {
                    // arm_chain_visible が全点の存在と信頼度を確認済み
                    if let (Some(start), Some(end)) = (pose.get(a), pose.get(b)) {
                        edges.push((start, end));
                    }
                }
            }

            // 目の線はどちらか一方の目が閾値を超えていれば描く
            let (le, re) = EYE_EDGE;
            if let (Some(left), Some(right)) = (pose.get(le), pose.get(re)) {
                if left.is_confident(threshold) || right.is_confident(threshold) {
                    edges.push((left, right));
                }
            }

            edges
        }
    }
}

/// 腕チェーンの6関節すべてが存在し閾値を超えているか
pub fn arm_chain_visible(pose: &Pose, threshold: f32) -> bool {
    ARM_CHAIN.iter().all(|&(a, b)| {
        matches!(
            (pose.get(a), pose.get(b)),
            (Some(start), Some(end))
                if start.is_confident(threshold) && end.is_confident(threshold)
        )
    })
}

/// 描画対象となるキーポイント（マーカー）の一覧
pub fn visible_keypoints(pose: &Pose, threshold: f32) -> impl Iterator<Item = &Keypoint> {
    pose.keypoints
        .iter()
        .filter(move |kp| kp.is_confident(threshold))
}
