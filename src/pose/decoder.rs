use rosc::{OscMessage, OscType};

use crate::pose::{Keypoint, KeypointIndex, Pose};

/// 姿勢データのOSCアドレス
pub const POSE_DATA_ADDR: &str = "/pose/data";

/// OSC引数を f32 として解釈（送信側は Float だが Int/Double も許容）
fn arg_as_f32(arg: &OscType) -> Option<f32> {
    match arg {
        OscType::Float(v) => Some(*v),
        OscType::Double(v) => Some(*v as f32),
        OscType::Int(v) => Some(*v as f32),
        OscType::Long(v) => Some(*v as f32),
        _ => None,
    }
}

/// OSC引数を i32 として解釈。Python側の送信機は人物IDを
/// Float で送ってくるため、整数型以外も切り捨てて受け入れる
fn arg_as_i32(arg: &OscType) -> Option<i32> {
    match arg {
        OscType::Int(v) => Some(*v),
        OscType::Long(v) => Some(*v as i32),
        OscType::Float(v) => Some(*v as i32),
        OscType::Double(v) => Some(*v as i32),
        _ => None,
    }
}

/// `/pose/data` メッセージを1人分の姿勢にデコードする。
///
/// 引数は `[id, x0, y0, c0, x1, y1, c1, ...]`。x/y は正規化座標
/// (0.0〜1.0) で、ここでキャンバスサイズに合わせてピクセルへ変換する。
/// 信頼度は無加工で通す（検証は描画側の閾値判定に委ねる）。
///
/// アドレスが一致しないメッセージ、IDの無いメッセージは None。
/// 引数が途中で切れた場合は 17 未満のキーポイントになるだけで
/// エラーにはならない。
pub fn decode(msg: &OscMessage, canvas_width: u32, canvas_height: u32) -> Option<Pose> {
    if msg.addr != POSE_DATA_ADDR {
        return None;
    }

    let id = arg_as_i32(msg.args.first()?)?;

    let mut keypoints = Vec::with_capacity(KeypointIndex::COUNT);
    for triplet in msg.args[1..].chunks_exact(3).take(KeypointIndex::COUNT) {
        let (Some(x), Some(y), Some(c)) = (
            arg_as_f32(&triplet[0]),
            arg_as_f32(&triplet[1]),
            arg_as_f32(&triplet[2]),
        ) else {
            // 数値以外が混ざったらそこで打ち切り
            break;
        };

        keypoints.push(Keypoint::new(
            x * canvas_width as f32,
            y * canvas_height as f32,
            c,
        ));
    }

    Some(Pose::new(id, keypoints))
}
