//! Python側パイプラインなしでビューアを動かすための合成データ送信機。
//! 1フレームにつき人物ごとに1メッセージを送る

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};

use pose_overlay::pose::{KeypointIndex, POSE_DATA_ADDR};

const TARGET_ADDR: &str = "127.0.0.1:12345";
const FPS: f64 = 30.0;
const PERSON_COUNT: usize = 2;

/// 直立した人型の正規化キーポイント（COCO順、キャンバス中央基準）
const BASE_FIGURE: [(f32, f32); KeypointIndex::COUNT] = [
    (0.50, 0.15), // nose
    (0.48, 0.13), // left eye
    (0.52, 0.13), // right eye
    (0.46, 0.14), // left ear
    (0.54, 0.14), // right ear
    (0.42, 0.28), // left shoulder
    (0.58, 0.28), // right shoulder
    (0.38, 0.42), // left elbow
    (0.62, 0.42), // right elbow
    (0.36, 0.55), // left wrist
    (0.64, 0.55), // right wrist
    (0.44, 0.55), // left hip
    (0.56, 0.55), // right hip
    (0.43, 0.72), // left knee
    (0.57, 0.72), // right knee
    (0.42, 0.90), // left ankle
    (0.58, 0.90), // right ankle
];

/// 1人分の `/pose/data` メッセージを組み立てる。
/// Python送信機と同じく id も Float で送る
fn build_pose_message(id: usize, t: f32) -> OscMessage {
    // 人物ごとに位相をずらして左右に揺らす
    let phase = id as f32 * 1.3;
    let sway = 0.08 * (t + phase).sin();
    let offset_x = -0.2 + 0.4 * id as f32;

    let mut args = vec![OscType::Float(id as f32)];
    for (i, (x, y)) in BASE_FIGURE.iter().enumerate() {
        // 腕は大きめに振る
        let wave = if i >= 7 && i <= 10 {
            0.05 * (2.0 * t + i as f32).sin()
        } else {
            0.0
        };
        args.push(OscType::Float((x + sway + offset_x + wave).clamp(0.0, 1.0)));
        args.push(OscType::Float((*y).clamp(0.0, 1.0)));
        args.push(OscType::Float(0.9));
    }

    OscMessage {
        addr: POSE_DATA_ADDR.to_string(),
        args,
    }
}

fn main() -> Result<()> {
    let target = std::env::args().nth(1).unwrap_or_else(|| TARGET_ADDR.to_string());

    println!("Pose Sender");
    println!("送信先: {}", target);
    println!("人数: {}, {}fps", PERSON_COUNT, FPS);
    println!("Ctrl+C で終了");

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    let frame_duration = Duration::from_secs_f64(1.0 / FPS);
    let start = Instant::now();

    loop {
        let loop_start = Instant::now();
        let t = start.elapsed().as_secs_f32();

        for id in 0..PERSON_COUNT {
            let msg = build_pose_message(id, t);
            let data = encoder::encode(&OscPacket::Message(msg))?;
            socket.send_to(&data, &target)?;
        }

        let elapsed = loop_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}
