use std::time::Instant;

use rosc::OscMessage;

use crate::config::Config;
use crate::pose::{decode, Pose, PoseStore};

/// 1tick分のパイプライン：受信メッセージ → デコード → ストア更新。
/// ウィンドウシステムには依存しないので、そのまま単体テストできる
pub struct App {
    store: PoseStore,
    canvas_width: u32,
    canvas_height: u32,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            store: PoseStore::new(
                config.store.policy,
                config.store.max_poses,
                config.store.timeout(),
            ),
            canvas_width: config.canvas.width,
            canvas_height: config.canvas.height,
        }
    }

    /// このtickに届いたメッセージをすべて処理し、古いエントリを
    /// 破棄する。表示内容が変わったら true（再描画が必要）
    pub fn tick(&mut self, messages: &[OscMessage], now: Instant) -> bool {
        self.store.begin_tick();

        let mut has_new_data = false;
        for msg in messages {
            // 対象外のアドレスは decode が None を返すので素通し
            if let Some(pose) = decode(msg, self.canvas_width, self.canvas_height) {
                if self.store.insert(pose, now) {
                    has_new_data = true;
                }
            }
        }

        let evicted = self.store.evict_stale(now);
        has_new_data || evicted > 0
    }

    pub fn poses(&self) -> impl Iterator<Item = &Pose> {
        self.store.iter()
    }

    pub fn pose_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{PoseStore, StorePolicy, POSE_DATA_ADDR};
    use crate::render::{skeleton::visible_edges, SkeletonProfile};
    use rosc::OscType;
    use std::time::Duration;

    fn app_with_policy(policy: &str) -> App {
        let toml = format!(
            r#"
            [store]
            policy = "{}"
            "#,
            policy
        );
        let config: Config = toml::from_str(&toml).unwrap();
        App::new(&config)
    }

    fn pose_msg(id: f32, triplets: &[(f32, f32, f32)]) -> OscMessage {
        let mut args = vec![OscType::Float(id)];
        for (x, y, c) in triplets {
            args.push(OscType::Float(*x));
            args.push(OscType::Float(*y));
            args.push(OscType::Float(*c));
        }
        OscMessage {
            addr: POSE_DATA_ADDR.to_string(),
            args,
        }
    }

    #[test]
    fn test_unknown_address_does_not_touch_store() {
        let mut app = app_with_policy("time-bounded");
        let msg = OscMessage {
            addr: "/other/topic".to_string(),
            args: vec![OscType::Float(0.0)],
        };
        let dirty = app.tick(&[msg], Instant::now());
        assert!(!dirty);
        assert_eq!(app.pose_count(), 0);
    }

    #[test]
    fn test_volatile_empty_after_silent_tick() {
        let mut app = app_with_policy("volatile");
        let now = Instant::now();
        assert!(app.tick(&[pose_msg(0.0, &[(0.5, 0.5, 0.9)])], now));
        assert_eq!(app.pose_count(), 1);

        assert!(!app.tick(&[], now));
        assert_eq!(app.pose_count(), 0);
    }

    #[test]
    fn test_time_bounded_survives_silent_tick() {
        let mut app = app_with_policy("time-bounded");
        let t0 = Instant::now();
        app.tick(&[pose_msg(0.0, &[(0.5, 0.5, 0.9)])], t0);

        // タイムアウト内の無音tickでは残る
        app.tick(&[], t0 + Duration::from_millis(500));
        assert_eq!(app.pose_count(), 1);

        // タイムアウト超過で消える
        app.tick(&[], t0 + Duration::from_millis(1500));
        assert_eq!(app.pose_count(), 0);
    }

    #[test]
    fn test_store_never_exceeds_max() {
        let config: Config = toml::from_str(
            r#"
            [store]
            policy = "time-bounded"
            max_poses = 5
            "#,
        )
        .unwrap();
        let mut app = App::new(&config);

        let messages: Vec<_> = (0..20)
            .map(|id| pose_msg(id as f32, &[(0.5, 0.5, 0.9)]))
            .collect();
        app.tick(&messages, Instant::now());
        assert_eq!(app.pose_count(), 5);
    }

    // spec外の汎用チェック：PoseStore を直接使った場合も上限は守られる
    #[test]
    fn test_raw_store_capacity() {
        let mut store = PoseStore::new(StorePolicy::Volatile, 2, Duration::from_secs(1));
        let now = Instant::now();
        for id in 0..4 {
            store.insert(Pose::new(id, vec![]), now);
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_end_to_end_full_skeleton() {
        // 800x600、全17点 (x=0.5, y=0.5, c=0.9) の1人分メッセージ
        let mut app = app_with_policy("time-bounded");
        let mut triplets = vec![(0.5, 0.5, 0.9)];
        triplets.extend((1..17).map(|i| (0.5 + 0.01 * i as f32, 0.5, 0.9)));
        let dirty = app.tick(&[pose_msg(1.0, &triplets)], Instant::now());
        assert!(dirty);

        let pose = app.poses().next().unwrap();
        assert_eq!(pose.id, 1);
        assert_eq!(pose.keypoints.len(), 17);
        assert_eq!(pose.keypoints[0].x, 400.0);
        assert_eq!(pose.keypoints[0].y, 300.0);
        assert_eq!(pose.keypoints[0].confidence, 0.9);

        // 閾値0.5で16本すべて描画対象
        let edges = visible_edges(pose, SkeletonProfile::Full, 0.5);
        assert_eq!(edges.len(), 16);
    }
}
