use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::pose::Pose;

/// 姿勢の保持・破棄ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorePolicy {
    /// 毎tick全消去して受信分だけ積み直す。送信が途切れると即座に消える
    Volatile,
    /// IDをスロット番号として上書き。破棄なし。送信側がIDを
    /// 再利用・スキップするとゴースト化する既知の弱点あり
    IdIndexed,
    /// IDごとに最終更新時刻を持ち、タイムアウトで破棄（推奨）
    TimeBounded,
}

#[derive(Debug)]
struct Entry {
    pose: Pose,
    last_seen: Instant,
}

/// 現在追跡中の姿勢の集合
#[derive(Debug)]
pub struct PoseStore {
    policy: StorePolicy,
    max_poses: usize,
    timeout: Duration,
    entries: Vec<Entry>,
}

impl PoseStore {
    pub fn new(policy: StorePolicy, max_poses: usize, timeout: Duration) -> Self {
        Self {
            policy,
            max_poses,
            timeout,
            entries: Vec::new(),
        }
    }

    /// tick先頭で呼ぶ。Volatile のみ前フレームの姿勢を捨てる
    pub fn begin_tick(&mut self) {
        if self.policy == StorePolicy::Volatile {
            self.entries.clear();
        }
    }

    /// デコード済みの姿勢を投入する。受理したら true。
    /// 上限超過の新規IDは黙って捨てる（既存エントリは追い出さない）
    pub fn insert(&mut self, pose: Pose, now: Instant) -> bool {
        match self.policy {
            StorePolicy::Volatile => self.push_if_capacity(pose, now),
            StorePolicy::IdIndexed => {
                let slot = pose.id;
                if slot >= 0 && (slot as usize) < self.entries.len() {
                    self.entries[slot as usize] = Entry { pose, last_seen: now };
                    true
                } else {
                    self.push_if_capacity(pose, now)
                }
            }
            StorePolicy::TimeBounded => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.pose.id == pose.id) {
                    entry.pose = pose;
                    entry.last_seen = now;
                    true
                } else {
                    self.push_if_capacity(pose, now)
                }
            }
        }
    }

    fn push_if_capacity(&mut self, pose: Pose, now: Instant) -> bool {
        if self.entries.len() < self.max_poses {
            self.entries.push(Entry { pose, last_seen: now });
            true
        } else {
            false
        }
    }

    /// タイムアウトを超えて更新の無いエントリを破棄（TimeBounded のみ）。
    /// 破棄した件数を返す
    pub fn evict_stale(&mut self, now: Instant) -> usize {
        if self.policy != StorePolicy::TimeBounded {
            return 0;
        }
        let timeout = self.timeout;
        let before = self.entries.len();
        self.entries
            .retain(|e| now.duration_since(e.last_seen) <= timeout);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.entries.iter().map(|e| &e.pose)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
