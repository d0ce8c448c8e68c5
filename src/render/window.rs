use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use crate::pose::Pose;
use crate::render::skeleton::{
    visible_edges, visible_keypoints, SkeletonProfile, KEYPOINT_COLOR, SKELETON_COLOR,
};

/// キーポイントマーカーの半径（ピクセル）
const KEYPOINT_RADIUS: i32 = 4;

/// 線分をキャンバス矩形 [0, w-1] x [0, h-1] にクリップする
/// （Liang-Barsky法）。デコードは座標の範囲検証をしないため、
/// 送信側の異常値がここまで届く。クリップせずに Bresenham に渡すと
/// ステップ数が座標値に比例して膨れ上がり、tickループが止まる
fn clip_segment(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    height: f32,
) -> Option<(f32, f32, f32, f32)> {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
        return None;
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    let edges = [
        (-dx, x0),
        (dx, (width - 1.0) - x0),
        (-dy, y0),
        (dy, (height - 1.0) - y0),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // 境界と平行：矩形の外側なら不可視
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
}

/// minifbを使用したレンダラー。
///
/// 描画は保持キャンバスに対して行い、完成したものだけを present() で
/// ウィンドウに転送する。表示中のフレームが描きかけになることはない
pub struct MinifbRenderer {
    window: Window,
    canvas: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);

        let canvas = vec![0u32; width * height];

        Ok(Self {
            window,
            canvas,
            width,
            height,
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// キャンバスを黒でクリアして全姿勢を描き直す
    pub fn redraw<'a>(
        &mut self,
        poses: impl Iterator<Item = &'a Pose>,
        profile: SkeletonProfile,
        threshold: f32,
    ) {
        self.canvas.fill(0);

        let w = self.width as f32;
        let h = self.height as f32;

        for pose in poses {
            // 骨格線。キャンバス外の部分は切り落としてから描く
            for (start, end) in visible_edges(pose, profile, threshold) {
                if let Some((x0, y0, x1, y1)) =
                    clip_segment(start.x, start.y, end.x, end.y, w, h)
                {
                    self.draw_line(x0 as i32, y0 as i32, x1 as i32, y1 as i32, SKELETON_COLOR);
                }
            }

            // キーポイント。キャンバス外の点は描かない
            for kp in visible_keypoints(pose, threshold) {
                if kp.x >= 0.0 && kp.x < w && kp.y >= 0.0 && kp.y < h {
                    self.draw_circle(kp.x as i32, kp.y as i32, KEYPOINT_RADIUS, KEYPOINT_COLOR);
                }
            }
        }
    }

    /// キャンバスをウィンドウに表示
    pub fn present(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.canvas, self.width, self.height)?;
        Ok(())
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.canvas[y as usize * self.width + x as usize] = color;
        }
    }
}
