//! In-memory RGBA surface and a texel-backed sprite
//!
//! Used by the headless driver and by tests; a windowed frontend supplies its
//! own `Surface`.

use std::io::{self, Write};
use std::path::Path;

use glam::Vec2;

use super::{Rect, Rgba, SpriteAsset, Surface, shade};

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Source-over blend of `src` onto an opaque destination pixel
#[inline]
fn blend(dst: &mut [u8; 4], src: Rgba) {
    let a = src[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let d = f32::from(dst[c]) / 255.0;
        dst[c] = to_byte(src[c] * a + d * (1.0 - a));
    }
    dst[3] = 255;
}

/// RGBA8 pixel buffer, row-major, origin top-left
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y), or `None` out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel span covered by `rect`, clipped to the buffer
    fn span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.round().max(0.0);
        let y0 = rect.y.round().max(0.0);
        let x1 = (rect.x + rect.w).round().min(self.width as f32);
        let y1 = (rect.y + rect.h).round().min(self.height as f32);
        // NaN compares false, so a NaN rect is dropped here too
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Binary PPM (P6) encoding, alpha dropped
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for p in &self.pixels {
            out.extend_from_slice(&p[..3]);
        }
        out
    }

    pub fn write_ppm(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(&self.to_ppm())?;
        file.flush()
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        let px = [to_byte(color[0]), to_byte(color[1]), to_byte(color[2]), 255];
        self.pixels.fill(px);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                blend(&mut self.pixels[row + x as usize], color);
            }
        }
    }

    fn fill_linear_gradient(&mut self, rect: Rect, top: Rgba, bottom: Rgba) {
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        for y in y0..y1 {
            let t = ((y as f32 + 0.5 - rect.y) / rect.h).clamp(0.0, 1.0);
            let color = lerp(top, bottom, t);
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                blend(&mut self.pixels[row + x as usize], color);
            }
        }
    }

    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Rgba,
        outer: Rgba,
    ) {
        let band = (outer_radius - inner_radius).max(f32::EPSILON);
        for y in 0..self.height {
            let row = (y * self.width) as usize;
            for x in 0..self.width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = ((p.distance(center) - inner_radius) / band).clamp(0.0, 1.0);
                blend(&mut self.pixels[row + x as usize], lerp(inner, outer, t));
            }
        }
    }
}

/// Sprite image held as RGBA8 texels
///
/// `pending` stands in for an image whose decode hasn't finished; the renderer
/// draws its placeholder figure until the sprite reports ready.
#[derive(Debug, Clone)]
pub struct PixelSprite {
    width: u32,
    height: u32,
    texels: Vec<[u8; 4]>,
    ready: bool,
}

impl PixelSprite {
    /// `None` when `texels` doesn't hold exactly `width * height` entries
    pub fn from_rgba(width: u32, height: u32, texels: Vec<[u8; 4]>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
            ready: true,
        })
    }

    pub fn pending(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: Vec::new(),
            ready: false,
        }
    }

    fn texel(&self, u: u32, v: u32) -> [u8; 4] {
        let u = u.min(self.width - 1);
        let v = v.min(self.height - 1);
        self.texels[(v * self.width + u) as usize]
    }
}

impl SpriteAsset for PixelSprite {
    fn ready(&self) -> bool {
        self.ready
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbor scale into `rect`; fully transparent texels are skipped
    fn draw(&self, surface: &mut dyn Surface, rect: Rect, brightness: f32) {
        if !self.ready || rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let (sw, sh) = surface.size();
        let x0 = rect.x.round().max(0.0) as u32;
        let y0 = rect.y.round().max(0.0) as u32;
        let x1 = (rect.x + rect.w).round().clamp(0.0, sw as f32) as u32;
        let y1 = (rect.y + rect.h).round().clamp(0.0, sh as f32) as u32;

        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - rect.y) / rect.h * self.height as f32) as u32;
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - rect.x) / rect.w * self.width as f32) as u32;
                let t = self.texel(u, v);
                if t[3] == 0 {
                    continue;
                }
                let color = [
                    f32::from(t[0]) / 255.0,
                    f32::from(t[1]) / 255.0,
                    f32::from(t[2]) / 255.0,
                    f32::from(t[3]) / 255.0,
                ];
                surface.fill_rect(
                    Rect::new(x as f32, y as f32, 1.0, 1.0),
                    shade(color, brightness),
                );
            }
        }
    }
}
