//! Border-connected background matting
//!
//! The matte grows from the image border: the border ring votes on a
//! background color, then a flood fill claims every border-connected pixel
//! within a color-distance threshold of that estimate. Pixels the fill never
//! reaches, including background-colored holes enclosed by the subject, stay
//! opaque.

use image::{Rgba, RgbaImage};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MatteOptions {
    /// Squared RGB distance below which a pixel counts as background.
    pub color_threshold: u32,
    /// Width of the border ring sampled for the background estimate.
    pub border_width: u32,
}

impl Default for MatteOptions {
    fn default() -> Self {
        Self {
            color_threshold: 2700,
            border_width: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatteEngine {
    options: MatteOptions,
}

impl MatteEngine {
    pub fn new(options: MatteOptions) -> Self {
        Self { options }
    }

    /// Produces a cutout: background-connected pixels become fully
    /// transparent, the subject keeps its original alpha.
    pub fn remove_background(&self, image: &RgbaImage) -> RgbaImage {
        let (width, height) = image.dimensions();
        let mut cutout = image.clone();
        if width == 0 || height == 0 {
            return cutout;
        }

        let background = self.estimate_background(image);
        let mask = self.grow_background_mask(image, background);

        for (x, y, pixel) in cutout.enumerate_pixels_mut() {
            if mask[(y * width + x) as usize] {
                *pixel = Rgba([pixel[0], pixel[1], pixel[2], 0]);
            }
        }
        cutout
    }

    /// Mean color of the border ring.
    fn estimate_background(&self, image: &RgbaImage) -> [u8; 3] {
        let (width, height) = image.dimensions();
        let ring = self.options.border_width.max(1);

        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for (x, y, pixel) in image.enumerate_pixels() {
            let on_ring = x < ring
                || y < ring
                || x >= width.saturating_sub(ring)
                || y >= height.saturating_sub(ring);
            if on_ring {
                sum[0] += pixel[0] as u64;
                sum[1] += pixel[1] as u64;
                sum[2] += pixel[2] as u64;
                count += 1;
            }
        }

        if count == 0 {
            return [0, 0, 0];
        }
        [
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        ]
    }

    /// Flood fill from the border: every border pixel within the threshold
    /// seeds the fill, which then claims matching 4-connected neighbors.
    fn grow_background_mask(&self, image: &RgbaImage, background: [u8; 3]) -> Vec<bool> {
        let (width, height) = image.dimensions();
        let threshold = self.options.color_threshold;

        let mut mask = vec![false; (width * height) as usize];
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

        let mut seed = |x: u32, y: u32, mask: &mut Vec<bool>, queue: &mut VecDeque<(u32, u32)>| {
            let index = (y * width + x) as usize;
            if !mask[index] && color_distance_sq(image.get_pixel(x, y), background) <= threshold {
                mask[index] = true;
                queue.push_back((x, y));
            }
        };

        for x in 0..width {
            seed(x, 0, &mut mask, &mut queue);
            seed(x, height - 1, &mut mask, &mut queue);
        }
        for y in 0..height {
            seed(0, y, &mut mask, &mut queue);
            seed(width - 1, y, &mut mask, &mut queue);
        }

        while let Some((x, y)) = queue.pop_front() {
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx >= width || ny >= height {
                    continue;
                }
                let index = (ny * width + nx) as usize;
                if !mask[index]
                    && color_distance_sq(image.get_pixel(nx, ny), background) <= threshold
                {
                    mask[index] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        mask
    }
}

fn color_distance_sq(pixel: &Rgba<u8>, background: [u8; 3]) -> u32 {
    let dr = pixel[0] as i32 - background[0] as i32;
    let dg = pixel[1] as i32 - background[1] as i32;
    let db = pixel[2] as i32 - background[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
