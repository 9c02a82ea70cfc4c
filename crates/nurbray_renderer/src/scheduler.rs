//! Pixel scheduling across a per-render worker pool.
//!
//! Workers pull pixels one at a time from a shared [`TileCursor`] until it is
//! exhausted. Each pixel index is handed out exactly once, so every worker
//! writes its own slots of the output without further locking.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use nurbray_math::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{PixelBuffer, RenderError, RenderResult, ScreenGeometry};

/// Row-major pixel counter shared by all workers of one render.
#[derive(Debug)]
pub struct TileCursor {
    width: u32,
    height: u32,
    next: Mutex<u64>,
}

impl TileCursor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next: Mutex::new(0),
        }
    }

    /// Claim the next pixel, or `None` once every pixel was handed out.
    pub fn next(&self) -> Option<(u32, u32)> {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let total = self.width as u64 * self.height as u64;
        if *next >= total {
            return None;
        }
        let index = *next;
        *next += 1;
        Some(((index % self.width as u64) as u32, (index / self.width as u64) as u32))
    }
}

/// One pixel handed to a shading callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub x: u32,
    pub y: u32,
    /// Normalized ray through the pixel centre.
    pub ray: DVec3,
}

/// Seed of the generator for pixel `index`.
pub fn pixel_seed(seed: u64, index: u64) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ index
}

/// Render every pixel of `screen` with `shade` on `thread_count` workers.
///
/// The callback receives a generator seeded from `seed` and the pixel index,
/// so the output does not depend on the thread count.
pub fn render_with<F>(
    screen: &ScreenGeometry,
    thread_count: usize,
    seed: u64,
    shade: F,
) -> RenderResult<PixelBuffer>
where
    F: Fn(&PixelSample, &mut StdRng) -> [u8; 3] + Sync,
{
    if thread_count == 0 {
        return Err(RenderError::NoWorkers);
    }

    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()?;

    let cursor = TileCursor::new(screen.width, screen.height);
    let slots: Vec<AtomicU8> = (0..screen.pixel_count() * 3).map(|_| AtomicU8::new(0)).collect();

    let (cursor, slots, shade) = (&cursor, &slots, &shade);
    pool.scope(|scope| {
        for _ in 0..thread_count {
            scope.spawn(move |_| {
                while let Some((x, y)) = cursor.next() {
                    let index = y as u64 * screen.width as u64 + x as u64;
                    let sample = PixelSample {
                        x,
                        y,
                        ray: screen.ray_through(x as f64, y as f64).normalize(),
                    };
                    let mut rng = StdRng::seed_from_u64(pixel_seed(seed, index));
                    let rgb = shade(&sample, &mut rng);

                    let offset = index as usize * 3;
                    for (slot, value) in slots[offset..offset + 3].iter().zip(rgb) {
                        slot.store(value, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    log::info!(
        "Rendered {}x{} on {} threads in {:.2}s",
        screen.width,
        screen.height,
        thread_count,
        start.elapsed().as_secs_f64()
    );

    let data = slots.iter().map(|slot| slot.load(Ordering::Relaxed)).collect();
    Ok(PixelBuffer::new(screen.width, screen.height, data))
}
