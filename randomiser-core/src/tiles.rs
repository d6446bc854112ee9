use std::path::Path;

use image::{imageops, ColorType, GenericImage, ImageBuffer, Pixel};
use rand::Rng;

use crate::materialize::Materializer;
use crate::permute::shuffle;
use crate::{RandomiserError, Result};

/// A fixed grid of equally sized tiles anchored at the image's top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl TileGrid {
    pub const fn new(tile_width: u32, tile_height: u32, columns: u32, rows: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            columns,
            rows,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    // Row-major.
    fn origin(&self, k: usize) -> (u32, u32) {
        let row = k as u32 / self.columns;
        let col = k as u32 % self.columns;
        (col * self.tile_width, row * self.tile_height)
    }

    fn check_bounds(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        let needed_width = u64::from(self.columns) * u64::from(self.tile_width);
        let needed_height = u64::from(self.rows) * u64::from(self.tile_height);
        if needed_width > u64::from(width) || needed_height > u64::from(height) {
            return Err(RandomiserError::TileOutOfBounds {
                path: path.to_path_buf(),
                grid: *self,
                width,
                height,
            });
        }
        Ok(())
    }
}

fn permute_tiles<P, R>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    grid: &TileGrid,
    rng: &mut R,
) -> image::ImageResult<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel + 'static,
    R: Rng + ?Sized,
{
    let tiles: Vec<ImageBuffer<P, Vec<P::Subpixel>>> = (0..grid.tile_count())
        .map(|k| {
            let (x, y) = grid.origin(k);
            imageops::crop_imm(src, x, y, grid.tile_width, grid.tile_height).to_image()
        })
        .collect();

    let (width, height) = src.dimensions();
    let mut out = ImageBuffer::<P, Vec<P::Subpixel>>::new(width, height);
    for (k, tile) in shuffle(&tiles, rng).iter().enumerate() {
        let (x, y) = grid.origin(k);
        out.copy_from(tile, x, y)?;
    }

    Ok(out)
}

/// Shuffles the tiles of the image at `rel` and writes the result to the
/// same relative path in the output tree.
///
/// Sixteen-bit sources are composited as RGBA16, everything else as RGBA8,
/// so the written image always carries an alpha channel.
pub fn try_shuffle_tiles<R: Rng + ?Sized>(
    io: &Materializer,
    rel: &Path,
    grid: &TileGrid,
    rng: &mut R,
) -> Result<()> {
    let image_err = |source: image::ImageError| RandomiserError::Image {
        path: rel.to_path_buf(),
        source,
    };

    let img = image::open(io.input_path(rel)).map_err(image_err)?;
    grid.check_bounds(rel, img.width(), img.height())?;

    let dest = io.prepare_output(rel)?;
    let wide = matches!(
        img.color(),
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16
    );
    if wide {
        permute_tiles(&img.to_rgba16(), grid, rng)
            .and_then(|out| out.save(&dest))
            .map_err(image_err)?;
    } else {
        permute_tiles(&img.to_rgba8(), grid, rng)
            .and_then(|out| out.save(&dest))
            .map_err(image_err)?;
    }

    tracing::debug!(image = %rel.display(), tiles = grid.tile_count(), "shuffled tiles");
    Ok(())
}

pub fn shuffle_tiles<R: Rng + ?Sized>(
    io: &Materializer,
    rel: &Path,
    grid: &TileGrid,
    rng: &mut R,
) -> usize {
    match try_shuffle_tiles(io, rel, grid, rng) {
        Ok(()) => 1,
        Err(err) => {
            tracing::warn!(image = %rel.display(), "tile shuffle skipped: {err}");
            0
        }
    }
}
