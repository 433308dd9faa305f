//! Fills the transparent rounded corners of card scans with the color of the adjacent border.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;

// share of the card width treated as corner, the corner radius of a card is about 5%
const CORNER_SHARE: f64 = 0.07;
const MASK_DILATION: u8 = 2;
const MASK_BLUR_SIGMA: f32 = 1.5;

/// `None` for images too small to have corners.
fn corner_size(image: &RgbaImage) -> Option<u32> {
    let (width, height) = image.dimensions();
    let max = width.min(height) / 2;
    if max == 0 {
        return None;
    }
    let size = (width.min(height) as f64 * CORNER_SHARE).round() as u32;
    Some(size.clamp(1, max))
}

/// The stripes next to a corner mirrored into it, horizontal and vertical mirror averaged.
fn mirrored(image: &RgbaImage, x: u32, y: u32, size: u32) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    let mirror = |v: u32, extent: u32| {
        if v < size {
            2 * size - 1 - v
        } else {
            // v is in the last `size` pixels
            let from_end = extent - 1 - v;
            extent - 2 * size + from_end
        }
    };
    let from_side = image.get_pixel(mirror(x, width), y);
    let from_top = image.get_pixel(x, mirror(y, height));
    let mut mixed = [0u8; 4];
    for (c, m) in mixed.iter_mut().enumerate() {
        *m = ((from_side[c] as u16 + from_top[c] as u16) / 2) as u8;
    }
    mixed[3] = from_side[3].max(from_top[3]);
    Rgba(mixed)
}

fn corners(width: u32, height: u32, size: u32) -> impl Iterator<Item = (u32, u32)> {
    [0, width - size]
        .into_iter()
        .flat_map(move |x0| [0, height - size].into_iter().map(move |y0| (x0, y0)))
        .flat_map(move |(x0, y0)| (x0..x0 + size).flat_map(move |x| (y0..y0 + size).map(move |y| (x, y))))
}

/// Best effort, the seam is softened by dilating and blurring the transparency mask.
pub fn fill_corners(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let Some(size) = corner_size(image) else {
        return image.clone();
    };
    if width < 4 * size || height < 4 * size {
        return image.clone();
    }

    let mut transparency = GrayImage::new(width, height);
    for (x, y) in corners(width, height, size) {
        transparency.put_pixel(x, y, Luma([255 - image.get_pixel(x, y)[3]]));
    }
    let mask = gaussian_blur_f32(&dilate(&transparency, Norm::LInf, MASK_DILATION), MASK_BLUR_SIGMA);

    let mut filled = image.clone();
    for (x, y) in corners(width, height, size) {
        let weight = mask.get_pixel(x, y)[0].max(transparency.get_pixel(x, y)[0]) as f32 / 255.0;
        if weight == 0.0 {
            continue;
        }
        let original = image.get_pixel(x, y);
        let fill = mirrored(image, x, y, size);
        let mut blended = [0u8; 4];
        for c in 0..3 {
            blended[c] = (original[c] as f32 * (1.0 - weight) + fill[c] as f32 * weight).round() as u8;
        }
        blended[3] = original[3].max(fill[3]);
        filled.put_pixel(x, y, Rgba(blended));
    }
    filled
}
