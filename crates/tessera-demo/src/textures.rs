//! Procedural RGBA8 images for the textured quads.

/// Two-color checkerboard, `cell` pixels per square.
pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            pixels.extend_from_slice(if even { &a } else { &b });
        }
    }
    pixels
}

/// Opaque ring on a transparent background; exercises alpha blending.
pub fn ring(size: u32, color: [u8; 3]) -> Vec<u8> {
    let center = size as f32 / 2.0;
    let outer = center;
    let inner = center * 0.6;

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let d = (dx * dx + dy * dy).sqrt();
            let alpha = if (inner..outer).contains(&d) { 255 } else { 0 };
            pixels.extend_from_slice(&[color[0], color[1], color[2], alpha]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixels: &[u8], size: u32, x: u32, y: u32) -> &[u8] {
        let i = ((y * size + x) * 4) as usize;
        &pixels[i..i + 4]
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let (a, b) = ([255, 255, 255, 255], [0, 0, 0, 255]);
        let px = checkerboard(8, 2, a, b);
        assert_eq!(px.len(), 8 * 8 * 4);
        assert_eq!(pixel(&px, 8, 0, 0), a);
        assert_eq!(pixel(&px, 8, 1, 1), a);
        assert_eq!(pixel(&px, 8, 2, 0), b);
        assert_eq!(pixel(&px, 8, 2, 2), a);
    }

    #[test]
    fn ring_is_transparent_at_center_and_corners() {
        let px = ring(32, [200, 40, 40]);
        assert_eq!(px.len(), 32 * 32 * 4);
        assert_eq!(pixel(&px, 32, 16, 16)[3], 0);
        assert_eq!(pixel(&px, 32, 0, 0)[3], 0);
        assert_eq!(pixel(&px, 32, 16, 1)[3], 255);
    }
}
