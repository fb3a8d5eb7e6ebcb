/// Converts YUYV (YUV 4:2:2) pixel data to packed RGB.
///
/// YUYV packs as `[Y0, U, Y1, V, ...]`; each pair of pixels shares U and V.
/// BT.601 coefficients:
/// - R = Y + 1.402 * (V - 128)
/// - G = Y - 0.344 * (U - 128) - 0.714 * (V - 128)
/// - B = Y + 1.772 * (U - 128)
///
/// Writes into `rgb`, reusing its allocation. Returns `false` and leaves
/// `rgb` empty if `data` is shorter than `width * height * 2` bytes.
pub fn yuyv_to_rgb_into(data: &[u8], width: usize, height: usize, rgb: &mut Vec<u8>) -> bool {
    rgb.clear();
    let pixel_count = width * height;
    let expected_len = pixel_count * 2;
    if data.len() < expected_len {
        return false;
    }

    rgb.reserve(pixel_count * 3);
    for chunk in data[..expected_len].chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0] as f32, chunk[2] as f32] {
            rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
        }
    }
    true
}

/// Allocating variant of [`yuyv_to_rgb_into`].
pub fn yuyv_to_rgb(data: &[u8], width: usize, height: usize) -> Option<Vec<u8>> {
    let mut rgb = Vec::new();
    yuyv_to_rgb_into(data, width, height, &mut rgb).then_some(rgb)
}
