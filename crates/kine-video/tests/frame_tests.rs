use kine_base::Vec2;
use kine_video::{Frame, CHANNELS};

#[test]
fn test_frame_accessors() {
    let frame = Frame::new(vec![7u8; 4 * 2 * CHANNELS], 4, 2);
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.size(), Vec2::new(4, 2));
    assert_eq!(frame.pixels().len(), 24);
    assert!(frame.is_valid());
}

#[test]
fn test_empty_frame_is_invalid() {
    let frame = Frame::empty();
    assert!(!frame.is_valid());
    assert!(frame.pixels().is_empty());
}

#[test]
fn test_zero_dimension_is_invalid() {
    assert!(!Frame::new(Vec::new(), 0, 480).is_valid());
    assert!(!Frame::new(Vec::new(), 640, 0).is_valid());
}

#[test]
fn test_buffer_size_mismatch_is_invalid() {
    assert!(!Frame::new(vec![0u8; 10], 2, 2).is_valid());
    assert!(!Frame::new(vec![0u8; 13], 2, 2).is_valid());
}

#[test]
fn test_pixel_lookup() {
    // 2x1 frame: red then blue
    let frame = Frame::new(vec![255, 0, 0, 0, 0, 255], 2, 1);
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0]));
    assert_eq!(frame.pixel(1, 0), Some([0, 0, 255]));
    assert_eq!(frame.pixel(2, 0), None);
    assert_eq!(frame.pixel(0, 1), None);
}

#[test]
fn test_into_pixels_returns_same_allocation() {
    let pixels = vec![1u8; 12];
    let ptr = pixels.as_ptr();
    let frame = Frame::new(pixels, 2, 2);
    let back = frame.into_pixels();
    assert_eq!(back.as_ptr(), ptr);
}
