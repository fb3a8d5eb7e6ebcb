use kine_base::Vec2;

#[test]
fn test_new_and_fields() {
    let v = Vec2::new(3.0_f32, 4.0);
    assert_eq!(v.x, 3.0);
    assert_eq!(v.y, 4.0);
}

#[test]
fn test_zero() {
    assert_eq!(Vec2::<f32>::zero(), Vec2::new(0.0, 0.0));
}

#[test]
fn test_arithmetic() {
    let a = Vec2::new(1.0_f32, 2.0);
    let b = Vec2::new(3.0, 4.0);
    assert_eq!(a + b, Vec2::new(4.0, 6.0));
    assert_eq!(b - a, Vec2::new(2.0, 2.0));
    assert_eq!(a * 4.0, Vec2::new(4.0, 8.0));
    assert_eq!(b / 2.0, Vec2::new(1.5, 2.0));
}

#[test]
fn test_length_and_distance() {
    assert_eq!(Vec2::new(3.0_f32, 4.0).length(), 5.0);
    assert_eq!(Vec2::new(1.0_f32, 1.0).distance_to(Vec2::new(4.0, 5.0)), 5.0);
}

#[test]
fn test_area() {
    assert_eq!(Vec2::new(640usize, 480).area(), 307200);
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", Vec2::new(1, 2)), "(1, 2)");
}
