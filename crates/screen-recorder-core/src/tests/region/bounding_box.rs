use crate::{BoundingBox, RegionError, ScreenPoint, select_full_screen, tests::fakes::FakeScreen};

/// WHAT: Corners given bottom-right first are normalized
/// WHY: The box must always have its minimum corner at (x1, y1)
#[test]
#[allow(clippy::unwrap_used)]
fn given_reversed_corners_when_building_box_then_min_corner_first() {
    // Given: Corners in reverse order
    let a = ScreenPoint::new(200, 300);
    let b = ScreenPoint::new(50, 50);

    // When: Building the box
    let region = BoundingBox::from_corners(a, b).unwrap();

    // Then: Corners are ordered and sizes positive
    assert_eq!(
        (region.x1(), region.y1(), region.x2(), region.y2()),
        (50, 50, 200, 300)
    );
    assert_eq!((region.width(), region.height()), (150, 250));
}

/// WHAT: A zero-height box is rejected
/// WHY: Degenerate boxes would produce zero-sized frames
#[test]
fn given_flat_rectangle_when_building_box_then_zero_area_error() {
    // Given: Two corners on the same row
    let a = ScreenPoint::new(10, 40);
    let b = ScreenPoint::new(90, 40);

    // When: Building the box
    let result = BoundingBox::from_corners(a, b);

    // Then: Zero area is reported with the attempted size
    assert_eq!(
        result,
        Err(RegionError::ZeroArea {
            width: 80,
            height: 0
        })
    );
}

/// WHAT: Full-screen selection matches the live display resolution
/// WHY: The recorded area must be exactly the display
#[test]
#[allow(clippy::unwrap_used)]
fn given_display_when_selecting_full_screen_then_box_spans_resolution() {
    // Given: A 2560x1440 display
    let screen = FakeScreen::new((2560, 1440));

    // When: Selecting the full screen
    let region = select_full_screen(&screen).unwrap();

    // Then: Box starts at the origin and ends at the resolution
    assert_eq!(
        (region.x1(), region.y1(), region.x2(), region.y2()),
        (0, 0, 2560, 1440)
    );
}

/// WHAT: A display reporting zero size cannot be selected
/// WHY: Prevents arming with a degenerate full-screen box
#[test]
fn given_zero_sized_display_when_selecting_full_screen_then_invalid_region() {
    // Given: A display reporting no pixels
    let screen = FakeScreen::new((0, 0));

    // When: Selecting the full screen
    let result = select_full_screen(&screen);

    // Then: The selection is rejected
    assert!(matches!(
        result,
        Err(crate::RecorderError::InvalidRegion { .. })
    ));
}
