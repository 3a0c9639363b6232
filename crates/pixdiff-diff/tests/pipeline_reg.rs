//! Component-interplay tests: score, mask, and overlay chained by hand
//! on synthetic images, without the orchestrator.

use pixdiff_core::color::pack_rgb;
use pixdiff_core::{ChannelMode, Raster};
use pixdiff_diff::{
    ChangeDirection, DEFAULT_CHANGE_THRESHOLD, Highlight, build_change_mask, composite_overlay,
    rms_difference,
};

/// 8x8 gray field with a 3x2 colored patch at (2, 3).
fn patched(base: (u8, u8, u8), patch: (u8, u8, u8)) -> Raster {
    let raster =
        Raster::filled(8, 8, ChannelMode::Rgb, pack_rgb(base.0, base.1, base.2)).unwrap();
    let mut rm = raster.to_mut();
    for y in 3..5 {
        for x in 2..5 {
            rm.set_rgb(x, y, patch.0, patch.1, patch.2).unwrap();
        }
    }
    rm.into()
}

#[test]
fn test_recolored_patch_flags_both_directions() {
    // A patch flips from red to blue: red is brighter before, blue is
    // brighter after, so the patch shows up in both directions.
    let before = patched((128, 128, 128), (200, 0, 0));
    let after = patched((128, 128, 128), (0, 0, 200));

    assert!(rms_difference(&before, &after).unwrap() > 0.0);

    let added = build_change_mask(
        &before,
        &after,
        ChangeDirection::Added,
        DEFAULT_CHANGE_THRESHOLD,
    )
    .unwrap();
    let removed = build_change_mask(
        &before,
        &after,
        ChangeDirection::Removed,
        DEFAULT_CHANGE_THRESHOLD,
    )
    .unwrap();

    assert_eq!(added.count_changed(), 6);
    assert_eq!(removed.count_changed(), 6);
    for y in 3..5 {
        for x in 2..5 {
            assert_eq!(added.get(x, y), Some(true));
            assert_eq!(removed.get(x, y), Some(true));
        }
    }

    // Overlay each direction over its conventional background.
    let added_overlay =
        composite_overlay(&after, &added, Highlight::added(1.0).unwrap()).unwrap();
    let removed_overlay =
        composite_overlay(&before, &removed, Highlight::removed(1.0).unwrap()).unwrap();

    assert_eq!(added_overlay.get_rgba(3, 4), Some((0, 255, 0, 255)));
    assert_eq!(removed_overlay.get_rgba(3, 4), Some((255, 0, 0, 255)));
    // Background outside the patch is untouched in both.
    assert_eq!(added_overlay.get_rgba(0, 0), Some((128, 128, 128, 255)));
    assert_eq!(removed_overlay.get_rgba(0, 0), Some((128, 128, 128, 255)));
}

#[test]
fn test_darkening_only_shows_as_removed() {
    // The patch dims from bright to dark gray: nothing is brighter in
    // the after image, so only the removed direction fires.
    let before = patched((128, 128, 128), (220, 220, 220));
    let after = patched((128, 128, 128), (60, 60, 60));

    let added = build_change_mask(
        &before,
        &after,
        ChangeDirection::Added,
        DEFAULT_CHANGE_THRESHOLD,
    )
    .unwrap();
    let removed = build_change_mask(
        &before,
        &after,
        ChangeDirection::Removed,
        DEFAULT_CHANGE_THRESHOLD,
    )
    .unwrap();

    assert!(added.is_all_unchanged());
    assert_eq!(removed.count_changed(), 6);
}

#[test]
fn test_score_tracks_patch_size() {
    let before = patched((128, 128, 128), (128, 128, 128));
    let small = patched((128, 128, 128), (128, 228, 128));

    // 6 of 64 pixels differ by 100 in one channel.
    let expected = (6.0f64 * 100.0 * 100.0 / 64.0).sqrt();
    let score = rms_difference(&before, &small).unwrap();
    assert!((score - expected).abs() < 1e-9, "score = {score}");
}

#[test]
fn test_below_mask_threshold_changes_still_score() {
    // A 5-level shift is visible to the scorer but below the mask
    // cutoff of 10, so the score is nonzero while both masks are empty.
    let before = patched((128, 128, 128), (128, 128, 128));
    let after = patched((128, 128, 128), (133, 133, 133));

    assert!(rms_difference(&before, &after).unwrap() > 0.0);
    for direction in [ChangeDirection::Added, ChangeDirection::Removed] {
        let mask =
            build_change_mask(&before, &after, direction, DEFAULT_CHANGE_THRESHOLD).unwrap();
        assert!(mask.is_all_unchanged());
    }
}
