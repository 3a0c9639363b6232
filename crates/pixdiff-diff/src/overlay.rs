//! Overlay compositing
//!
//! Renders a change mask over a background image as a colored
//! highlight. Three pixel-exact, order-independent stages:
//!
//! 1. **select** - keep the background content of changed pixels,
//!    transparent black everywhere else;
//! 2. **recolor** - rewrite the selected content to the highlight
//!    color, with one special case: pixels that are exactly opaque
//!    black become fully transparent. This artifact-removal rule means
//!    changed regions whose background content is pure black are
//!    indistinguishable from "unchanged" after selection and come out
//!    unhighlighted - a known limitation, kept as an exact-equality
//!    check on purpose;
//! 3. **composite** - standard "over" alpha compositing of the
//!    recolored layer onto the background.

use crate::mask::ChangeMask;
use pixdiff_core::error::Error;
use pixdiff_core::{ChannelMode, Raster, Result, color};

/// Highlight color and opacity used to render changed regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
    /// Alpha component, scaled by `opacity` during recoloring
    pub a: u8,
    /// Overlay opacity in [0, 1]
    pub opacity: f32,
}

impl Highlight {
    /// Create a highlight, validating the opacity range.
    ///
    /// # Errors
    ///
    /// Returns [`pixdiff_core::Error::InvalidParameter`] if `opacity`
    /// is not a finite value in [0, 1].
    pub fn new(r: u8, g: u8, b: u8, a: u8, opacity: f32) -> Result<Self> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(Error::InvalidParameter(format!(
                "opacity must be in [0, 1], got {opacity}"
            )));
        }
        Ok(Highlight { r, g, b, a, opacity })
    }

    /// Opaque green, the default highlight for added content.
    pub fn added(opacity: f32) -> Result<Self> {
        Self::new(0, 255, 0, 255, opacity)
    }

    /// Opaque red, the default highlight for removed content.
    pub fn removed(opacity: f32) -> Result<Self> {
        Self::new(255, 0, 0, 255, opacity)
    }

    /// The highlight as a packed pixel with alpha scaled by opacity.
    fn to_pixel(self) -> u32 {
        let scaled = (self.a as f32 * self.opacity + 0.5) as u8;
        color::pack_rgba(self.r, self.g, self.b, scaled)
    }
}

/// Render `mask` over `background` as a highlight overlay.
///
/// The background is normalized to RGBA; where the mask is unchanged
/// the output pixel equals the normalized background bit-exactly, and
/// where it is changed the highlight shows at the configured opacity
/// (opacity 1.0 leaves no background bleed-through). Returns a new
/// image; the inputs are never modified and share no buffers with the
/// output.
///
/// # Errors
///
/// Returns [`pixdiff_core::Error::DimensionMismatch`] if the mask shape
/// differs from the background shape.
pub fn composite_overlay(
    background: &Raster,
    mask: &ChangeMask,
    highlight: Highlight,
) -> Result<Raster> {
    if background.width() != mask.width() || background.height() != mask.height() {
        return Err(Error::DimensionMismatch {
            expected: (background.width(), background.height()),
            actual: (mask.width(), mask.height()),
        });
    }

    let background = background.to_rgba();
    let selected = select_changed(&background, mask)?;
    let layer = recolor(&selected, highlight)?;
    composite_over(&background, &layer)
}

/// Stage 1: keep the background content of changed pixels at full
/// opacity, transparent black elsewhere.
fn select_changed(background: &Raster, mask: &ChangeMask) -> Result<Raster> {
    let out = Raster::new(background.width(), background.height(), ChannelMode::Rgba)?;
    let mut out = out.try_into_mut().unwrap();

    for y in 0..background.height() {
        for x in 0..background.width() {
            if mask.get_unchecked(x, y) {
                let (r, g, b) = color::unpack_rgb(background.get_pixel_unchecked(x, y));
                out.set_pixel_unchecked(x, y, color::pack_rgba(r, g, b, 255));
            }
        }
    }

    Ok(out.into())
}

/// Stage 2: rewrite selected content to the highlight color. Fully
/// transparent pixels stay untouched; exactly-opaque-black pixels are
/// demoted to fully transparent (the black-content artifact rule).
fn recolor(selected: &Raster, highlight: Highlight) -> Result<Raster> {
    let highlight_pixel = highlight.to_pixel();
    let out = Raster::new(selected.width(), selected.height(), ChannelMode::Rgba)?;
    let mut out = out.try_into_mut().unwrap();

    for y in 0..selected.height() {
        for x in 0..selected.width() {
            let pixel = selected.get_pixel_unchecked(x, y);
            let rewritten = if color::alpha(pixel) == 0 {
                color::TRANSPARENT
            } else if pixel == color::OPAQUE_BLACK {
                color::TRANSPARENT
            } else {
                highlight_pixel
            };
            out.set_pixel_unchecked(x, y, rewritten);
        }
    }

    Ok(out.into())
}

/// Stage 3: "over" alpha compositing of `layer` onto `base`.
fn composite_over(base: &Raster, layer: &Raster) -> Result<Raster> {
    base.require_same_size(layer)?;

    let out = Raster::new(base.width(), base.height(), ChannelMode::Rgba)?;
    let mut out = out.try_into_mut().unwrap();

    for y in 0..base.height() {
        for x in 0..base.width() {
            let fg = color::unpack_rgba(layer.get_pixel_unchecked(x, y));
            let bg = color::unpack_rgba(base.get_pixel_unchecked(x, y));
            out.set_pixel_unchecked(x, y, blend_over(fg, bg));
        }
    }

    Ok(out.into())
}

/// Blend a foreground pixel over a background pixel.
fn blend_over(fg: (u8, u8, u8, u8), bg: (u8, u8, u8, u8)) -> u32 {
    // Fast paths keep untouched background pixels bit-exact.
    if fg.3 == 0 {
        return color::pack_rgba(bg.0, bg.1, bg.2, bg.3);
    }
    if fg.3 == 255 {
        return color::pack_rgba(fg.0, fg.1, fg.2, 255);
    }

    let fa = fg.3 as f32 / 255.0;
    let ba = bg.3 as f32 / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= 0.0 {
        return color::TRANSPARENT;
    }

    let channel = |f: u8, b: u8| -> u8 {
        let value = (f as f32 * fa + b as f32 * ba * (1.0 - fa)) / out_a;
        (value + 0.5) as u8
    };

    color::pack_rgba(
        channel(fg.0, bg.0),
        channel(fg.1, bg.1),
        channel(fg.2, bg.2),
        (out_a * 255.0 + 0.5) as u8,
    )
}
