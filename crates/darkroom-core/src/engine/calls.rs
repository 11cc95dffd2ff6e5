//! Primitive transform calls the registry may queue against an engine.
//!
//! One variant per engine primitive. Several registry operations project onto
//! the same primitive (brightness/saturation/hue all queue `Modulate`), and
//! one operation may queue several calls (blur queues scale/blur/scale).

/// A single primitive call to the image engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// Resize to exact dimensions
    Scale { width: u32, height: u32 },

    /// Gaussian blur with the given kernel radius and sigma
    Blur { radius: f64, sigma: f64 },

    /// Surround the image with a colored frame
    Border {
        width: u32,
        height: u32,
        color: String,
    },

    /// Simulate a charcoal drawing
    Charcoal { factor: f64 },

    /// Blend each channel toward full intensity by a percentage
    Colorize { red: f64, green: f64, blue: f64 },

    /// Adjust contrast; positive increases, negative decreases
    Contrast { multiplier: f64 },

    /// Extract a region at (x, y)
    Crop {
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    },

    /// Reduce speckle noise
    Despeckle,

    /// Highlight edges; `radius` selects the detector size
    Edge { radius: Option<f64> },

    /// Emboss relief effect
    Emboss { radius: Option<f64> },

    /// Digital photo noise cleanup
    Enhance,

    /// Histogram equalization
    Equalize,

    /// Mirror vertically
    Flip,

    /// Mirror horizontally
    Flop,

    /// Per-channel gamma correction
    Gamma { red: f64, green: f64, blue: f64 },

    /// Pull pixels toward the center
    Implode { factor: Option<f64> },

    /// Three-channel brightness/saturation/hue adjustment, 100 = neutral
    Modulate {
        brightness: f64,
        saturation: f64,
        hue: f64,
    },

    /// Reduce to black and white
    Monochrome,

    /// Invert all channels
    Negative,

    /// Stretch channel ranges to span full intensity
    Normalize,

    /// Rotate by arbitrary degrees, filling exposed corners with `background`
    Rotate { background: String, degrees: f64 },

    /// Apply a sepia tone
    Sepia,

    /// Invert channels above a percentage threshold
    Solarize { threshold: f64 },

    /// Twist pixels around the center by up to `degrees`
    Swirl { degrees: f64 },

    /// Binarize on luminance at a percentage threshold
    Threshold { percent: f64 },

    /// Make pixels of the given color fully transparent
    Transparent { color: String },

    /// Remove uniform borders
    Trim,

    /// Displace rows along a sine wave
    Wave { amplitude: f64, wavelength: f64 },
}

impl EngineCall {
    /// Stable primitive name, used in engine error attribution and logs.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCall::Scale { .. } => "scale",
            EngineCall::Blur { .. } => "blur",
            EngineCall::Border { .. } => "border",
            EngineCall::Charcoal { .. } => "charcoal",
            EngineCall::Colorize { .. } => "colorize",
            EngineCall::Contrast { .. } => "contrast",
            EngineCall::Crop { .. } => "crop",
            EngineCall::Despeckle => "despeckle",
            EngineCall::Edge { .. } => "edge",
            EngineCall::Emboss { .. } => "emboss",
            EngineCall::Enhance => "enhance",
            EngineCall::Equalize => "equalize",
            EngineCall::Flip => "flip",
            EngineCall::Flop => "flop",
            EngineCall::Gamma { .. } => "gamma",
            EngineCall::Implode { .. } => "implode",
            EngineCall::Modulate { .. } => "modulate",
            EngineCall::Monochrome => "monochrome",
            EngineCall::Negative => "negative",
            EngineCall::Normalize => "normalize",
            EngineCall::Rotate { .. } => "rotate",
            EngineCall::Sepia => "sepia",
            EngineCall::Solarize { .. } => "solarize",
            EngineCall::Swirl { .. } => "swirl",
            EngineCall::Threshold { .. } => "threshold",
            EngineCall::Transparent { .. } => "transparent",
            EngineCall::Trim => "trim",
            EngineCall::Wave { .. } => "wave",
        }
    }
}
