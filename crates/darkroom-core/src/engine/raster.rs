//! In-process engine built on the `image` crate.
//!
//! The raster engine materializes an [`ImageState`] by decoding its source,
//! folding the queued calls over the decoded buffer, and inspecting or
//! re-encoding the result. Decode and pixel work run under `spawn_blocking`
//! so probe/extract stay the only suspension points of a pipeline run.

use std::io::Cursor;

use async_trait::async_trait;
use image::{imageops, ImageFormat, Rgba, RgbaImage};

use crate::config::{LimitsConfig, OutputConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ImageInfo, ImageSource, ImageState};

use super::calls::EngineCall;
use super::filters;
use super::Engine;

/// Engine adapter over the `image` crate.
pub struct RasterEngine {
    output: OutputConfig,
    limits: LimitsConfig,
}

impl RasterEngine {
    /// Create an engine with the given output encoding settings and limits.
    pub fn new(output: OutputConfig, limits: LimitsConfig) -> Self {
        Self { output, limits }
    }

    /// Read the source bytes, from disk or the in-memory buffer.
    async fn source_bytes(&self, state: &ImageState) -> PipelineResult<Vec<u8>> {
        match state.source() {
            ImageSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|e| PipelineError::Engine {
                        call: "decode".to_string(),
                        message: format!("cannot read {}: {e}", path.display()),
                    })
            }
            ImageSource::Buffer(bytes) => Ok(bytes.clone()),
        }
    }

    /// Decode, fold the call queue, and return the result plus the detected
    /// source format. Runs on the blocking pool.
    async fn materialize(
        &self,
        state: &ImageState,
    ) -> PipelineResult<(RgbaImage, ImageFormat)> {
        let bytes = self.source_bytes(state).await?;
        let calls = state.calls().to_vec();
        let max_dimension = self.limits.max_image_dimension;
        tokio::task::spawn_blocking(move || -> PipelineResult<(RgbaImage, ImageFormat)> {
            let (img, format) = decode(bytes, max_dimension)?;
            let img = calls
                .iter()
                .try_fold(img, |img, call| apply_call(img, call))?;
            Ok((img, format))
        })
        .await
        .map_err(|e| PipelineError::Engine {
            call: "materialize".to_string(),
            message: format!("task join error: {e}"),
        })?
    }
}

#[async_trait]
impl Engine for RasterEngine {
    fn name(&self) -> &str {
        "raster"
    }

    async fn probe(&self, state: &ImageState) -> PipelineResult<ImageInfo> {
        // The encoded size of an untouched state is just the source length;
        // anything queued has to be materialized and re-encoded to measure.
        if state.is_untouched() {
            let bytes = self.source_bytes(state).await?;
            let encoded_size = bytes.len() as u64;
            let max_dimension = self.limits.max_image_dimension;
            return tokio::task::spawn_blocking(move || -> PipelineResult<ImageInfo> {
                let (img, format) = decode(bytes, max_dimension)?;
                Ok(ImageInfo {
                    width: img.width(),
                    height: img.height(),
                    format: format_to_string(format),
                    encoded_size,
                })
            })
            .await
            .map_err(|e| PipelineError::Engine {
                call: "probe".to_string(),
                message: format!("task join error: {e}"),
            })?;
        }

        let (img, format) = self.materialize(state).await?;
        let quality = self.output.jpeg_quality;
        tokio::task::spawn_blocking(move || -> PipelineResult<ImageInfo> {
            let encoded = encode(&img, format, quality).map_err(|e| PipelineError::Engine {
                call: "probe".to_string(),
                message: e,
            })?;
            Ok(ImageInfo {
                width: img.width(),
                height: img.height(),
                format: format_to_string(format),
                encoded_size: encoded.len() as u64,
            })
        })
        .await
        .map_err(|e| PipelineError::Engine {
            call: "probe".to_string(),
            message: format!("task join error: {e}"),
        })?
    }

    async fn extract(&self, state: &ImageState) -> PipelineResult<Vec<u8>> {
        // No queued calls: the output is byte-identical to the input.
        if state.is_untouched() {
            return self.source_bytes(state).await;
        }

        let (img, format) = self.materialize(state).await?;
        let quality = self.output.jpeg_quality;
        tokio::task::spawn_blocking(move || {
            encode(&img, format, quality).map_err(PipelineError::Encoding)
        })
        .await
        .map_err(|e| PipelineError::Encoding(format!("task join error: {e}")))?
    }
}

/// Decode bytes into an RGBA buffer, detecting the format by content.
/// Images wider or taller than `max_dimension` are refused before any
/// transform work happens.
fn decode(bytes: Vec<u8>, max_dimension: u32) -> PipelineResult<(RgbaImage, ImageFormat)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Engine {
            call: "decode".to_string(),
            message: format!("cannot detect image format: {e}"),
        })?;
    let format = reader.format().ok_or_else(|| PipelineError::Engine {
        call: "decode".to_string(),
        message: "unrecognized image format".to_string(),
    })?;
    let img = reader.decode().map_err(|e| PipelineError::Engine {
        call: "decode".to_string(),
        message: e.to_string(),
    })?;
    let (w, h) = (img.width(), img.height());
    if w > max_dimension || h > max_dimension {
        return Err(PipelineError::Engine {
            call: "decode".to_string(),
            message: format!("image dimensions {w}x{h} exceed limit {max_dimension}"),
        });
    }
    Ok((img.to_rgba8(), format))
}

/// Encode an RGBA buffer in the given format. JPEG drops alpha and honors
/// the configured quality; other formats use their default encoders.
fn encode(img: &RgbaImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| format!("jpeg encode failed: {e}"))?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut out), format)
                .map_err(|e| format!("{} encode failed: {e}", format_to_string(format)))?;
        }
    }
    Ok(out)
}

/// Apply one primitive call to the buffer.
fn apply_call(img: RgbaImage, call: &EngineCall) -> PipelineResult<RgbaImage> {
    let engine_err = |message: String| PipelineError::Engine {
        call: call.name().to_string(),
        message,
    };

    Ok(match call {
        EngineCall::Scale { width, height } => {
            if *width == 0 || *height == 0 {
                return Err(engine_err("scale dimensions must be non-zero".into()));
            }
            imageops::resize(&img, *width, *height, imageops::FilterType::Lanczos3)
        }
        EngineCall::Blur { radius: _, sigma } => imageops::blur(&img, sigma.max(0.1) as f32),
        EngineCall::Border {
            width,
            height,
            color,
        } => {
            let color = parse_color(color, call)?;
            filters::border(&img, *width, *height, color)
        }
        EngineCall::Charcoal { factor } => filters::charcoal(&img, *factor),
        EngineCall::Colorize { red, green, blue } => filters::colorize(&img, *red, *green, *blue),
        EngineCall::Contrast { multiplier } => {
            imageops::contrast(&img, (*multiplier * 10.0) as f32)
        }
        EngineCall::Crop {
            width,
            height,
            x,
            y,
        } => {
            let (w, h) = img.dimensions();
            if *x >= w || *y >= h {
                return Err(engine_err(format!(
                    "crop origin ({x}, {y}) outside image bounds {w}x{h}"
                )));
            }
            // Clamp the region to the image, like the engine the original used
            let cw = (*width).min(w - x).max(1);
            let ch = (*height).min(h - y).max(1);
            imageops::crop_imm(&img, *x, *y, cw, ch).to_image()
        }
        EngineCall::Despeckle => filters::despeckle(&img),
        EngineCall::Edge { radius } => filters::edge(&img, *radius),
        EngineCall::Emboss { radius } => filters::emboss(&img, *radius),
        EngineCall::Enhance => filters::enhance(&img),
        EngineCall::Equalize => filters::equalize(&img),
        EngineCall::Flip => imageops::flip_vertical(&img),
        EngineCall::Flop => imageops::flip_horizontal(&img),
        EngineCall::Gamma { red, green, blue } => filters::gamma(&img, *red, *green, *blue),
        EngineCall::Implode { factor } => filters::implode(&img, *factor),
        EngineCall::Modulate {
            brightness,
            saturation,
            hue,
        } => filters::modulate(&img, *brightness, *saturation, *hue),
        EngineCall::Monochrome => filters::threshold(&img, 50.0),
        EngineCall::Negative => {
            let mut out = img;
            imageops::invert(&mut out);
            out
        }
        EngineCall::Normalize => filters::normalize(&img),
        EngineCall::Rotate {
            background,
            degrees,
        } => {
            let color = parse_color(background, call)?;
            filters::rotate(&img, color, *degrees)
        }
        EngineCall::Sepia => filters::sepia(&img),
        EngineCall::Solarize { threshold } => filters::solarize(&img, *threshold),
        EngineCall::Swirl { degrees } => filters::swirl(&img, *degrees),
        EngineCall::Threshold { percent } => filters::threshold(&img, *percent),
        EngineCall::Transparent { color } => {
            let color = parse_color(color, call)?;
            filters::transparent(&img, color)
        }
        EngineCall::Trim => filters::trim(&img),
        EngineCall::Wave {
            amplitude,
            wavelength,
        } => filters::wave(&img, *amplitude, *wavelength),
    })
}

fn parse_color(input: &str, call: &EngineCall) -> PipelineResult<Rgba<u8>> {
    filters::parse_color(input).ok_or_else(|| PipelineError::Engine {
        call: call.name().to_string(),
        message: format!("unrecognized color \"{input}\""),
    })
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Ico => "ico".to_string(),
        ImageFormat::Pnm => "pnm".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}
