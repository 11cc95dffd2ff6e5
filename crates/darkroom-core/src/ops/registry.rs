//! Transform dispatch: projects a validated step onto engine calls.
//!
//! Each arm is pure with respect to its inputs: the same `(info, params)`
//! always queues the same call sequence. Arms read `info` but never write it;
//! the executor re-probes after every step instead.

use crate::engine::EngineCall;
use crate::types::{ImageInfo, ImageState};

use super::params::OpParams;
use super::step::ProcessStep;

/// Linear downsample factor for the blur fast path.
///
/// Blur runs on a 1/10-scale copy and is resized back up afterwards. This is
/// a deliberate speed/quality tradeoff that callers depend on: output
/// dimensions always match the pre-blur dimensions.
const BLUR_DOWNSAMPLE: u32 = 10;

/// Gaussian kernel radius paired with the caller-supplied sigma.
const BLUR_RADIUS: f64 = 7.0;

/// Neutral value for an unmodified modulation channel.
const MODULATE_NEUTRAL: f64 = 100.0;

/// Queue the engine calls for one step onto the state.
pub fn apply(step: &ProcessStep, state: &mut ImageState, info: &ImageInfo) {
    match step.params() {
        OpParams::Blur(p) => {
            // Scale down, blur small, scale back to the probed size
            state.push(EngineCall::Scale {
                width: (info.width / BLUR_DOWNSAMPLE).max(1),
                height: (info.height / BLUR_DOWNSAMPLE).max(1),
            });
            state.push(EngineCall::Blur {
                radius: BLUR_RADIUS,
                sigma: p.factor,
            });
            state.push(EngineCall::Scale {
                width: info.width,
                height: info.height,
            });
        }
        OpParams::Border(p) => state.push(EngineCall::Border {
            width: p.width,
            height: p.height,
            color: p.color.clone(),
        }),
        // brightness/saturation/hue are projections of the three-channel
        // modulate primitive: two channels pinned at neutral, one varied
        OpParams::Brightness(p) => state.push(EngineCall::Modulate {
            brightness: p.percent,
            saturation: MODULATE_NEUTRAL,
            hue: MODULATE_NEUTRAL,
        }),
        OpParams::Saturation(p) => state.push(EngineCall::Modulate {
            brightness: MODULATE_NEUTRAL,
            saturation: p.percent,
            hue: MODULATE_NEUTRAL,
        }),
        OpParams::Hue(p) => state.push(EngineCall::Modulate {
            brightness: MODULATE_NEUTRAL,
            saturation: MODULATE_NEUTRAL,
            hue: p.percent,
        }),
        OpParams::Charcoal(p) => state.push(EngineCall::Charcoal { factor: p.factor }),
        OpParams::Colorize(p) => state.push(EngineCall::Colorize {
            red: p.r,
            green: p.g,
            blue: p.b,
        }),
        OpParams::Contrast(p) => state.push(EngineCall::Contrast {
            multiplier: p.multiplier,
        }),
        OpParams::Crop(p) => state.push(EngineCall::Crop {
            width: p.width,
            height: p.height,
            x: p.x,
            y: p.y,
        }),
        OpParams::Despeckle => state.push(EngineCall::Despeckle),
        OpParams::Edge(p) => state.push(EngineCall::Edge { radius: p.radius }),
        OpParams::Emboss(p) => state.push(EngineCall::Emboss { radius: p.radius }),
        OpParams::Enhance => state.push(EngineCall::Enhance),
        OpParams::Equalize => state.push(EngineCall::Equalize),
        OpParams::Flip => state.push(EngineCall::Flip),
        OpParams::Flop => state.push(EngineCall::Flop),
        OpParams::Gamma(p) => state.push(EngineCall::Gamma {
            red: p.r,
            green: p.g,
            blue: p.b,
        }),
        OpParams::Implode(p) => state.push(EngineCall::Implode { factor: p.factor }),
        OpParams::Monochrome => state.push(EngineCall::Monochrome),
        OpParams::Negative => state.push(EngineCall::Negative),
        OpParams::Normalize => state.push(EngineCall::Normalize),
        OpParams::Rotate(p) => state.push(EngineCall::Rotate {
            background: p.background_color.clone(),
            degrees: p.degrees,
        }),
        OpParams::Scale(p) => state.push(EngineCall::Scale {
            width: p.width,
            height: p.height,
        }),
        OpParams::Sepia => state.push(EngineCall::Sepia),
        OpParams::Solarize(p) => state.push(EngineCall::Solarize {
            threshold: p.threshold,
        }),
        OpParams::Swirl(p) => state.push(EngineCall::Swirl { degrees: p.degrees }),
        OpParams::Threshold(p) => state.push(EngineCall::Threshold { percent: p.percent }),
        OpParams::Transparent(p) => state.push(EngineCall::Transparent {
            color: p.color.clone(),
        }),
        OpParams::Trim => state.push(EngineCall::Trim),
        OpParams::Wave(p) => state.push(EngineCall::Wave {
            amplitude: p.amplitude,
            wavelength: p.wavelength,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::kind::OperationKind;
    use crate::ops::params::OpParams;
    use serde_json::json;

    fn info(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            width,
            height,
            format: "png".to_string(),
            encoded_size: 1024,
        }
    }

    fn step(kind: OperationKind, raw: serde_json::Value) -> ProcessStep {
        ProcessStep::new(OpParams::parse(kind, Some(&raw)).unwrap())
    }

    #[test]
    fn test_blur_queues_downsample_blur_upsample() {
        let mut state = ImageState::from_bytes(vec![]);
        apply(
            &step(OperationKind::Blur, json!({ "factor": 4 })),
            &mut state,
            &info(1000, 500),
        );
        assert_eq!(
            state.calls(),
            &[
                EngineCall::Scale {
                    width: 100,
                    height: 50
                },
                EngineCall::Blur {
                    radius: 7.0,
                    sigma: 4.0
                },
                EngineCall::Scale {
                    width: 1000,
                    height: 500
                },
            ]
        );
    }

    #[test]
    fn test_blur_downsample_floors_and_clamps() {
        let mut state = ImageState::from_bytes(vec![]);
        apply(
            &step(OperationKind::Blur, json!({ "factor": 1 })),
            &mut state,
            &info(19, 5),
        );
        // 19/10 floors to 1; 5/10 floors to 0 and clamps to 1
        assert_eq!(
            state.calls()[0],
            EngineCall::Scale {
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_brightness_pins_other_modulate_channels() {
        let mut state = ImageState::from_bytes(vec![]);
        apply(
            &step(OperationKind::Brightness, json!({ "percent": 40 })),
            &mut state,
            &info(10, 10),
        );
        assert_eq!(
            state.calls(),
            &[EngineCall::Modulate {
                brightness: 40.0,
                saturation: 100.0,
                hue: 100.0
            }]
        );
    }

    #[test]
    fn test_saturation_and_hue_projections() {
        let mut state = ImageState::from_bytes(vec![]);
        apply(
            &step(OperationKind::Saturation, json!({ "percent": 70 })),
            &mut state,
            &info(10, 10),
        );
        apply(
            &step(OperationKind::Hue, json!({ "percent": 130 })),
            &mut state,
            &info(10, 10),
        );
        assert_eq!(
            state.calls(),
            &[
                EngineCall::Modulate {
                    brightness: 100.0,
                    saturation: 70.0,
                    hue: 100.0
                },
                EngineCall::Modulate {
                    brightness: 100.0,
                    saturation: 100.0,
                    hue: 130.0
                },
            ]
        );
    }

    #[test]
    fn test_parameterless_op_queues_single_call() {
        let mut state = ImageState::from_bytes(vec![]);
        apply(
            &ProcessStep::new(OpParams::parse(OperationKind::Trim, None).unwrap()),
            &mut state,
            &info(10, 10),
        );
        assert_eq!(state.calls(), &[EngineCall::Trim]);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let s = step(OperationKind::Swirl, json!({ "degrees": 90 }));
        let mut a = ImageState::from_bytes(vec![]);
        let mut b = ImageState::from_bytes(vec![]);
        apply(&s, &mut a, &info(10, 10));
        apply(&s, &mut b, &info(10, 10));
        assert_eq!(a.calls(), b.calls());
    }
}
