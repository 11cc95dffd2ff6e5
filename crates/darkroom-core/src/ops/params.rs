//! Typed parameter payloads, one shape per operation.
//!
//! Each operation with parameters gets a serde struct with
//! `deny_unknown_fields`, so schema violations come back with field-level
//! detail straight from the deserializer ("missing field `height`",
//! "unknown field `foo`", "invalid type: string, expected f64").

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

use super::kind::OperationKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlurParams {
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderParams {
    pub width: u32,
    pub height: u32,
    pub color: String,
}

/// Shared shape for the percent-valued operations
/// (brightness, hue, saturation, threshold).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PercentParams {
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharcoalParams {
    pub factor: f64,
}

/// Shared shape for the per-channel operations (colorize, gamma).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RgbParams {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContrastParams {
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropParams {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Shared shape for the optional-radius operations (edge, emboss).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadiusParams {
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImplodeParams {
    pub factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotateParams {
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    pub degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleParams {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarizeParams {
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwirlParams {
    pub degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransparentParams {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveParams {
    pub amplitude: f64,
    pub wavelength: f64,
}

/// Validated parameters for exactly one operation.
///
/// Parameterless operations are unit variants; any params supplied for them
/// are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum OpParams {
    Blur(BlurParams),
    Border(BorderParams),
    Brightness(PercentParams),
    Charcoal(CharcoalParams),
    Colorize(RgbParams),
    Contrast(ContrastParams),
    Crop(CropParams),
    Despeckle,
    Edge(RadiusParams),
    Emboss(RadiusParams),
    Enhance,
    Equalize,
    Flip,
    Flop,
    Gamma(RgbParams),
    Hue(PercentParams),
    Implode(ImplodeParams),
    Monochrome,
    Negative,
    Normalize,
    Rotate(RotateParams),
    Saturation(PercentParams),
    Scale(ScaleParams),
    Sepia,
    Solarize(SolarizeParams),
    Swirl(SwirlParams),
    Threshold(PercentParams),
    Transparent(TransparentParams),
    Trim,
    Wave(WaveParams),
}

impl OpParams {
    /// Validate a raw params payload against the schema registered for
    /// `kind`, producing the typed form.
    pub fn parse(kind: OperationKind, raw: Option<&Value>) -> PipelineResult<Self> {
        use OperationKind as K;
        Ok(match kind {
            K::Blur => OpParams::Blur(required(kind, raw)?),
            K::Border => OpParams::Border(required(kind, raw)?),
            K::Brightness => OpParams::Brightness(required(kind, raw)?),
            K::Charcoal => {
                let params: CharcoalParams = required(kind, raw)?;
                if !(0.0..=3.0).contains(&params.factor) {
                    return Err(schema_err(kind, "factor must be between 0 and 3"));
                }
                OpParams::Charcoal(params)
            }
            K::Colorize => OpParams::Colorize(required(kind, raw)?),
            K::Contrast => OpParams::Contrast(required(kind, raw)?),
            K::Crop => OpParams::Crop(required(kind, raw)?),
            K::Despeckle => OpParams::Despeckle,
            K::Edge => OpParams::Edge(optional(kind, raw)?),
            K::Emboss => OpParams::Emboss(optional(kind, raw)?),
            K::Enhance => OpParams::Enhance,
            K::Equalize => OpParams::Equalize,
            K::Flip => OpParams::Flip,
            K::Flop => OpParams::Flop,
            K::Gamma => OpParams::Gamma(required(kind, raw)?),
            K::Hue => OpParams::Hue(required(kind, raw)?),
            K::Implode => OpParams::Implode(optional(kind, raw)?),
            K::Monochrome => OpParams::Monochrome,
            K::Negative => OpParams::Negative,
            K::Normalize => OpParams::Normalize,
            K::Rotate => OpParams::Rotate(required(kind, raw)?),
            K::Saturation => OpParams::Saturation(required(kind, raw)?),
            K::Scale => OpParams::Scale(required(kind, raw)?),
            K::Sepia => OpParams::Sepia,
            K::Solarize => OpParams::Solarize(required(kind, raw)?),
            K::Swirl => OpParams::Swirl(required(kind, raw)?),
            K::Threshold => OpParams::Threshold(required(kind, raw)?),
            K::Transparent => OpParams::Transparent(required(kind, raw)?),
            K::Trim => OpParams::Trim,
            K::Wave => OpParams::Wave(required(kind, raw)?),
        })
    }

    /// The operation these params belong to.
    pub fn kind(&self) -> OperationKind {
        use OperationKind as K;
        match self {
            OpParams::Blur(_) => K::Blur,
            OpParams::Border(_) => K::Border,
            OpParams::Brightness(_) => K::Brightness,
            OpParams::Charcoal(_) => K::Charcoal,
            OpParams::Colorize(_) => K::Colorize,
            OpParams::Contrast(_) => K::Contrast,
            OpParams::Crop(_) => K::Crop,
            OpParams::Despeckle => K::Despeckle,
            OpParams::Edge(_) => K::Edge,
            OpParams::Emboss(_) => K::Emboss,
            OpParams::Enhance => K::Enhance,
            OpParams::Equalize => K::Equalize,
            OpParams::Flip => K::Flip,
            OpParams::Flop => K::Flop,
            OpParams::Gamma(_) => K::Gamma,
            OpParams::Hue(_) => K::Hue,
            OpParams::Implode(_) => K::Implode,
            OpParams::Monochrome => K::Monochrome,
            OpParams::Negative => K::Negative,
            OpParams::Normalize => K::Normalize,
            OpParams::Rotate(_) => K::Rotate,
            OpParams::Saturation(_) => K::Saturation,
            OpParams::Scale(_) => K::Scale,
            OpParams::Sepia => K::Sepia,
            OpParams::Solarize(_) => K::Solarize,
            OpParams::Swirl(_) => K::Swirl,
            OpParams::Threshold(_) => K::Threshold,
            OpParams::Transparent(_) => K::Transparent,
            OpParams::Trim => K::Trim,
            OpParams::Wave(_) => K::Wave,
        }
    }
}

fn schema_err(kind: OperationKind, detail: impl Into<String>) -> PipelineError {
    PipelineError::SchemaValidation {
        operation: kind.as_str().to_string(),
        detail: detail.into(),
    }
}

/// Deserialize params that must be present.
fn required<T: DeserializeOwned>(kind: OperationKind, raw: Option<&Value>) -> PipelineResult<T> {
    let value = raw.ok_or_else(|| schema_err(kind, "params are required"))?;
    serde_json::from_value(value.clone()).map_err(|e| schema_err(kind, e.to_string()))
}

/// Deserialize params that may be absent; absence yields the default shape.
fn optional<T: DeserializeOwned + Default>(
    kind: OperationKind,
    raw: Option<&Value>,
) -> PipelineResult<T> {
    match raw {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| schema_err(kind, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blur_params_parse() {
        let params = OpParams::parse(OperationKind::Blur, Some(&json!({ "factor": 10 }))).unwrap();
        assert_eq!(params, OpParams::Blur(BlurParams { factor: 10.0 }));
    }

    #[test]
    fn test_missing_required_field_carries_field_name() {
        let err =
            OpParams::parse(OperationKind::Crop, Some(&json!({ "width": 10 }))).unwrap_err();
        match err {
            PipelineError::SchemaValidation { operation, detail } => {
                assert_eq!(operation, "crop");
                assert!(detail.contains("missing field"), "got: {detail}");
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_params_is_rejected() {
        let err = OpParams::parse(OperationKind::Blur, None).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaValidation { .. }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = OpParams::parse(
            OperationKind::Blur,
            Some(&json!({ "factor": 1, "sigma": 2 })),
        )
        .unwrap_err();
        match err {
            PipelineError::SchemaValidation { detail, .. } => {
                assert!(detail.contains("unknown field"), "got: {detail}");
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = OpParams::parse(
            OperationKind::Scale,
            Some(&json!({ "width": "wide", "height": 10 })),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaValidation { .. }));
    }

    #[test]
    fn test_parameterless_op_ignores_provided_params() {
        let params =
            OpParams::parse(OperationKind::Sepia, Some(&json!({ "anything": true }))).unwrap();
        assert_eq!(params, OpParams::Sepia);
    }

    #[test]
    fn test_optional_params_default_when_absent() {
        assert_eq!(
            OpParams::parse(OperationKind::Edge, None).unwrap(),
            OpParams::Edge(RadiusParams { radius: None })
        );
        assert_eq!(
            OpParams::parse(OperationKind::Implode, Some(&Value::Null)).unwrap(),
            OpParams::Implode(ImplodeParams { factor: None })
        );
    }

    #[test]
    fn test_optional_params_accept_values() {
        assert_eq!(
            OpParams::parse(OperationKind::Emboss, Some(&json!({ "radius": 2.5 }))).unwrap(),
            OpParams::Emboss(RadiusParams { radius: Some(2.5) })
        );
    }

    #[test]
    fn test_charcoal_factor_range() {
        assert!(OpParams::parse(OperationKind::Charcoal, Some(&json!({ "factor": 3 }))).is_ok());
        let err =
            OpParams::parse(OperationKind::Charcoal, Some(&json!({ "factor": 3.5 }))).unwrap_err();
        match err {
            PipelineError::SchemaValidation { detail, .. } => {
                assert!(detail.contains("between 0 and 3"));
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_rotate_uses_camel_case_wire_name() {
        let params = OpParams::parse(
            OperationKind::Rotate,
            Some(&json!({ "backgroundColor": "red", "degrees": 45 })),
        )
        .unwrap();
        assert_eq!(
            params,
            OpParams::Rotate(RotateParams {
                background_color: "red".to_string(),
                degrees: 45.0,
            })
        );
    }

    #[test]
    fn test_negative_crop_coordinates_are_rejected() {
        let err = OpParams::parse(
            OperationKind::Crop,
            Some(&json!({ "width": 10, "height": 10, "x": -1, "y": 0 })),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaValidation { .. }));
    }

    #[test]
    fn test_kind_accessor_matches_parse_input() {
        let cases = [
            (OperationKind::Blur, json!({ "factor": 2 })),
            (OperationKind::Crop, json!({ "width": 1, "height": 1, "x": 0, "y": 0 })),
            (OperationKind::Hue, json!({ "percent": 50 })),
            (OperationKind::Gamma, json!({ "r": 1, "g": 1, "b": 1 })),
            (OperationKind::Wave, json!({ "amplitude": 1, "wavelength": 4 })),
        ];
        for (kind, raw) in cases {
            let params = OpParams::parse(kind, Some(&raw)).unwrap();
            assert_eq!(params.kind(), kind);
        }
        for kind in [OperationKind::Flip, OperationKind::Trim, OperationKind::Sepia] {
            assert_eq!(OpParams::parse(kind, None).unwrap().kind(), kind);
        }
    }
}
