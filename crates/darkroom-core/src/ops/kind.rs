//! The closed set of operations a pipeline step may name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A registered operation kind.
///
/// The set is closed: a step naming anything else fails validation with
/// `UnknownOperation` before any engine work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Blur,
    Border,
    Brightness,
    Charcoal,
    Colorize,
    Contrast,
    Crop,
    Despeckle,
    Edge,
    Emboss,
    Enhance,
    Equalize,
    Flip,
    Flop,
    Gamma,
    Hue,
    Implode,
    Monochrome,
    Negative,
    Normalize,
    Rotate,
    Saturation,
    Scale,
    Sepia,
    Solarize,
    Swirl,
    Threshold,
    Transparent,
    Trim,
    Wave,
}

/// Every registered operation, in registry order.
pub const OPERATIONS: [OperationKind; 30] = [
    OperationKind::Blur,
    OperationKind::Border,
    OperationKind::Brightness,
    OperationKind::Charcoal,
    OperationKind::Colorize,
    OperationKind::Contrast,
    OperationKind::Crop,
    OperationKind::Despeckle,
    OperationKind::Edge,
    OperationKind::Emboss,
    OperationKind::Enhance,
    OperationKind::Equalize,
    OperationKind::Flip,
    OperationKind::Flop,
    OperationKind::Gamma,
    OperationKind::Hue,
    OperationKind::Implode,
    OperationKind::Monochrome,
    OperationKind::Negative,
    OperationKind::Normalize,
    OperationKind::Rotate,
    OperationKind::Saturation,
    OperationKind::Scale,
    OperationKind::Sepia,
    OperationKind::Solarize,
    OperationKind::Swirl,
    OperationKind::Threshold,
    OperationKind::Transparent,
    OperationKind::Trim,
    OperationKind::Wave,
];

impl OperationKind {
    /// The wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Blur => "blur",
            OperationKind::Border => "border",
            OperationKind::Brightness => "brightness",
            OperationKind::Charcoal => "charcoal",
            OperationKind::Colorize => "colorize",
            OperationKind::Contrast => "contrast",
            OperationKind::Crop => "crop",
            OperationKind::Despeckle => "despeckle",
            OperationKind::Edge => "edge",
            OperationKind::Emboss => "emboss",
            OperationKind::Enhance => "enhance",
            OperationKind::Equalize => "equalize",
            OperationKind::Flip => "flip",
            OperationKind::Flop => "flop",
            OperationKind::Gamma => "gamma",
            OperationKind::Hue => "hue",
            OperationKind::Implode => "implode",
            OperationKind::Monochrome => "monochrome",
            OperationKind::Negative => "negative",
            OperationKind::Normalize => "normalize",
            OperationKind::Rotate => "rotate",
            OperationKind::Saturation => "saturation",
            OperationKind::Scale => "scale",
            OperationKind::Sepia => "sepia",
            OperationKind::Solarize => "solarize",
            OperationKind::Swirl => "swirl",
            OperationKind::Threshold => "threshold",
            OperationKind::Transparent => "transparent",
            OperationKind::Trim => "trim",
            OperationKind::Wave => "wave",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OPERATIONS
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_roundtrips_through_its_name() {
        for kind in OPERATIONS {
            assert_eq!(kind.as_str().parse::<OperationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "sharpen".parse::<OperationKind>().unwrap_err();
        match err {
            PipelineError::UnknownOperation(name) => assert_eq!(name, "sharpen"),
            other => panic!("expected UnknownOperation, got {other:?}"),
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = OPERATIONS.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OPERATIONS.len());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&OperationKind::Blur).unwrap();
        assert_eq!(json, "\"blur\"");
        let parsed: OperationKind = serde_json::from_str("\"crop\"").unwrap();
        assert_eq!(parsed, OperationKind::Crop);
    }
}
