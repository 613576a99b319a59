use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::annotation::AnnotationKind;

/// A labeled region on an image.
///
/// The `type` field is the discriminator on the wire and in storage; a payload
/// without a recognized `type` never deserializes. The shapes are exclusive, so
/// fields belonging to the other variant are rejected rather than dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum Annotation {
    /// Axis-aligned rectangle: top-left corner plus width and height.
    Box {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        x: i64,
        y: i64,
        w: i64,
        h: i64,
    },
    /// Ordered outline of `[x, y]` vertices.
    Polygon {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[schema(value_type = Vec<Vec<i64>>)]
        points: Vec<[i64; 2]>,
    },
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Box { .. } => AnnotationKind::Box,
            Annotation::Polygon { .. } => AnnotationKind::Polygon,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Annotation::Box { label, .. } | Annotation::Polygon { label, .. } => label.as_deref(),
        }
    }
}
