//! Conversion between typed annotations and their persisted string form.
//!
//! The stored blob is the complete annotation as JSON, discriminator and label
//! included, so `decode` never needs the `type` column to rebuild the variant.

use thiserror::Error;

use crate::entities::annotation::AnnotationKind;
use crate::models::Annotation;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode annotation: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("corrupt annotation record: {0}")]
    Corrupt(String),
}

/// Row-ready form of an annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedAnnotation {
    pub kind: AnnotationKind,
    pub label: Option<String>,
    pub data: String,
}

pub fn encode(annotation: &Annotation) -> Result<EncodedAnnotation, CodecError> {
    let data = serde_json::to_string(annotation).map_err(CodecError::Encode)?;

    Ok(EncodedAnnotation {
        kind: annotation.kind(),
        label: annotation.label().map(str::to_owned),
        data,
    })
}

pub fn decode(data: &str) -> Result<Annotation, CodecError> {
    serde_json::from_str(data).map_err(|e| CodecError::Corrupt(e.to_string()))
}

/// Decodes a stored row, checking the blob against the row's `type` column.
pub fn decode_row(kind: AnnotationKind, data: &str) -> Result<Annotation, CodecError> {
    let annotation = decode(data)?;
    if annotation.kind() != kind {
        return Err(CodecError::Corrupt(format!(
            "type column is {:?} but payload is {:?}",
            kind,
            annotation.kind()
        )));
    }
    Ok(annotation)
}
