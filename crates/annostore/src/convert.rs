// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Bounding box conversions and filters injected into table schemas.
//!
//! ## Coordinate Systems
//!
//! - **Raw annotations**: `[x, y, width, height]` in pixels, top-left origin
//! - **Stored boxes**: `[xmin, ymin, xmax, ymax]` in pixels, inclusive corners

use crate::{
    Error, FieldValue, Record,
    schema::{RecordFilter, RecordTransform},
};
use std::sync::Arc;

// =============================================================================
// Bounding Box Conversion
// =============================================================================

/// Convert `[x, y, w, h]` to inclusive `[xmin, ymin, xmax, ymax]`.
///
/// # Example
/// ```
/// use annostore::convert::xywh_to_xyxy;
///
/// assert_eq!(xywh_to_xyxy(&[0.0, 0.0, 10.0, 20.0]).unwrap(), [0.0, 0.0, 9.0, 19.0]);
/// ```
pub fn xywh_to_xyxy(bbox: &[f64]) -> Result<[f64; 4], Error> {
    let [x, y, w, h] = <[f64; 4]>::try_from(bbox).map_err(|_| {
        Error::InvalidInput(format!(
            "Bounding box must have 4 values, got {}",
            bbox.len()
        ))
    })?;
    Ok([x, y, x + w - 1.0, y + h - 1.0])
}

/// Transform converting the named box fields from `xywh` to `xyxy`.
///
/// Fields absent from a record are left absent so the table's default value
/// applies unchanged.
pub fn boxes_to_xyxy(fields: &[&str]) -> RecordTransform {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Arc::new(move |mut record: Record| -> Result<Record, Error> {
        for name in &fields {
            let Some(value) = record.fields.get_mut(name) else {
                continue;
            };
            let converted = match &*value {
                FieldValue::Floats(bbox) => xywh_to_xyxy(bbox),
                other => Err(Error::InvalidInput(format!(
                    "Field '{}' must be a box, got {}",
                    name,
                    other.kind_name()
                ))),
            }?;
            *value = FieldValue::Floats(converted.to_vec());
        }
        Ok(record)
    })
}

/// Filter keeping records whose raw `[x, y, w, h]` box in `field` is at
/// least `min_size` wide and high.
///
/// Records without a well-formed box are kept; the builder rejects them with
/// a proper error instead of silently dropping them.
pub fn min_box_size(field: &str, min_size: f64) -> RecordFilter {
    let field = field.to_string();
    Arc::new(move |record: &Record| match record.field(&field) {
        Some(FieldValue::Floats(bbox)) if bbox.len() == 4 => {
            bbox[2] >= min_size && bbox[3] >= min_size
        }
        _ => true,
    })
}
