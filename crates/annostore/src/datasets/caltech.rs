// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Caltech Pedestrian detection.
//!
//! Expects the sequences already extracted to
//! `<root>/extracted_data/<set>/<video>/{images,annotations}`, one JSON
//! annotation file per frame holding a list of objects:
//!
//! ```json
//! [{"lbl": "person", "pos": [x, y, w, h], "posv": [x, y, w, h], "id": 3, "occl": 0}]
//! ```

use super::{Dataset, SplitIter, list_dirs, list_files, require_dir};
use crate::{
    ConversionConfig, DatasetSchema, Error, HarvestedSplit, Record, SourceNode,
    convert::{boxes_to_xyxy, min_box_size},
    schema::{CrossReference, FieldSpec, IndexSpec, KeyDomain, Member, ObjectColumn, TableSchema},
};
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Object labels, in class identity order.
pub const CLASSES: [&str; 4] = ["person", "person-fa", "people", "person?"];

const EXTRACTED_DIR: &str = "extracted_data";

/// Boxes narrower or lower than this many pixels are discarded.
const MIN_BOX_SIZE: f64 = 5.0;

const SPLITS: [(&str, &[&str]); 2] = [
    ("train", &["set00", "set01", "set02", "set03", "set04", "set05"]),
    ("test", &["set06", "set07", "set08", "set09", "set10"]),
];

/// One annotated object of a frame.
#[derive(Debug, Clone, Deserialize)]
struct Annotation {
    lbl: String,
    pos: Vec<f64>,
    /// Visible box; not always a list in the raw files.
    #[serde(default)]
    posv: serde_json::Value,
    /// Track id; not always an integer in the raw files.
    #[serde(default)]
    id: serde_json::Value,
    occl: f64,
}

impl Annotation {
    fn into_record(self, image: &str) -> Record {
        let mut record = Record::new()
            .with_field("boxes", self.pos)
            .with_field("occlusion", self.occl)
            .with_key("image", image)
            .with_key("class", self.lbl);

        if let Some(posv) = self.posv.as_array() {
            let values: Option<Vec<f64>> = posv.iter().map(|v| v.as_f64()).collect();
            match values {
                Some(values) => record = record.with_field("boxesv", values),
                None => warn!("Ignoring non-numeric posv for an object of {}", image),
            }
        }
        if let Some(id) = self.id.as_i64() {
            record = record.with_field("id", id);
        }
        record
    }
}

/// The Caltech Pedestrian dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaltechPedestrian;

impl Dataset for CaltechPedestrian {
    fn name(&self) -> &'static str {
        "caltech_pedestrian"
    }

    fn category(&self) -> &'static str {
        "detection"
    }

    fn description(&self) -> &'static str {
        "Caltech Pedestrian: 10 hours of 640x480 30Hz driving video with pedestrian boxes"
    }

    fn tasks(&self) -> &'static [&'static str] {
        &["detection", "detection_10x", "detection_30x"]
    }

    fn default_task(&self) -> &'static str {
        "detection"
    }

    fn task_preset(&self, task: &str) -> Option<ConversionConfig> {
        let skip_step = match task {
            "detection" => 30,
            "detection_10x" => 3,
            "detection_30x" => 1,
            _ => return None,
        };
        Some(ConversionConfig {
            skip_step,
            output_name: task.to_string(),
            ..Default::default()
        })
    }

    fn schema(&self) -> DatasetSchema {
        let per_image = |name: &str| IndexSpec::new(name, "objects", "image", Member::Row);

        DatasetSchema::new(self.name())
            .domain(KeyDomain::open("image").persist_as("image_filenames"))
            .domain(KeyDomain::closed("class", CLASSES).persist_as("classes"))
            .table(
                TableSchema::new("objects")
                    .field(FieldSpec::floats("boxes", 4))
                    .field(FieldSpec::floats("boxesv", 4).with_default([0.0; 4]))
                    .field(FieldSpec::int("id").with_default(0_i64))
                    .field(FieldSpec::float("occlusion"))
                    .filter(min_box_size("boxes", MIN_BOX_SIZE))
                    .transform(boxes_to_xyxy(&["boxes", "boxesv"]))
                    .cross_reference(CrossReference::new([
                        ("image_filenames", ObjectColumn::Key("image".into())),
                        ("classes", ObjectColumn::Key("class".into())),
                        ("boxes", ObjectColumn::Row),
                        ("boxesv", ObjectColumn::Row),
                        ("id", ObjectColumn::Row),
                        ("occlusion", ObjectColumn::Row),
                    ])),
            )
            .index(IndexSpec::new(
                "list_image_filenames_per_class",
                "objects",
                "class",
                Member::Key("image".into()),
            ))
            .index(per_image("list_boxes_per_image"))
            .index(per_image("list_boxesv_per_image"))
            .index(per_image("list_object_ids_per_image"))
            .index(IndexSpec::new(
                "list_objects_ids_per_class",
                "objects",
                "class",
                Member::Row,
            ))
    }

    fn harvest(&self, root: &Path, config: &ConversionConfig) -> Result<SplitIter, Error> {
        let extracted = require_dir(root.join(EXTRACTED_DIR)).map_err(|_| {
            Error::Harvest(format!(
                "No extracted sequences under {:?}; extract the .seq/.vbb files to '{}' first",
                root, EXTRACTED_DIR
            ))
        })?;
        let root = root.to_path_buf();
        let skip_step = config.skip_step.max(1);

        Ok(Box::new(SPLITS.into_iter().map(move |(name, sets)| {
            harvest_split(&root, &extracted, name, sets, skip_step)
                .map_err(|e| e.in_split(name))
        })))
    }
}

/// Every `skip_step`-th entry, starting at index `skip_step - 1`.
fn sample(names: Vec<String>, skip_step: usize) -> Vec<String> {
    names
        .into_iter()
        .skip(skip_step - 1)
        .step_by(skip_step)
        .collect()
}

fn harvest_split(
    root: &Path,
    extracted: &Path,
    name: &str,
    sets: &[&str],
    skip_step: usize,
) -> Result<HarvestedSplit, Error> {
    let mut split = HarvestedSplit::new(name);

    for &set in sets {
        let set_dir = extracted.join(set);
        if !set_dir.is_dir() {
            warn!("Set {} not found in {:?}, skipping", set, extracted);
            continue;
        }

        for video in list_dirs(&set_dir)? {
            let video_dir = set_dir.join(&video);
            let rel = |kind: &str, file: &str| {
                format!("{}/{}/{}/{}/{}", EXTRACTED_DIR, set, video, kind, file)
            };

            let images = sample(
                list_files(&require_dir(video_dir.join("images"))?, "jpg")?,
                skip_step,
            );
            let annotations = sample(
                list_files(&require_dir(video_dir.join("annotations"))?, "json")?,
                skip_step,
            );
            if images.len() != annotations.len() {
                return Err(Error::Harvest(format!(
                    "{}/{}: {} sampled images but {} annotation files",
                    set,
                    video,
                    images.len(),
                    annotations.len()
                )));
            }

            for (j, (image, annotation)) in images.iter().zip(&annotations).enumerate() {
                let image_path = rel("images", image);
                let annotation_path = rel("annotations", annotation);

                let j = j.to_string();
                split.source.insert(
                    &[set, video.as_str(), j.as_str(), "image_filenames"],
                    SourceNode::Text(vec![image_path.clone()]),
                );
                split.source.insert(
                    &[set, video.as_str(), j.as_str(), "annotation_filenames"],
                    SourceNode::Text(vec![annotation_path.clone()]),
                );

                split.declare("image", image_path.clone());
                for object in read_annotations(&root.join(&annotation_path))? {
                    split.push("objects", object.into_record(&image_path));
                }
            }
            debug!("{}/{}/{}: {} frames", name, set, video, images.len());
        }
    }

    Ok(split)
}

fn read_annotations(path: &Path) -> Result<Vec<Annotation>, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Harvest(format!("Cannot read {:?}: {}", path, e)))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents)
        .map_err(|e| Error::Harvest(format!("Malformed annotation file {:?}: {}", path, e)))
}
