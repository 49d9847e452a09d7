// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! UCF Sports action recognition.
//!
//! Expects `<root>/ucf_sports_actions/ucf action/<Activity-Dir>/<video>/`
//! holding the extracted `.jpg` frames and optionally the `.avi` source.
//! The dataset has no official partition, so `splits.count` random
//! train/test pairs (`train01`/`test01`, ...) are drawn per activity with a
//! seeded RNG.

use super::{Dataset, SplitIter, list_dirs, list_files, require_dir};
use crate::{
    ConversionConfig, DatasetSchema, Error, HarvestedSplit, Record, SourceNode,
    schema::{CrossReference, FieldSpec, IndexSpec, KeyDomain, Member, ObjectColumn, TableSchema},
};
use log::{debug, warn};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::path::Path;

/// Activity labels, in activity identity order.
pub const ACTIVITIES: [&str; 10] = [
    "diving",
    "golf_swing",
    "kicking",
    "lifting",
    "riding_horse",
    "running",
    "skateboarding",
    "swing_bench",
    "swing_side",
    "walking",
];

const ACTIONS_DIR: &str = "ucf_sports_actions/ucf action";

const NO_VIDEO: &str = "not_available";

/// Activity of a raw activity directory.
fn activity_of(dir: &str) -> Option<&'static str> {
    Some(match dir {
        "Diving-Side" => "diving",
        "Golf-Swing-Back" | "Golf-Swing-Front" | "Golf-Swing-Side" => "golf_swing",
        "Kicking-Front" | "Kicking-Side" => "kicking",
        "Lifting" => "lifting",
        "Riding-Horse" => "riding_horse",
        "Run-Side" => "running",
        "SkateBoarding-Front" => "skateboarding",
        "Swing-Bench" => "swing_bench",
        "Swing-SideAngle" => "swing_side",
        "Walk-Front" => "walking",
        _ => return None,
    })
}

/// One video directory.
#[derive(Debug, Clone, PartialEq)]
struct Video {
    /// `<Activity-Dir>/<video>`, unique across the dataset.
    name: String,
    activity: &'static str,
    video_filename: String,
    image_filenames: Vec<String>,
}

/// The UCF Sports dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct UcfSports;

impl Dataset for UcfSports {
    fn name(&self) -> &'static str {
        "ucf_sports"
    }

    fn category(&self) -> &'static str {
        "recognition"
    }

    fn description(&self) -> &'static str {
        "UCF Sports: 150 broadcast sports clips over 10 actions"
    }

    fn tasks(&self) -> &'static [&'static str] {
        &["recognition"]
    }

    fn default_task(&self) -> &'static str {
        "recognition"
    }

    fn task_preset(&self, task: &str) -> Option<ConversionConfig> {
        (task == "recognition").then(|| ConversionConfig {
            skip_step: 1,
            output_name: task.to_string(),
            ..Default::default()
        })
    }

    fn schema(&self) -> DatasetSchema {
        DatasetSchema::new(self.name())
            .domain(KeyDomain::closed("activity", ACTIVITIES).persist_as("activities"))
            .domain(KeyDomain::open("video"))
            .table(
                TableSchema::new("videos")
                    .field(FieldSpec::text("videos"))
                    .field(FieldSpec::text("video_filenames"))
                    .field(FieldSpec::int("total_frames"))
                    .cross_reference(CrossReference::new([
                        ("videos", ObjectColumn::Row),
                        ("video_filenames", ObjectColumn::Row),
                        ("list_image_filenames_per_video", ObjectColumn::Row),
                        ("activities", ObjectColumn::Key("activity".into())),
                        ("total_frames", ObjectColumn::Row),
                    ])),
            )
            .table(TableSchema::new("frames").field(FieldSpec::text("image_filenames")))
            .index(IndexSpec::new(
                "list_videos_per_activity",
                "videos",
                "activity",
                Member::Row,
            ))
            .index(IndexSpec::new(
                "list_image_filenames_per_video",
                "frames",
                "video",
                Member::Row,
            ))
    }

    fn harvest(&self, root: &Path, config: &ConversionConfig) -> Result<SplitIter, Error> {
        let actions = require_dir(root.join(ACTIONS_DIR))?;
        let videos = scan(&actions)?;
        let assignments = random_splits(&videos, config);

        Ok(Box::new(assignments.into_iter().map(move |(name, members)| {
            let mut members: Vec<&Video> = members.iter().map(|&i| &videos[i]).collect();
            members.sort_by(|a, b| {
                activity_rank(a.activity)
                    .cmp(&activity_rank(b.activity))
                    .then_with(|| a.name.cmp(&b.name))
            });
            Ok::<_, Error>(build_split(&name, &members))
        })))
    }
}

fn activity_rank(activity: &str) -> usize {
    ACTIVITIES
        .iter()
        .position(|a| *a == activity)
        .unwrap_or(ACTIVITIES.len())
}

/// Collect every video directory, in sorted directory order.
fn scan(actions: &Path) -> Result<Vec<Video>, Error> {
    let mut videos = Vec::new();

    for dir in list_dirs(actions)? {
        let activity = activity_of(&dir).ok_or_else(|| {
            Error::Harvest(format!("Unrecognized activity directory '{}'", dir))
        })?;

        for video in list_dirs(&actions.join(&dir))? {
            let video_dir = actions.join(&dir).join(&video);
            let prefix = format!("{}/{}/{}", ACTIONS_DIR, dir, video);

            let frames = list_files(&video_dir, "jpg")?;
            if frames.is_empty() {
                warn!(
                    "No extracted frames in {:?}; extract the video frames first",
                    video_dir
                );
            }
            let avi = list_files(&video_dir, "avi")?
                .into_iter()
                .next()
                .unwrap_or_else(|| NO_VIDEO.to_string());

            videos.push(Video {
                name: format!("{}/{}", dir, video),
                activity,
                video_filename: format!("{}/{}", prefix, avi),
                image_filenames: frames
                    .iter()
                    .map(|f| format!("{}/{}", prefix, f))
                    .collect(),
            });
        }
    }

    debug!("Found {} videos under {:?}", videos.len(), actions);
    Ok(videos)
}

/// Draw `splits.count` train/test pairs, per activity.
///
/// Within an activity the sorted videos are shuffled and the first
/// `floor(n * train_fraction)` go to train. A single RNG seeded with
/// `splits.seed` is used for all pairs, so equal seeds give equal splits.
fn random_splits(videos: &[Video], config: &ConversionConfig) -> Vec<(String, Vec<usize>)> {
    let mut rng = StdRng::seed_from_u64(config.splits.seed);
    let mut out = Vec::with_capacity(config.splits.count * 2);

    for i in 1..=config.splits.count {
        let mut train = Vec::new();
        let mut test = Vec::new();
        for activity in ACTIVITIES {
            let mut members: Vec<usize> = (0..videos.len())
                .filter(|&v| videos[v].activity == activity)
                .collect();
            members.sort_by(|&a, &b| videos[a].name.cmp(&videos[b].name));
            members.shuffle(&mut rng);

            let n_train = (members.len() as f64 * config.splits.train_fraction) as usize;
            test.extend_from_slice(&members[n_train..]);
            members.truncate(n_train);
            train.extend(members);
        }
        out.push((format!("train{:02}", i), train));
        out.push((format!("test{:02}", i), test));
    }
    out
}

fn build_split(name: &str, videos: &[&Video]) -> HarvestedSplit {
    let mut split = HarvestedSplit::new(name);

    for video in videos {
        let (dir, clip) = video.name.split_once('/').unwrap_or(("", video.name.as_str()));
        split.source.insert(
            &[video.activity, dir, clip, "image_filenames"],
            SourceNode::Text(video.image_filenames.clone()),
        );
        split.source.insert(
            &[video.activity, dir, clip, "video_filename"],
            SourceNode::Text(vec![video.video_filename.clone()]),
        );

        split.declare("video", video.name.clone());
        split.push(
            "videos",
            Record::new()
                .with_field("videos", video.name.as_str())
                .with_field("video_filenames", video.video_filename.as_str())
                .with_field("total_frames", video.image_filenames.len() as i64)
                .with_key("activity", video.activity)
                .with_key("video", video.name.as_str()),
        );
        for frame in &video.image_filenames {
            split.push(
                "frames",
                Record::new()
                    .with_field("image_filenames", frame.as_str())
                    .with_key("video", video.name.as_str()),
            );
        }
    }

    debug!("Split {}: {} videos", name, videos.len());
    split
}
