// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Harvester tests over synthetic dataset trees.

use super::*;
use crate::{FieldValue, SourceNode};
use std::fs;
use tempfile::TempDir;

fn write_caltech_video(root: &Path, set: &str, video: &str, frames: &[&str]) {
    let video_dir = root.join("extracted_data").join(set).join(video);
    fs::create_dir_all(video_dir.join("images")).unwrap();
    fs::create_dir_all(video_dir.join("annotations")).unwrap();
    for (i, annotation) in frames.iter().enumerate() {
        fs::write(video_dir.join("images").join(format!("I{:05}.jpg", i)), b"").unwrap();
        fs::write(
            video_dir.join("annotations").join(format!("I{:05}.json", i)),
            annotation,
        )
        .unwrap();
    }
}

#[test]
fn test_catalog_lookup() {
    let names: Vec<&str> = catalog().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["caltech_pedestrian", "ucf_sports"]);

    let dataset = lookup("ucf_sports").unwrap();
    assert_eq!(dataset.category(), "recognition");
    assert_eq!(dataset.all_tasks(), vec!["recognition", "recognition_d"]);
    assert!(matches!(lookup("cifar10"), Err(Error::UnknownDataset(_))));
}

#[test]
fn test_caltech_missing_extracted_data() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConversionConfig::default();
    match CaltechPedestrian.harvest(temp_dir.path(), &config) {
        Err(Error::Harvest(msg)) => assert!(msg.contains("extracted_data")),
        Err(other) => panic!("Expected harvest error, got {:?}", other),
        Ok(_) => panic!("Expected harvest error"),
    }
}

#[test]
fn test_caltech_harvest_samples_frames() {
    let temp_dir = TempDir::new().unwrap();
    let person = r#"[{"lbl": "person", "pos": [0, 0, 10, 20], "posv": 0, "id": 1, "occl": 0}]"#;
    write_caltech_video(
        temp_dir.path(),
        "set00",
        "V000",
        &[person, "[]", person, "[]", "[]", person],
    );
    write_caltech_video(temp_dir.path(), "set06", "V000", &["[]", "[]", "[]"]);

    let config = CaltechPedestrian.task_config("detection_10x").unwrap();
    let splits: Vec<HarvestedSplit> = CaltechPedestrian
        .harvest(temp_dir.path(), &config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(splits.len(), 2);
    let train = &splits[0];
    assert_eq!(train.name, "train");
    // frames 2 and 5 of six
    assert_eq!(
        train.declared["image"],
        vec![
            "extracted_data/set00/V000/images/I00002.jpg",
            "extracted_data/set00/V000/images/I00005.jpg"
        ]
    );
    assert_eq!(train.records["objects"].len(), 2);
    assert_eq!(
        train.source.get(&["set00", "V000", "1", "annotation_filenames"]),
        Some(&SourceNode::Text(vec![
            "extracted_data/set00/V000/annotations/I00005.json".to_string()
        ]))
    );

    let test = &splits[1];
    assert_eq!(test.name, "test");
    assert_eq!(test.declared["image"].len(), 1);
    assert!(test.records.is_empty());
}

#[test]
fn test_caltech_malformed_annotation_names_split() {
    let temp_dir = TempDir::new().unwrap();
    write_caltech_video(temp_dir.path(), "set01", "V003", &["{not json"]);

    let config = CaltechPedestrian.task_config("detection_30x").unwrap();
    let mut splits = CaltechPedestrian.harvest(temp_dir.path(), &config).unwrap();
    let err = splits.next().unwrap().unwrap_err();
    assert!(matches!(&err, Error::Split { split, .. } if split == "train"));
    assert!(err.to_string().contains("Malformed annotation"));
}

#[test]
fn test_ucf_harvest_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let actions = temp_dir.path().join("ucf_sports_actions").join("ucf action");
    for (dir, videos) in [("Diving-Side", 4), ("Kicking-Front", 3), ("Kicking-Side", 3)] {
        for v in 0..videos {
            let video_dir = actions.join(dir).join(format!("{:03}", v));
            fs::create_dir_all(&video_dir).unwrap();
            for f in 0..v + 1 {
                fs::write(video_dir.join(format!("{:03}.jpg", f)), b"").unwrap();
            }
            if v == 0 {
                fs::write(video_dir.join("clip.avi"), b"").unwrap();
            }
        }
    }

    let mut config = UcfSports.task_config("recognition").unwrap();
    config.splits.count = 2;
    config.splits.seed = 7;

    let first: Vec<HarvestedSplit> = UcfSports
        .harvest(temp_dir.path(), &config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let second: Vec<HarvestedSplit> = UcfSports
        .harvest(temp_dir.path(), &config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let names: Vec<&str> = first.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["train01", "test01", "train02", "test02"]);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.declared, b.declared);
        assert_eq!(a.source, b.source);
    }

    // each pair covers all ten videos exactly once
    for pair in first.chunks(2) {
        let total = pair[0].declared["video"].len() + pair[1].declared["video"].len();
        assert_eq!(total, 10);
    }

    let videos = first
        .iter()
        .flat_map(|s| &s.records["videos"])
        .find(|r| r.key("video") == Some("Kicking-Front/000"))
        .unwrap();
    assert_eq!(
        videos.field("video_filenames"),
        Some(&FieldValue::Text(
            "ucf_sports_actions/ucf action/Kicking-Front/000/clip.avi".to_string()
        ))
    );
    assert_eq!(videos.key("activity"), Some("kicking"));
}

#[test]
fn test_ucf_unknown_activity_dir() {
    let temp_dir = TempDir::new().unwrap();
    let actions = temp_dir.path().join("ucf_sports_actions").join("ucf action");
    fs::create_dir_all(actions.join("Juggling").join("001")).unwrap();

    let config = UcfSports.task_config("recognition").unwrap();
    assert!(matches!(
        UcfSports.harvest(temp_dir.path(), &config),
        Err(Error::Harvest(_))
    ));
}

#[test]
fn test_listings_are_sorted() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("b")).unwrap();
    fs::create_dir(temp_dir.path().join("a")).unwrap();
    fs::write(temp_dir.path().join("I00001.JPG"), b"").unwrap();
    fs::write(temp_dir.path().join("I00000.jpg"), b"").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), b"").unwrap();

    assert_eq!(list_dirs(temp_dir.path()).unwrap(), vec!["a", "b"]);
    assert_eq!(
        list_files(temp_dir.path(), "jpg").unwrap(),
        vec!["I00000.jpg", "I00001.JPG"]
    );
}

#[cfg(unix)]
#[test]
fn test_listings_reject_non_utf8_names() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let temp_dir = TempDir::new().unwrap();
    let name = OsStr::from_bytes(b"I\xff0000.jpg");
    fs::write(temp_dir.path().join(name), b"").unwrap();
    fs::create_dir(temp_dir.path().join(OsStr::from_bytes(b"V\xfe00"))).unwrap();

    let err = list_files(temp_dir.path(), "jpg").unwrap_err();
    assert!(matches!(err, Error::Harvest(ref msg) if msg.contains("Non UTF-8")));
    assert!(matches!(list_dirs(temp_dir.path()), Err(Error::Harvest(_))));
}
