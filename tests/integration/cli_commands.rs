//! CLI-level checks against a dump-file memory source.

use std::fs;

use assert_cmd::Command;
use rbprobe::testkit::{store_image, StoredNode};
use tempfile::tempdir;

fn rbprobe() -> Command {
    Command::cargo_bin("rbprobe").expect("rbprobe binary builds")
}

fn write_dump(nodes: &[StoredNode], root: Option<u64>) -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("tree.img");
    fs::write(&path, store_image(root, nodes)).expect("write dump");
    let path = path.to_str().expect("utf-8 path").to_string();
    (dir, path)
}

#[test]
fn dot_command_prints_graph_for_dump_file() {
    let nodes = [
        StoredNode {
            red: false,
            parent: None,
            left: Some(1),
            right: Some(2),
            value: 10,
        },
        StoredNode {
            red: true,
            parent: Some(0),
            left: None,
            right: None,
            value: 5,
        },
        StoredNode {
            red: false,
            parent: Some(0),
            left: None,
            right: None,
            value: 20,
        },
    ];
    let (_dir, path) = write_dump(&nodes, Some(0));

    let assert = rbprobe()
        .args(["dot", "--image", &path])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("digraph G {"));
    assert!(stdout.contains("graph [ordering=\"out\"];"));
    assert!(stdout.contains("10 [label=\"0,10\", color=\"black\"];"));
    assert!(stdout.contains("5 [label=\"1,5\", color=\"red\"];"));
    assert!(stdout.contains("10 -> 5;"));
    assert!(stdout.contains("10 -> 20;"));
    assert!(!stdout.contains("shape=point"), "leaves draw no placeholders");
}

#[test]
fn dot_command_respects_nonzero_image_base() {
    let nodes = [StoredNode {
        red: false,
        parent: None,
        left: None,
        right: None,
        value: 1,
    }];
    let (_dir, path) = write_dump(&nodes, Some(0));

    rbprobe()
        .args([
            "dot",
            "--image",
            &path,
            "--base",
            "0x7f0000000000",
            "--addr",
            "0x7f0000000000",
        ])
        .assert()
        .success();
}

#[test]
fn info_command_summarizes_snapshot() {
    let nodes = [StoredNode {
        red: true,
        parent: None,
        left: None,
        right: None,
        value: 42,
    }];
    let (_dir, path) = write_dump(&nodes, Some(0));

    let assert = rbprobe()
        .args(["info", "--image", &path])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Nodes"));
    assert!(stdout.contains("42"));
    assert!(stdout.contains("red"));
}

#[test]
fn corrupted_dump_fails_the_command() {
    let nodes = [StoredNode {
        red: false,
        parent: None,
        left: None,
        right: Some(9), // out of range
        value: 3,
    }];
    let (_dir, path) = write_dump(&nodes, Some(0));

    let assert = rbprobe()
        .args(["dot", "--image", &path])
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("out of range"), "stderr was: {stderr}");
}

#[test]
fn missing_source_is_an_error() {
    rbprobe().arg("dot").assert().failure();
}
