//! Projection from a library given as a relative path.
//!
//! Kept in its own test binary: it changes the process working directory.

#![cfg(unix)]

use lazer_link_core::{BeatmapSet, Catalog, LinkMode, Session};
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_links_from_relative_library_resolve() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(temp.path().join("lib/files")).unwrap();
    fs::write(temp.path().join("lib/client.realm"), b"realm").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(temp.path()).unwrap();

    let session = Session::open(Path::new("lib"), Path::new("out")).unwrap();
    let hash = session.library().file_store().insert(b"mp3").unwrap();
    let catalog = Catalog::new(vec![BeatmapSet::new(123).with_file("audio.mp3", &hash)]);

    let result = session.projector(LinkMode::Link).materialize_all(&catalog);
    assert!(result.is_success());

    let link = Path::new("out/123/audio.mp3");
    let target = fs::read_link(link).unwrap();
    assert!(target.is_absolute(), "link target {:?} is relative", target);
    assert_eq!(fs::read(link).unwrap(), b"mp3");

    let report = session.validator().validate().unwrap();
    assert!(report.is_clean());
    assert!(link.exists());

    env::set_current_dir(previous).unwrap();
}
