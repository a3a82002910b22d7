//! Child resolution and listing for bucket-backed directories.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use store::{Bucket, CreateObjectRequest, MemoryBucket, Object};

use bucketfs::{ChildKind, DirInode, ExplicitDirInode, FsConfig, InodeId, Name};
use common::{init_tracing, test_attrs, CountingBucket};

fn config(implicit_dirs: bool) -> FsConfig {
    FsConfig {
        implicit_dirs,
        ..FsConfig::with_owner(1000, 1000)
    }
}

async fn put(bucket: &Arc<CountingBucket>, name: &str) -> Object {
    bucket
        .create_object(CreateObjectRequest {
            name: name.to_string(),
            contents: Bytes::from_static(b"contents"),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn bucket_with(names: &[&str]) -> Arc<CountingBucket> {
    let bucket = Arc::new(CountingBucket::new(Arc::new(MemoryBucket::new("b"))));
    for name in names {
        put(&bucket, name).await;
    }
    bucket
}

fn dir_at_root(bucket: Arc<CountingBucket>, implicit_dirs: bool) -> DirInode {
    DirInode::new(
        InodeId(2),
        Name::bucket_root("b"),
        test_attrs(),
        &config(implicit_dirs),
        bucket,
    )
}

#[tokio::test]
async fn file_child_resolves_with_backing_object() {
    init_tracing();
    let bucket = bucket_with(&["file"]).await;
    let dir = dir_at_root(bucket, false);

    let result = dir.look_up_child("file").await.unwrap().unwrap();
    assert_eq!(result.full_name, Name::object("b", "file"));
    assert_eq!(result.object.as_ref().unwrap().name, "file");
    assert!(!result.implicit_dir);
}

#[tokio::test]
async fn explicit_dir_child_resolves_from_marker() {
    let bucket = bucket_with(&["dir/", "dir/inner"]).await;
    let dir = dir_at_root(bucket, false);

    let result = dir.look_up_child("dir").await.unwrap().unwrap();
    assert_eq!(result.full_name, Name::object("b", "dir/"));
    assert_eq!(result.object.as_ref().unwrap().name, "dir/");
    assert!(!result.implicit_dir);
}

#[tokio::test]
async fn directories_shadow_files_of_the_same_name() {
    let bucket = bucket_with(&["both", "both/"]).await;
    let dir = dir_at_root(bucket, false);

    let result = dir.look_up_child("both").await.unwrap().unwrap();
    assert!(result.full_name.is_dir());
}

#[tokio::test]
async fn implicit_dir_requires_the_flag() {
    let bucket = bucket_with(&["implied/leaf"]).await;

    let dir = dir_at_root(bucket.clone(), false);
    assert!(dir.look_up_child("implied").await.unwrap().is_none());

    let dir = dir_at_root(bucket, true);
    let result = dir.look_up_child("implied").await.unwrap().unwrap();
    assert!(result.implicit_dir);
    assert!(result.object.is_none());
    assert_eq!(result.full_name, Name::object("b", "implied/"));
}

#[tokio::test]
async fn child_kind_cache_avoids_redundant_stats() {
    let bucket = bucket_with(&["file"]).await;
    let dir = dir_at_root(bucket.clone(), false);
    let baseline = bucket.stat_count();

    // Full resolution stats the dir flavor first, then the file.
    dir.look_up_child("file").await.unwrap().unwrap();
    assert_eq!(bucket.stat_count() - baseline, 2);

    // The cached kind narrows the repeat lookup to one stat.
    dir.look_up_child("file").await.unwrap().unwrap();
    assert_eq!(bucket.stat_count() - baseline, 3);
}

#[tokio::test]
async fn negative_lookups_are_not_cached() {
    let bucket = bucket_with(&["file"]).await;
    let dir = dir_at_root(bucket.clone(), false);
    let baseline = bucket.stat_count();

    assert!(dir.look_up_child("missing").await.unwrap().is_none());
    assert!(dir.look_up_child("missing").await.unwrap().is_none());

    // Both lookups performed the full two-stat resolution.
    assert_eq!(bucket.stat_count() - baseline, 4);
}

#[tokio::test]
async fn stale_kind_hint_falls_back_to_full_resolution() {
    let bucket = bucket_with(&["entry"]).await;
    let dir = dir_at_root(bucket.clone(), false);

    dir.look_up_child("entry").await.unwrap().unwrap();

    // The file disappears and a directory of the same name appears.
    bucket.delete_object("entry").await.unwrap();
    put(&bucket, "entry/").await;

    let result = dir.look_up_child("entry").await.unwrap().unwrap();
    assert!(result.full_name.is_dir());
}

#[tokio::test]
async fn read_entries_without_implicit_dirs() {
    let bucket = bucket_with(&["a", "dir/", "dir/x", "implied/y"]).await;
    let dir = dir_at_root(bucket, false);

    let entries = dir.read_entries().await.unwrap();
    let summary: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
    assert_eq!(
        summary,
        vec![("a", ChildKind::File), ("dir", ChildKind::Dir)]
    );
    // The explicit dir entry carries its marker object.
    assert_eq!(entries[1].object.as_ref().unwrap().name, "dir/");
}

#[tokio::test]
async fn read_entries_with_implicit_dirs() {
    let bucket = bucket_with(&["a", "dir/", "dir/x", "implied/y"]).await;
    let dir = dir_at_root(bucket, true);

    let entries = dir.read_entries().await.unwrap();
    let summary: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
    assert_eq!(
        summary,
        vec![
            ("a", ChildKind::File),
            ("dir", ChildKind::Dir),
            ("implied", ChildKind::Dir),
        ]
    );
    // The implied dir has no marker object to carry.
    assert!(entries[2].object.is_none());
}

#[tokio::test]
async fn nested_dir_resolves_relative_children() {
    let bucket = bucket_with(&["dir/", "dir/leaf", "dir/sub/", "dir/sub/deep"]).await;
    let marker = bucket.stat_object("dir/").await.unwrap();
    let dir = DirInode::new(
        InodeId(3),
        Name::object("b", "dir/"),
        test_attrs(),
        &config(false),
        bucket,
    );
    assert_eq!(marker.name, "dir/");

    let result = dir.look_up_child("leaf").await.unwrap().unwrap();
    assert_eq!(result.full_name, Name::object("b", "dir/leaf"));

    let result = dir.look_up_child("sub").await.unwrap().unwrap();
    assert_eq!(result.full_name, Name::object("b", "dir/sub/"));

    let entries = dir.read_entries().await.unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["leaf", "sub"]);
}

#[tokio::test]
async fn explicit_dir_captures_marker_generation() {
    let bucket = bucket_with(&["dir/", "dir/inner"]).await;
    let marker = bucket.stat_object("dir/").await.unwrap();

    let dir = ExplicitDirInode::new(
        InodeId(4),
        Name::object("b", "dir/"),
        &marker,
        test_attrs(),
        &config(false),
        bucket.clone(),
    );

    assert_eq!(dir.source_generation(), marker.generation_pair());

    // The generation is fixed at construction; a marker rewrite does not
    // change what the inode reports.
    put(&bucket, "dir/").await;
    assert_eq!(dir.source_generation(), marker.generation_pair());

    // Directory behavior delegates to the wrapped implementation.
    let result = dir.look_up_child("inner").await.unwrap().unwrap();
    assert_eq!(result.full_name, Name::object("b", "dir/inner"));
}
