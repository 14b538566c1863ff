//! File and folder operations over the in-memory stores.

use cipherstudio_core::ErrorKind;
use cipherstudio_core::config::TieringConfig;
use cipherstudio_entity::node::NodeKind;
use cipherstudio_service::CreateNodeRequest;

use crate::helpers::TestApp;

fn inline_only() -> TieringConfig {
    TieringConfig {
        offload_threshold_bytes: u64::MAX,
        ..TieringConfig::default()
    }
}

#[tokio::test]
async fn test_inline_body_round_trips() {
    let app = TestApp::with_tiering(inline_only());
    let project = app.create_project("inline").await;
    let root = app.root(project.id).await;
    let blobs_after_seed = app.blobs.len().await;

    let file = app.file(project.id, root.id, "notes.md", "# hello").await;
    assert!(!file.is_offloaded());
    assert_eq!(app.blobs.len().await, blobs_after_seed);

    let fetched = app.tree.get_node(&app.owner, file.id).await.unwrap();
    assert_eq!(fetched.body(), "# hello");
    assert_eq!(fetched.size_bytes, Some(7));
    assert_eq!(fetched.extension.as_deref(), Some("md"));
}

#[tokio::test]
async fn test_offloaded_body_round_trips() {
    let app = TestApp::new();
    let project = app.create_project("offload").await;
    let root = app.root(project.id).await;

    let body = "export const answer = 42;";
    let file = app.file(project.id, root.id, "answer.js", body).await;
    let key = file.blob_key.clone().expect("body offloaded");
    assert_eq!(file.body(), "");
    assert!(app.blobs.contains(&key).await);
    assert_eq!(
        app.blobs.content_type(&key).await.as_deref(),
        Some("application/javascript")
    );

    let fetched = app.tree.get_node(&app.owner, file.id).await.unwrap();
    assert_eq!(fetched.body(), body);
    assert_eq!(fetched.size_bytes, Some(body.len() as i64));

    app.tree
        .update_file_content(&app.owner, file.id, "export const answer = 43;")
        .await
        .unwrap();
    let fetched = app.tree.get_node(&app.owner, file.id).await.unwrap();
    assert_eq!(fetched.body(), "export const answer = 43;");
    assert_eq!(fetched.blob_key.as_deref(), Some(key.as_str()));
}

#[tokio::test]
async fn test_empty_file_stays_inline() {
    let app = TestApp::new();
    let project = app.create_project("empty").await;
    let root = app.root(project.id).await;

    let file = app.file(project.id, root.id, "blank.txt", "").await;
    assert!(!file.is_offloaded());
    assert_eq!(file.size_bytes, Some(0));
}

#[tokio::test]
async fn test_rename_recomputes_extension_and_keeps_blob() {
    let app = TestApp::new();
    let project = app.create_project("rename").await;
    let root = app.root(project.id).await;
    let file = app.file(project.id, root.id, "a.txt", "{}").await;

    let renamed = app
        .tree
        .rename_node(&app.owner, file.id, "b.json")
        .await
        .unwrap();
    assert_eq!(renamed.name, "b.json");
    assert_eq!(renamed.extension.as_deref(), Some("json"));
    assert_eq!(renamed.blob_key, file.blob_key);

    let fetched = app.tree.get_node(&app.owner, file.id).await.unwrap();
    assert_eq!(fetched.body(), "{}");
}

#[tokio::test]
async fn test_file_parent_is_rejected() {
    let app = TestApp::new();
    let project = app.create_project("parents").await;
    let root = app.root(project.id).await;
    let file = app.file(project.id, root.id, "main.js", "1").await;

    let err = app
        .tree
        .create_node(
            &app.owner,
            CreateNodeRequest {
                project_id: project.id,
                parent_id: Some(file.id),
                name: "child.js".into(),
                kind: NodeKind::File,
                content: Some("2".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidParent));
}

#[tokio::test]
async fn test_parent_from_other_project_is_rejected() {
    let app = TestApp::new();
    let first = app.create_project("first").await;
    let second = app.create_project("second").await;
    let foreign_root = app.root(second.id).await;

    let err = app
        .tree
        .create_node(
            &app.owner,
            CreateNodeRequest {
                project_id: first.id,
                parent_id: Some(foreign_root.id),
                name: "stray".into(),
                kind: NodeKind::Folder,
                content: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidParent));
}

#[tokio::test]
async fn test_failed_blob_put_writes_no_record() {
    let app = TestApp::new();
    let project = app.create_project("degraded").await;
    let root = app.root(project.id).await;
    let before = app.stored_nodes(project.id).await.len();

    app.blobs.fail_puts(true);
    let err = app
        .tree
        .create_node(
            &app.owner,
            CreateNodeRequest {
                project_id: project.id,
                parent_id: Some(root.id),
                name: "lost.js".into(),
                kind: NodeKind::File,
                content: Some("let x;".into()),
            },
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Storage));
    assert_eq!(app.stored_nodes(project.id).await.len(), before);
}

#[tokio::test]
async fn test_unreadable_blob_returns_metadata() {
    let app = TestApp::new();
    let project = app.create_project("unreadable").await;
    let root = app.root(project.id).await;
    let file = app.file(project.id, root.id, "data.csv", "a,b").await;

    app.blobs.fail_gets(true);
    let fetched = app.tree.get_node(&app.owner, file.id).await.unwrap();
    assert_eq!(fetched.name, "data.csv");
    assert_eq!(fetched.body(), "");
    assert_eq!(fetched.size_bytes, Some(3));
}

#[tokio::test]
async fn test_writing_folder_content_is_rejected() {
    let app = TestApp::new();
    let project = app.create_project("folders").await;
    let root = app.root(project.id).await;

    let err = app
        .tree
        .update_file_content(&app.owner, root.id, "nope")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidOperation));
}

#[tokio::test]
async fn test_delete_subtree_leaves_siblings() {
    let app = TestApp::new();
    let project = app.create_project("subtree").await;
    let root = app.root(project.id).await;

    let a = app.folder(project.id, root.id, "a").await;
    let x = app.file(project.id, a.id, "x.js", "x").await;
    let b = app.folder(project.id, a.id, "b").await;
    let y = app.file(project.id, b.id, "y.js", "y").await;
    let c = app.folder(project.id, root.id, "c").await;
    let z = app.file(project.id, c.id, "z.js", "z").await;

    let removed = app.tree.delete_node(&app.owner, a.id).await.unwrap();
    assert_eq!(removed, 4);

    let remaining = app.stored_nodes(project.id).await;
    for gone in [&a, &x, &b, &y] {
        assert!(remaining.iter().all(|n| n.id != gone.id));
    }
    assert!(remaining.iter().any(|n| n.id == c.id));
    assert!(remaining.iter().any(|n| n.id == z.id));

    for released in [&x, &y] {
        let key = released.blob_key.as_deref().unwrap();
        assert!(!app.blobs.contains(key).await);
    }
    assert!(app.blobs.contains(z.blob_key.as_deref().unwrap()).await);
}

#[tokio::test]
async fn test_delete_succeeds_when_blob_release_fails() {
    let app = TestApp::new();
    let project = app.create_project("sticky").await;
    let root = app.root(project.id).await;
    let dir = app.folder(project.id, root.id, "tmp").await;
    let file = app.file(project.id, dir.id, "cache.json", "[]").await;

    app.blobs.fail_deletes(true);
    let removed = app.tree.delete_node(&app.owner, dir.id).await.unwrap();
    assert_eq!(removed, 2);

    let remaining = app.stored_nodes(project.id).await;
    assert!(remaining.iter().all(|n| n.id != file.id));
    assert!(app.blobs.contains(file.blob_key.as_deref().unwrap()).await);
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let app = TestApp::new();
    let project = app.create_project("moves").await;
    let root = app.root(project.id).await;
    let outer = app.folder(project.id, root.id, "outer").await;
    let inner = app.folder(project.id, outer.id, "inner").await;

    let err = app
        .tree
        .move_node(&app.owner, outer.id, inner.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidParent));

    let err = app
        .tree
        .move_node(&app.owner, outer.id, outer.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidParent));

    let moved = app.tree.move_node(&app.owner, inner.id, root.id).await.unwrap();
    assert_eq!(moved.parent_id, Some(root.id));
}

#[tokio::test]
async fn test_children_are_listed_folders_first() {
    let app = TestApp::new();
    let project = app.create_project("order").await;
    let root = app.root(project.id).await;
    app.file(project.id, root.id, "b.js", "b").await;
    app.folder(project.id, root.id, "z").await;
    app.file(project.id, root.id, "a.js", "a").await;

    let names: Vec<String> = app
        .tree
        .list_children(&app.owner, project.id, Some(root.id))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, ["src", "z", "a.js", "b.js"]);
}

#[tokio::test]
async fn test_stranger_cannot_touch_nodes() {
    let app = TestApp::new();
    let project = app.create_project("private").await;
    let root = app.root(project.id).await;
    let file = app.file(project.id, root.id, "secret.txt", "s3cr3t").await;
    let stranger = app.stranger();

    let err = app.tree.get_node(&stranger, file.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    let err = app.tree.delete_node(&stranger, file.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    let err = app
        .tree
        .list_children(&stranger, project.id, None)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));
}
