//! Project lifecycle: seeding, opening, ownership and cascading delete.

use std::time::Duration;

use cipherstudio_core::ErrorKind;
use cipherstudio_core::types::ProjectId;
use cipherstudio_entity::node::NodeKind;
use cipherstudio_service::project::seed::{APP_JS, INDEX_JS, SOURCE_FOLDER};
use cipherstudio_service::{CreateProjectRequest, UpdateProjectRequest};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_project_seeds_starter_tree() {
    let app = TestApp::new();
    let project = app.create_project("my-app").await;

    let nodes = app.stored_nodes(project.id).await;
    assert_eq!(nodes.len(), 4);

    let root = nodes.iter().find(|n| n.parent_id.is_none()).unwrap();
    assert_eq!(root.name, "my-app");
    assert_eq!(root.kind, NodeKind::Folder);

    let src = nodes
        .iter()
        .find(|n| n.parent_id == Some(root.id))
        .unwrap();
    assert_eq!(src.name, SOURCE_FOLDER);

    let files: Vec<_> = nodes.iter().filter(|n| n.is_file()).collect();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.parent_id == Some(src.id)));
    assert!(files.iter().all(|f| f.is_offloaded()));

    let snapshot = app.tree.snapshot(&app.owner, project.id).await.unwrap();
    let paths: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    assert_eq!(paths, ["/src/App.js", "/src/index.js"]);
    assert_eq!(snapshot["/src/App.js"], APP_JS);
    assert_eq!(snapshot["/src/index.js"], INDEX_JS);
}

#[tokio::test]
async fn test_create_project_rejects_bad_names() {
    let app = TestApp::new();
    let too_long = "x".repeat(101);

    for name in ["", "   ", too_long.as_str()] {
        let err = app
            .projects
            .create_project(
                &app.owner,
                CreateProjectRequest {
                    name: name.to_string(),
                    description: None,
                    template: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation), "name {name:?}");
    }
    assert!(app.nodes.is_empty().await);
}

#[tokio::test]
async fn test_get_project_touches_last_opened() {
    let app = TestApp::new();
    let project = app.create_project("opened").await;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let opened = app.projects.get_project(&app.owner, project.id).await.unwrap();

    assert!(opened.project.last_opened_at > project.last_opened_at);
    assert_eq!(opened.nodes.len(), 4);
}

#[tokio::test]
async fn test_list_projects_shows_only_own() {
    let app = TestApp::new();
    let older = app.create_project("older").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = app.create_project("newer").await;

    let stranger = app.stranger();
    assert!(app.projects.list_projects(&stranger).await.unwrap().is_empty());

    let ids: Vec<ProjectId> = app
        .projects
        .list_projects(&app.owner)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, [newer.id, older.id]);
}

#[tokio::test]
async fn test_stranger_is_forbidden() {
    let app = TestApp::new();
    let project = app.create_project("mine").await;
    let stranger = app.stranger();

    let err = app.projects.get_project(&stranger, project.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    let err = app
        .projects
        .update_project(
            &stranger,
            project.id,
            UpdateProjectRequest {
                name: Some("theirs".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    let err = app
        .projects
        .delete_project(&stranger, project.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    let err = app.tree.snapshot(&stranger, project.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Forbidden));

    assert_eq!(app.stored_nodes(project.id).await.len(), 4);
}

#[tokio::test]
async fn test_missing_project_is_not_found() {
    let app = TestApp::new();
    let err = app
        .projects
        .get_project(&app.owner, ProjectId::new())
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_update_project_keeps_root_folder_name() {
    let app = TestApp::new();
    let project = app.create_project("before").await;

    let updated = app
        .projects
        .update_project(
            &app.owner,
            project.id,
            UpdateProjectRequest {
                name: Some("after".into()),
                description: Some("renamed".into()),
                is_public: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "after");
    assert_eq!(updated.description, "renamed");
    assert!(updated.is_public);

    let root = app.root(project.id).await;
    assert_eq!(root.name, "before");

    // The old root name no longer matches, so it shows up in paths.
    let snapshot = app.tree.snapshot(&app.owner, project.id).await.unwrap();
    assert!(snapshot.contains_key("/before/src/App.js"));
}

#[tokio::test]
async fn test_delete_project_cascades() {
    let app = TestApp::new();
    let doomed = app.create_project("doomed").await;
    let root = app.root(doomed.id).await;
    let lib = app.folder(doomed.id, root.id, "lib").await;
    app.file(doomed.id, lib.id, "util.js", "export {}").await;
    let keeper = app.create_project("keeper").await;

    let keeper_blobs = app.blobs.len().await - 3;
    let outcome = app
        .projects
        .delete_project(&app.owner, doomed.id)
        .await
        .unwrap();

    assert_eq!(outcome.nodes_removed, 6);
    assert_eq!(outcome.blobs_released, 3);
    assert_eq!(outcome.blobs_failed, 0);
    assert!(app.stored_nodes(doomed.id).await.is_empty());
    assert_eq!(app.blobs.len().await, keeper_blobs);

    let err = app.projects.get_project(&app.owner, doomed.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    assert_eq!(app.stored_nodes(keeper.id).await.len(), 4);
    let snapshot = app.tree.snapshot(&app.owner, keeper.id).await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_delete_project_attempts_every_blob() {
    let app = TestApp::new();
    let project = app.create_project("stubborn").await;
    let root = app.root(project.id).await;
    app.file(project.id, root.id, "extra.txt", "more").await;

    app.blobs.fail_deletes(true);
    let outcome = app
        .projects
        .delete_project(&app.owner, project.id)
        .await
        .unwrap();

    assert_eq!(outcome.blobs_failed, 3);
    assert_eq!(outcome.blobs_released, 0);
    assert_eq!(app.blobs.delete_calls(), 3);
    assert!(app.stored_nodes(project.id).await.is_empty());
}
