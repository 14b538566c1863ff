//! Concurrent mutations within one project.

use std::collections::HashSet;

use futures::future::join_all;

use cipherstudio_core::ErrorKind;
use cipherstudio_entity::node::NodeKind;
use cipherstudio_service::CreateNodeRequest;

use crate::helpers::TestApp;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_create_racing_folder_delete_leaves_no_orphans() {
    let app = TestApp::new();
    let project = app.create_project("race").await;
    let project_id = project.id;
    let root = app.root(project_id).await;

    for round in 0..50 {
        let folder_id = app
            .folder(project_id, root.id, &format!("scratch-{round}"))
            .await
            .id;

        let creator = {
            let tree = app.tree.clone();
            let ctx = app.owner.clone();
            tokio::spawn(async move {
                tree.create_node(
                    &ctx,
                    CreateNodeRequest {
                        project_id,
                        parent_id: Some(folder_id),
                        name: format!("late-{round}.js"),
                        kind: NodeKind::File,
                        content: Some("late".into()),
                    },
                )
                .await
            })
        };
        let deleter = {
            let tree = app.tree.clone();
            let ctx = app.owner.clone();
            tokio::spawn(async move { tree.delete_node(&ctx, folder_id).await })
        };

        let created = creator.await.unwrap();
        let deleted = deleter.await.unwrap();

        // Either ordering is fine; a create after the delete finds no parent.
        deleted.unwrap();
        if let Err(e) = created {
            assert!(e.is(ErrorKind::InvalidParent), "round {round}: {e}");
        }
    }

    let nodes = app.stored_nodes(project_id).await;
    let ids: HashSet<_> = nodes.iter().map(|n| n.id).collect();
    for node in &nodes {
        if let Some(parent_id) = node.parent_id {
            assert!(ids.contains(&parent_id), "orphan {}", node.name);
        }
    }
    assert_eq!(nodes.len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_all_land() {
    let app = TestApp::new();
    let project = app.create_project("busy").await;
    let project_id = project.id;
    let root_id = app.root(project_id).await.id;

    let tasks = (0..32).map(|i| {
        let tree = app.tree.clone();
        let ctx = app.owner.clone();
        tokio::spawn(async move {
            tree.create_node(
                &ctx,
                CreateNodeRequest {
                    project_id,
                    parent_id: Some(root_id),
                    name: format!("file-{i:02}.txt"),
                    kind: NodeKind::File,
                    content: Some(format!("body {i}")),
                },
            )
            .await
        })
    });

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let snapshot = app.tree.snapshot(&app.owner, project_id).await.unwrap();
    assert_eq!(snapshot.len(), 34);
    assert_eq!(snapshot["/file-07.txt"], "body 7");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_project_deletes_release_once() {
    let app = TestApp::new();
    let project_id = app.create_project("twice").await.id;

    let tasks = (0..4).map(|_| {
        let projects = app.projects.clone();
        let ctx = app.owner.clone();
        tokio::spawn(async move { projects.delete_project(&ctx, project_id).await })
    });

    let mut succeeded = 0;
    for result in join_all(tasks).await {
        match result.unwrap() {
            Ok(outcome) => {
                succeeded += 1;
                assert_eq!(outcome.blobs_released, 2);
            }
            Err(e) => assert!(e.is(ErrorKind::NotFound), "{e}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(app.blobs.delete_calls(), 2);
    assert!(app.blobs.is_empty().await);
}
