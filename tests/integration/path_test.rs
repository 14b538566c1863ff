//! Path resolution over trees built through the services.

use cipherstudio_core::config::TieringConfig;
use cipherstudio_service::{PathResolver, resolve_path};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_nested_paths_skip_project_root() {
    let app = TestApp::new();
    let project = app.create_project("site").await;
    let root = app.root(project.id).await;
    let components = app.folder(project.id, root.id, "components").await;
    let forms = app.folder(project.id, components.id, "forms").await;
    let input = app.file(project.id, forms.id, "Input.jsx", "<input />").await;

    let nodes = app.tree.list_project_nodes(&app.owner, project.id).await.unwrap();
    assert_eq!(
        resolve_path(&project.name, &input, &nodes),
        "/components/forms/Input.jsx"
    );
    assert_eq!(resolve_path(&project.name, &forms, &nodes), "/components/forms");

    let snapshot = app.tree.snapshot(&app.owner, project.id).await.unwrap();
    assert_eq!(snapshot["/components/forms/Input.jsx"], "<input />");
}

#[tokio::test]
async fn test_paths_follow_moves_and_renames() {
    let app = TestApp::new();
    let project = app.create_project("shuffle").await;
    let root = app.root(project.id).await;
    let from = app.folder(project.id, root.id, "from").await;
    let to = app.folder(project.id, root.id, "to").await;
    let file = app.file(project.id, from.id, "a.txt", "moving").await;

    app.tree.move_node(&app.owner, file.id, to.id).await.unwrap();
    app.tree.rename_node(&app.owner, file.id, "b.json").await.unwrap();

    let snapshot = app.tree.snapshot(&app.owner, project.id).await.unwrap();
    assert!(!snapshot.contains_key("/from/a.txt"));
    assert_eq!(snapshot["/to/b.json"], "moving");
}

#[tokio::test]
async fn test_file_paths_match_snapshot_keys() {
    let app = TestApp::with_tiering(TieringConfig {
        hydration_concurrency: 1,
        ..TieringConfig::default()
    });
    let project = app.create_project("listing").await;
    let root = app.root(project.id).await;
    app.file(project.id, root.id, "README.md", "# listing").await;

    let nodes = app.tree.list_project_nodes(&app.owner, project.id).await.unwrap();
    let resolver = PathResolver::new(&project.name, &nodes);
    let mut paths: Vec<String> = resolver.files(&nodes).into_iter().map(|(p, _)| p).collect();
    paths.sort();

    let snapshot = app.tree.snapshot(&app.owner, project.id).await.unwrap();
    let keys: Vec<String> = snapshot.into_keys().collect();
    assert_eq!(paths, keys);
    assert_eq!(keys, ["/README.md", "/src/App.js", "/src/index.js"]);
}
