//! End-to-end tests over the process-wide registry: handler flows, the
//! freshness lifecycle, and the TCP request/response surface.

use serial_test::serial;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::UNIX_EPOCH;

use api_model::protocol::message::api_request_message::{ApiRequestKind, ApiRequestMessage};
use api_model::protocol::message::api_response_message::{ApiResponseKind, ApiResponseMessage};
use api_model::protocol::models::api_error::ErrorCode;
use api_model::protocol::models::graph::fetch_graph::FetchGraphRequest;
use api_model::protocol::models::graph::graph_view::GraphStatus;
use api_model::protocol::models::graph::list_graphs::ListGraphsRequest;
use api_model::protocol::models::graph::register_graph::RegisterGraphRequest;
use api_model::protocol::models::graph::upload_graph::UploadGraphRequest;
use api_model::protocol::protocol::Protocol;

use server::config::{Config, EnvVar};
use server::constants::UPLOAD_DIR_NAME;
use server::global_var::{ENV_VAR, LOGGER_CELL};
use server::interface::ApiListener;
use server::interface::handlers::run_handler;
use server::registry::{REGISTRY, init_registry, init_working_dir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

static TEST_WORKING_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Set up the shared process-wide environment once: a temp working dir,
/// the file logger, the resolved config and the registry.
async fn ensure_env() -> &'static Path {
    if let Some(p) = TEST_WORKING_DIR.get() {
        return p;
    }
    let mut wd = std::env::temp_dir();
    wd.push(format!("graph_registry_it_{}", std::process::id()));
    std::fs::create_dir_all(&wd).expect("create working dir");

    let (logger, _logger_task) = init_working_dir(&wd).await.expect("init working dir");
    let _ = LOGGER_CELL.set(logger);

    let mut cfg = Config::new();
    cfg.app_config.working_dir = wd.to_string_lossy().to_string();
    let _ = ENV_VAR.set(EnvVar::from_config(&cfg).expect("resolve env"));

    init_registry().await.expect("init registry");
    let _ = TEST_WORKING_DIR.set(wd);
    TEST_WORKING_DIR.get().unwrap().as_path()
}

fn graph_file(wd: &Path, name: &str, content: &str) -> String {
    let p = wd.join(name);
    std::fs::write(&p, content).expect("write graph file");
    p.to_string_lossy().to_string()
}

/// Push an entry's watermark back to the epoch so the live file reads as
/// changed without sleeping past mtime granularity.
async fn rewind_watermark(path: &str) {
    let path = path.to_string();
    REGISTRY
        .store()
        .update(move |map| {
            map.get_mut(&path).expect("tracked entry").stored_mtime = UNIX_EPOCH;
            Ok(())
        })
        .await
        .expect("rewind watermark");
}

fn find_row<'a>(
    resp: &'a ApiResponseKind,
    path: &str,
) -> &'a api_model::protocol::models::graph::graph_view::GraphView {
    match resp {
        ApiResponseKind::ListGraphs(list) => list
            .graphs
            .iter()
            .find(|g| g.path == path)
            .expect("row for path"),
        other => panic!("expected listing, got {:?}", other),
    }
}

async fn list() -> ApiResponseKind {
    run_handler(&ApiRequestKind::ListGraphs(ListGraphsRequest)).await
}

#[tokio::test]
#[serial]
async fn freshness_lifecycle_over_handlers() {
    let wd = ensure_env().await;
    let path = graph_file(wd, "lifecycle.json", "{\"nodes\":[1]}");

    // Register: NEW, and NEW survives repeated listings.
    let resp = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
        path: path.clone(),
        label: "lifecycle".into(),
    }))
    .await;
    match &resp {
        ApiResponseKind::RegisterGraph(r) => assert_eq!(r.status, GraphStatus::New),
        other => panic!("expected register response, got {:?}", other),
    }
    for _ in 0..2 {
        let listing = list().await;
        let row = find_row(&listing, &path);
        assert_eq!(row.status, GraphStatus::New);
        assert_eq!(row.display_mtime, None);
    }

    // Fetch acknowledges: content comes back, status drops to NORMAL.
    let resp = run_handler(&ApiRequestKind::FetchGraph(FetchGraphRequest {
        path: path.clone(),
    }))
    .await;
    match &resp {
        ApiResponseKind::FetchGraph(r) => assert_eq!(r.content, b"{\"nodes\":[1]}"),
        other => panic!("expected fetch response, got {:?}", other),
    }
    let listing = list().await;
    assert_eq!(find_row(&listing, &path).status, GraphStatus::Normal);

    // A change past the watermark shows UPDATED with a rendered mtime, and
    // the banner survives any number of listings.
    rewind_watermark(&path).await;
    for _ in 0..3 {
        let listing = list().await;
        let row = find_row(&listing, &path);
        assert_eq!(row.status, GraphStatus::Updated);
        assert!(row.display_mtime.is_some());
    }

    // Fetch again: acknowledged, banner gone. A second fetch is idempotent.
    for _ in 0..2 {
        let resp = run_handler(&ApiRequestKind::FetchGraph(FetchGraphRequest {
            path: path.clone(),
        }))
        .await;
        assert!(matches!(resp, ApiResponseKind::FetchGraph(_)));
        let listing = list().await;
        let row = find_row(&listing, &path);
        assert_eq!(row.status, GraphStatus::Normal);
        assert_eq!(row.display_mtime, None);
    }

    // Deleting the file surfaces MISSING without touching the record.
    let before = REGISTRY.store().load_all().await;
    std::fs::remove_file(&path).unwrap();
    let listing = list().await;
    assert_eq!(find_row(&listing, &path).status, GraphStatus::Missing);
    assert_eq!(REGISTRY.store().load_all().await, before);

    // Fetching the missing file fails; the record still stays intact.
    let resp = run_handler(&ApiRequestKind::FetchGraph(FetchGraphRequest {
        path: path.clone(),
    }))
    .await;
    match resp {
        ApiResponseKind::Error(e) => assert_eq!(e.code, ErrorCode::NotFound),
        other => panic!("expected error response, got {:?}", other),
    }
    assert_eq!(REGISTRY.store().load_all().await, before);
}

#[tokio::test]
#[serial]
async fn re_register_marks_updated_and_overwrites_label() {
    let wd = ensure_env().await;
    let path = graph_file(wd, "relabel.json", "{}");

    let first = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
        path: path.clone(),
        label: "old label".into(),
    }))
    .await;
    match first {
        ApiResponseKind::RegisterGraph(r) => assert_eq!(r.status, GraphStatus::New),
        other => panic!("expected register response, got {:?}", other),
    }

    let second = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
        path: path.clone(),
        label: "new label".into(),
    }))
    .await;
    match second {
        ApiResponseKind::RegisterGraph(r) => assert_eq!(r.status, GraphStatus::Updated),
        other => panic!("expected register response, got {:?}", other),
    }

    let listing = list().await;
    let row = find_row(&listing, &path);
    assert_eq!(row.label, "new label");
    assert_eq!(row.status, GraphStatus::Updated);
}

#[tokio::test]
#[serial]
async fn register_validation_errors() {
    let wd = ensure_env().await;
    let path = graph_file(wd, "valid.json", "{}");

    let empty_label = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
        path: path.clone(),
        label: "  ".into(),
    }))
    .await;
    match empty_label {
        ApiResponseKind::Error(e) => assert_eq!(e.code, ErrorCode::InvalidInput),
        other => panic!("expected error response, got {:?}", other),
    }

    let no_file = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
        path: "/no/such/file.json".into(),
        label: "x".into(),
    }))
    .await;
    match no_file {
        ApiResponseKind::Error(e) => assert_eq!(e.code, ErrorCode::InvalidInput),
        other => panic!("expected error response, got {:?}", other),
    }

    // Neither attempt may create an entry.
    let map = REGISTRY.store().load_all().await;
    assert!(!map.contains_key(&path));
    assert!(!map.contains_key("/no/such/file.json"));
}

#[tokio::test]
#[serial]
async fn upload_sanitizes_names_and_tracks_the_result() {
    let wd = ensure_env().await;

    // A traversal-shaped name lands flat in the upload dir.
    let resp = run_handler(&ApiRequestKind::UploadGraph(UploadGraphRequest {
        file_name: "../../escape.json".into(),
        content: b"{\"v\":1}".to_vec(),
    }))
    .await;
    let uploaded_path = match resp {
        ApiResponseKind::UploadGraph(r) => {
            assert_eq!(r.status, GraphStatus::New);
            r.path
        }
        other => panic!("expected upload response, got {:?}", other),
    };
    let expected = wd.join(UPLOAD_DIR_NAME).join("escape.json");
    assert_eq!(uploaded_path, expected.to_string_lossy());
    assert_eq!(std::fs::read(&expected).unwrap(), b"{\"v\":1}");

    // Re-uploading the same name replaces the content and reads UPDATED.
    let resp = run_handler(&ApiRequestKind::UploadGraph(UploadGraphRequest {
        file_name: "escape.json".into(),
        content: b"{\"v\":2}".to_vec(),
    }))
    .await;
    match resp {
        ApiResponseKind::UploadGraph(r) => assert_eq!(r.status, GraphStatus::Updated),
        other => panic!("expected upload response, got {:?}", other),
    }
    assert_eq!(std::fs::read(&expected).unwrap(), b"{\"v\":2}");

    // Wrong extension and unusable names are rejected up front.
    for name in ["notes.txt", "", "..", "/"] {
        let resp = run_handler(&ApiRequestKind::UploadGraph(UploadGraphRequest {
            file_name: name.into(),
            content: b"{}".to_vec(),
        }))
        .await;
        match resp {
            ApiResponseKind::Error(e) => assert_eq!(e.code, ErrorCode::InvalidInput, "{name}"),
            other => panic!("expected error for '{}', got {:?}", name, other),
        }
    }
}

#[tokio::test]
#[serial]
async fn listing_orders_attention_first_over_the_wire() {
    let wd = ensure_env().await;

    // Reset the document so ordering is not polluted by other tests.
    REGISTRY
        .store()
        .update(|map| {
            map.clear();
            Ok(())
        })
        .await
        .unwrap();

    let p_normal_b = graph_file(wd, "ord1.json", "{}");
    let p_new_z = graph_file(wd, "ord2.json", "{}");
    let p_updated_a = graph_file(wd, "ord3.json", "{}");
    let p_normal_m = graph_file(wd, "ord4.json", "{}");

    for (p, l) in [
        (&p_normal_b, "b"),
        (&p_new_z, "z"),
        (&p_updated_a, "a"),
        (&p_normal_m, "m"),
    ] {
        let resp = run_handler(&ApiRequestKind::RegisterGraph(RegisterGraphRequest {
            path: p.to_string(),
            label: l.to_string(),
        }))
        .await;
        assert!(matches!(resp, ApiResponseKind::RegisterGraph(_)));
    }
    for p in [&p_normal_b, &p_updated_a, &p_normal_m] {
        let resp = run_handler(&ApiRequestKind::FetchGraph(FetchGraphRequest {
            path: p.to_string(),
        }))
        .await;
        assert!(matches!(resp, ApiResponseKind::FetchGraph(_)));
    }
    rewind_watermark(&p_updated_a).await;

    // Over the TCP surface, exactly as a client would see it.
    let listener = ApiListener::bind_on(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .expect("bind");
    let dest = listener.local_addr().unwrap();
    let handle = listener.into_task();

    let mut client = TcpStream::connect(dest).await.expect("connect");
    let req = ApiRequestMessage::new(ApiRequestKind::ListGraphs(ListGraphsRequest));
    client.write_all(&req.serialize()).await.expect("send");
    let _ = client.shutdown().await;
    let mut raw = Vec::new();
    client.read_to_end(&mut raw).await.expect("receive");
    let msg = ApiResponseMessage::deserialize(&raw).expect("decode");

    match msg.response {
        ApiResponseKind::ListGraphs(listing) => {
            let labels: Vec<&str> = listing.graphs.iter().map(|g| g.label.as_str()).collect();
            assert_eq!(labels, ["z", "a", "b", "m"]);
            assert_eq!(listing.graphs[0].status, GraphStatus::New);
            assert_eq!(listing.graphs[1].status, GraphStatus::Updated);
            assert!(listing.graphs[1].display_mtime.is_some());
        }
        other => panic!("expected listing, got {:?}", other),
    }

    handle.shutdown().await.expect("shutdown");
}
