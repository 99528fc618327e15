//! End-to-end deploy runs against a scripted local Notehub.

use std::sync::{Arc, Mutex};

use notehub_deploy_api::Client;
use notehub_deploy_core::{DeployError, DeployMode, DeployOrchestrator, DeploymentConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Request line and body of one request received by the server.
#[derive(Debug, Clone)]
struct Seen {
    request_line: String,
    authorization: Option<String>,
    body: String,
}

async fn read_request(stream: &mut TcpStream) -> Seen {
    let mut data = Vec::new();
    let mut buf = vec![0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break data.len();
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let header = |name: &str| {
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    };
    let content_length = header("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    Seen {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        authorization: header("authorization"),
        body: String::from_utf8_lossy(&data[header_end..]).into_owned(),
    }
}

/// Starts a server that answers successive connections with `responses`
/// in order and records every request it sees.
async fn scripted_server(
    responses: Vec<(u16, &'static str)>,
) -> (String, Arc<Mutex<Vec<Seen>>>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{port}");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let handle = tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let req = read_request(&mut stream).await;
            log.lock().unwrap().push(req);

            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (url, seen, handle)
}

fn client_for(url: &str) -> Client {
    Client::new()
        .unwrap()
        .with_endpoints(format!("{url}/oauth2/token"), format!("{url}/v1"))
}

fn firmware_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("build")).unwrap();
    std::fs::write(dir.path().join("build/firmware.bin"), b"firmware-bytes").unwrap();
    dir
}

fn config(dir: &tempfile::TempDir) -> DeploymentConfig {
    let mut config = DeploymentConfig::new("app:1234", "build/firmware.bin", "cid", "csecret");
    config.firmware_dir = dir.path().to_path_buf();
    config
}

const TOKEN_OK: (u16, &str) = (
    200,
    r#"{"access_token":"tok-e2e","token_type":"bearer","expires_in":1799}"#,
);
const UPLOAD_OK: (u16, &str) = (200, r#"{"filename":"firmware.bin"}"#);
const DFU_OK: (u16, &str) = (200, r#"{"success":true,"message":"ok"}"#);

#[tokio::test]
async fn deploys_and_targets_single_device() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![TOKEN_OK, UPLOAD_OK, DFU_OK]).await;

    let mut config = config(&dir);
    config.mode = DeployMode::from_issue_dfu("true");
    config.targeting.device_uid = "dev:123".into();

    let client = client_for(&url);
    let outcome = DeployOrchestrator::new(&client)
        .deploy(&config)
        .await
        .unwrap();
    handle.await.unwrap();

    assert_eq!(outcome.uploaded_filename, "firmware.bin");
    assert_eq!(outcome.size, b"firmware-bytes".len());
    assert!(outcome.dfu_triggered());

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].request_line, "POST /oauth2/token HTTP/1.1");
    assert!(seen[0].body.contains("grant_type=client_credentials"));

    assert_eq!(
        seen[1].request_line,
        "PUT /v1/projects/app:1234/firmware/host/firmware.bin HTTP/1.1"
    );
    assert_eq!(seen[1].authorization.as_deref(), Some("Bearer tok-e2e"));
    assert_eq!(seen[1].body, "firmware-bytes");

    assert_eq!(
        seen[2].request_line,
        "POST /v1/projects/app:1234/dfu/host/update?deviceUID=dev%3A123 HTTP/1.1"
    );
    assert_eq!(seen[2].authorization.as_deref(), Some("Bearer tok-e2e"));
    assert_eq!(seen[2].body, r#"{"filename":"firmware.bin"}"#);
}

#[tokio::test]
async fn missing_firmware_stops_after_authenticate() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![TOKEN_OK, UPLOAD_OK, DFU_OK]).await;

    let mut config = config(&dir);
    config.firmware_file = "build/absent.bin".into();

    let client = client_for(&url);
    let err = DeployOrchestrator::new(&client)
        .deploy(&config)
        .await
        .unwrap_err();
    handle.abort();

    assert!(matches!(err, DeployError::FirmwareNotFound(_)));
    assert!(err.to_string().contains("absent.bin"));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn comma_separated_tags_repeat_parameter() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![TOKEN_OK, UPLOAD_OK, DFU_OK]).await;

    let mut config = config(&dir);
    config.targeting.tag = "production,staging".into();

    let client = client_for(&url);
    DeployOrchestrator::new(&client)
        .deploy(&config)
        .await
        .unwrap();
    handle.await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert!(
        seen[2]
            .request_line
            .contains("?tags=production&tags=staging "),
        "{}",
        seen[2].request_line
    );
}

#[tokio::test]
async fn unauthorized_aborts_before_upload() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![
        (401, r#"{"error":"invalid_client"}"#),
        UPLOAD_OK,
        DFU_OK,
    ])
    .await;

    let client = client_for(&url);
    let err = DeployOrchestrator::new(&client)
        .deploy(&config(&dir))
        .await
        .unwrap_err();
    handle.abort();

    assert!(matches!(err, DeployError::Authentication(_)));
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid_client"));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn upload_only_skips_dfu_request() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![TOKEN_OK, UPLOAD_OK, DFU_OK]).await;

    let mut config = config(&dir);
    config.mode = DeployMode::from_issue_dfu("FALSE");

    let client = client_for(&url);
    let outcome = DeployOrchestrator::new(&client)
        .deploy(&config)
        .await
        .unwrap();
    handle.abort();

    assert!(!outcome.dfu_triggered());
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn renamed_upload_is_what_gets_triggered() {
    let dir = firmware_dir();
    let (url, seen, handle) = scripted_server(vec![
        TOKEN_OK,
        (200, r#"{"filename":"firmware$20250301.bin"}"#),
        DFU_OK,
    ])
    .await;

    let client = client_for(&url);
    DeployOrchestrator::new(&client)
        .deploy(&config(&dir))
        .await
        .unwrap();
    handle.await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen[2].body, r#"{"filename":"firmware$20250301.bin"}"#);
}
