use super::http_request::{
    autopilot_put::{AutopilotRequest, AutopilotTarget},
    control_put::ControlRequest,
    node_delete::NodeDeleteRequest,
    propellant_get::PropellantRequest,
    request_common::{HTTPRequestMethod, HTTPRequestType},
    warp_put::WarpRequest,
};
use super::http_response::{nodes::NodesResponse, telemetry::TelemetryResponse};
use super::{BridgeLink, HTTPError};
use crate::flight_control::{
    telemetry::{ManeuverNode, Propellant, ReferenceFrame, TelemetrySample},
    vessel_link::{Actuator, LinkError, TelemetrySource},
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn node() -> ManeuverNode {
    ManeuverNode {
        id: 7,
        time_of_execution: 1_234.5,
        prograde_delta_v: 120.0,
        reference_frame: ReferenceFrame::Node,
    }
}

#[test]
fn test_control_request_skips_unset_fields() {
    let req = ControlRequest { throttle: Some(0.4), ..ControlRequest::default() };
    assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "throttle": 0.4 }));
    assert_eq!(req.endpoint(), "/control");
    assert_eq!(req.request_method(), HTTPRequestMethod::Put);
}

#[test]
fn test_autopilot_target_encoding() {
    let req = AutopilotRequest { engaged: true, target: Some(AutopilotTarget::Node { id: 7 }) };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({ "engaged": true, "target": { "kind": "node", "id": 7 } })
    );
    let req = AutopilotRequest { engaged: false, target: None };
    assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "engaged": false }));
}

#[test]
fn test_parameterized_endpoints() {
    let req = PropellantRequest::new(1, Propellant::SolidFuel);
    assert_eq!(req.endpoint(), "/stage/1/propellant/SolidFuel");
    assert_eq!(req.request_method(), HTTPRequestMethod::Get);
    let req = NodeDeleteRequest::new(7);
    assert_eq!(req.endpoint(), "/node/7");
    assert_eq!(req.request_method(), HTTPRequestMethod::Delete);
    assert!(WarpRequest { ut: 10.0 }.timeout().is_some());
}

#[test]
fn test_parse_telemetry_and_nodes() {
    let sample = TelemetrySample { altitude: 1_500.0, current_stage: 2, ..TelemetrySample::default() };
    let resp: TelemetryResponse =
        serde_json::from_value(serde_json::to_value(sample).unwrap()).unwrap();
    assert_eq!(resp.sample(), sample);

    let resp: NodesResponse = serde_json::from_value(json!([node(), node()])).unwrap();
    assert_eq!(resp.len(), 2);
    assert_eq!(resp.first(), Some(node()));
    let resp: NodesResponse = serde_json::from_value(json!([])).unwrap();
    assert_eq!(resp.first(), None);
}

/// Answers a single request with `status` and `body` and returns the raw request.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let content_length = text[..split]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
                    })
                    .unwrap_or(0usize);
                if raw.len() >= split + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });
    (url, handle)
}

#[tokio::test]
async fn test_bridge_reads_telemetry() {
    let sample = TelemetrySample { altitude: 42.0, universal_time: 3.0, ..TelemetrySample::default() };
    let (url, server) = serve_once("200 OK", serde_json::to_string(&sample).unwrap()).await;
    let link = BridgeLink::new(&url);

    assert_eq!(link.sample().await.unwrap(), sample);
    assert!(server.await.unwrap().starts_with("GET /telemetry "));
}

#[tokio::test]
async fn test_bridge_sends_throttle() {
    let body = json!({ "throttle": 0.25, "pitch": 80.0, "heading": 90.0, "roll": 0.0 }).to_string();
    let (url, server) = serve_once("200 OK", body).await;
    let link = BridgeLink::new(&url);

    link.set_throttle(0.25).await.unwrap();
    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /control "));
    assert!(request.ends_with(r#"{"throttle":0.25}"#), "{request}");
}

#[tokio::test]
async fn test_bridge_point_at_node_engages_hold() {
    let (url, server) = serve_once("200 OK", json!({ "engaged": true, "error": 3.5 }).to_string()).await;
    let link = BridgeLink::new(&url);

    link.point_at_node(&node()).await.unwrap();
    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /autopilot "));
    assert!(
        request.ends_with(r#"{"engaged":true,"target":{"kind":"node","id":7}}"#),
        "{request}"
    );
}

#[tokio::test]
async fn test_bridge_reports_refused_node_removal() {
    let (url, server) = serve_once("200 OK", json!({ "removed": false }).to_string()).await;
    let link = BridgeLink::new(&url);

    assert!(matches!(link.remove_node(&node()).await, Err(LinkError::Rejected(_))));
    assert!(server.await.unwrap().starts_with("DELETE /node/7 "));
}

#[tokio::test]
async fn test_bridge_bad_request() {
    let body = json!({ "detail": "no stage left" }).to_string();
    let (url, _server) = serve_once("400 Bad Request", body).await;
    let link = BridgeLink::new(&url);

    match link.activate_next_stage().await {
        Err(LinkError::Http(HTTPError::HTTPResponseError(
            super::http_response::response_common::ResponseError::BadRequest(detail),
        ))) => assert_eq!(detail.detail(), "no stage left"),
        other => panic!("expected a bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_bridge() {
    let link = BridgeLink::new("http://127.0.0.1:1");
    assert!(matches!(link.sample().await, Err(LinkError::Disconnected)));
}
