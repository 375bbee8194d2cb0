use super::http_client::HTTPClient;
use super::http_request::{
    autopilot_put::{AutopilotRequest, AutopilotTarget},
    control_put::ControlRequest,
    node_delete::NodeDeleteRequest,
    node_post::NodeRequest,
    nodes_get::NodesRequest,
    propellant_get::PropellantRequest,
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
    stage_post::StageRequest,
    telemetry_get::TelemetryRequest,
    warp_put::WarpRequest,
};
use crate::event;
use crate::flight_control::{
    telemetry::{ManeuverNode, Propellant, TelemetrySample},
    vessel_link::{Actuator, LinkError, TelemetrySource, TimeWarp},
};

/// Vessel collaborator backed by the REST bridge.
#[derive(Debug)]
pub struct BridgeLink {
    client: HTTPClient,
}

impl BridgeLink {
    pub fn new(url: &str) -> Self { Self { client: HTTPClient::new(url) } }

    async fn control(&self, req: ControlRequest) -> Result<(), LinkError> {
        let applied = req.send_request(&self.client).await?;
        event!(
            "Bridge control: throttle {:.3}, pitch {:.1}, heading {:.1}, roll {:.1}",
            applied.throttle(),
            applied.pitch(),
            applied.heading(),
            applied.roll()
        );
        Ok(())
    }

    async fn autopilot(&self, req: AutopilotRequest) -> Result<(), LinkError> {
        let status = req.send_request(&self.client).await?;
        event!("Bridge autopilot engaged: {}, error {:.2} deg", status.is_engaged(), status.error());
        if status.is_engaged() != req.engaged {
            return Err(LinkError::Rejected(format!(
                "autopilot stayed {}",
                if status.is_engaged() { "engaged" } else { "disengaged" }
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TelemetrySource for BridgeLink {
    async fn sample(&self) -> Result<TelemetrySample, LinkError> {
        Ok(TelemetryRequest {}.send_request(&self.client).await?.sample())
    }

    async fn stage_propellant(&self, stage: u32, resource: Propellant) -> Result<f64, LinkError> {
        let resp = PropellantRequest::new(stage, resource).send_request(&self.client).await?;
        if resp.stage() != stage || resp.resource() != resource {
            return Err(LinkError::Rejected(format!(
                "asked for {resource} in stage {stage}, got {} in stage {}",
                resp.resource(),
                resp.stage()
            )));
        }
        Ok(resp.amount())
    }

    async fn next_node(&self) -> Result<Option<ManeuverNode>, LinkError> {
        let nodes = NodesRequest {}.send_request(&self.client).await?;
        event!("Bridge flight plan holds {} nodes", nodes.len());
        Ok(nodes.first())
    }
}

#[async_trait::async_trait]
impl Actuator for BridgeLink {
    async fn set_throttle(&self, throttle: f64) -> Result<(), LinkError> {
        self.control(ControlRequest { throttle: Some(throttle), ..ControlRequest::default() }).await
    }

    async fn set_pitch_and_heading(&self, pitch: f64, heading: f64) -> Result<(), LinkError> {
        self.control(ControlRequest {
            pitch: Some(pitch),
            heading: Some(heading),
            ..ControlRequest::default()
        })
        .await
    }

    async fn set_roll(&self, roll: f64) -> Result<(), LinkError> {
        self.control(ControlRequest { roll: Some(roll), ..ControlRequest::default() }).await
    }

    async fn engage_autopilot(&self) -> Result<(), LinkError> {
        self.autopilot(AutopilotRequest { engaged: true, target: Some(AutopilotTarget::Attitude) })
            .await
    }

    async fn disengage_autopilot(&self) -> Result<(), LinkError> {
        self.autopilot(AutopilotRequest { engaged: false, target: None }).await
    }

    async fn point_at_node(&self, node: &ManeuverNode) -> Result<(), LinkError> {
        self.autopilot(AutopilotRequest {
            engaged: true,
            target: Some(AutopilotTarget::Node { id: node.id }),
        })
        .await
    }

    async fn activate_next_stage(&self) -> Result<u32, LinkError> {
        Ok(StageRequest {}.send_request(&self.client).await?.current_stage())
    }

    async fn add_node(&self, ut: f64, prograde: f64) -> Result<ManeuverNode, LinkError> {
        Ok(NodeRequest { ut, prograde }.send_request(&self.client).await?.node())
    }

    async fn remove_node(&self, node: &ManeuverNode) -> Result<(), LinkError> {
        if NodeDeleteRequest::new(node.id).send_request(&self.client).await?.removed() {
            Ok(())
        } else {
            Err(LinkError::Rejected(format!("node {} was not removed", node.id)))
        }
    }
}

#[async_trait::async_trait]
impl TimeWarp for BridgeLink {
    async fn warp_to(&self, ut: f64) -> Result<(), LinkError> {
        let reached = WarpRequest { ut }.send_request(&self.client).await?.ut();
        event!("Bridge warp ended at UT {reached:.1}");
        Ok(())
    }
}
