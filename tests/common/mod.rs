//! A fake gateway served on an ephemeral local port.

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::{json, Value};
use smartmeter_exporter::GatewayConfig;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: Arc<AtomicUsize>,
}

/// Handle to a running fake gateway.
pub struct FakeGateway {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FakeGateway {
    /// Serve `body` with `status` on `/smartmeter/api/read`.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        Self::start_delayed(status, body, Duration::ZERO).await
    }

    /// Like [`FakeGateway::start`], waiting `delay` before answering.
    pub async fn start_delayed(status: u16, body: impl Into<String>, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let reply = Reply {
            status: StatusCode::from_u16(status).expect("Should be a valid status"),
            body: body.into(),
            delay,
            hits: hits.clone(),
        };

        let app = Router::new()
            .route("/smartmeter/api/read", get(read))
            .with_state(reply);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind fake gateway");
        let addr = listener.local_addr().expect("Should have local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake gateway should run");
        });

        Self { addr, hits }
    }

    /// Gateway configuration pointing at this fake.
    pub fn config(&self) -> GatewayConfig {
        GatewayConfig::new(self.addr.to_string()).expect("Should accept address")
    }

    /// Number of requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn read(State(reply): State<Reply>) -> (StatusCode, String) {
    reply.hits.fetch_add(1, Ordering::SeqCst);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, reply.body.clone())
}

/// A complete gateway document using string values throughout.
pub fn sample_document() -> Value {
    json!({
        "firmware_running": "1",
        "firmware_available": "2",
        "firmware_update_available": "true",
        "ElectricityTariff": "2",
        "EnergyDeliveredTariff1": "4521.301",
        "EnergyReturnedTariff1": "1022.45",
        "EnergyDeliveredTariff2": "3870.012",
        "EnergyReturnedTariff2": "2410.9",
        "PowerDelivered_total": "1240",
        "PowerReturned_total": "0",
        "PowerDelivered_l1": "410",
        "PowerDelivered_l2": "380",
        "PowerDelivered_l3": "450",
        "PowerReturned_l1": "0",
        "PowerReturned_l2": "0",
        "PowerReturned_l3": "0",
        "Voltage_l1": "231",
        "Voltage_l2": "232",
        "Voltage_l3": "229",
        "Current_l1": "2",
        "Current_l2": "2",
        "Current_l3": "3",
        "PowerDeliveredHour": "0.318",
        "PowerDeliveredNetto": "1.24",
        "GasDelivered": "1234.56",
        "GasDeliveredHour": "0.041"
    })
}
