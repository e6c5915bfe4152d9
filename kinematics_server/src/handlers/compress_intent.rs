use crate::api_types::{CompressIntentRequest, CompressIntentResponse};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use kinematics_core::intent::{self, MotionSample, PACKED_RECORD_BYTES};
use std::time::Instant;

pub async fn compress_intent(
    State(state): State<AppState>,
    Json(request): Json<CompressIntentRequest>,
) -> Result<Json<CompressIntentResponse>, ApiError> {
    let start = Instant::now();
    let result = (|| {
        let original_samples = request.samples.len();
        let samples: Vec<MotionSample> = request
            .samples
            .into_iter()
            .map(|s| MotionSample {
                timestamp: s.timestamp,
                position: s.position,
                velocity: s.velocity,
            })
            .collect();
        let compressed = intent::compress(&samples, request.sample_rate_hz)?;
        let intent_id = uuid::Uuid::new_v4().to_string();
        Ok::<_, ApiError>(CompressIntentResponse {
            intent_id,
            intent_type: compressed.class,
            direction: compressed.direction,
            magnitude: compressed.magnitude,
            compressed_bytes: PACKED_RECORD_BYTES,
            original_samples,
            compression_ratio: compressed.compression_ratio,
            packed_hex: hex_encode(&compressed.packed),
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    })();

    state.stats.record(
        "compress_intent",
        result.is_ok(),
        start.elapsed().as_micros() as u64,
    );
    result.map(Json)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
