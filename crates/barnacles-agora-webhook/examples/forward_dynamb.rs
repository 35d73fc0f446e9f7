use barnacles_agora_webhook::{AgoraOptions, BarnaclesAgora};
use serde_json::json;

/// Sends one sample dynamb to the target given as first argument and waits
/// for the request to finish. Delivery errors are printed unless
/// `--no-print-errors` follows the target.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .unwrap_or_else(|| "https://localhost:8443/api/sensors".to_string());
    let print_errors = args.next().as_deref() != Some("--no-print-errors");

    let agora = BarnaclesAgora::new(AgoraOptions::new(target).print_errors(print_errors))?;
    let dynamb = json!({
        "deviceId": "ac233fa00000",
        "deviceIdType": 2,
        "acceleration": [0.02, -0.01, 0.98],
        "batteryPercentage": 87,
        "isMotionDetected": [false, true],
        "temperature": 21.5,
        "relativeHumidity": 4500
    });

    println!("POST {}", agora.config().endpoint());
    if let Some(task) = agora.handle_event("dynamb", &dynamb) {
        task.await?;
    }

    Ok(())
}
