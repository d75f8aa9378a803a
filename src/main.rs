#[tokio::main]
async fn main() -> std::io::Result<()> {
    geofence_worker::run_with_config().await
}
