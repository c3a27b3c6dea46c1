#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmu_gateway::entrypoint().await
}
