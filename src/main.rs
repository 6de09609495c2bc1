#[tokio::main]
async fn main() -> anyhow::Result<()> {
    video_monitor_lib::init_tracing();
    video_monitor_lib::run(std::env::args().skip(1).collect()).await
}
