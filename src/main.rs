fn main() -> anyhow::Result<()> {
    tracing_log::LogTracer::init().expect("failed to initialize LogTracer");

    let stdout_subscriber = tracing_subscriber::fmt().pretty().finish();
    tracing::subscriber::set_global_default(stdout_subscriber)
        .expect("failed to install stdout global tracing subscriber");

    lantern::run()
}
