//! Subscriber setup for `kctool`. Engine spans and events are compiled in
//! only with the `trace` feature; without it this is a no-op.

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: Option<&std::path::Path>) {
    use std::sync::OnceLock;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kc_core=debug,kc_session=debug"))
        };
        let Some(dir) = log_dir else {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .compact()
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
            return;
        };

        let file = tracing_appender::rolling::never(dir, "kctool-trace.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(file);
        // The writer thread lives as long as the process.
        std::mem::forget(guard);
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(writer)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: Option<&std::path::Path>) {}
