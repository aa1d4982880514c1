use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::new("garrison=info");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_line_number(true)
        .with_file(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

//Rolling file log for the binary; stdout stays free for chat output.
pub fn init_file_tracing(dir: &str) {
    let writer = tracing_appender::rolling::daily(dir, "garrison.log");
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .compact()
        .with_line_number(true)
        .with_file(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
