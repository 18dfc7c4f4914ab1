use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("api_chainer=trace"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Api call failed: {0}")]
pub struct ApiError(pub &'static str);
