// src/shared/telemetria.rs

use tracing_subscriber::EnvFilter;

/// Inicializa o tracing/log do processo.
///
/// Pode ser chamada mais de uma vez (as chamadas seguintes não fazem nada).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs em JSON com timestamp, configuráveis via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
