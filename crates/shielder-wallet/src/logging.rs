/// Installs the global subscriber. `RUST_LOG` refines the INFO default.
/// Calling it more than once is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    let _ = tracing_wasm::try_set_as_global_default();
}
