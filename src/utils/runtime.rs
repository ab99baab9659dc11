use anyhow::Result;

/// The daemon is a single sequential loop, so one thread is all it gets.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
