pub mod detection_worker;
pub mod intake_worker;
pub mod model_loader;

use std::thread;

use iced::futures::channel::oneshot;

/// Run `job` on a fresh named thread and await its result from the UI side.
async fn off_ui_thread<T, F>(name: &'static str, job: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            let _ = tx.send(job());
        })
        .map_err(|e| format!("failed to start {name} thread: {e}"))?;
    rx.await
        .map_err(|_| format!("{name} thread exited without a result"))?
}
