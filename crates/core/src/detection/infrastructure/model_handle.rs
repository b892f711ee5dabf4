use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;

/// A loaded detector shared between the UI and detection workers.
///
/// Inference needs `&mut`, so concurrent detections serialize on the lock.
pub type SharedDetector = Arc<Mutex<Box<dyn FaceDetector>>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Cloneable handle to a face detection model that loads exactly once.
///
/// The handle starts out loading; the first call to [`ModelHandle::complete`]
/// fixes its outcome and wakes every waiter. Later completions are ignored,
/// so a failed load stays failed for the rest of the session.
#[derive(Clone)]
pub struct ModelHandle {
    slot: Arc<ModelSlot>,
}

struct ModelSlot {
    outcome: Mutex<Option<Result<SharedDetector, String>>>,
    ready: Condvar,
}

impl ModelHandle {
    /// A handle whose model has not been provided yet.
    pub fn pending() -> Self {
        Self {
            slot: Arc::new(ModelSlot {
                outcome: Mutex::new(None),
                ready: Condvar::new(),
            }),
        }
    }

    /// A handle that is immediately usable.
    pub fn ready(detector: Box<dyn FaceDetector>) -> Self {
        let handle = Self::pending();
        handle.complete(Ok(detector));
        handle
    }

    /// Run `loader` once on a background thread.
    ///
    /// Nothing waits on the load: callers that need the model block in
    /// [`ModelHandle::wait`]. The outcome is logged either way.
    pub fn load_in_background<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> + Send + 'static,
    {
        let handle = Self::pending();
        let slot_handle = handle.clone();
        let spawned = thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let outcome = loader().map_err(|e| e.to_string());
                match &outcome {
                    Ok(_) => log::info!("Face detection model loaded"),
                    Err(e) => log::error!("Failed to load face detection model: {e}"),
                }
                slot_handle.complete(outcome);
            });
        if let Err(e) = spawned {
            log::error!("Failed to start model loader: {e}");
            handle.complete(Err(format!("model loader did not start: {e}")));
        }
        handle
    }

    /// Record the load outcome. Returns `false` if one was already recorded.
    pub fn complete(&self, outcome: Result<Box<dyn FaceDetector>, String>) -> bool {
        let mut guard = self.slot.lock();
        if guard.is_some() {
            log::warn!("Ignoring second completion of the face detection model");
            return false;
        }
        *guard = Some(outcome.map(|d| Arc::new(Mutex::new(d))));
        self.slot.ready.notify_all();
        true
    }

    pub fn status(&self) -> ModelStatus {
        match &*self.slot.lock() {
            None => ModelStatus::Loading,
            Some(Ok(_)) => ModelStatus::Ready,
            Some(Err(e)) => ModelStatus::Failed(e.clone()),
        }
    }

    /// Block until loading has finished, then hand out the detector.
    pub fn wait(&self) -> Result<SharedDetector, DetectionError> {
        let mut guard = self.slot.lock();
        loop {
            if let Some(outcome) = &*guard {
                return outcome.clone().map_err(DetectionError::ModelUnavailable);
            }
            guard = self
                .slot
                .ready
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl ModelSlot {
    fn lock(&self) -> MutexGuard<'_, Option<Result<SharedDetector, String>>> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::detection::domain::detection::{Detection, DetectionOptions};
    use crate::shared::frame::Frame;

    struct NoFaces;

    impl FaceDetector for NoFaces {
        fn detect(
            &mut self,
            _frame: &Frame,
            _options: &DetectionOptions,
        ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_pending_reports_loading() {
        assert_eq!(ModelHandle::pending().status(), ModelStatus::Loading);
    }

    #[test]
    fn test_ready_handle_waits_without_blocking() {
        let handle = ModelHandle::ready(Box::new(NoFaces));
        assert_eq!(handle.status(), ModelStatus::Ready);
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn test_first_completion_wins() {
        let handle = ModelHandle::pending();
        assert!(handle.complete(Err("missing weights".into())));
        assert!(!handle.complete(Ok(Box::new(NoFaces))));
        assert_eq!(handle.status(), ModelStatus::Failed("missing weights".into()));
    }

    #[test]
    fn test_failed_load_surfaces_as_model_unavailable() {
        let handle = ModelHandle::pending();
        handle.complete(Err("missing weights".into()));
        assert_eq!(
            handle.wait().err(),
            Some(DetectionError::ModelUnavailable("missing weights".into()))
        );
    }

    #[test]
    fn test_wait_blocks_until_completion() {
        let handle = ModelHandle::pending();
        let waiter = handle.clone();
        let (tx, rx) = mpsc::channel();
        let join = thread::spawn(move || {
            let _ = tx.send(waiter.wait().is_ok());
        });

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        handle.complete(Ok(Box::new(NoFaces)));
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
        join.join().unwrap();
    }

    #[test]
    fn test_load_in_background_runs_loader() {
        let handle = ModelHandle::load_in_background(|| Ok(Box::new(NoFaces)));
        assert!(handle.wait().is_ok());
        assert_eq!(handle.status(), ModelStatus::Ready);
    }

    #[test]
    fn test_load_in_background_records_error() {
        let handle = ModelHandle::load_in_background(|| Err("no such file".into()));
        assert!(matches!(handle.wait(), Err(DetectionError::ModelUnavailable(m)) if m == "no such file"));
    }

    #[test]
    fn test_clones_share_the_detector() {
        let handle = ModelHandle::ready(Box::new(NoFaces));
        let a = handle.wait().unwrap();
        let b = handle.clone().wait().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
