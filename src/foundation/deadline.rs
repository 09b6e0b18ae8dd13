use std::{sync::mpsc, thread, time::Duration};

use crate::foundation::error::{AdError, AdResult};

/// Run `f` on a worker thread and wait at most `timeout` for its result.
///
/// On expiry the worker is detached; its eventual result is dropped. A worker that panics is
/// reported as an inference error.
pub fn call_with_deadline<T, F>(label: &str, timeout: Duration, f: F) -> AdResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AdResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name(format!("adforge-{label}"))
        .spawn(move || {
            let _ = tx.send(f());
        })
        .map_err(|e| AdError::inference(format!("failed to spawn {label} worker: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(AdError::timeout(format!(
            "{label} exceeded {:.1}s",
            timeout.as_secs_f64()
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(AdError::inference(format!(
            "{label} worker exited without a result"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_worker_result_before_deadline() {
        let v = call_with_deadline("unit", Duration::from_secs(5), || Ok(7)).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn propagates_worker_error() {
        let err = call_with_deadline::<u8, _>("unit", Duration::from_secs(5), || {
            Err(AdError::inference("boom"))
        })
        .unwrap_err();
        assert!(matches!(err, AdError::Inference(_)));
    }

    #[test]
    fn slow_worker_times_out() {
        let err = call_with_deadline("unit", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, AdError::Timeout(_)));
    }

    #[test]
    fn panicking_worker_is_an_inference_error() {
        let err = call_with_deadline::<(), _>("unit", Duration::from_secs(5), || {
            panic!("worker blew up")
        })
        .unwrap_err();
        assert!(matches!(err, AdError::Inference(_)));
    }
}
