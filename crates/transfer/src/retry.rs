use std::time::Duration;

/// Linear backoff schedule for transient send failures: 100ms, 200ms, 300ms.
pub const BACKOFF_SCHEDULE_MILLIS: [u64; 3] = [100, 200, 300];

/// Retries `attempt` up to `BACKOFF_SCHEDULE_MILLIS.len()` additional times
/// after the first failure, sleeping the linear backoff between attempts.
/// Returns the first success, or the last error if every attempt failed.
pub fn retry_with_backoff<T, E>(mut attempt: impl FnMut() -> Result<T, E>) -> Result<T, E> {
    let mut last_err = None;
    match attempt() {
        Ok(value) => return Ok(value),
        Err(err) => last_err = Some(err),
    }

    for backoff_ms in BACKOFF_SCHEDULE_MILLIS {
        std::thread::sleep(Duration::from_millis(backoff_ms));
        match attempt() {
            Ok(value) => return Ok(value),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.expect("at least one attempt was made"))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn succeeds_without_retrying_on_first_try() {
        let calls = Cell::new(0);
        let result: Result<(), &str> = retry_with_backoff(|| {
            calls.set(calls.get() + 1);
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retries_up_to_three_additional_times_then_gives_up() {
        let calls = Cell::new(0);
        let result: Result<(), &str> = retry_with_backoff(|| {
            calls.set(calls.get() + 1);
            Err("transient")
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn recovers_on_a_later_attempt() {
        let calls = Cell::new(0);
        let result: Result<&str, &str> = retry_with_backoff(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err("transient")
            } else {
                Ok("done")
            }
        });
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.get(), 3);
    }
}
