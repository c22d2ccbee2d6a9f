//! Background worker for deferred one-shot jobs.
//!
//! One thread, one queue. Jobs run in order of their due time, each no
//! earlier than its own delay after it was scheduled. Jobs due at the same
//! instant run in submission order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Scheduled {
    due: Instant,
    job: Job,
}

/// A received job waiting for its due time. Ordered by `(due, seq)`.
struct Pending {
    due: Instant,
    seq: u64,
    job: Job,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Single-threaded delayed job queue.
pub struct Worker {
    sender: Option<Sender<Scheduled>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start the worker thread.
    pub fn start() -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("infopages-worker".to_string())
            .spawn(move || run(receiver));

        match handle {
            Ok(handle) => Self {
                sender: Some(sender),
                handle: Some(handle),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Could not start worker thread; jobs will run inline");
                Self {
                    sender: None,
                    handle: None,
                }
            }
        }
    }

    /// Run `job` after `delay`.
    ///
    /// Without a running thread the job runs immediately on the caller.
    pub fn schedule<F>(&self, delay: Duration, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let scheduled = Scheduled {
            due: Instant::now() + delay,
            job: Box::new(job),
        };
        let Some(sender) = &self.sender else {
            (scheduled.job)();
            return;
        };
        if let Err(mpsc::SendError(scheduled)) = sender.send(scheduled) {
            tracing::warn!("Worker stopped; running job inline");
            (scheduled.job)();
        }
    }

    /// Run every queued job, then stop the thread.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("Worker thread panicked");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(receiver: Receiver<Scheduled>) {
    let mut pending: BinaryHeap<Reverse<Pending>> = BinaryHeap::new();
    let mut seq = 0u64;

    loop {
        run_due(&mut pending);

        let received = match pending.peek() {
            None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(Reverse(next)) => {
                receiver.recv_timeout(next.due.saturating_duration_since(Instant::now()))
            }
        };

        match received {
            Ok(scheduled) => {
                pending.push(Reverse(Pending {
                    due: scheduled.due,
                    seq,
                    job: scheduled.job,
                }));
                seq += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Shutdown: everything still queued runs once due.
    while let Some(Reverse(next)) = pending.pop() {
        let now = Instant::now();
        if next.due > now {
            thread::sleep(next.due - now);
        }
        (next.job)();
    }
    tracing::debug!("Worker queue drained");
}

/// Pop and run every job whose due time has passed.
fn run_due(pending: &mut BinaryHeap<Reverse<Pending>>) {
    while let Some(Reverse(next)) = pending.peek() {
        if next.due > Instant::now() {
            break;
        }
        if let Some(Reverse(job)) = pending.pop() {
            (job.job)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn record(worker: &Worker, log: &Arc<Mutex<Vec<u32>>>, id: u32, delay_ms: u64) {
        let log = Arc::clone(log);
        worker.schedule(Duration::from_millis(delay_ms), move || {
            log.lock().unwrap().push(id);
        });
    }

    #[test]
    fn test_short_delay_runs_before_earlier_long_delay() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut worker = Worker::start();
        let start = Instant::now();

        let first = Arc::clone(&log);
        worker.schedule(Duration::from_millis(1200), move || {
            first.lock().unwrap().push(1);
        });
        let finished = Arc::new(Mutex::new(None));
        let second = Arc::clone(&log);
        let slot = Arc::clone(&finished);
        worker.schedule(Duration::from_millis(200), move || {
            second.lock().unwrap().push(2);
            *slot.lock().unwrap() = Some(Instant::now());
        });
        worker.shutdown();

        assert_eq!(*log.lock().unwrap(), vec![2, 1]);
        let ran = finished.lock().unwrap().expect("short job ran");
        assert!(ran.duration_since(start) < Duration::from_millis(1000));
    }

    #[test]
    fn test_equal_delays_keep_submission_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut worker = Worker::start();

        for id in 1..=5 {
            record(&worker, &log, id, 0);
        }
        worker.shutdown();

        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shutdown_runs_pending_jobs_by_due_time() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut worker = Worker::start();

        record(&worker, &log, 1, 60);
        record(&worker, &log, 2, 20);
        record(&worker, &log, 3, 40);
        worker.shutdown();

        assert_eq!(*log.lock().unwrap(), vec![2, 3, 1]);
    }

    #[test]
    fn test_delay_is_honored() {
        let ran_at = Arc::new(Mutex::new(None));
        let mut worker = Worker::start();
        let start = Instant::now();

        let slot = Arc::clone(&ran_at);
        worker.schedule(Duration::from_millis(50), move || {
            *slot.lock().unwrap() = Some(Instant::now());
        });
        worker.shutdown();

        let ran = ran_at.lock().unwrap().expect("job ran");
        assert!(ran.duration_since(start) >= Duration::from_millis(50));
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let mut worker = Worker::start();
        worker.shutdown();
        worker.shutdown();
    }

    #[test]
    fn test_schedule_after_shutdown_runs_inline() {
        let mut worker = Worker::start();
        worker.shutdown();

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        worker.schedule(Duration::from_millis(0), move || {
            *flag.lock().unwrap() = true;
        });
        assert!(*ran.lock().unwrap());
    }
}
