use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;
use web_time::{Duration, Instant};

/// Completes once the deadline has passed. Used to simulate network latency;
/// the await point is the only place execution suspends.
pub struct Delay {
    deadline: Instant,
    waker_slot: Option<Arc<Mutex<Option<Waker>>>>,
}

pub fn delay(duration: Duration) -> Delay {
    Delay {
        deadline: Instant::now() + duration,
        waker_slot: None,
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if Instant::now() >= self.deadline {
            return Poll::Ready(());
        }
        match &self.waker_slot {
            Some(slot) => {
                *slot.lock() = Some(cx.waker().clone());
            }
            None => {
                let slot = Arc::new(Mutex::new(Some(cx.waker().clone())));
                let remaining = self.deadline.saturating_duration_since(Instant::now());
                let timer_slot = slot.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(remaining);
                    if let Some(waker) = timer_slot.lock().take() {
                        waker.wake();
                    }
                });
                self.waker_slot = Some(slot);
            }
        }
        Poll::Pending
    }
}
