use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use converter_core::{Generation, Msg, ELAPSED_SAMPLE_INTERVAL, PROGRESS_TICK_INTERVAL};
use engine_logging::engine_debug;

/// Monotonic milliseconds since the session started.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Progress and elapsed-time tickers, one pair per job generation.
///
/// Ticker threads only post messages; the core drops any tick whose
/// generation is no longer current.
pub struct Timers {
    clock: Clock,
    msg_tx: mpsc::Sender<Msg>,
    running: HashMap<Generation, Arc<AtomicBool>>,
}

impl Timers {
    pub fn new(clock: Clock, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            clock,
            msg_tx,
            running: HashMap::new(),
        }
    }

    pub fn start(&mut self, generation: Generation) {
        self.stop(generation);
        let stop = Arc::new(AtomicBool::new(false));

        spawn_ticker(
            PROGRESS_TICK_INTERVAL,
            stop.clone(),
            self.msg_tx.clone(),
            move || Msg::ProgressTick { generation },
        );
        let clock = self.clock;
        spawn_ticker(
            ELAPSED_SAMPLE_INTERVAL,
            stop.clone(),
            self.msg_tx.clone(),
            move || Msg::ClockTick {
                generation,
                now_ms: clock.now_ms(),
            },
        );

        engine_debug!("Timers started for generation {}", generation);
        self.running.insert(generation, stop);
    }

    pub fn stop(&mut self, generation: Generation) {
        if let Some(flag) = self.running.remove(&generation) {
            flag.store(true, Ordering::Relaxed);
            engine_debug!("Timers stopped for generation {}", generation);
        }
    }

    #[cfg(test)]
    fn running(&self) -> usize {
        self.running.len()
    }

    fn stop_all(&mut self) {
        for (_, flag) in self.running.drain() {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.stop_all();
    }
}

fn spawn_ticker(
    interval: Duration,
    stop: Arc<AtomicBool>,
    msg_tx: mpsc::Sender<Msg>,
    make_msg: impl Fn() -> Msg + Send + 'static,
) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if stop.load(Ordering::Relaxed) || msg_tx.send(make_msg()).is_err() {
            break;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_carry_generation_and_stop_on_request() {
        let (tx, rx) = mpsc::channel();
        let mut timers = Timers::new(Clock::start(), tx);
        timers.start(3);
        assert_eq!(timers.running(), 1);

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(
            first,
            Msg::ProgressTick { generation: 3 } | Msg::ClockTick { generation: 3, .. }
        ));

        timers.stop(3);
        assert_eq!(timers.running(), 0);
        // Drain anything already in flight, then expect silence.
        thread::sleep(Duration::from_millis(300));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }
}
