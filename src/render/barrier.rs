use parking_lot::{Condvar, Mutex};

/// Barrière de complétion: le coordinateur annonce `n` tuiles, les workers
/// signalent chaque tuile terminée, le coordinateur dort jusqu'à zéro.
///
/// Le mutex donne la relation release/acquire entre le dernier
/// `report_done` et le retour de `wait_until_done`: les écritures des
/// workers dans la grille sont visibles par le coordinateur.
///
/// Un worker dont la tuile panique appelle `fail`: le coordinateur est
/// réveillé et panique à son tour au lieu d'attendre un signal qui ne
/// viendra jamais.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    state: Mutex<State>,
    done: Condvar,
}

#[derive(Debug, Default)]
struct State {
    remaining: usize,
    failed: bool,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annonce `n` unités de travail. Doit précéder tout `report_done` du calcul.
    ///
    /// Panique si un calcul précédent n'est pas terminé.
    pub fn arm(&self, n: usize) {
        let mut state = self.state.lock();
        assert!(!state.failed, "barrière réarmée après la panique d'un worker");
        assert_eq!(
            state.remaining, 0,
            "barrière réarmée alors que {} tuiles restent en cours",
            state.remaining
        );
        state.remaining = n;
    }

    /// Une unité terminée. Panique si plus d'unités sont signalées qu'annoncées.
    pub fn report_done(&self) {
        let mut state = self.state.lock();
        assert!(state.remaining > 0, "report_done appelé plus de fois qu'annoncé");
        state.remaining -= 1;
        if state.remaining == 0 {
            self.done.notify_all();
        }
    }

    /// Une unité ne sera jamais signalée. Définitif pour cette barrière.
    pub fn fail(&self) {
        self.state.lock().failed = true;
        self.done.notify_all();
    }

    /// Bloque tant qu'il reste des unités en cours.
    ///
    /// Panique si un worker a appelé `fail`.
    pub fn wait_until_done(&self) {
        let mut state = self.state.lock();
        while state.remaining > 0 && !state.failed {
            self.done.wait(&mut state);
        }
        assert!(!state.failed, "un worker a paniqué pendant le calcul");
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn stress(units: usize, workers: usize) {
        let barrier = Arc::new(CompletionBarrier::new());
        let reported = Arc::new(AtomicUsize::new(0));
        let next = Arc::new(AtomicUsize::new(0));
        barrier.arm(units);

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let reported = Arc::clone(&reported);
                let next = Arc::clone(&next);
                thread::spawn(move || {
                    while next.fetch_add(1, Ordering::Relaxed) < units {
                        reported.fetch_add(1, Ordering::Relaxed);
                        barrier.report_done();
                    }
                })
            })
            .collect();

        barrier.wait_until_done();
        assert_eq!(reported.load(Ordering::Relaxed), units);
        assert_eq!(barrier.remaining(), 0);
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(reported.load(Ordering::Relaxed), units);
    }

    #[test]
    fn test_stress_units_and_workers() {
        for &units in &[1, 17, 10_000] {
            for &workers in &[1, 4, 16] {
                stress(units, workers);
            }
        }
    }

    #[test]
    fn test_wait_returns_immediately_when_unarmed() {
        let barrier = CompletionBarrier::new();
        barrier.wait_until_done();
        barrier.arm(0);
        barrier.wait_until_done();
    }

    #[test]
    fn test_rearm_after_drain() {
        let barrier = CompletionBarrier::new();
        for n in [3, 1, 5] {
            barrier.arm(n);
            for _ in 0..n {
                barrier.report_done();
            }
            barrier.wait_until_done();
        }
    }

    #[test]
    #[should_panic(expected = "plus de fois")]
    fn test_over_report_panics() {
        let barrier = CompletionBarrier::new();
        barrier.arm(1);
        barrier.report_done();
        barrier.report_done();
    }

    #[test]
    #[should_panic(expected = "un worker a paniqué")]
    fn test_failure_wakes_waiter() {
        let barrier = Arc::new(CompletionBarrier::new());
        barrier.arm(2);
        barrier.report_done();
        let failing = Arc::clone(&barrier);
        let handle = thread::spawn(move || failing.fail());
        handle.join().unwrap();
        barrier.wait_until_done();
    }

    #[test]
    #[should_panic(expected = "après la panique")]
    fn test_arm_after_failure_panics() {
        let barrier = CompletionBarrier::new();
        barrier.arm(1);
        barrier.fail();
        barrier.arm(1);
    }

    #[test]
    #[should_panic(expected = "réarmée")]
    fn test_arm_while_draining_panics() {
        let barrier = CompletionBarrier::new();
        barrier.arm(2);
        barrier.report_done();
        barrier.arm(2);
    }
}
