//! File de travail bornée, bloquante, multi-producteurs / multi-consommateurs.
//!
//! Deux conditions distinctes: `not_empty` réveille les consommateurs,
//! `not_full` réveille les producteurs. Une fois fermée, la file se vide
//! normalement puis `dequeue` rend `None`.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// Élément refusé par une file fermée.
#[derive(Debug, PartialEq, Eq)]
pub struct Closed<T>(pub T);

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

#[derive(Debug)]
pub struct BoundedWorkQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedWorkQueue<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacité de file nulle");
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Ajoute en queue, en attendant une place libre si la file est pleine.
    pub fn enqueue(&self, item: T) -> Result<(), Closed<T>> {
        let mut state = self.state.lock();
        while state.items.len() == self.capacity && !state.closed {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return Err(Closed(item));
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Retire en tête, en attendant un élément si la file est vide.
    ///
    /// `None` uniquement quand la file est fermée et vide.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Ferme la file et réveille tous les threads en attente.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}
