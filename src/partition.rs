// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Strided row assignment.  Worker `k` of `P` owns rows `k, k+P,
//! k+2P, ...`, which spreads the expensive rows near the middle of
//! the set across everyone and keeps each worker within one row of
//! every other.  Nothing here looks at row content, and no worker
//! needs to know what the others were given.

use itertools::iproduct;
use std::iter::StepBy;
use std::ops::Range;

use crate::error::Error;

/// A division of `0..rows` into `workers` disjoint, exhaustive subsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    rows: usize,
    workers: usize,
}

impl Partition {
    /// Fails only for zero workers.  More workers than rows is fine;
    /// the surplus simply gets nothing.
    pub fn new(rows: usize, workers: usize) -> Result<Self, Error> {
        if workers == 0 {
            return Err(Error::config("at least one worker is required"));
        }
        Ok(Partition { rows, workers })
    }

    /// Total rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The rows assigned to `worker`, ascending.  Out-of-range workers
    /// get an empty sequence.
    pub fn rows_for(&self, worker: usize) -> StepBy<Range<usize>> {
        let start = if worker < self.workers {
            worker
        } else {
            self.rows
        };
        (start..self.rows).step_by(self.workers)
    }

    /// How many rows `worker` will compute.
    pub fn count_for(&self, worker: usize) -> usize {
        if worker >= self.workers || worker >= self.rows {
            return 0;
        }
        (self.rows - worker + self.workers - 1) / self.workers
    }

    /// Which worker owns `row`.
    pub fn owner_of(&self, row: usize) -> Option<usize> {
        if row < self.rows {
            Some(row % self.workers)
        } else {
            None
        }
    }

    /// The round-robin pull order an assembler can follow when it
    /// wants to receive from one worker at a time: worker 0's first row,
    /// worker 1's first row, and so on, then everyone's second row.
    /// Because the assignment is strided, that is ascending row order.
    pub fn schedule(&self) -> Vec<(usize, usize)> {
        let rounds = (self.rows + self.workers - 1) / self.workers;
        iproduct!(0..rounds, 0..self.workers)
            .map(|(round, worker)| (worker, round * self.workers + worker))
            .filter(|&(_, row)| row < self.rows)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_is_a_config_error() {
        match Partition::new(10, 0) {
            Err(Error::Config { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn assignment_is_strided() {
        let p = Partition::new(10, 3).unwrap();
        assert_eq!(p.rows_for(0).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(p.rows_for(1).collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(p.rows_for(2).collect::<Vec<_>>(), vec![2, 5, 8]);
        assert_eq!(p.rows_for(3).count(), 0);
    }

    #[test]
    fn every_row_is_assigned_exactly_once() {
        for rows in 1..40 {
            for workers in 1..12 {
                let p = Partition::new(rows, workers).unwrap();
                let mut seen = vec![0; rows];
                for k in 0..workers {
                    let mine: Vec<usize> = p.rows_for(k).collect();
                    assert_eq!(mine.len(), p.count_for(k));
                    for row in mine {
                        assert_eq!(p.owner_of(row), Some(k));
                        seen[row] += 1;
                    }
                }
                assert!(seen.iter().all(|&n| n == 1), "{} rows / {} workers", rows, workers);
            }
        }
    }

    #[test]
    fn load_is_balanced_within_one_row() {
        let p = Partition::new(101, 7).unwrap();
        let counts: Vec<usize> = (0..7).map(|k| p.count_for(k)).collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1);
        assert_eq!(counts.iter().sum::<usize>(), 101);
    }

    #[test]
    fn surplus_workers_get_nothing() {
        let p = Partition::new(2, 5).unwrap();
        assert_eq!(p.count_for(4), 0);
        assert_eq!(p.rows_for(4).count(), 0);
        assert_eq!(p.owner_of(2), None);
    }

    #[test]
    fn schedule_visits_rows_in_ascending_order() {
        let p = Partition::new(11, 4).unwrap();
        let schedule = p.schedule();
        let rows: Vec<usize> = schedule.iter().map(|&(_, row)| row).collect();
        assert_eq!(rows, (0..11).collect::<Vec<_>>());
        for (worker, row) in schedule {
            assert_eq!(p.owner_of(row), Some(worker));
        }
    }
}
