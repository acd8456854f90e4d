// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Workers and the drivers that run them.
//!
//! Each worker owns a strided slice of the rows (see `partition`),
//! builds every one of its rows start to finish, and sends the finished
//! row down a bounded channel.  The calling thread is the coordinator:
//! it drains the channel into the assembler, which is the only thing
//! that ever touches the sink.  Workers share nothing mutable.

use crossbeam::channel;
use log::{debug, info, trace, warn};
use std::time::Instant;

use crate::assembler::{Assembler, RowSink};
use crate::color::{colorize, Color};
use crate::escape::{evaluate, EscapeResult, IterationParams};
use crate::partition::Partition;
use crate::plane::Viewport;
use crate::raster::{Image, Row};
use crate::Error;

/// How many finished rows each worker may have queued up before it
/// blocks waiting for the coordinator.
const ROWS_IN_FLIGHT_PER_WORKER: usize = 4;

/// Anything that can produce a finished row given its index.  Must be
/// shareable between threads; it is only ever read.
pub trait RowRenderer: Sync {
    /// Pixels per row.
    fn width(&self) -> usize;
    /// Number of rows.
    fn height(&self) -> usize;
    /// Builds row `y` in full.
    fn render_row(&self, y: usize) -> Row;
}

/// The escape-time renderer: a viewport and the iteration bounds.
/// Once built, it should not be mutable.
#[derive(Clone, Debug)]
pub struct EscapeTimeRenderer {
    viewport: Viewport,
    params: IterationParams,
}

impl EscapeTimeRenderer {
    /// Both halves are validated by their own constructors.
    pub fn new(viewport: Viewport, params: IterationParams) -> Self {
        EscapeTimeRenderer { viewport, params }
    }

    /// The pixel-to-plane mapping.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The iteration bounds.
    pub fn params(&self) -> &IterationParams {
        &self.params
    }

    /// The escape result of a single pixel, with the row's antenna
    /// snap applied exactly as `render_row` applies it.
    pub fn escape_at(&self, x: usize, y: usize) -> EscapeResult {
        evaluate(self.viewport.column_re(x), self.viewport.row_im(y), &self.params)
    }
}

impl RowRenderer for EscapeTimeRenderer {
    fn width(&self) -> usize {
        self.viewport.width()
    }

    fn height(&self) -> usize {
        self.viewport.height()
    }

    fn render_row(&self, y: usize) -> Row {
        // The imaginary part, snapped or not, is fixed for the whole row.
        let cy = self.viewport.row_im(y);
        let pixels: Vec<Color> = (0..self.viewport.width())
            .map(|x| {
                let result = evaluate(self.viewport.column_re(x), cy, &self.params);
                colorize(result, &self.params)
            })
            .collect();
        Row::new(y, pixels)
    }
}

/// The main function for single-threaded rendering: every row, in
/// order, on the calling thread.
pub fn render_single<R, S>(renderer: &R, sink: S) -> Result<S, Error>
where
    R: RowRenderer + ?Sized,
    S: RowSink,
{
    let started = Instant::now();
    let mut assembler = Assembler::new(renderer.width(), renderer.height(), sink);
    for y in 0..renderer.height() {
        assembler.submit(renderer.render_row(y))?;
    }
    let sink = assembler.finalize()?;
    info!(
        "rendered {}x{} on one thread in {:.3}s",
        renderer.width(),
        renderer.height(),
        seconds(started)
    );
    Ok(sink)
}

/// A multi-threaded version of the render function that takes a
/// worker count.  The sink receives rows in ascending order whatever
/// order the workers finish them in, so the output does not depend on
/// the worker count.
pub fn render_rows<R, S>(renderer: &R, workers: usize, sink: S) -> Result<S, Error>
where
    R: RowRenderer + ?Sized,
    S: RowSink,
{
    let started = Instant::now();
    let partition = Partition::new(renderer.height(), workers)?;
    let mut assembler = Assembler::new(renderer.width(), renderer.height(), sink);
    let (tx, rx) = channel::bounded::<Row>(workers * ROWS_IN_FLIGHT_PER_WORKER);

    info!(
        "rendering {}x{} with {} worker(s)",
        renderer.width(),
        renderer.height(),
        workers
    );

    let scoped = crossbeam::scope(|spawner| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let tx = tx.clone();
                let rows = partition.rows_for(worker);
                spawner.spawn(move |_| {
                    let mut sent = 0;
                    for y in rows {
                        let row = renderer.render_row(y);
                        trace!("worker {} finished row {}", worker, y);
                        if tx.send(row).is_err() {
                            debug!("worker {} stopping: coordinator hung up", worker);
                            break;
                        }
                        sent += 1;
                    }
                    sent
                })
            })
            .collect();
        // Only the workers hold senders now, so the channel closes when
        // the last of them is done.
        drop(tx);

        let mut assembled = Ok(());
        for row in rx.iter() {
            if let Err(err) = assembler.submit(row) {
                assembled = Err(err);
                break;
            }
        }
        // Unblocks any worker still waiting to send.
        drop(rx);

        let mut failed = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(sent) => debug!(
                    "worker {} delivered {} of {} rows",
                    worker,
                    sent,
                    partition.count_for(worker)
                ),
                Err(_) => {
                    warn!("worker {} panicked", worker);
                    failed = failed.or(Some(worker));
                }
            }
        }

        match failed {
            Some(worker) => Err(Error::Worker { worker }),
            None => assembled,
        }
    });

    match scoped {
        Ok(result) => result?,
        Err(_) => return Err(Error::Pool),
    }

    let sink = assembler.finalize()?;
    info!(
        "rendered {}x{} with {} worker(s) in {:.3}s",
        renderer.width(),
        renderer.height(),
        workers,
        seconds(started)
    );
    Ok(sink)
}

/// Renders into memory.  `workers == 0` means the calling thread does
/// all the work.
pub fn render_image<R>(renderer: &R, workers: usize) -> Result<Image, Error>
where
    R: RowRenderer + ?Sized,
{
    let image = Image::new(renderer.width(), renderer.height());
    if workers == 0 {
        render_single(renderer, image)
    } else {
        render_rows(renderer, workers, image)
    }
}

fn seconds(started: Instant) -> f64 {
    let elapsed = started.elapsed();
    elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn renderer(width: usize, height: usize, max: u32) -> EscapeTimeRenderer {
        let viewport = Viewport::new(
            width,
            height,
            Complex::new(-2.5, -2.0),
            Complex::new(1.5, 2.0),
        )
        .unwrap();
        EscapeTimeRenderer::new(viewport, IterationParams::new(max, 400.0).unwrap())
    }

    #[test]
    fn threaded_matches_single() {
        let r = renderer(48, 33, 200);
        let single = render_single(&r, Image::new(48, 33)).unwrap().to_bytes();
        for &workers in &[1, 2, 3, 4, 7, 33, 50] {
            let threaded = render_rows(&r, workers, Image::new(48, 33)).unwrap();
            assert!(threaded.is_complete());
            assert_eq!(threaded.to_bytes(), single, "{} workers", workers);
        }
    }

    #[test]
    fn zero_workers_renders_on_this_thread() {
        let r = renderer(8, 8, 50);
        assert_eq!(
            render_image(&r, 0).unwrap(),
            render_image(&r, 3).unwrap()
        );
    }

    #[test]
    fn captured_pixels_are_black() {
        let r = renderer(40, 40, 100);
        let image = render_image(&r, 2).unwrap();
        for y in 0..40 {
            for x in 0..40 {
                if !r.escape_at(x, y).escaped {
                    assert_eq!(image.pixel(x, y), Some(Color::BLACK));
                }
            }
        }
    }

    #[test]
    fn rows_are_mirrored_about_the_real_axis() {
        // Rows y and height - y sit at conjugate imaginary parts.
        let r = renderer(16, 16, 100);
        let image = render_image(&r, 4).unwrap();
        for y in 1..8 {
            assert_eq!(image.rows()[y].pixels, image.rows()[16 - y].pixels);
        }
    }

    struct Panicky;

    impl RowRenderer for Panicky {
        fn width(&self) -> usize {
            2
        }
        fn height(&self) -> usize {
            9
        }
        fn render_row(&self, y: usize) -> Row {
            if y == 4 {
                panic!("row 4 is cursed");
            }
            Row::new(y, vec![Color::BLACK; 2])
        }
    }

    #[test]
    fn a_panicking_worker_fails_the_job() {
        // Three workers: row 4 belongs to worker 1.
        match render_rows(&Panicky, 3, Image::new(2, 9)) {
            Err(Error::Worker { worker }) => assert_eq!(worker, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    struct Stutter;

    impl RowRenderer for Stutter {
        fn width(&self) -> usize {
            1
        }
        fn height(&self) -> usize {
            6
        }
        fn render_row(&self, y: usize) -> Row {
            // Every odd row claims to be the row before it.
            Row::new(y - y % 2, vec![Color::BLACK])
        }
    }

    #[test]
    fn a_misnumbered_row_is_an_integrity_error() {
        let err = render_rows(&Stutter, 2, Image::new(1, 6)).unwrap_err();
        assert!(err.is_partition_integrity(), "{:?}", err);
        let err = render_single(&Stutter, Image::new(1, 6)).unwrap_err();
        assert!(err.is_partition_integrity(), "{:?}", err);
    }
}
