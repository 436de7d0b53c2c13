//! Grid sweep: tile a square region into cells and search each one in turn.

use std::collections::HashSet;

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::{LatLng, Place};
use crate::places::{AreaSearcher, PlacesSource};

/// Square grid of cell centres around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub center: LatLng,
    pub cell_size_deg: f64,
    pub cells_per_axis: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub row: i64,
    pub col: i64,
    pub center: LatLng,
}

impl Grid {
    pub fn new(center: LatLng, cell_size_deg: f64, cells_per_axis: u32) -> Self {
        Self {
            center,
            cell_size_deg,
            cells_per_axis,
        }
    }

    pub fn len(&self) -> usize {
        let n = self.cells_per_axis as usize;
        n * n
    }

    pub fn is_empty(&self) -> bool {
        self.cells_per_axis == 0
    }

    /// Axis indices: `-(n/2) .. n - n/2`, e.g. `-30..=29` for 60 cells.
    fn indices(&self) -> std::ops::Range<i64> {
        let n = i64::from(self.cells_per_axis);
        let lo = -(n / 2);
        lo..lo + n
    }

    /// Row-major: latitude index outer, longitude index inner.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.indices().flat_map(move |row| {
            self.indices().map(move |col| Cell {
                row,
                col,
                center: self.center.offset(
                    row as f64 * self.cell_size_deg,
                    col as f64 * self.cell_size_deg,
                ),
            })
        })
    }
}

/// Drop exact duplicates in place, keeping the first occurrence of each place.
pub fn dedup_places(places: &mut Vec<Place>) {
    let mut seen = HashSet::with_capacity(places.len());
    let keep: Vec<bool> = places.iter().map(|p| seen.insert(p.key())).collect();
    drop(seen);
    let mut keep = keep.into_iter();
    places.retain(|_| keep.next().unwrap_or(true));
}

pub struct GridWalker<S> {
    searcher: AreaSearcher<S>,
    radius_m: u32,
    progress: ProgressBar,
}

impl<S: PlacesSource> GridWalker<S> {
    pub fn new(searcher: AreaSearcher<S>, radius_m: u32) -> Self {
        Self {
            searcher,
            radius_m,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn sweep(
        &self,
        center: LatLng,
        cell_size_deg: f64,
        cells_per_axis: u32,
        cap: usize,
    ) -> Result<Vec<Place>> {
        self.sweep_grid(&Grid::new(center, cell_size_deg, cells_per_axis), cap)
    }

    /// Search every cell until the grid is exhausted or `cap` distinct places
    /// have been collected; the result never holds more than `cap` places.
    pub fn sweep_grid(&self, grid: &Grid, cap: usize) -> Result<Vec<Place>> {
        let mut places = Vec::new();
        if cap == 0 {
            return Ok(places);
        }
        self.progress.set_length(grid.len() as u64);

        for cell in grid.cells() {
            info!(row = cell.row, col = cell.col, location = %cell.center, "searching area");
            let found = match self.searcher.search(cell.center, self.radius_m) {
                Ok(found) => found,
                Err(err) => {
                    self.progress.abandon();
                    return Err(err);
                }
            };
            places.extend(found);
            dedup_places(&mut places);

            self.progress.inc(1);
            self.progress.set_message(format!("{} places", places.len()));

            if places.len() >= cap {
                places.truncate(cap);
                self.progress.finish_and_clear();
                info!(cap, row = cell.row, col = cell.col, "cap reached, stopping sweep");
                return Ok(places);
            }
        }

        self.progress.finish_and_clear();
        warn!(found = places.len(), cap, "grid exhausted before reaching cap");
        Ok(places)
    }
}
