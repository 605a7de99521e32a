//! Cluster addressing and caret edges
//!
//! A cluster map gives, for every code unit of a run, the smallest glyph
//! index of the cluster the code unit belongs to. Consecutive code units
//! with the same entry form one cluster. Everything in this module works
//! on run-relative indices.

use std::ops::Range;

/// First code unit of the cluster containing `index`
pub fn cluster_start(cluster_map: &[usize], index: usize) -> usize {
    let glyph = cluster_map[index];
    let mut start = index;
    while start > 0 && cluster_map[start - 1] == glyph {
        start -= 1;
    }
    start
}

/// One past the last code unit of the cluster containing `index`
pub fn cluster_end(cluster_map: &[usize], index: usize) -> usize {
    let glyph = cluster_map[index];
    let mut end = index + 1;
    while end < cluster_map.len() && cluster_map[end] == glyph {
        end += 1;
    }
    end
}

/// Glyphs covering the whole clusters in `start..end`
///
/// `start` and `end` must be cluster boundaries.
pub fn glyph_range(
    cluster_map: &[usize],
    glyph_count: usize,
    is_backward: bool,
    start: usize,
    end: usize,
) -> Range<usize> {
    if start >= end {
        return 0..0;
    }
    if is_backward {
        let upper = if start > 0 {
            cluster_map[start - 1]
        } else {
            glyph_count
        };
        cluster_map[end - 1]..upper
    } else {
        let upper = if end < cluster_map.len() {
            cluster_map[end]
        } else {
            glyph_count
        };
        cluster_map[start]..upper
    }
}

/// Glyph where the cluster of `index` begins in logical order
pub fn leading_glyph_index(
    cluster_map: &[usize],
    glyph_count: usize,
    is_backward: bool,
    index: usize,
) -> usize {
    let glyphs = cluster_glyphs(cluster_map, glyph_count, is_backward, index);
    if is_backward {
        glyphs.end.saturating_sub(1)
    } else {
        glyphs.start
    }
}

/// Glyph where the cluster of `index` ends in logical order
pub fn trailing_glyph_index(
    cluster_map: &[usize],
    glyph_count: usize,
    is_backward: bool,
    index: usize,
) -> usize {
    let glyphs = cluster_glyphs(cluster_map, glyph_count, is_backward, index);
    if is_backward {
        glyphs.start
    } else {
        glyphs.end.saturating_sub(1)
    }
}

fn cluster_glyphs(
    cluster_map: &[usize],
    glyph_count: usize,
    is_backward: bool,
    index: usize,
) -> Range<usize> {
    let start = cluster_start(cluster_map, index);
    let end = cluster_end(cluster_map, index);
    glyph_range(cluster_map, glyph_count, is_backward, start, end)
}

/// Computes per-code-unit caret edges for a shaped run
///
/// The result has one entry per code unit boundary. Entry `i` is the
/// distance of the caret before code unit `i` from the run's left edge.
/// Forward runs therefore start at 0 and grow; backward runs start at the
/// run width and shrink to 0 at their logical end.
///
/// A cluster's advance is split evenly over its caret stops. Cluster
/// boundaries always count as stops; interior code units count only when
/// the `caret_stops` mask allows them, and a non-stop code unit repeats the
/// edge before it.
///
/// ```
/// use typeset_layout::caret::CaretEdgesBuilder;
///
/// // One ligature glyph covering three code units
/// let edges = CaretEdgesBuilder::new(&[0, 0, 0], &[30.0], false).build();
/// assert_eq!(edges, vec![0.0, 10.0, 20.0, 30.0]);
/// ```
#[derive(Debug, Clone)]
pub struct CaretEdgesBuilder<'a> {
    cluster_map: &'a [usize],
    glyph_advances: &'a [f32],
    is_backward: bool,
    caret_stops: Option<&'a [bool]>,
}

impl<'a> CaretEdgesBuilder<'a> {
    pub fn new(cluster_map: &'a [usize], glyph_advances: &'a [f32], is_backward: bool) -> Self {
        Self {
            cluster_map,
            glyph_advances,
            is_backward,
            caret_stops: None,
        }
    }

    /// Restrict caret positions inside clusters; `None` allows all
    pub fn caret_stops(mut self, caret_stops: Option<&'a [bool]>) -> Self {
        self.caret_stops = caret_stops;
        self
    }

    pub fn build(&self) -> Vec<f32> {
        let count = self.cluster_map.len();
        let glyph_count = self.glyph_advances.len();
        let mut edges = vec![0.0; count + 1];
        let is_stop = |index: usize| self.caret_stops.map_or(true, |stops| stops[index]);

        let mut distance = 0.0;
        let mut start = 0;
        while start < count {
            let end = cluster_end(self.cluster_map, start);
            let glyphs = glyph_range(self.cluster_map, glyph_count, self.is_backward, start, end);
            let advance: f32 = self.glyph_advances[glyphs].iter().sum();

            let interior_stops = (start + 1..end).filter(|&i| is_stop(i)).count();
            let segment = advance / (interior_stops + 1) as f32;

            let mut edge = distance;
            for (index, slot) in edges.iter_mut().enumerate().take(end).skip(start + 1) {
                if is_stop(index) {
                    edge += segment;
                }
                *slot = edge;
            }

            distance += advance;
            edges[end] = distance;
            start = end;
        }

        if self.is_backward {
            for edge in &mut edges {
                *edge = distance - *edge;
            }
        }

        edges
    }
}
