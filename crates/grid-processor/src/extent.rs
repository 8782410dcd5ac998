//! Valid-data footprint extraction.
//!
//! The validity mask of a raster is split into 4-connected regions, numbered
//! in raster scan order of their first pixel. Each region is traced into
//! closed rings running along pixel edges; the ring with the largest area is
//! the exterior and the others are holes.

use std::collections::{HashMap, HashSet, VecDeque};

use et_common::{BoundingBox, CrsCode, GeoTransform};
use ndarray::Array2;
use tracing::{debug, instrument, warn};

use crate::error::{GridProcessorError, Result};
use crate::reader::RasterDataset;

/// Closed ring of world coordinates (first vertex repeated at the end).
pub type Ring = Vec<(f64, f64)>;

/// Polygon describing where a raster holds data, in the raster's own CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtentGeometry {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
    pub crs: Option<CrsCode>,
}

impl ExtentGeometry {
    pub fn bounds(&self) -> BoundingBox {
        // An exterior ring always has at least four vertices.
        BoundingBox::from_points(self.exterior.iter().copied())
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Bounds of the geometry buffered by `distance`.
    ///
    /// The envelope of a round buffer is exactly the envelope expanded by the
    /// buffer distance, so no buffered polygon is materialized.
    pub fn buffered_bounds(&self, distance: f64) -> BoundingBox {
        self.bounds().expand(distance)
    }

    /// Vertex count over all rings.
    pub fn vertex_count(&self) -> usize {
        self.exterior.len() + self.interiors.iter().map(Vec::len).sum::<usize>()
    }

    /// Area enclosed by the exterior minus the holes.
    pub fn area(&self) -> f64 {
        ring_area(&self.exterior).abs()
            - self
                .interiors
                .iter()
                .map(|r| ring_area(r).abs())
                .sum::<f64>()
    }
}

/// Footprint of the first valid-data region of `dataset`.
///
/// Fails with `EmptyExtent` when no pixel is valid.
#[instrument(skip(dataset), fields(width = dataset.width(), height = dataset.height()))]
pub fn extract_extent(dataset: &RasterDataset) -> Result<ExtentGeometry> {
    let mask = dataset.dataset_mask();
    let mut regions = vectorize_mask(&mask, &dataset.transform, dataset.crs);

    if regions.len() > 1 {
        warn!(
            regions = regions.len(),
            "Reference raster has several disjoint valid regions, using the first"
        );
    }
    if regions.is_empty() {
        return Err(GridProcessorError::EmptyExtent);
    }

    let extent = regions.swap_remove(0);
    debug!(
        bounds = ?extent.bounds(),
        vertices = extent.vertex_count(),
        holes = extent.interiors.len(),
        "Extracted extent"
    );
    Ok(extent)
}

/// Vectorize every 4-connected `true` region of `mask`.
pub fn vectorize_mask(
    mask: &Array2<bool>,
    transform: &GeoTransform,
    crs: Option<CrsCode>,
) -> Vec<ExtentGeometry> {
    let (labels, count) = label_regions(mask);

    (1..=count)
        .filter_map(|label| {
            let rings = trace_rings(&labels, label);
            polygon_from_rings(rings, transform, crs)
        })
        .collect()
}

/// 4-connected component labels (0 = invalid), numbered in scan order.
fn label_regions(mask: &Array2<bool>) -> (Array2<usize>, usize) {
    let (height, width) = mask.dim();
    let mut labels = Array2::<usize>::zeros((height, width));
    let mut next = 0;

    for row in 0..height {
        for col in 0..width {
            if !mask[[row, col]] || labels[[row, col]] != 0 {
                continue;
            }
            next += 1;
            labels[[row, col]] = next;

            let mut queue = VecDeque::from([(row, col)]);
            while let Some((r, c)) = queue.pop_front() {
                let neighbors = [
                    (r.wrapping_sub(1), c),
                    (r + 1, c),
                    (r, c.wrapping_sub(1)),
                    (r, c + 1),
                ];
                for (nr, nc) in neighbors {
                    if nr < height && nc < width && mask[[nr, nc]] && labels[[nr, nc]] == 0 {
                        labels[[nr, nc]] = next;
                        queue.push_back((nr, nc));
                    }
                }
            }
        }
    }

    (labels, next)
}

/// Edge directions in pixel space (row grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Dir {
    East,
    South,
    West,
    North,
}

impl Dir {
    fn step(self, (col, row): (usize, usize)) -> (usize, usize) {
        match self {
            Dir::East => (col + 1, row),
            Dir::South => (col, row + 1),
            Dir::West => (col - 1, row),
            Dir::North => (col, row - 1),
        }
    }

    fn right(self) -> Self {
        match self {
            Dir::East => Dir::South,
            Dir::South => Dir::West,
            Dir::West => Dir::North,
            Dir::North => Dir::East,
        }
    }

    fn left(self) -> Self {
        self.right().right().right()
    }
}

type Corner = (usize, usize);

/// Trace the boundary of region `label` into closed rings of pixel corners.
///
/// Edges run clockwise around each pixel (region on the right). At a corner
/// shared by two diagonal pixels the trace turns right, hugging one pixel
/// as 4-connectivity requires. A walk that passes such a corner twice is
/// split there, so every returned ring is simple.
fn trace_rings(labels: &Array2<usize>, label: usize) -> Vec<Vec<Corner>> {
    let (height, width) = labels.dim();
    let inside = |r: isize, c: isize| {
        r >= 0
            && c >= 0
            && (r as usize) < height
            && (c as usize) < width
            && labels[[r as usize, c as usize]] == label
    };

    let mut outgoing: HashMap<Corner, Vec<Dir>> = HashMap::new();
    let mut edges: Vec<(Corner, Dir)> = Vec::new();
    for row in 0..height {
        for col in 0..width {
            if labels[[row, col]] != label {
                continue;
            }
            let (r, c) = (row as isize, col as isize);
            let mut add = |start: Corner, dir: Dir| {
                outgoing.entry(start).or_default().push(dir);
                edges.push((start, dir));
            };
            if !inside(r - 1, c) {
                add((col, row), Dir::East);
            }
            if !inside(r, c + 1) {
                add((col + 1, row), Dir::South);
            }
            if !inside(r + 1, c) {
                add((col + 1, row + 1), Dir::West);
            }
            if !inside(r, c - 1) {
                add((col, row + 1), Dir::North);
            }
        }
    }

    let mut used: HashSet<(Corner, Dir)> = HashSet::new();
    let mut rings = Vec::new();

    for &(start, start_dir) in &edges {
        if used.contains(&(start, start_dir)) {
            continue;
        }

        let mut ring = vec![start];
        let (mut corner, mut dir) = (start, start_dir);
        loop {
            used.insert((corner, dir));
            corner = dir.step(corner);
            ring.push(corner);
            if corner == start {
                break;
            }

            let candidates = outgoing.get(&corner).map(Vec::as_slice).unwrap_or(&[]);
            let next = [dir.right(), dir, dir.left()]
                .into_iter()
                .find(|d| candidates.contains(d) && !used.contains(&(corner, *d)));
            match next {
                Some(d) => dir = d,
                None => break,
            }
        }
        rings.extend(split_at_pinches(ring).into_iter().map(simplify_ring));
    }

    rings
}

/// Split a closed ring at every vertex it visits twice.
///
/// Each detour that returns to an earlier vertex becomes its own closed
/// ring; what is left over closes the original ring.
fn split_at_pinches(ring: Vec<Corner>) -> Vec<Vec<Corner>> {
    let Some((_, open)) = ring.split_last() else {
        return Vec::new();
    };

    let mut loops = Vec::new();
    let mut path: Vec<Corner> = Vec::with_capacity(open.len());
    let mut seen: HashMap<Corner, usize> = HashMap::new();

    for &vertex in open {
        if let Some(&at) = seen.get(&vertex) {
            let mut detour: Vec<Corner> = path.drain(at + 1..).collect();
            for v in &detour {
                seen.remove(v);
            }
            detour.insert(0, vertex);
            detour.push(vertex);
            loops.push(detour);
        } else {
            seen.insert(vertex, path.len());
            path.push(vertex);
        }
    }

    if let Some(&first) = path.first() {
        path.push(first);
        loops.push(path);
    }
    loops
}

/// Drop vertices in the middle of straight runs. The ring stays closed.
fn simplify_ring(ring: Vec<Corner>) -> Vec<Corner> {
    if ring.len() < 4 {
        return ring;
    }
    // Work on the open ring so the closing vertex is tested like the others.
    let open = &ring[..ring.len() - 1];
    let n = open.len();
    let mut kept: Vec<Corner> = (0..n)
        .filter(|&i| {
            let (p, c, q) = (open[(i + n - 1) % n], open[i], open[(i + 1) % n]);
            let cross = (c.0 as i64 - p.0 as i64) * (q.1 as i64 - c.1 as i64)
                - (c.1 as i64 - p.1 as i64) * (q.0 as i64 - c.0 as i64);
            cross != 0
        })
        .map(|i| open[i])
        .collect();
    if let Some(&first) = kept.first() {
        kept.push(first);
    }
    kept
}

fn polygon_from_rings(
    rings: Vec<Vec<Corner>>,
    transform: &GeoTransform,
    crs: Option<CrsCode>,
) -> Option<ExtentGeometry> {
    let mut world: Vec<Ring> = rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|(c, r)| transform.pixel_to_world(c as f64, r as f64))
                .collect()
        })
        .collect();

    let exterior_idx = world
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| ring_area(a).abs().total_cmp(&ring_area(b).abs()))
        .map(|(i, _)| i)?;
    let exterior = world.swap_remove(exterior_idx);

    Some(ExtentGeometry {
        exterior,
        interiors: world,
        crs,
    })
}

/// Signed shoelace area of a closed ring.
fn ring_area(ring: &[(f64, f64)]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
        .sum::<f64>()
        / 2.0
}
