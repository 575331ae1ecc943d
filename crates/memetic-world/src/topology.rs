//! Random-graph topology builders and the CSR adjacency index.
//!
//! A world's social graph is built exactly once, at construction, from one
//! of four models:
//!
//! - **scale-free** -- Barabási–Albert preferential attachment with
//!   `m = max(2, floor(n * density / 2))` edges per arriving node.
//! - **small-world** -- Watts–Strogatz ring lattice with
//!   `k = max(4, floor(n * density))` neighbours and rewiring
//!   probability 0.3.
//! - **random** -- Erdős–Rényi `G(n, p)` with `p = density`.
//! - **geo-local** -- per agent, `max(1, floor(n * density))` random
//!   candidates; same-region pairs connect with probability 0.7,
//!   cross-region pairs with 0.3. May leave isolated agents.
//!
//! Builders produce a deduplicated, self-loop-free undirected edge list
//! over node indices `0..n`. [`CsrGraph`] then freezes the edge list into
//! compressed sparse-row arrays for cache-friendly neighbour iteration
//! during ticks; edges are immutable for the world's lifetime.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use memetic_types::{NetworkType, Region};

/// Watts–Strogatz rewiring probability.
const REWIRING_PROBABILITY: f64 = 0.3;

/// Geo-local connection probability for same-region candidate pairs.
const SAME_REGION_PROBABILITY: f64 = 0.7;

/// Geo-local connection probability for cross-region candidate pairs.
const CROSS_REGION_PROBABILITY: f64 = 0.3;

/// Convert a node id to a vector index.
///
/// Node ids are bounded by the population cap, far below `u32::MAX`;
/// `u32` always fits in `usize` on supported platforms.
#[allow(clippy::cast_possible_truncation)]
const fn idx(node: u32) -> usize {
    node as usize
}

// ---------------------------------------------------------------------------
// CSR adjacency
// ---------------------------------------------------------------------------

/// Compressed sparse-row adjacency over nodes `0..node_count`.
///
/// Both directions of every undirected edge are stored, so
/// `neighbors(u)` is the full adjacency row of `u`. Rows are sorted
/// ascending for deterministic iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    /// Row boundaries: node `i`'s neighbours live at
    /// `targets[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<u32>,
    /// Concatenated neighbour rows.
    targets: Vec<u32>,
}

impl CsrGraph {
    /// Freeze an undirected edge list into CSR form.
    ///
    /// Edges referencing nodes outside `0..node_count` are ignored.
    pub fn from_edges(node_count: u32, edges: &[(u32, u32)]) -> Self {
        let n = idx(node_count);

        let mut degrees = vec![0_u32; n];
        for &(u, v) in edges {
            if u >= node_count || v >= node_count || u == v {
                continue;
            }
            if let Some(d) = degrees.get_mut(idx(u)) {
                *d = d.saturating_add(1);
            }
            if let Some(d) = degrees.get_mut(idx(v)) {
                *d = d.saturating_add(1);
            }
        }

        let mut offsets = Vec::with_capacity(n.saturating_add(1));
        offsets.push(0_u32);
        let mut running = 0_u32;
        for degree in &degrees {
            running = running.saturating_add(*degree);
            offsets.push(running);
        }

        let mut cursor: Vec<u32> = offsets.iter().take(n).copied().collect();
        let mut targets = vec![0_u32; idx(running)];
        for &(u, v) in edges {
            if u >= node_count || v >= node_count || u == v {
                continue;
            }
            place(&mut targets, &mut cursor, u, v);
            place(&mut targets, &mut cursor, v, u);
        }

        // Sort each row so neighbour iteration order is deterministic.
        let mut row_start = 0_usize;
        for &end in offsets.iter().skip(1) {
            let row_end = idx(end);
            if let Some(row) = targets.get_mut(row_start..row_end) {
                row.sort_unstable();
            }
            row_start = row_end;
        }

        Self { offsets, targets }
    }

    /// The neighbour row of `node`, sorted ascending.
    pub fn neighbors(&self, node: u32) -> &[u32] {
        let lo = self.offsets.get(idx(node)).copied().unwrap_or(0);
        let hi = self
            .offsets
            .get(idx(node).saturating_add(1))
            .copied()
            .unwrap_or(lo);
        self.targets.get(idx(lo)..idx(hi)).unwrap_or(&[])
    }

    /// The degree of `node`.
    pub fn degree(&self, node: u32) -> usize {
        self.neighbors(node).len()
    }

    /// Number of nodes the graph was built over.
    pub fn node_count(&self) -> u32 {
        u32::try_from(self.offsets.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Number of undirected edges.
    pub const fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Iterate every undirected edge once, as `(u, v)` with `u < v`.
    pub fn iter_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.node_count()).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}

/// Append `to` into `from`'s CSR row at the row cursor.
fn place(targets: &mut [u32], cursor: &mut [u32], from: u32, to: u32) {
    if let Some(c) = cursor.get_mut(idx(from)) {
        if let Some(slot) = targets.get_mut(idx(*c)) {
            *slot = to;
        }
        *c = c.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Edge builders
// ---------------------------------------------------------------------------

/// Build the undirected edge list for a population of `regions.len()`
/// agents according to the requested topology.
///
/// `regions` carries each node's region assignment (only the geo-local
/// model reads it). Returns normalized `(u, v)` pairs with `u < v`.
pub fn build_edges<R: Rng + ?Sized>(
    rng: &mut R,
    network_type: NetworkType,
    density: f64,
    regions: &[Region],
) -> Vec<(u32, u32)> {
    let n = u32::try_from(regions.len()).unwrap_or(u32::MAX);
    if n < 2 {
        return Vec::new();
    }

    let edges = match network_type {
        NetworkType::ScaleFree => {
            let m = scaled_parameter(n, density / 2.0).max(2).min(n.saturating_sub(1));
            barabasi_albert(rng, n, m)
        }
        NetworkType::SmallWorld => {
            let k = scaled_parameter(n, density).max(4).min(n.saturating_sub(1));
            watts_strogatz(rng, n, k)
        }
        NetworkType::Random => erdos_renyi(rng, n, density),
        NetworkType::GeoLocal => {
            let attempts = scaled_parameter(n, density).max(1);
            geo_local(rng, regions, attempts)
        }
    };

    edges.into_iter().collect()
}

/// `floor(n * factor)` as a topology parameter.
fn scaled_parameter(n: u32, factor: f64) -> u32 {
    // Bounded by the population cap; the float floor fits in u32.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (f64::from(n) * factor).floor().max(0.0) as u32;
    scaled
}

/// Normalize an edge so the smaller endpoint comes first.
const fn norm(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Barabási–Albert preferential attachment: each arriving node connects
/// to `m` existing nodes, chosen proportionally to current degree.
fn barabasi_albert<R: Rng + ?Sized>(rng: &mut R, n: u32, m: u32) -> BTreeSet<(u32, u32)> {
    let mut edges = BTreeSet::new();

    // `repeated` holds one entry per edge endpoint, so uniform choice
    // from it is degree-proportional choice over nodes.
    let mut repeated: Vec<u32> = Vec::new();
    let mut targets: BTreeSet<u32> = (0..m).collect();

    for source in m..n {
        for &target in &targets {
            edges.insert(norm(source, target));
            repeated.push(target);
            repeated.push(source);
        }
        targets = degree_weighted_subset(rng, &repeated, idx(m));
    }

    edges
}

/// Draw `m` distinct nodes from the endpoint pool (degree-proportional).
fn degree_weighted_subset<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[u32],
    m: usize,
) -> BTreeSet<u32> {
    let mut subset = BTreeSet::new();
    let limit = pool.len().saturating_mul(8).max(64);
    let mut draws = 0_usize;
    while subset.len() < m && draws < limit {
        if let Some(&node) = pool.choose(rng) {
            subset.insert(node);
        }
        draws = draws.saturating_add(1);
    }
    // The pool can run out of distinct nodes only for degenerate sizes;
    // top up deterministically so the caller always gets a full set.
    if subset.len() < m {
        for &node in pool {
            subset.insert(node);
            if subset.len() >= m {
                break;
            }
        }
    }
    subset
}

/// Watts–Strogatz: ring lattice with `k / 2` neighbours per side, then
/// each lattice edge rewired with probability 0.3.
fn watts_strogatz<R: Rng + ?Sized>(rng: &mut R, n: u32, k: u32) -> BTreeSet<(u32, u32)> {
    let mut edges = BTreeSet::new();
    let half = (k / 2).max(1);

    for offset in 1..=half {
        for i in 0..n {
            let j = i.saturating_add(offset) % n;
            if i != j {
                edges.insert(norm(i, j));
            }
        }
    }

    for offset in 1..=half {
        for i in 0..n {
            if rng.random::<f64>() >= REWIRING_PROBABILITY {
                continue;
            }
            let old = norm(i, i.saturating_add(offset) % n);
            let mut attempts = 0_u32;
            while attempts < n {
                let w = rng.random_range(0..n);
                if w != i && !edges.contains(&norm(i, w)) {
                    edges.remove(&old);
                    edges.insert(norm(i, w));
                    break;
                }
                attempts = attempts.saturating_add(1);
            }
        }
    }

    edges
}

/// Erdős–Rényi `G(n, p)`: every pair connects independently with
/// probability `p`.
fn erdos_renyi<R: Rng + ?Sized>(rng: &mut R, n: u32, p: f64) -> BTreeSet<(u32, u32)> {
    let mut edges = BTreeSet::new();
    for i in 0..n {
        for j in i.saturating_add(1)..n {
            if rng.random::<f64>() < p {
                edges.insert((i, j));
            }
        }
    }
    edges
}

/// Region-biased wiring: each agent tries a fixed number of random
/// candidates, connecting more readily within its own region.
fn geo_local<R: Rng + ?Sized>(
    rng: &mut R,
    regions: &[Region],
    attempts: u32,
) -> BTreeSet<(u32, u32)> {
    let n = u32::try_from(regions.len()).unwrap_or(u32::MAX);
    let mut edges = BTreeSet::new();

    for i in 0..n {
        for _ in 0..attempts {
            let j = rng.random_range(0..n);
            if i == j {
                continue;
            }
            let same_region = regions.get(idx(i)) == regions.get(idx(j));
            let p = if same_region {
                SAME_REGION_PROBABILITY
            } else {
                CROSS_REGION_PROBABILITY
            };
            if rng.random::<f64>() < p {
                edges.insert(norm(i, j));
            }
        }
    }

    edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn uniform_regions(n: usize) -> Vec<Region> {
        vec![Region::Na; n]
    }

    fn mixed_regions(n: usize) -> Vec<Region> {
        (0..n)
            .map(|i| if i % 2 == 0 { Region::Na } else { Region::Asia })
            .collect()
    }

    fn assert_valid_edges(edges: &[(u32, u32)], n: u32) {
        for &(u, v) in edges {
            assert_ne!(u, v, "self loop {u}");
            assert!(u < v, "edge not normalized: ({u}, {v})");
            assert!(v < n, "endpoint {v} out of range");
        }
    }

    // ------------------------------------------------------------------
    // CSR
    // ------------------------------------------------------------------

    #[test]
    fn csr_from_small_graph() {
        // Path 0 - 1 - 2 plus edge 0 - 2.
        let graph = CsrGraph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1]);
    }

    #[test]
    fn csr_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(5);
        let regions = uniform_regions(60);
        let edges = build_edges(&mut rng, NetworkType::Random, 0.2, &regions);
        let graph = CsrGraph::from_edges(60, &edges);

        for (u, v) in graph.iter_edges() {
            assert!(graph.neighbors(u).contains(&v));
            assert!(graph.neighbors(v).contains(&u));
        }
    }

    #[test]
    fn csr_isolated_node_has_empty_row() {
        let graph = CsrGraph::from_edges(4, &[(0, 1)]);
        assert!(graph.neighbors(2).is_empty());
        assert!(graph.neighbors(3).is_empty());
        assert_eq!(graph.degree(0), 1);
    }

    #[test]
    fn csr_ignores_out_of_range_edges() {
        let graph = CsrGraph::from_edges(3, &[(0, 1), (0, 9)]);
        assert_eq!(graph.edge_count(), 1);
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    #[test]
    fn scale_free_connects_every_arrival() {
        let mut rng = StdRng::seed_from_u64(1);
        let regions = uniform_regions(100);
        let edges = build_edges(&mut rng, NetworkType::ScaleFree, 0.1, &regions);
        assert_valid_edges(&edges, 100);

        let graph = CsrGraph::from_edges(100, &edges);
        // m = max(2, floor(100 * 0.1 / 2)) = 5: every node past the seed
        // core attaches with degree >= m.
        for node in 5..100 {
            assert!(graph.degree(node) >= 5, "node {node} under-attached");
        }
    }

    #[test]
    fn scale_free_has_hubs() {
        let mut rng = StdRng::seed_from_u64(2);
        let regions = uniform_regions(200);
        let edges = build_edges(&mut rng, NetworkType::ScaleFree, 0.05, &regions);
        let graph = CsrGraph::from_edges(200, &edges);

        let max_degree = (0..200).map(|n| graph.degree(n)).max().unwrap_or(0);
        let min_degree = (0..200).map(|n| graph.degree(n)).min().unwrap_or(0);
        // Preferential attachment concentrates degree.
        assert!(max_degree >= min_degree.saturating_mul(3));
    }

    #[test]
    fn small_world_keeps_lattice_density() {
        let mut rng = StdRng::seed_from_u64(3);
        let regions = uniform_regions(100);
        let edges = build_edges(&mut rng, NetworkType::SmallWorld, 0.1, &regions);
        assert_valid_edges(&edges, 100);

        // k = max(4, floor(100 * 0.1)) = 10, half = 5: the ring lattice
        // has 500 edges and rewiring preserves the count up to collisions.
        assert!(edges.len() > 400);
        assert!(edges.len() <= 500);
    }

    #[test]
    fn random_graph_tracks_density() {
        let mut rng = StdRng::seed_from_u64(4);
        let regions = uniform_regions(100);
        let edges = build_edges(&mut rng, NetworkType::Random, 0.1, &regions);
        assert_valid_edges(&edges, 100);

        // Expected edges: 4950 pairs * 0.1 = 495; allow wide slack.
        assert!(edges.len() > 300, "too sparse: {}", edges.len());
        assert!(edges.len() < 700, "too dense: {}", edges.len());
    }

    #[test]
    fn random_graph_with_p_one_is_complete() {
        let mut rng = StdRng::seed_from_u64(5);
        let regions = uniform_regions(10);
        let edges = build_edges(&mut rng, NetworkType::Random, 1.0, &regions);
        assert_eq!(edges.len(), 45);
    }

    #[test]
    fn geo_local_favors_same_region() {
        let mut rng = StdRng::seed_from_u64(6);
        let regions = mixed_regions(200);
        let edges = build_edges(&mut rng, NetworkType::GeoLocal, 0.1, &regions);
        assert_valid_edges(&edges, 200);
        assert!(!edges.is_empty());

        let same = edges
            .iter()
            .filter(|&&(u, v)| regions.get(idx(u)) == regions.get(idx(v)))
            .count();
        let cross = edges.len().saturating_sub(same);
        // 0.7 vs 0.3 acceptance should show through the noise.
        assert!(same > cross, "same={same} cross={cross}");
    }

    #[test]
    fn geo_local_may_leave_isolated_agents() {
        // Near-zero density on a tiny population: build succeeds and the
        // result is a valid (possibly empty) edge set.
        let mut rng = StdRng::seed_from_u64(7);
        let regions = mixed_regions(10);
        let edges = build_edges(&mut rng, NetworkType::GeoLocal, 0.01, &regions);
        assert_valid_edges(&edges, 10);
    }

    #[test]
    fn degenerate_population_yields_no_edges() {
        let mut rng = StdRng::seed_from_u64(8);
        let edges = build_edges(&mut rng, NetworkType::ScaleFree, 0.5, &[Region::Na]);
        assert!(edges.is_empty());
    }
}
