//! Tour construction heuristics used to warm-start the populations.
//!
//! - [`greedy_2approx`]: nearest-neighbour insertion grown from the closest
//!   pair of points.
//! - [`mst_2approx`]: double-tree heuristic on a Kruskal minimum spanning
//!   tree. Its tour is at most twice the optimum on metric instances.
//!
//! Both return a permutation of `0..n` starting at point 0.

use super::point::{DistanceMatrix, Edge};
use crate::union_find::DisjointSet;

/// Rotates `cycle` in place so that point 0 leads.
fn rotate_to_anchor(cycle: &mut [usize]) {
    if let Some(anchor) = cycle.iter().position(|&point| point == 0) {
        cycle.rotate_left(anchor);
    }
}

/// Greedy insertion tour.
///
/// Starts from the globally closest pair. Each step picks the unvisited
/// point closest to any point already on the path and inserts it right
/// after that path point. Ties go to the earliest path position, then the
/// lowest point index.
///
/// Returns `0..n` unchanged for `n < 2`.
pub fn greedy_2approx(dist: &DistanceMatrix) -> Vec<usize> {
    let n = dist.len();
    if n < 2 {
        return (0..n).collect();
    }

    let mut cycle = vec![0, 1];
    let mut min_weight = dist.get(0, 1);
    for u in 0..n {
        for v in u + 1..n {
            if dist.get(u, v) < min_weight {
                min_weight = dist.get(u, v);
                cycle = vec![u, v];
            }
        }
    }

    let mut added = vec![false; n];
    added[cycle[0]] = true;
    added[cycle[1]] = true;

    while cycle.len() < n {
        let Some(first) = (0..n).find(|&v| !added[v]) else {
            break;
        };
        let mut best = (dist.get(cycle[0], first), 0, first);

        for (i, &u) in cycle.iter().enumerate() {
            for v in (0..n).filter(|&v| !added[v]) {
                if dist.get(u, v) < best.0 {
                    best = (dist.get(u, v), i, v);
                }
            }
        }

        let (_, index, w) = best;
        cycle.insert(index + 1, w);
        added[w] = true;
    }

    rotate_to_anchor(&mut cycle);
    cycle
}

/// Minimum spanning tree of the graph on `0..n`, as adjacency lists.
///
/// Edges are stably sorted by weight and added when their endpoints are in
/// different components. Neighbours appear in the order their edge was
/// accepted.
pub fn kruskal(n: usize, edges: &mut [Edge]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    let mut components = DisjointSet::new(n);

    edges.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    for edge in edges.iter() {
        if !components.is_same_set(edge.u, edge.v) {
            components.union_set(edge.u, edge.v);
            adjacency[edge.u].push(edge.v);
            adjacency[edge.v].push(edge.u);
        }
    }
    adjacency
}

/// Double-tree tour on the minimum spanning tree of `edges`.
///
/// Walks every tree edge once in each direction starting at point 0,
/// always following the most recently added unused neighbour, and keeps
/// each point at its first visit.
///
/// `edges` is sorted by weight as a side effect.
pub fn mst_2approx(n: usize, edges: &mut [Edge]) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut adjacency = kruskal(n, edges);

    let mut walk = Vec::with_capacity(2 * n);
    let mut stack = Vec::with_capacity(n);
    let mut u = 0;
    loop {
        if let Some(v) = adjacency[u].pop() {
            stack.push(u);
            u = v;
        } else {
            walk.push(u);
            match stack.pop() {
                Some(prev) => u = prev,
                None => break,
            }
        }
    }

    rotate_to_anchor(&mut walk);

    let mut visited = vec![false; n];
    let mut cycle = Vec::with_capacity(n);
    for point in walk {
        if !visited[point] {
            visited[point] = true;
            cycle.push(point);
        }
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp::point::tests::unit_square;
    use crate::tsp::point::Point;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn is_tour(cycle: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        cycle.len() == n
            && cycle.iter().all(|&c| {
                let fresh = c < n && !seen[c];
                if fresh {
                    seen[c] = true;
                }
                fresh
            })
    }

    fn random_matrix(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<Point> = (0..n)
            .map(|i| Point::new(i as u64, rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
            .collect();
        DistanceMatrix::from_points(&points)
    }

    fn mst_weight(adjacency: &[Vec<usize>], dist: &DistanceMatrix) -> f64 {
        let mut total = 0.0;
        for (u, neighbours) in adjacency.iter().enumerate() {
            for &v in neighbours {
                if u < v {
                    total += dist.get(u, v);
                }
            }
        }
        total
    }

    #[test]
    fn test_greedy_square() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let cycle = greedy_2approx(&dm);
        assert!(is_tour(&cycle, 4));
        assert_eq!(cycle[0], 0);
        assert!((dm.cycle_cost(&cycle) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_mst_square() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let cycle = mst_2approx(4, &mut dm.edges());
        assert!(is_tour(&cycle, 4));
        assert_eq!(cycle[0], 0);
        assert!((dm.cycle_cost(&cycle) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_starts_from_closest_pair() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 10.0, 0.0),
            Point::new(2, 10.0, 0.5),
        ];
        let dm = DistanceMatrix::from_points(&points);
        // closest pair (1, 2); 0 is nearest to 1 and goes right after it
        assert_eq!(greedy_2approx(&dm), vec![0, 2, 1]);
    }

    #[test]
    fn test_degenerate_sizes() {
        let dm = DistanceMatrix::from_points(&[]);
        assert!(greedy_2approx(&dm).is_empty());
        assert!(mst_2approx(0, &mut []).is_empty());

        let dm = DistanceMatrix::from_points(&[Point::new(0, 1.0, 1.0)]);
        assert_eq!(greedy_2approx(&dm), vec![0]);
        assert_eq!(mst_2approx(1, &mut []), vec![0]);

        let dm = DistanceMatrix::from_points(&[Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0)]);
        assert_eq!(greedy_2approx(&dm), vec![0, 1]);
        assert_eq!(mst_2approx(2, &mut dm.edges()), vec![0, 1]);
    }

    #[test]
    fn test_kruskal_line() {
        let points: Vec<Point> = (0..5).map(|i| Point::new(i, i as f64, 0.0)).collect();
        let dm = DistanceMatrix::from_points(&points);
        let adjacency = kruskal(5, &mut dm.edges());
        assert_eq!(adjacency[0], vec![1]);
        assert_eq!(adjacency[2], vec![1, 3]);
        assert_eq!(adjacency[4], vec![3]);
        assert!((mst_weight(&adjacency, &dm) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_kruskal_spanning_tree() {
        let n = 30;
        let dm = random_matrix(n, 17);
        let adjacency = kruskal(n, &mut dm.edges());

        let edge_count: usize = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        assert_eq!(edge_count, n - 1);

        let mut ds = DisjointSet::new(n);
        for (u, neighbours) in adjacency.iter().enumerate() {
            for &v in neighbours {
                ds.union_set(u, v);
            }
        }
        assert!((1..n).all(|v| ds.is_same_set(0, v)));
    }

    #[test]
    fn test_mst_tour_within_twice_tree_weight() {
        for seed in 0..5 {
            let n = 40;
            let dm = random_matrix(n, seed);
            let tree = mst_weight(&kruskal(n, &mut dm.edges()), &dm);
            let cycle = mst_2approx(n, &mut dm.edges());

            assert!(is_tour(&cycle, n));
            assert_eq!(cycle[0], 0);
            assert!(dm.cycle_cost(&cycle) <= 2.0 * tree + 1e-9);
        }
    }

    #[test]
    fn test_greedy_random_instances() {
        for seed in 0..5 {
            let n = 35;
            let dm = random_matrix(n, 100 + seed);
            let cycle = greedy_2approx(&dm);
            assert!(is_tour(&cycle, n));
            assert_eq!(cycle[0], 0);
        }
    }
}
