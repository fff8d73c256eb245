use std::collections::BTreeMap;

use crate::error::{Result, TopologyError};

/// Rebuilds one closed vertex cycle from an unordered set of undirected
/// edges (point-index pairs).
///
/// Degenerate self-pairs are discarded. If exactly two vertices have odd
/// degree, a synthetic edge joins them — this closes the open chain left
/// where a clip plane cut a face's boundary. The walk starts from the
/// lowest vertex and always takes the first unvisited neighbor, so the
/// result is deterministic.
///
/// This is not a general multi-contour solver: one cut plane produces a
/// single new boundary loop per zone, and more than two odd-degree
/// vertices would mean the input is not such a loop.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidContour`] when the reconstructed cycle
/// has fewer than three vertices.
pub fn reconstruct_contour(edges: &[[usize; 2]]) -> Result<Vec<usize>> {
    // Ordered adjacency keeps the walk deterministic.
    let mut adjacency: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &[a, b] in edges {
        if a == b {
            continue;
        }
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let odd: Vec<usize> = adjacency
        .iter()
        .filter(|(_, neighbors)| neighbors.len() % 2 == 1)
        .map(|(&v, _)| v)
        .collect();
    if odd.len() == 2 {
        let (a, b) = (odd[0], odd[1]);
        if let Some(list) = adjacency.get_mut(&a) {
            list.push(b);
        }
        if let Some(list) = adjacency.get_mut(&b) {
            list.push(a);
        }
    }

    let Some((&start, _)) = adjacency.iter().next() else {
        return Err(TopologyError::InvalidContour { len: 0 }.into());
    };

    let mut contour = Vec::with_capacity(adjacency.len());
    let mut visited = vec![false; adjacency.keys().max().map_or(0, |&m| m + 1)];
    let mut current = start;
    loop {
        contour.push(current);
        visited[current] = true;
        let next = adjacency
            .get(&current)
            .and_then(|ns| ns.iter().find(|&&n| !visited[n]))
            .copied();
        match next {
            Some(n) => current = n,
            None => break,
        }
    }

    if contour.len() < 3 {
        return Err(TopologyError::InvalidContour { len: contour.len() }.into());
    }
    Ok(contour)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closed_square() {
        let edges = [[0, 1], [2, 3], [1, 2], [3, 0]];
        let contour = reconstruct_contour(&edges).unwrap();
        assert_eq!(contour.len(), 4);
        // Every consecutive pair (cyclically) must be an input edge.
        for i in 0..4 {
            let a = contour[i];
            let b = contour[(i + 1) % 4];
            assert!(
                edges
                    .iter()
                    .any(|e| (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a)),
                "{a}-{b} is not an input edge"
            );
        }
    }

    #[test]
    fn open_chain_is_closed_by_odd_degree_rule() {
        // Path 0-1-2-3: vertices 0 and 3 have odd degree.
        let edges = [[0, 1], [1, 2], [2, 3]];
        let contour = reconstruct_contour(&edges).unwrap();
        assert_eq!(contour.len(), 4);
    }

    #[test]
    fn self_pairs_are_discarded() {
        let edges = [[5, 5], [0, 1], [1, 2], [2, 0], [7, 7]];
        let contour = reconstruct_contour(&edges).unwrap();
        assert_eq!(contour.len(), 3);
    }

    #[test]
    fn too_short_cycle_is_rejected() {
        let edges = [[0, 1]];
        assert!(reconstruct_contour(&edges).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(reconstruct_contour(&[]).is_err());
    }
}
