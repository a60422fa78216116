//! Constraint collection and independent-component partitioning.
//!
//! Every revealed numbered cell with unresolved neighbors yields one
//! constraint. Constraints whose cell sets transitively intersect are
//! grouped into components that can be searched independently.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::board::BoardSnapshot;
use crate::types::{Cell, Component, Constraint};

/// Derive one constraint per revealed numbered cell that still has
/// unresolved neighbors. Cells showing 0, and cells whose neighbors are
/// all resolved, contribute nothing. An empty result is a valid outcome.
pub fn collect(board: &BoardSnapshot) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    for cell in board.all_cells() {
        let Some(value) = board.revealed_value(cell) else {
            continue;
        };
        if value == 0 {
            continue;
        }

        let unresolved = board.unresolved_neighbors(cell);
        if unresolved.is_empty() {
            continue;
        }

        let flagged = board.flagged_neighbor_count(cell);
        // More flags than the number allows means the external board is
        // inconsistent. Clamp and keep going; validation is not ours.
        let required = if flagged > value as usize {
            log::warn!(
                "cell {} shows {} but has {} flagged neighbors; clamping",
                cell,
                value,
                flagged
            );
            0
        } else {
            value as usize - flagged
        };

        constraints.push(Constraint {
            cells: unresolved,
            required,
            source: cell,
        });
    }

    constraints
}

/// Partition constraints into independent components: build the
/// intersection graph (two constraints are adjacent iff their cell sets
/// share a cell) and take connected components via breadth-first
/// traversal. Each component's cell union is sorted and deduplicated.
pub fn partition(constraints: Vec<Constraint>) -> Vec<Component> {
    if constraints.is_empty() {
        return Vec::new();
    }

    // Cell -> indices of constraints covering it; adjacency falls out of
    // shared ownership without a quadratic pairwise scan.
    let mut owners: HashMap<Cell, Vec<usize>> = HashMap::new();
    for (i, constraint) in constraints.iter().enumerate() {
        for &cell in &constraint.cells {
            owners.entry(cell).or_default().push(i);
        }
    }

    let mut visited = vec![false; constraints.len()];
    let mut components = Vec::new();

    for start in 0..constraints.len() {
        if visited[start] {
            continue;
        }

        let mut member_indices = Vec::new();
        let mut cell_union: HashSet<Cell> = HashSet::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            member_indices.push(current);
            for &cell in &constraints[current].cells {
                cell_union.insert(cell);
                for &next in &owners[&cell] {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut cells: Vec<Cell> = cell_union.into_iter().collect();
        cells.sort_unstable();
        member_indices.sort_unstable();
        components.push(Component {
            constraints: member_indices
                .into_iter()
                .map(|i| constraints[i].clone())
                .collect(),
            cells,
        });
    }

    components
}
