//! Hungarian (Kuhn-Munkres) assignment solver.

/// Solves the square assignment problem over `cost`, where
/// `cost[i][j]` is the cost of giving marcher `i` target `j`.
///
/// Returns a vector indexed 1..=`count`: `result[j]` is the 1-indexed
/// marcher assigned to target `j`; `result[0]` is working state with no
/// meaning. The returned assignment minimizes total cost and is always a
/// bijection for finite cost matrices.
///
/// This is the O(n³) potentials-and-augmenting-path formulation. Slack
/// comparisons are plain f64 comparisons; cost ties are resolved by scan
/// order.
///
/// `cost` must be at least `count` x `count`.
pub fn hungarian_algorithm(cost: &[Vec<f64>], count: usize) -> Vec<usize> {
    // Row and column potentials, kept feasible throughout.
    let mut u = vec![0.0_f64; count + 1];
    let mut v = vec![0.0_f64; count + 1];
    // assignment[j] = marcher currently holding target j (0 = free).
    let mut assignment = vec![0_usize; count + 1];
    // path[j] = previous target on the alternating path into j.
    let mut path = vec![0_usize; count + 1];

    for marcher in 1..=count {
        // Column 0 is the artificial start of the augmenting path.
        assignment[0] = marcher;
        let mut current_target = 0_usize;
        let mut min_cost = vec![f64::INFINITY; count + 1];
        let mut visited = vec![false; count + 1];

        loop {
            visited[current_target] = true;
            let current_marcher = assignment[current_target];
            let mut delta = f64::INFINITY;
            let mut next_target = 0_usize;

            for target in 1..=count {
                if visited[target] {
                    continue;
                }
                let adjusted = cost[current_marcher - 1][target - 1]
                    - u[current_marcher]
                    - v[target];
                if adjusted < min_cost[target] {
                    min_cost[target] = adjusted;
                    path[target] = current_target;
                }
                if min_cost[target] < delta {
                    delta = min_cost[target];
                    next_target = target;
                }
            }

            for target in 0..=count {
                if visited[target] {
                    u[assignment[target]] += delta;
                    v[target] -= delta;
                } else {
                    min_cost[target] -= delta;
                }
            }

            current_target = next_target;
            if assignment[current_target] == 0 {
                break;
            }
        }

        // Flip the alternating path back to the artificial column.
        loop {
            let previous_target = path[current_target];
            assignment[current_target] = assignment[previous_target];
            current_target = previous_target;
            if current_target == 0 {
                break;
            }
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_cost(cost: &[Vec<f64>], assignment: &[usize]) -> f64 {
        (1..assignment.len())
            .map(|target| cost[assignment[target] - 1][target - 1])
            .sum()
    }

    #[test]
    fn picks_the_cheap_diagonal() {
        let cost = vec![vec![1.0, 10.0], vec![10.0, 1.0]];
        let assignment = hungarian_algorithm(&cost, 2);
        assert_eq!(&assignment[1..], &[1, 2]);
    }

    #[test]
    fn picks_the_cheap_antidiagonal() {
        let cost = vec![vec![10.0, 1.0], vec![1.0, 10.0]];
        let assignment = hungarian_algorithm(&cost, 2);
        assert_eq!(&assignment[1..], &[2, 1]);
    }

    #[test]
    fn three_by_three_known_optimum() {
        let cost = vec![
            vec![0.0, 5.0, 5.0],
            vec![5.0, 0.0, 5.0],
            vec![5.0, 5.0, 0.0],
        ];
        let assignment = hungarian_algorithm(&cost, 3);
        assert_eq!(&assignment[1..], &[1, 2, 3]);
        assert_eq!(total_cost(&cost, &assignment), 0.0);
    }

    #[test]
    fn single_marcher() {
        let cost = vec![vec![7.0]];
        assert_eq!(&hungarian_algorithm(&cost, 1)[1..], &[1]);
    }

    #[test]
    fn result_is_a_bijection() {
        let cost = vec![
            vec![4.0, 2.0, 8.0, 7.0],
            vec![3.0, 3.0, 1.0, 6.0],
            vec![9.0, 5.0, 2.0, 2.0],
            vec![1.0, 8.0, 6.0, 4.0],
        ];
        let assignment = hungarian_algorithm(&cost, 4);
        let mut seen = [false; 5];
        for &marcher in &assignment[1..] {
            assert!((1..=4).contains(&marcher));
            assert!(!seen[marcher], "marcher {marcher} assigned twice");
            seen[marcher] = true;
        }
    }

    #[test]
    fn beats_the_identity_assignment_when_cheaper() {
        // Identity costs 12, the optimum (2, 1, 4, 3) costs 4.
        let cost = vec![
            vec![3.0, 1.0, 9.0, 9.0],
            vec![1.0, 3.0, 9.0, 9.0],
            vec![9.0, 9.0, 3.0, 1.0],
            vec![9.0, 9.0, 1.0, 3.0],
        ];
        let assignment = hungarian_algorithm(&cost, 4);
        assert_eq!(total_cost(&cost, &assignment), 4.0);
    }
}
