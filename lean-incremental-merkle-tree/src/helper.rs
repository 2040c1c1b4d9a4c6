/// Depth of a lean tree holding `size` leaves: `ceil(log2(size))`, and 0
/// for `size <= 1`.
///
/// ```text
///   size  1  2  3  4  5 .. 8  9 .. 16  17
///  depth  0  1  2  2  3 .. 3  4 .. 4   5
/// ```
pub fn depth_for_size(size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    (usize::BITS - (size - 1).leading_zeros()) as usize
}

/// Number of nodes on the level above a level of `len` nodes.
pub(crate) fn parent_count(len: usize) -> usize {
    len.div_ceil(2)
}

/// Checks that `nodes` is the matrix of some lean tree: either a single
/// empty level, or `depth_for_size(leaves) + 1` levels each holding
/// `ceil(len / 2)` of the level below. Hash values are not checked.
pub(crate) fn check_matrix_shape<N>(nodes: &[Vec<N>]) -> core::result::Result<(), String> {
    let Some(leaves) = nodes.first() else {
        return Err("node matrix has no levels".into());
    };
    if leaves.is_empty() {
        if nodes.len() != 1 {
            return Err(format!("tree without leaves has {} levels", nodes.len()));
        }
        return Ok(());
    }

    let expected_levels = depth_for_size(leaves.len()) + 1;
    if nodes.len() != expected_levels {
        return Err(format!(
            "{} leaves need {} levels, got {}",
            leaves.len(),
            expected_levels,
            nodes.len()
        ));
    }
    for (level, pair) in nodes.windows(2).enumerate() {
        if pair[1].len() != parent_count(pair[0].len()) {
            return Err(format!(
                "level {} has {} nodes, expected {}",
                level + 1,
                pair[1].len(),
                parent_count(pair[0].len())
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_for_size() {
        let expected = [0, 0, 1, 2, 2, 3, 3, 3, 3, 4];
        for (size, depth) in expected.iter().enumerate() {
            assert_eq!(depth_for_size(size), *depth, "size {size}");
        }
        assert_eq!(depth_for_size(16), 4);
        assert_eq!(depth_for_size(17), 5);
        assert_eq!(depth_for_size(1 << 20), 20);
        assert_eq!(depth_for_size((1 << 20) + 1), 21);
    }

    #[test]
    fn test_check_matrix_shape() {
        assert!(check_matrix_shape::<u8>(&[vec![]]).is_ok());
        assert!(check_matrix_shape(&[vec![1]]).is_ok());
        assert!(check_matrix_shape(&[vec![1, 2, 3], vec![3, 3], vec![6]]).is_ok());

        assert!(check_matrix_shape::<u8>(&[]).is_err());
        assert!(check_matrix_shape::<u8>(&[vec![], vec![]]).is_err());
        assert!(check_matrix_shape(&[vec![1, 2, 3], vec![3, 3]]).is_err());
        assert!(check_matrix_shape(&[vec![1, 2, 3], vec![3], vec![3]]).is_err());
        assert!(check_matrix_shape(&[vec![1, 2], vec![3], vec![3]]).is_err());
    }
}
