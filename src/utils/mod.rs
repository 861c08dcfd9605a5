//! Utility functions and helpers

pub mod formats;
pub mod generate;

pub use formats::{from_sprs_csc, to_sprs_csc};
pub use generate::{random_ccs, random_input};

/// Computes an exclusive prefix sum (scan) for a vector
///
/// The result has one more element than the input and starts at 0.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0);

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        assert_eq!(exclusive_scan(&[1, 2, 3, 4]), vec![0, 1, 3, 6, 10]);
        assert_eq!(exclusive_scan(&[0, 0, 5, 0]), vec![0, 0, 0, 5, 5]);
        assert_eq!(exclusive_scan(&[]), vec![0]);
    }
}
