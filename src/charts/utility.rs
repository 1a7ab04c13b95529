/// Default number of ticks on a count axis.
pub const MAX_TICKS: usize = 5;

/// Integer tick values for a count axis topping out at the largest of `sums`.
///
/// Ticks start at 0 and step by `ceil(max / (max_ticks - 1))`; the maximum is
/// always the last tick. An all-zero or empty input yields `[0]`.
pub fn y_ticks(sums: &[u64], max_ticks: usize) -> Vec<u64> {
    let max = sums.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0];
    }

    let increment = max.div_ceil(max_ticks.saturating_sub(1).max(1) as u64);
    let mut ticks: Vec<u64> = (0..=max).step_by(increment as usize).collect();
    if ticks.last() != Some(&max) {
        ticks.push(max);
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_ticks_all_zero() {
        assert_eq!(y_ticks(&[0, 0], MAX_TICKS), vec![0]);
        assert_eq!(y_ticks(&[], MAX_TICKS), vec![0]);
    }

    #[test]
    fn test_y_ticks_even_division() {
        assert_eq!(y_ticks(&[3, 8], MAX_TICKS), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_y_ticks_appends_max() {
        assert_eq!(y_ticks(&[10], MAX_TICKS), vec![0, 3, 6, 9, 10]);
    }

    #[test]
    fn test_y_ticks_small_max() {
        assert_eq!(y_ticks(&[1], MAX_TICKS), vec![0, 1]);
    }
}
