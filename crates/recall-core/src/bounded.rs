//! Oldest-first eviction for capped lists.

/// Appends `item` and drops the oldest entries until `items.len() <= cap`.
///
/// A `cap` of zero is treated as one: the item just pushed is always kept.
pub fn push_bounded<T>(items: &mut Vec<T>, item: T, cap: usize) {
    let cap = cap.max(1);
    items.push(item);
    if items.len() > cap {
        let overflow = items.len() - cap;
        items.drain(..overflow);
    }
}

/// Returns the last `n` items (all of them if fewer).
pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cap_keeps_newest() {
        let mut items = vec![1, 2];
        push_bounded(&mut items, 3, 0);
        assert_eq!(items, vec![3]);
    }

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut items = Vec::new();
        for i in 0..7 {
            push_bounded(&mut items, i, 5);
        }
        assert_eq!(items, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_tail_shorter_than_n() {
        let items = [1, 2];
        assert_eq!(tail(&items, 5), &[1, 2]);
        assert_eq!(tail(&items, 1), &[2]);
    }
}
