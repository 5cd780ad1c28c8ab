/// Record comparison for name records of the form "<first> <last>".
/// Allocation-free: every function works on raw byte slices, and the
/// comparator is pure so all workers may call it concurrently.
use std::cmp::Ordering;

/// Sort key of a record: the substring after the first space.
/// A record without a space is its own key.
#[inline]
pub fn last_name(record: &[u8]) -> &[u8] {
    match memchr::memchr(b' ', record) {
        Some(pos) => &record[pos + 1..],
        None => record,
    }
}

/// Total order over records: last names compare lexicographically, the
/// full record breaks ties. First names only decide between identical
/// last names; separator-free records fall back to whole-record order.
#[inline]
pub fn compare_records(a: &[u8], b: &[u8]) -> Ordering {
    match last_name(a).cmp(last_name(b)) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}
