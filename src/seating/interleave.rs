//! Academic-year interleaving of a room's seating queue.

use std::collections::HashMap;

use crate::models::Examinee;

/// Orders examinees so that consecutive seats alternate academic years.
///
/// Examinees are bucketed by year, buckets ordered by the first
/// appearance of their year in `examinees`, and the buckets drained
/// round-robin. Order within a bucket is preserved.
pub fn interleave_by_year<'a>(examinees: &[&'a Examinee]) -> Vec<&'a Examinee> {
    let mut buckets: Vec<Vec<&'a Examinee>> = Vec::new();
    let mut bucket_of: HashMap<u8, usize> = HashMap::new();

    for &e in examinees {
        let idx = *bucket_of.entry(e.year).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[idx].push(e);
    }

    let longest = buckets.iter().map(Vec::len).max().unwrap_or(0);
    let mut queue = Vec::with_capacity(examinees.len());
    for round in 0..longest {
        queue.extend(buckets.iter().filter_map(|b| b.get(round).copied()));
    }
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamSlot;

    fn examinee(id: &str, year: u8) -> Examinee {
        Examinee::new(id, "Maths", "2024-05-01", ExamSlot::Morning).with_year(year)
    }

    fn ids(queue: &[&Examinee]) -> Vec<String> {
        queue.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_round_robin_by_first_appearance() {
        let roster = vec![
            examinee("A", 2),
            examinee("B", 2),
            examinee("C", 1),
            examinee("D", 2),
            examinee("E", 1),
        ];
        let refs: Vec<&Examinee> = roster.iter().collect();
        assert_eq!(ids(&interleave_by_year(&refs)), ["A", "C", "B", "E", "D"]);
    }

    #[test]
    fn test_single_year_keeps_order() {
        let roster = vec![examinee("A", 3), examinee("B", 3)];
        let refs: Vec<&Examinee> = roster.iter().collect();
        assert_eq!(ids(&interleave_by_year(&refs)), ["A", "B"]);
    }

    #[test]
    fn test_empty() {
        assert!(interleave_by_year(&[]).is_empty());
    }
}
