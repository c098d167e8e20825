//! Longest-common-subsequence table and backtrack shared by line and token diffs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Keep { old: usize, new: usize },
    Delete(usize),
    Insert(usize),
}

/// Minimal edit script turning `old` into `new`.
///
/// Common prefix and suffix are matched up front, the remaining middle goes through an
/// O(n·m) table. Within a change run deletions come before insertions.
pub fn edit_script<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Step> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut steps = Vec::with_capacity(old.len().max(new.len()));
    steps.extend((0..prefix).map(|idx| Step::Keep { old: idx, new: idx }));
    steps.extend(
        middle_script(old_mid, new_mid)
            .into_iter()
            .map(|step| offset_step(step, prefix)),
    );
    steps.extend((0..suffix).map(|k| Step::Keep {
        old: old.len() - suffix + k,
        new: new.len() - suffix + k,
    }));
    steps
}

/// Length of the longest common subsequence.
pub fn lcs_len<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    edit_script(old, new)
        .iter()
        .filter(|step| matches!(step, Step::Keep { .. }))
        .count()
}

fn offset_step(step: Step, by: usize) -> Step {
    match step {
        Step::Keep { old, new } => Step::Keep {
            old: old + by,
            new: new + by,
        },
        Step::Delete(idx) => Step::Delete(idx + by),
        Step::Insert(idx) => Step::Insert(idx + by),
    }
}

fn middle_script<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Step> {
    let m = old.len();
    let n = new.len();
    let width = n + 1;
    let mut table = vec![0u32; (m + 1) * width];

    for i in 1..=m {
        for j in 1..=n {
            table[i * width + j] = if old[i - 1] == new[j - 1] {
                table[(i - 1) * width + j - 1] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + j - 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(m + n);
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            steps.push(Step::Keep {
                old: i - 1,
                new: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i * width + j - 1] >= table[(i - 1) * width + j]) {
            steps.push(Step::Insert(j - 1));
            j -= 1;
        } else {
            steps.push(Step::Delete(i - 1));
            i -= 1;
        }
    }

    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::{edit_script, lcs_len, Step};

    #[test]
    fn identical_inputs_keep_everything() {
        let steps = edit_script(&["a", "b"], &["a", "b"]);
        assert_eq!(
            steps,
            vec![Step::Keep { old: 0, new: 0 }, Step::Keep { old: 1, new: 1 }]
        );
    }

    #[test]
    fn deletions_precede_insertions() {
        let steps = edit_script(&["a", "x", "c"], &["a", "y", "c"]);
        assert_eq!(
            steps,
            vec![
                Step::Keep { old: 0, new: 0 },
                Step::Delete(1),
                Step::Insert(1),
                Step::Keep { old: 2, new: 2 },
            ]
        );
    }

    #[test]
    fn lcs_length_is_minimal() {
        assert_eq!(lcs_len(&[1, 2, 3, 4, 1], &[3, 4, 1, 2, 1]), 3);
        assert_eq!(lcs_len::<u8>(&[], &[1, 2]), 0);
    }
}
