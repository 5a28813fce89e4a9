use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T> {
    fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }
}

/// Contiguous block of differing lines, 0-based positions on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

impl Hunk {
    /// `@@ -A[,old_len] +B[,new_len] @@`, a length of one printed bare
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            Self::range(self.old_start, self.old_len),
            Self::range(self.new_start, self.new_len)
        )
    }

    fn range(start: usize, len: usize) -> String {
        let start = if len > 0 { start + 1 } else { start };
        match len {
            1 => start.to_string(),
            len => format!("{start},{len}"),
        }
    }
}

pub trait DiffAlgorithm<'d, T> {
    /// Minimal edit script turning the old sequence into the new one
    fn diff(&self) -> Vec<Edit<T>>;

    /// Runs of consecutive changes, positioned on both sides
    fn hunks(&self) -> Vec<Hunk> {
        let mut hunks = Vec::new();
        let (mut old_pos, mut new_pos) = (0, 0);
        let mut current: Option<Hunk> = None;

        for edit in self.diff() {
            if edit.is_equal() {
                hunks.extend(current.take());
                old_pos += 1;
                new_pos += 1;
                continue;
            }

            let hunk = current.get_or_insert(Hunk::new(old_pos, 0, new_pos, 0));
            match edit {
                Edit::Delete { .. } => {
                    hunk.old_len += 1;
                    old_pos += 1;
                }
                Edit::Insert { .. } => {
                    hunk.new_len += 1;
                    new_pos += 1;
                }
                Edit::Equal { .. } => {}
            }
        }
        hunks.extend(current);

        hunks
    }
}

/// Myers' O((N+M)D) shortest edit script, in linear space
///
/// Each step strips the common prefix and suffix, finds the middle snake of
/// what is left by searching from both ends at once, and recurses on the two
/// halves around it. Within every run of changes deletions come before
/// insertions.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

/// Furthest x reached on each diagonal k, indexed from -max to max
struct Frontier {
    offset: isize,
    xs: Vec<usize>,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Frontier {
            offset: max as isize + 1,
            xs: vec![0; 2 * max + 3],
        }
    }

    fn get(&self, k: isize) -> usize {
        self.xs[(self.offset + k) as usize]
    }

    fn set(&mut self, k: isize, x: usize) {
        self.xs[(self.offset + k) as usize] = x;
    }
}

impl<'d, T: Eq + Clone> MyersDiff<'d, T> {
    fn conquer(&self, a: &[T], b: &[T], edits: &mut Vec<Edit<T>>) {
        let prefix = common_prefix(a, b);
        edits.extend(a[..prefix].iter().map(|value| Edit::Equal {
            value: value.clone(),
        }));
        let (a, b) = (&a[prefix..], &b[prefix..]);

        let suffix = common_suffix(a, b);
        let tail = &a[a.len() - suffix..];
        let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

        if a.is_empty() || b.is_empty() {
            edits.extend(a.iter().map(|value| Edit::Delete {
                value: value.clone(),
            }));
            edits.extend(b.iter().map(|value| Edit::Insert {
                value: value.clone(),
            }));
        } else {
            let (x, y) = middle_snake(a, b);
            self.conquer(&a[..x], &b[..y], edits);
            self.conquer(&a[x..], &b[y..], edits);
        }

        edits.extend(tail.iter().map(|value| Edit::Equal {
            value: value.clone(),
        }));
    }
}

impl<'d, T: Eq + Clone> DiffAlgorithm<'d, T> for MyersDiff<'d, T> {
    fn diff(&self) -> Vec<Edit<T>> {
        let mut edits = Vec::with_capacity(self.a.len().max(self.b.len()));
        self.conquer(self.a, self.b, &mut edits);

        deletions_first(edits)
    }
}

fn common_prefix<T: Eq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix<T: Eq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Split point `(x, y)` on a shortest edit path of two non-empty sequences
/// whose first and last elements differ
fn middle_snake<T: Eq>(a: &[T], b: &[T]) -> (usize, usize) {
    let (n, m) = (a.len(), b.len());
    let delta = n as isize - m as isize;
    let odd = delta % 2 != 0;
    let max = (n + m).div_ceil(2) + 1;

    let mut forward = Frontier::new(max);
    let mut backward = Frontier::new(max);

    for d in 0..max as isize {
        for k in (-d..=d).rev().step_by(2) {
            let from_above = k == -d || (k != d && forward.get(k - 1) < forward.get(k + 1));
            let mut x = if from_above {
                forward.get(k + 1)
            } else {
                forward.get(k - 1) + 1
            };
            let y = (x as isize - k) as usize;
            let start = (x, y);
            if x < n && y < m {
                x += common_prefix(&a[x..], &b[y..]);
            }
            forward.set(k, x);

            if odd && (k - delta).abs() < d && x + backward.get(delta - k) >= n {
                return start;
            }
        }

        for k in (-d..=d).rev().step_by(2) {
            let from_above = k == -d || (k != d && backward.get(k - 1) < backward.get(k + 1));
            let mut x = if from_above {
                backward.get(k + 1)
            } else {
                backward.get(k - 1) + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let run = common_suffix(&a[..n - x], &b[..m - y]);
                x += run;
                y += run;
            }
            backward.set(k, x);

            if !odd && (k - delta).abs() <= d && x + forward.get(delta - k) >= n {
                return (n - x, m - y);
            }
        }
    }

    // unreachable for inputs meeting the precondition; splitting at the
    // origin would not shrink the problem, so cut after the first element
    (1, 0)
}

/// Reorder every run of changes so its deletions precede its insertions
fn deletions_first<T>(edits: Vec<Edit<T>>) -> Vec<Edit<T>> {
    let mut ordered = Vec::with_capacity(edits.len());
    let mut inserts = Vec::new();

    for edit in edits {
        match edit {
            Edit::Insert { .. } => inserts.push(edit),
            Edit::Delete { .. } => ordered.push(edit),
            Edit::Equal { .. } => {
                ordered.append(&mut inserts);
                ordered.push(edit);
            }
        }
    }
    ordered.append(&mut inserts);

    ordered
}
