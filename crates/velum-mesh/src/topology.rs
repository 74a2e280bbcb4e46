//! Spring topology over an `n × m` point grid.
//!
//! Two independent views of the same stencil:
//!
//! - [`fill_springs`] emits the forward-only springs of one point, so that
//!   driving it over every point in row-major order ([`generate_springs`])
//!   produces each spring exactly once. [`number_of_springs`] gives the
//!   closed-form count of that enumeration.
//! - [`possible_springs`] lists every spring candidate incident to a point
//!   (up to 12), without consulting the global list. The force engine uses
//!   it for local normal estimation.

use velum_types::constants::MAX_SPRINGS_PER_POINT;
use velum_types::{GridPoint, VelumError, VelumResult};

use crate::spring::{Spring, SpringKind, Stiffness};

/// Closed-form spring counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpringCount {
    /// Diagonal, adjacent.
    pub shear: usize,
    /// Axis-aligned, skip-one.
    pub flexion: usize,
    /// Axis-aligned, adjacent.
    pub structural: usize,
}

impl SpringCount {
    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.shear + self.flexion + self.structural
    }
}

/// Number of springs [`generate_springs`] emits for an `n × m` grid.
///
/// - shear: `2 (n-1)(m-1)`
/// - flexion: `(m-2) n + (n-2) m`, each term clamped at zero
/// - structural: `(2n-1)(m-1) + (n-1)`
///
/// Both dimensions must be at least 1.
pub fn number_of_springs(n: usize, m: usize) -> SpringCount {
    debug_assert!(n >= 1 && m >= 1, "grid dimensions must be >= 1");
    let shear = 2 * (n - 1) * (m - 1);
    let flexion = m.saturating_sub(2) * n + n.saturating_sub(2) * m;
    let structural = (2 * n - 1) * (m - 1) + (n - 1);
    SpringCount {
        shear,
        flexion,
        structural,
    }
}

/// Appends the forward-only springs anchored at `p` to `springs`.
///
/// At most six springs, each emitted only if its far endpoint is on the
/// grid: structural `(i+1, j)` and `(i, j+1)`, shear `(i+1, j+1)` and
/// `(i-1, j+1)`, flexion `(i+2, j)` and `(i, j+2)`.
pub fn fill_springs(springs: &mut Vec<Spring>, p: GridPoint, n: usize, m: usize, stiffness: &Stiffness) {
    const FORWARD: [(i64, i64, SpringKind); 6] = [
        (1, 0, SpringKind::StructuralHorizontal),
        (0, 1, SpringKind::StructuralVertical),
        (1, 1, SpringKind::Shear),
        (-1, 1, SpringKind::Shear),
        (2, 0, SpringKind::FlexionHorizontal),
        (0, 2, SpringKind::FlexionVertical),
    ];

    for (di, dj, kind) in FORWARD {
        if let Some(q) = p.offset(di, dj, n, m) {
            springs.push(Spring::new(p, q, stiffness.for_kind(kind), kind));
        }
    }
}

/// Builds the full, non-duplicated spring list for an `n × m` grid.
///
/// Fails with `InvalidConfig` on an empty grid, and with
/// `InvariantViolation` if the enumeration disagrees with
/// [`number_of_springs`].
pub fn generate_springs(n: usize, m: usize, stiffness: &Stiffness) -> VelumResult<Vec<Spring>> {
    if n == 0 || m == 0 {
        return Err(VelumError::InvalidConfig(format!(
            "Grid dimensions must be >= 1, got {n}x{m}"
        )));
    }

    let expected = number_of_springs(n, m).total();
    let mut springs = Vec::with_capacity(expected);
    for i in 0..n {
        for j in 0..m {
            fill_springs(&mut springs, GridPoint::new(i as u32, j as u32), n, m, stiffness);
        }
    }

    if springs.len() != expected {
        return Err(VelumError::InvariantViolation(format!(
            "Generated {} springs for a {n}x{m} grid, closed form says {expected}",
            springs.len()
        )));
    }
    Ok(springs)
}

/// Spring candidates incident to one point. Fixed capacity, no allocation.
#[derive(Debug, Clone, Copy)]
pub struct Stencil {
    springs: [Option<Spring>; MAX_SPRINGS_PER_POINT],
    len: usize,
}

impl Stencil {
    fn empty() -> Self {
        Self {
            springs: [None; MAX_SPRINGS_PER_POINT],
            len: 0,
        }
    }

    fn push(&mut self, spring: Spring) {
        self.springs[self.len] = Some(spring);
        self.len += 1;
    }

    /// Number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the point has no neighbour at all (a 1×1 grid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Candidate `k` in stencil order.
    #[inline]
    pub fn get(&self, k: usize) -> Option<&Spring> {
        self.springs[..self.len].get(k).and_then(Option::as_ref)
    }

    /// First candidate in stencil order.
    #[inline]
    pub fn first(&self) -> Option<&Spring> {
        self.get(0)
    }

    /// Last candidate in stencil order.
    #[inline]
    pub fn last(&self) -> Option<&Spring> {
        self.len.checked_sub(1).and_then(|k| self.get(k))
    }

    /// Iterates over the candidates in stencil order.
    pub fn iter(&self) -> impl Iterator<Item = &Spring> {
        self.springs[..self.len].iter().flatten()
    }
}

/// Every spring candidate incident to `p`, each with `a == p`.
///
/// Order: the 3×3 neighbourhood scanned row by row (`i-1..=i+1`, then
/// `j-1..=j+1`, skipping `p` itself), followed by the skip-one neighbours
/// `(i-2, j)`, `(i+2, j)`, `(i, j-2)`, `(i, j+2)`. Off-grid candidates are
/// dropped.
pub fn possible_springs(p: GridPoint, n: usize, m: usize, stiffness: &Stiffness) -> Stencil {
    let mut stencil = Stencil::empty();

    for di in -1..=1_i64 {
        for dj in -1..=1_i64 {
            if di == 0 && dj == 0 {
                continue;
            }
            let Some(q) = p.offset(di, dj, n, m) else {
                continue;
            };
            let kind = if di != 0 && dj != 0 {
                SpringKind::Shear
            } else if di != 0 {
                SpringKind::StructuralHorizontal
            } else {
                SpringKind::StructuralVertical
            };
            stencil.push(Spring::new(p, q, stiffness.for_kind(kind), kind));
        }
    }

    const SKIP_ONE: [(i64, i64, SpringKind); 4] = [
        (-2, 0, SpringKind::FlexionHorizontal),
        (2, 0, SpringKind::FlexionHorizontal),
        (0, -2, SpringKind::FlexionVertical),
        (0, 2, SpringKind::FlexionVertical),
    ];
    for (di, dj, kind) in SKIP_ONE {
        if let Some(q) = p.offset(di, dj, n, m) {
            stencil.push(Spring::new(p, q, stiffness.for_kind(kind), kind));
        }
    }

    stencil
}
