use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::LocalLabel;
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::site::SiteId;
use crate::tensor::SiteTensor;

const DENSE_LIMIT: usize = 1 << 22;

fn one() -> Complex64 {
    Complex64::new(1.0, 0.0)
}

fn zero() -> Complex64 {
    Complex64::new(0.0, 0.0)
}

fn boundary_error(code: &str, message: &str, position: usize, dim: usize) -> PrepError {
    PrepError::BoundaryDimensionMismatch(
        ErrorInfo::new(code, message)
            .with_context("position", position)
            .with_context("dim", dim),
    )
}

/// Truncation applied when compressing dense amplitudes into an [`Mps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruncationOpts {
    /// Singular values below `cutoff * largest` are discarded.
    pub cutoff: f64,
    /// Optional hard cap on bond dimensions.
    pub max_bond_dim: Option<usize>,
}

impl Default for TruncationOpts {
    fn default() -> Self {
        Self {
            cutoff: 1e-12,
            max_bond_dim: None,
        }
    }
}

/// Open-boundary matrix product state.
///
/// The outermost links are always present with dimension one, so every site
/// tensor is a rank-3 object. `center` records the orthogonality centre after
/// [`canonicalize`](Mps::canonicalize) and is cleared by any structural edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Mps {
    tensors: Vec<SiteTensor>,
    center: Option<usize>,
}

impl Mps {
    /// Assembles a state from site tensors, checking that neighbouring links agree.
    pub fn new(tensors: Vec<SiteTensor>) -> Result<Self, PrepError> {
        let Some(first) = tensors.first() else {
            return Err(PrepError::invalid("empty-mps", "a state needs at least one site"));
        };
        if first.left_dim() != 1 {
            return Err(boundary_error(
                "open-left-link",
                "leftmost link must have dimension one",
                1,
                first.left_dim(),
            ));
        }
        for (idx, pair) in tensors.windows(2).enumerate() {
            if pair[0].right_dim() != pair[1].left_dim() {
                return Err(PrepError::InvalidInput(
                    ErrorInfo::new("link-mismatch", "neighbouring link dimensions disagree")
                        .with_context("position", idx + 1)
                        .with_context("right", pair[0].right_dim())
                        .with_context("left", pair[1].left_dim()),
                ));
            }
        }
        let last = &tensors[tensors.len() - 1];
        if last.right_dim() != 1 {
            return Err(boundary_error(
                "open-right-link",
                "rightmost link must have dimension one",
                tensors.len(),
                last.right_dim(),
            ));
        }
        Ok(Self {
            tensors,
            center: None,
        })
    }

    /// Product state with one label per site.
    pub fn product_state(sites: &[SiteId], labels: &[LocalLabel]) -> Result<Self, PrepError> {
        if sites.len() != labels.len() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("label-count-mismatch", "one label per site is required")
                    .with_context("sites", sites.len())
                    .with_context("labels", labels.len()),
            ));
        }
        let tensors = sites
            .iter()
            .zip(labels)
            .map(|(site, label)| SiteTensor::product(*site, site.kind.index_of(*label)?))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tensors)
    }

    /// Compresses a dense amplitude vector by successive singular value decompositions.
    ///
    /// Amplitudes are indexed with the first site as the slowest-varying index.
    pub fn from_dense(
        sites: &[SiteId],
        amplitudes: &[Complex64],
        opts: &TruncationOpts,
    ) -> Result<Self, PrepError> {
        if sites.is_empty() {
            return Err(PrepError::invalid("empty-mps", "a state needs at least one site"));
        }
        let total = sites
            .iter()
            .try_fold(1usize, |acc, site| acc.checked_mul(site.dim()))
            .filter(|&total| total <= DENSE_LIMIT)
            .ok_or_else(|| {
                PrepError::invalid("dense-too-large", "dense amplitude space is too large")
            })?;
        if amplitudes.len() != total {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "amplitude-count-mismatch",
                    "amplitude vector does not match site dimensions",
                )
                .with_context("expected", total)
                .with_context("found", amplitudes.len()),
            ));
        }
        let norm_sq: f64 = amplitudes.iter().map(|z| z.norm_sqr()).sum();
        if norm_sq == 0.0 || !norm_sq.is_finite() {
            return Err(PrepError::invalid(
                "zero-norm",
                "cannot compress a zero or non-finite state",
            ));
        }

        let mut remainder = DMatrix::from_row_slice(1, total, amplitudes);
        let mut left = 1usize;
        let mut tensors = Vec::with_capacity(sites.len());
        for (k, site) in sites.iter().enumerate() {
            let d = site.dim();
            let rest = remainder.ncols() / d;
            if k + 1 == sites.len() {
                let blocks = (0..d)
                    .map(|s| DMatrix::from_fn(left, 1, |a, _| remainder[(a, s)]))
                    .collect();
                tensors.push(SiteTensor::new(*site, blocks)?);
                break;
            }
            let grouped = DMatrix::from_fn(left * d, rest, |row, col| {
                remainder[(row / d, (row % d) * rest + col)]
            });
            let svd = grouped.svd(true, true);
            let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
                return Err(PrepError::SolverNonConvergence(
                    ErrorInfo::new("svd-failed", "singular value decomposition did not converge")
                        .with_context("position", k + 1),
                ));
            };
            let values = svd.singular_values;
            let mut order: Vec<usize> = (0..values.len()).collect();
            order.sort_by(|&a, &b| {
                values[b]
                    .partial_cmp(&values[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let largest = values[order[0]];
            let mut keep: Vec<usize> = order
                .into_iter()
                .filter(|&idx| values[idx] > opts.cutoff * largest)
                .collect();
            if let Some(cap) = opts.max_bond_dim {
                keep.truncate(cap.max(1));
            }
            if keep.is_empty() {
                keep.push(0);
            }
            let kept = keep.len();
            let blocks = (0..d)
                .map(|s| DMatrix::from_fn(left, kept, |a, j| u[(a * d + s, keep[j])]))
                .collect();
            tensors.push(SiteTensor::new(*site, blocks)?);
            remainder = DMatrix::from_fn(kept, rest, |j, col| {
                v_t[(keep[j], col)] * Complex64::new(values[keep[j]], 0.0)
            });
            left = kept;
        }
        Self::new(tensors)
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Always `false` for a constructed state.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Orthogonality centre, if the state is in mixed-canonical form.
    pub fn center(&self) -> Option<usize> {
        self.center
    }

    /// Tensor at one-based `position`.
    pub fn tensor(&self, position: usize) -> Result<&SiteTensor, PrepError> {
        if position == 0 || position > self.tensors.len() {
            return Err(PrepError::OutOfRange(
                ErrorInfo::new("position-out-of-range", "site position is not in 1..=N")
                    .with_context("position", position)
                    .with_context("len", self.tensors.len()),
            ));
        }
        Ok(&self.tensors[position - 1])
    }

    /// Site identities in chain order.
    pub fn sites(&self) -> Vec<SiteId> {
        self.tensors.iter().map(SiteTensor::site).collect()
    }

    /// Dimensions of the `N - 1` internal links.
    pub fn bond_dims(&self) -> Vec<usize> {
        self.tensors
            .iter()
            .take(self.tensors.len().saturating_sub(1))
            .map(SiteTensor::right_dim)
            .collect()
    }

    /// Largest internal link dimension (1 for product states).
    pub fn max_bond_dim(&self) -> usize {
        self.bond_dims().into_iter().max().unwrap_or(1)
    }

    fn check_same_space(&self, other: &Mps) -> Result<(), PrepError> {
        let same = self.tensors.len() == other.tensors.len()
            && self
                .tensors
                .iter()
                .zip(&other.tensors)
                .all(|(a, b)| a.phys_dim() == b.phys_dim());
        if same {
            Ok(())
        } else {
            Err(PrepError::invalid(
                "space-mismatch",
                "states live on different site spaces",
            ))
        }
    }

    /// Overlap `<self|other>`.
    pub fn inner(&self, other: &Mps) -> Result<Complex64, PrepError> {
        self.check_same_space(other)?;
        let mut env = DMatrix::from_element(1, 1, one());
        for (a, b) in self.tensors.iter().zip(&other.tensors) {
            let mut next = DMatrix::from_element(a.right_dim(), b.right_dim(), zero());
            for (block_a, block_b) in a.blocks().iter().zip(b.blocks()) {
                next += block_a.adjoint() * &env * block_b;
            }
            env = next;
        }
        Ok(env[(0, 0)])
    }

    /// Euclidean norm of the state.
    pub fn norm(&self) -> f64 {
        if let Some(center) = self.center {
            return self.tensors[center - 1].norm_squared().sqrt();
        }
        self.inner(self).map(|value| value.re.max(0.0).sqrt()).unwrap_or(0.0)
    }

    /// Normalised expectation of a sum of single-site diagonal operators.
    ///
    /// `weight(position, site, index)` is the eigenvalue of the operator at
    /// `position` on physical basis state `index`.
    pub fn expect_diagonal<F>(&self, weight: F) -> Result<f64, PrepError>
    where
        F: Fn(usize, &SiteId, usize) -> f64,
    {
        let mut plain = DMatrix::from_element(1, 1, one());
        let mut inserted = DMatrix::from_element(1, 1, zero());
        for (idx, tensor) in self.tensors.iter().enumerate() {
            let site = tensor.site();
            let dim = tensor.right_dim();
            let mut next_plain = DMatrix::from_element(dim, dim, zero());
            let mut next_inserted = DMatrix::from_element(dim, dim, zero());
            for (s, block) in tensor.blocks().iter().enumerate() {
                let through_plain = block.adjoint() * &plain * block;
                next_inserted += block.adjoint() * &inserted * block;
                next_inserted += &through_plain * Complex64::new(weight(idx + 1, &site, s), 0.0);
                next_plain += through_plain;
            }
            plain = next_plain;
            inserted = next_inserted;
        }
        let norm_sq = plain[(0, 0)].re;
        if norm_sq <= 0.0 || !norm_sq.is_finite() {
            return Err(PrepError::invalid("zero-norm", "expectation value of a zero state"));
        }
        Ok(inserted[(0, 0)].re / norm_sq)
    }

    /// Total particle number `sum_j <n_j>` using each site's number operator.
    pub fn particle_number(&self) -> Result<f64, PrepError> {
        self.expect_diagonal(|_, site, index| site.kind.number(index))
    }

    /// Product-state label at `position`, or `None` if the site is entangled or in superposition.
    pub fn local_label(&self, position: usize) -> Result<Option<LocalLabel>, PrepError> {
        let tensor = self.tensor(position)?;
        if tensor.left_dim() != 1 || tensor.right_dim() != 1 {
            return Ok(None);
        }
        let magnitudes: Vec<f64> = tensor
            .blocks()
            .iter()
            .map(|block| block[(0, 0)].norm())
            .collect();
        let largest = magnitudes.iter().copied().fold(0.0_f64, f64::max);
        if largest == 0.0 {
            return Ok(None);
        }
        let mut support = magnitudes
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 1e-10 * largest)
            .map(|(idx, _)| idx);
        match (support.next(), support.next()) {
            (Some(index), None) => Ok(tensor.site().kind.label_of(index)),
            _ => Ok(None),
        }
    }

    /// Grafts `sub` onto positions `start..start + sub.len()`.
    ///
    /// Each grafted tensor is re-keyed to the site identity already present at
    /// its target position. The outer links of `sub` are trivial because
    /// [`Mps::new`] rejects anything else; they are identified with the host
    /// bonds at the seams, which must be trivial as well. Nothing is modified
    /// unless every check passes.
    pub fn splice(&mut self, start: usize, sub: Mps) -> Result<(), PrepError> {
        let count = sub.len();
        let end = start + count.saturating_sub(1);
        if start == 0 || count == 0 || end > self.tensors.len() {
            return Err(PrepError::OutOfRange(
                ErrorInfo::new("splice-out-of-range", "grafted region does not fit the state")
                    .with_context("start", start)
                    .with_context("count", count)
                    .with_context("len", self.tensors.len()),
            ));
        }
        let host_left = self.tensors[start - 1].left_dim();
        if host_left != 1 {
            return Err(boundary_error(
                "host-left-link",
                "host link left of the grafted region is not trivial",
                start,
                host_left,
            ));
        }
        let host_right = self.tensors[end - 1].right_dim();
        if host_right != 1 {
            return Err(boundary_error(
                "host-right-link",
                "host link right of the grafted region is not trivial",
                end,
                host_right,
            ));
        }
        let mut grafted = sub.tensors;
        for (offset, tensor) in grafted.iter_mut().enumerate() {
            tensor.relabel(self.tensors[start - 1 + offset].site())?;
        }
        for (offset, tensor) in grafted.into_iter().enumerate() {
            self.tensors[start - 1 + offset] = tensor;
        }
        self.center = None;
        Ok(())
    }

    fn left_orthonormalize(&mut self, idx: usize) {
        let tensor = &self.tensors[idx];
        let (l, d, r) = (tensor.left_dim(), tensor.phys_dim(), tensor.right_dim());
        let grouped = DMatrix::from_fn(l * d, r, |row, b| tensor.blocks()[row % d][(row / d, b)]);
        let qr = grouped.qr();
        let (q, rest) = (qr.q(), qr.r());
        let kept = q.ncols();
        let blocks = (0..d)
            .map(|s| DMatrix::from_fn(l, kept, |a, j| q[(a * d + s, j)]))
            .collect();
        self.tensors[idx].replace_blocks(blocks);
        for block in self.tensors[idx + 1].blocks_mut() {
            *block = &rest * &*block;
        }
    }

    fn right_orthonormalize(&mut self, idx: usize) {
        let tensor = &self.tensors[idx];
        let (l, d, r) = (tensor.left_dim(), tensor.phys_dim(), tensor.right_dim());
        let grouped = DMatrix::from_fn(l, d * r, |a, col| tensor.blocks()[col / r][(a, col % r)]);
        let qr = grouped.adjoint().qr();
        let (q, rest) = (qr.q(), qr.r());
        let kept = q.ncols();
        let blocks = (0..d)
            .map(|s| DMatrix::from_fn(kept, r, |j, b| q[(s * r + b, j)].conj()))
            .collect();
        self.tensors[idx].replace_blocks(blocks);
        let carry = rest.adjoint();
        for block in self.tensors[idx - 1].blocks_mut() {
            *block = &*block * &carry;
        }
    }

    /// Brings the state to mixed-canonical form with orthogonality centre at `center`.
    ///
    /// Sites left of the centre become left-orthonormal and sites right of it
    /// right-orthonormal, so the norm of the state is carried by the centre tensor.
    pub fn canonicalize(&mut self, center: usize) -> Result<(), PrepError> {
        if center == 0 || center > self.tensors.len() {
            return Err(PrepError::OutOfRange(
                ErrorInfo::new("center-out-of-range", "orthogonality centre is not in 1..=N")
                    .with_context("center", center)
                    .with_context("len", self.tensors.len()),
            ));
        }
        for idx in 0..center - 1 {
            self.left_orthonormalize(idx);
        }
        for idx in (center..self.tensors.len()).rev() {
            self.right_orthonormalize(idx);
        }
        self.center = Some(center);
        Ok(())
    }

    /// Rescales the state to unit norm and returns the norm it had before.
    ///
    /// Canonicalises at position 1 first when no orthogonality centre is set.
    pub fn normalize(&mut self) -> Result<f64, PrepError> {
        let center = match self.center {
            Some(center) => center,
            None => {
                self.canonicalize(1)?;
                1
            }
        };
        let norm = self.tensors[center - 1].norm_squared().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(PrepError::invalid(
                "zero-norm",
                "cannot normalise a zero or non-finite state",
            ));
        }
        let scale = Complex64::new(1.0 / norm, 0.0);
        for block in self.tensors[center - 1].blocks_mut() {
            *block *= scale;
        }
        Ok(norm)
    }

    /// Dense amplitudes with the first site as the slowest-varying index.
    pub fn to_dense(&self) -> Result<Vec<Complex64>, PrepError> {
        let total = self
            .tensors
            .iter()
            .try_fold(1usize, |acc, tensor| acc.checked_mul(tensor.phys_dim()))
            .filter(|&total| total <= DENSE_LIMIT)
            .ok_or_else(|| {
                PrepError::invalid("dense-too-large", "dense amplitude space is too large")
            })?;
        let mut rows: Vec<DMatrix<Complex64>> = vec![DMatrix::from_element(1, 1, one())];
        for tensor in &self.tensors {
            rows = rows
                .iter()
                .flat_map(|row| tensor.blocks().iter().map(move |block| row * block))
                .collect();
        }
        debug_assert_eq!(rows.len(), total);
        Ok(rows.into_iter().map(|row| row[(0, 0)]).collect())
    }
}
