//! Site tensors stored as one bond matrix per physical index.

use meso_core::errors::{ErrorInfo, PrepError};
use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::site::SiteId;

/// Tensor of one site: `blocks[s]` is the `left x right` bond matrix for physical index `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTensor {
    site: SiteId,
    blocks: Vec<DMatrix<Complex64>>,
}

impl SiteTensor {
    /// Creates a tensor, checking that there is one equally shaped block per physical index.
    pub fn new(site: SiteId, blocks: Vec<DMatrix<Complex64>>) -> Result<Self, PrepError> {
        if blocks.len() != site.dim() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("block-count-mismatch", "one block per physical index is required")
                    .with_context("position", site.position)
                    .with_context("dim", site.dim())
                    .with_context("blocks", blocks.len()),
            ));
        }
        let shape = blocks[0].shape();
        if shape.0 == 0 || shape.1 == 0 || blocks.iter().any(|block| block.shape() != shape) {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("ragged-blocks", "bond matrices must share a non-empty shape")
                    .with_context("position", site.position),
            ));
        }
        Ok(Self { site, blocks })
    }

    /// Product-state tensor with a single unit amplitude at physical index `index`.
    pub fn product(site: SiteId, index: usize) -> Result<Self, PrepError> {
        if index >= site.dim() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "physical-index-out-of-range",
                    "physical index exceeds site dimension",
                )
                .with_context("position", site.position)
                .with_context("index", index),
            ));
        }
        let blocks = (0..site.dim())
            .map(|s| {
                let value = if s == index {
                    Complex64::new(1.0, 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                };
                DMatrix::from_element(1, 1, value)
            })
            .collect();
        Ok(Self { site, blocks })
    }

    /// Identity of the site.
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Bond matrices indexed by physical index.
    pub fn blocks(&self) -> &[DMatrix<Complex64>] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [DMatrix<Complex64>] {
        &mut self.blocks
    }

    pub(crate) fn replace_blocks(&mut self, blocks: Vec<DMatrix<Complex64>>) {
        self.blocks = blocks;
    }

    /// Dimension of the left link.
    pub fn left_dim(&self) -> usize {
        self.blocks[0].nrows()
    }

    /// Dimension of the right link.
    pub fn right_dim(&self) -> usize {
        self.blocks[0].ncols()
    }

    /// Dimension of the physical index.
    pub fn phys_dim(&self) -> usize {
        self.blocks.len()
    }

    /// Re-keys the site identity; the local space dimension must not change.
    pub fn relabel(&mut self, site: SiteId) -> Result<(), PrepError> {
        if site.dim() != self.phys_dim() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "site-dimension-mismatch",
                    "cannot re-key a site onto a different local space",
                )
                .with_context("position", site.position)
                .with_context("expected", site.dim())
                .with_context("found", self.phys_dim()),
            ));
        }
        self.site = site;
        Ok(())
    }

    /// Squared Frobenius norm over all blocks.
    pub fn norm_squared(&self) -> f64 {
        self.blocks.iter().map(|block| block.norm_squared()).sum()
    }
}
