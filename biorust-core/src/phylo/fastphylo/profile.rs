//! Per-site probability profiles and the distance arithmetic built on them.
//!
//! A profile is an L x 4 matrix of non-negative reals (row sums <= 1) over
//! the nucleotide alphabet A, C, G, T. Leaf profiles are one-hot per site;
//! internal-node profiles are weighted averages of their children.

use crate::error::{BioError, BioResult};

/// Index of A, C, G, T within a profile row.
const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    data: Vec<f64>,
    sites: usize,
}

impl Profile {
    pub fn zero(sites: usize) -> Self {
        Self {
            data: vec![0.0; sites * 4],
            sites,
        }
    }

    /// One-hot encode a nucleotide sequence; gap characters become the
    /// all-zero row. Any byte outside {A,C,G,T,gap} (case-insensitive,
    /// '-' or '.' as gap) is an input-shape error.
    pub fn from_sequence(seq: &[u8]) -> BioResult<Self> {
        let mut data = vec![0.0; seq.len() * 4];
        for (i, &b) in seq.iter().enumerate() {
            if b == b'-' || b == b'.' {
                continue;
            }
            let upper = b.to_ascii_uppercase();
            let Some(col) = BASES.iter().position(|&base| base == upper) else {
                return Err(BioError::InvalidChar {
                    ch: b as char,
                    pos: i,
                });
            };
            data[i * 4 + col] = 1.0;
        }
        Ok(Self {
            data,
            sites: seq.len(),
        })
    }

    pub fn sites(&self) -> usize {
        self.sites
    }

    pub fn row(&self, site: usize) -> &[f64] {
        &self.data[site * 4..site * 4 + 4]
    }

    fn row_mut(&mut self, site: usize) -> &mut [f64] {
        &mut self.data[site * 4..site * 4 + 4]
    }

    fn check_same_length(&self, other: &Profile) -> BioResult<()> {
        if self.sites != other.sites {
            return Err(BioError::ProfileLengthMismatch {
                a: self.sites,
                b: other.sites,
            });
        }
        Ok(())
    }

    pub fn add_in_place(&mut self, other: &Profile) -> BioResult<()> {
        self.check_same_length(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }

    pub fn subtract_in_place(&mut self, other: &Profile) -> BioResult<()> {
        self.check_same_length(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= b;
        }
        Ok(())
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            data: self.data.iter().map(|v| v * factor).collect(),
            sites: self.sites,
        }
    }
}

/// `average(p, q, lambda)`: cell-wise `lambda*p + (1-lambda)*q`.
pub fn average(p: &Profile, q: &Profile, lambda: f64) -> BioResult<Profile> {
    p.check_same_length(q)?;
    let mut out = Profile::zero(p.sites);
    for site in 0..p.sites {
        let pr = p.row(site);
        let qr = q.row(site);
        let or = out.row_mut(site);
        for a in 0..4 {
            or[a] = lambda * pr[a] + (1.0 - lambda) * qr[a];
        }
    }
    Ok(out)
}

/// Profile distance `Delta(p, q)`: expected mismatch probability between two
/// independent draws from `p` and `q`, summed over all ordered (a,b) with
/// a != b. The explicit a != b mask (rather than the "both entries > 0"
/// indicator some implementations use) is the form given in the FastTree
/// paper and is the only one that stays correct for non-one-hot (averaged,
/// internal-node) profiles.
pub fn profile_distance(p: &Profile, q: &Profile) -> BioResult<f64> {
    p.check_same_length(q)?;
    if p.sites == 0 {
        return Ok(0.0);
    }
    let mut total = 0.0;
    let mut overlap_mass = 0.0;
    for site in 0..p.sites {
        let pr = p.row(site);
        let qr = q.row(site);
        let p_mass: f64 = pr.iter().sum();
        let q_mass: f64 = qr.iter().sum();
        overlap_mass += p_mass * q_mass;
        for a in 0..4 {
            if pr[a] == 0.0 {
                continue;
            }
            for b in 0..4 {
                if a == b {
                    continue;
                }
                total += pr[a] * qr[b];
            }
        }
    }
    // Non-overlapping sequences: every site has a gap in at least one of
    // the two profiles, so there is no comparable (non-gap, non-gap) site
    // anywhere and the raw sum above is vacuously 0. Rather than reporting
    // these as identical, treat them as maximally diverged.
    if overlap_mass == 0.0 {
        return Ok(1.0);
    }
    Ok(total / p.sites as f64)
}

/// Jukes-Cantor correction. Clamped to `max_corrected` when `du >= 0.75`
/// (saturation) or when the raw correction would exceed it.
pub fn jc_correct(du: f64, max_corrected: f64) -> f64 {
    if du >= 0.75 {
        return max_corrected;
    }
    let arg = 1.0 - (4.0 / 3.0) * du;
    if arg <= 0.0 {
        return max_corrected;
    }
    let d = -0.75 * arg.ln();
    if d > max_corrected || d.is_nan() {
        max_corrected
    } else {
        d
    }
}
