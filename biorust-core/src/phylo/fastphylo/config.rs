//! Recognized configuration options for the profile-based engine.

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Top-hits list bound per node.
    pub m: usize,
    /// 0 = silent, 1 = progress, 2 = per-site detail. Only gates `log`
    /// emission; never changes results.
    pub verbose: u8,
    /// Rebuild the total profile from scratch every this-many joins, to
    /// bound floating-point drift.
    pub t_refresh_period: usize,
    /// Number of NNI sweeps over the whole tree.
    pub nni_rounds: usize,
    /// Jukes-Cantor correction is clamped to this value once saturated.
    pub max_corrected_distance: f64,
}

impl Config {
    /// Defaults keyed off the initial leaf count, per the FastTree
    /// recommendations: m = ceil(sqrt(n0)), nni_rounds = ceil(log2(n0))+1.
    pub fn default_for(n0: usize) -> Self {
        let m = (n0 as f64).sqrt().ceil() as usize;
        let nni_rounds = if n0 <= 1 {
            1
        } else {
            (n0 as f64).log2().ceil() as usize + 1
        };
        Self {
            m: m.max(1),
            verbose: 0,
            t_refresh_period: 200,
            nni_rounds,
            max_corrected_distance: 3.0,
        }
    }
}
