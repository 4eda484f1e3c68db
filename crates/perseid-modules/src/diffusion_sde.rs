//! Anisotropic diffusive transport along magnetic field lines via
//! adaptive-step Euler–Maruyama integration.
//!
//! The deterministic drift term follows the local field line, whose
//! tangent is integrated with an embedded Cash-Karp 4(5) pair; the
//! stochastic term displaces the candidate in the field-aligned frame
//! with independent Wiener increments, the parallel component scaled by
//! the full diffusion coefficient and the two perpendicular components
//! by `epsilon` times it.

use std::sync::Arc;

use perseid_core::units::{C_LIGHT, KPC, PARSEC};
use perseid_core::{Candidate, ConfigError, Module, ModuleError, Vector3};
use perseid_fields::MagneticField;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Diffusion coefficient at the reference rigidity, m^2/s.
const DIFFUSION_NORM: f64 = 6.1e24;
/// Reference rigidity, volts.
const RIGIDITY_NORM: f64 = 4.0e9;

// Cash-Karp 4(5) tableau
const CK_A: [[f64; 5]; 5] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0],
    [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0],
    [
        1631.0 / 55296.0,
        175.0 / 512.0,
        575.0 / 13824.0,
        44275.0 / 110592.0,
        253.0 / 4096.0,
    ],
];
const CK_B5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];
const CK_B4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    1.0 / 4.0,
];

/// Propagates candidates as pseudo-particles: the transport equation is
/// solved by time integration of a stochastic differential equation
/// with an Euler–Maruyama scheme, anisotropic with respect to the
/// magnetic field line coordinates.
///
/// # Step adaptation
///
/// A trial step (the candidate's proposed next step clamped into
/// `[min_step, max_step]`) is integrated along the field line; the
/// Cash-Karp positional error, expressed per kiloparsec, is compared
/// against `tolerance`. Too large
/// an error halves the step and retries — nothing is committed until a
/// step is accepted, so retries need no explicit rollback. A step that
/// still violates the tolerance at `min_step` is accepted at the floor;
/// the error controller then keeps the following pass at the minimum.
///
/// # Determinism
///
/// The Wiener increments come from a `ChaCha8Rng` seeded per call from
/// the configured seed, the candidate's serial, and its trajectory
/// length, so re-running an identical candidate (or a clone, which
/// keeps the serial) reproduces its trajectory bit for bit regardless
/// of scheduling.
pub struct DiffusionSde {
    field: Arc<dyn MagneticField>,
    tolerance: f64,
    min_step: f64,
    max_step: f64,
    epsilon: f64,
    alpha: f64,
    scale: f64,
    seed: u64,
}

impl std::fmt::Debug for DiffusionSde {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffusionSde")
            .field("tolerance", &self.tolerance)
            .field("min_step", &self.min_step)
            .field("max_step", &self.max_step)
            .field("epsilon", &self.epsilon)
            .field("alpha", &self.alpha)
            .field("scale", &self.scale)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DiffusionSde`]. Required field: `field`.
pub struct DiffusionSdeBuilder {
    field: Option<Arc<dyn MagneticField>>,
    tolerance: f64,
    min_step: f64,
    max_step: f64,
    epsilon: f64,
    alpha: f64,
    scale: f64,
    seed: u64,
}

impl DiffusionSde {
    /// Create a new builder with the reference defaults: tolerance
    /// `1e-4`, step bounds `[10 pc, 1 kpc]`, `epsilon = 0.1`,
    /// `alpha = 1/3`, `scale = 1`.
    pub fn builder() -> DiffusionSdeBuilder {
        DiffusionSdeBuilder {
            field: None,
            tolerance: 1e-4,
            min_step: 10.0 * PARSEC,
            max_step: 1.0 * KPC,
            epsilon: 0.1,
            alpha: 1.0 / 3.0,
            scale: 1.0,
            seed: 0,
        }
    }

    /// Minimum integration step, meters.
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    /// Maximum integration step, meters.
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Step-adjustment error tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Perpendicular-to-parallel diffusion ratio.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Power-law index of the rigidity-dependent diffusion coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Overall scaling of the diffusion coefficient.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Diagonal of the diffusion tensor in field-aligned coordinates,
    /// `[sqrt(2 D_par), sqrt(2 D_perp), sqrt(2 D_perp)]`, for a given
    /// rigidity (volts). Purely functional. The coefficients are
    /// homogeneous: rigidity is the only input, position and redshift
    /// do not enter.
    ///
    /// `D_par = scale * 6.1e24 m^2/s * (|rigidity| / 4 GV)^alpha` and
    /// `D_perp = epsilon * D_par`.
    pub fn calculate_b_tensor(&self, rigidity: f64) -> [f64; 3] {
        let d_par = self.scale * DIFFUSION_NORM * (rigidity.abs() / RIGIDITY_NORM).powf(self.alpha);
        let d_perp = self.epsilon * d_par;
        [
            (2.0 * d_par).sqrt(),
            (2.0 * d_perp).sqrt(),
            (2.0 * d_perp).sqrt(),
        ]
    }

    /// Integrate the field-line tangent equation `dy/ds = B(y)/|B(y)|`
    /// over one trial step with the embedded Cash-Karp 4(5) pair.
    ///
    /// Returns `(higher, lower, error)`: the fifth-order position, the
    /// embedded fourth-order position, and their difference used for
    /// the step-size error estimate. Purely functional — no candidate
    /// is mutated, which keeps the scheme unit-testable in isolation.
    /// A zero local field yields a zero tangent (no motion) rather
    /// than dividing by zero.
    pub fn try_step(&self, position: &Vector3, z: f64, step: f64) -> (Vector3, Vector3, Vector3) {
        let tangent = |p: &Vector3| -> Vector3 {
            let b = self.field.value(p, z);
            let norm = b.norm();
            if norm > 0.0 {
                b / norm
            } else {
                Vector3::ZERO
            }
        };

        let mut k = [Vector3::ZERO; 6];
        k[0] = tangent(position);
        for (i, row) in CK_A.iter().enumerate() {
            let mut p = *position;
            for (j, a) in row.iter().take(i + 1).enumerate() {
                p += k[j] * (a * step);
            }
            k[i + 1] = tangent(&p);
        }

        let mut higher = *position;
        let mut lower = *position;
        for i in 0..6 {
            higher += k[i] * (CK_B5[i] * step);
            lower += k[i] * (CK_B4[i] * step);
        }
        (higher, lower, higher - lower)
    }

    /// Per-call RNG derived from the configured seed and the candidate
    /// state, so identical candidate state yields identical noise.
    fn rng_for(&self, candidate: &Candidate) -> ChaCha8Rng {
        let mix = candidate
            .serial()
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ candidate.trajectory_length().to_bits().rotate_left(17);
        ChaCha8Rng::seed_from_u64(self.seed ^ mix)
    }

    /// Generate a standard-normal sample using the Box-Muller
    /// transform. Avoids the `rand_distr` dependency.
    fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
        let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
        let u2: f64 = rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl Module for DiffusionSde {
    fn name(&self) -> &str {
        "DiffusionSde"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() || candidate.current.energy() <= 0.0 {
            return Ok(());
        }

        // snapshot for rollback and crossing detection
        candidate.previous = candidate.current;

        let h = candidate.next_step().clamp(self.min_step, self.max_step);
        let pos_in = candidate.current.position();
        let dir_in = candidate.current.direction();
        let z = candidate.redshift();

        let charge = candidate.current.charge();
        if charge == 0.0 {
            // rectilinear propagation for neutral particles
            candidate.current.set_position(pos_in + dir_in * h);
            candidate.set_current_step(h);
            candidate.add_trajectory_length(h);
            candidate.set_next_step(self.max_step);
            return Ok(());
        }

        let rigidity = candidate.current.energy() / charge;
        let b_tensor = self.calculate_b_tensor(rigidity);

        // integrate the field line until the error estimate passes,
        // halving the step on each miss; at min_step accept regardless.
        // The positional error is measured per kiloparsec so that the
        // tolerance is independent of the absolute step length.
        let mut step = h;
        let mut r;
        let pos_out = loop {
            let (higher, _lower, err) = self.try_step(&pos_in, z, step);
            r = err.norm() / KPC / self.tolerance;
            if r <= 1.0 || step <= self.min_step {
                break higher;
            }
            step = (0.5 * step).max(self.min_step);
        };

        // field-line tangent; a degenerate field leaves the direction
        // unperturbed
        let delta = pos_out - pos_in;
        let t_vec = if delta.norm() > 0.0 {
            delta.unit()
        } else {
            dir_in
        };

        // complete the field-aligned orthonormal frame
        let helper = if t_vec.x.abs() < 0.9 {
            Vector3::X
        } else {
            Vector3::Y
        };
        let n_vec = t_vec.cross(&helper).unit();
        let b_vec = t_vec.cross(&n_vec);

        let mut rng = self.rng_for(candidate);
        let eta = [
            Self::box_muller(&mut rng),
            Self::box_muller(&mut rng),
            Self::box_muller(&mut rng),
        ];

        let sqrt_tau = (step / C_LIGHT).sqrt();
        let pos_new = pos_in
            + t_vec * (b_tensor[0] * eta[0] * sqrt_tau)
            + n_vec * (b_tensor[1] * eta[1] * sqrt_tau)
            + b_vec * (b_tensor[2] * eta[2] * sqrt_tau);

        if !pos_new.is_finite() {
            return Err(ModuleError::NonFiniteState {
                quantity: "position".into(),
            });
        }

        candidate.current.set_position(pos_new);
        candidate
            .current
            .set_direction(if eta[0] < 0.0 { -t_vec } else { t_vec });
        candidate.set_current_step(step);
        candidate.add_trajectory_length(step);

        // standard step-size controller for the next pass
        let factor = if r > 1e-6 {
            (0.95 * r.powf(-0.2)).min(5.0)
        } else {
            5.0
        };
        candidate.set_next_step((step * factor).clamp(self.min_step, self.max_step));
        Ok(())
    }
}

impl DiffusionSdeBuilder {
    /// Set the magnetic field the integrator follows.
    pub fn field(mut self, field: Arc<dyn MagneticField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Set the step-adjustment tolerance (default `1e-4`).
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the minimum step in meters (default 10 pc).
    pub fn min_step(mut self, min_step: f64) -> Self {
        self.min_step = min_step;
        self
    }

    /// Set the maximum step in meters (default 1 kpc).
    pub fn max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Set the perpendicular-to-parallel diffusion ratio (default 0.1).
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the rigidity power-law index (default 1/3).
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the diffusion-coefficient scale factor (default 1).
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the noise seed (default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the integrator, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending option if `field`
    /// is not set, a bound or tolerance is non-positive or non-finite,
    /// the step bounds are inverted, or `epsilon`/`scale` are negative.
    pub fn build(self) -> Result<DiffusionSde, ConfigError> {
        let field = self.field.ok_or_else(|| ConfigError::MissingOption {
            option: "field".into(),
        })?;

        let positive_finite = |option: &str, value: f64| -> Result<(), ConfigError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidOption {
                    option: option.into(),
                    reason: format!("must be finite and positive, got {value}"),
                });
            }
            Ok(())
        };
        positive_finite("tolerance", self.tolerance)?;
        positive_finite("min_step", self.min_step)?;
        positive_finite("max_step", self.max_step)?;

        if self.min_step > self.max_step {
            return Err(ConfigError::InvalidOption {
                option: "min_step".into(),
                reason: format!(
                    "min_step ({}) exceeds max_step ({})",
                    self.min_step, self.max_step
                ),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidOption {
                option: "epsilon".into(),
                reason: format!("must be finite and non-negative, got {}", self.epsilon),
            });
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(ConfigError::InvalidOption {
                option: "scale".into(),
                reason: format!("must be finite and non-negative, got {}", self.scale),
            });
        }
        if !self.alpha.is_finite() {
            return Err(ConfigError::InvalidOption {
                option: "alpha".into(),
                reason: format!("must be finite, got {}", self.alpha),
            });
        }

        Ok(DiffusionSde {
            field,
            tolerance: self.tolerance,
            min_step: self.min_step,
            max_step: self.max_step,
            epsilon: self.epsilon,
            alpha: self.alpha,
            scale: self.scale,
            seed: self.seed,
        })
    }
}
