// ============================================================================
// PID CONTROLLER - Proportional-Integral-Derivative control
// ============================================================================

/// Gains and bounds for one controller instance, fixed for its lifetime.
///
/// A term is disabled when its gain is `None`; a disabled term contributes
/// nothing and leaves its state untouched. `dt` is the tick period in
/// seconds.
#[derive(Debug, Clone, Copy)]
pub struct PidConfig {
    pub kp: Option<f64>,
    pub kd: Option<f64>,
    pub ki: Option<f64>,
    pub i_limit: Option<f64>,
    pub output_min: Option<f64>,
    pub output_max: Option<f64>,
    pub dt: f64,
}

impl PidConfig {
    /// Proportional-only configuration, mostly useful in tests and benches.
    pub fn proportional(kp: f64, dt: f64) -> Self {
        Self {
            kp: Some(kp),
            kd: None,
            ki: None,
            i_limit: None,
            output_min: None,
            output_max: None,
            dt,
        }
    }
}

/// Stateful PID evaluator. One logical owner, one `step` per tick.
pub struct PidController {
    config: PidConfig,
    integral: f64,
    prev_error: f64,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Advance the controller by one tick and return the control value.
    ///
    /// Term order is fixed: P, D, I, then the output bounds. The derivative
    /// uses `prev_error = 0.0` on the first tick, so a nonzero initial error
    /// produces a one-tick spike of `kd * error / dt`.
    pub fn step(&mut self, target: f64, measurement: f64) -> f64 {
        let error = target - measurement;
        let mut control = 0.0;

        if let Some(kp) = self.config.kp {
            control += kp * error;
        }

        if let Some(kd) = self.config.kd {
            control += kd * (error - self.prev_error) / self.config.dt;
        }

        if let Some(ki) = self.config.ki {
            self.integral += error * self.config.dt;
            if let Some(limit) = self.config.i_limit {
                if self.integral.abs() > limit {
                    self.integral = limit.copysign(self.integral);
                }
            }
            control += ki * self.integral;
        }

        if let Some(min) = self.config.output_min {
            if control < min {
                control = min;
            }
        }

        // The upper bound engages while control sits below it: it acts as a
        // floor, not a cap. Outputs already above it pass through unchanged.
        if let Some(max) = self.config.output_max {
            if control < max {
                control = max;
            }
        }

        self.prev_error = error;
        control
    }

    /// Current integral accumulator, clamped to the configured limit.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Error seen by the previous tick (0.0 before the first tick).
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Drop accumulated state, keeping the configuration.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }
}
