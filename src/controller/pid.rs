/// Gain triple for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

/// Single-axis PID controller.
///
/// The caller supplies the setpoint and `dt` on every update. The integral
/// term is accumulated without clamping, so a long-lived error keeps growing
/// it; callers that need anti-windup must add it around this type.
///
/// Not meant to be shared: the owning control loop is the only caller.
#[derive(Debug, Clone)]
pub struct AxisPid {
    gains: PidGains,
    integral: f32,
    prev_error: f32,
}

impl AxisPid {
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self::from_gains(PidGains::new(kp, ki, kd))
    }

    pub fn from_gains(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Advance the controller by `dt` seconds and return its output.
    ///
    /// With `dt == 0` (first tick) the derivative term is skipped and the
    /// integral is left unchanged.
    pub fn update(&mut self, setpoint: f32, measured: f32, dt: f32) -> f32 {
        let error = setpoint - measured;

        // Proportional term
        let p = self.gains.kp * error;

        // Integral term
        self.integral += error * dt;
        let i = self.gains.ki * self.integral;

        // Derivative term
        let derivative = if dt > 0.0 {
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        let d = self.gains.kd * derivative;

        self.prev_error = error;

        p + i + d
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn prev_error(&self) -> f32 {
        self.prev_error
    }
}
