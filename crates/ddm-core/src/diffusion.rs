use crate::Time;

pub trait Diffusion: Send + Sync {
    /// Noise intensity σ(t, x)
    fn sigma(&self, t: Time, x: f64) -> f64;

    /// σ² as it enters the Fokker-Planck operator
    fn sigma_squared(&self, t: Time, x: f64) -> f64 {
        let s = self.sigma(t, x);
        s * s
    }
}
