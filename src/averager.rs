use crate::prelude::Vector3;

/// Running mean of 3D vectors
#[derive(Debug, Clone)]
pub struct Averager {
    pub mean: Vector3<f64>,
    pub count: u64,
}

impl Default for Averager {
    fn default() -> Self {
        Self::new()
    }
}

impl Averager {
    /// Builds new Averager
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: Vector3::zeros(),
        }
    }

    /// Push new value into [Averager]
    pub fn add(&mut self, x: &Vector3<f64>) {
        self.count += 1;
        let k = self.count as f64;
        self.mean = x / k + self.mean * (k - 1.0) / k;
    }
}

#[cfg(test)]
mod test {
    use super::Averager;
    use crate::prelude::Vector3;

    #[test]
    fn test_averager() {
        let mut avg = Averager::new();

        for (x_i, mean) in [
            (Vector3::new(1.0, 0.0, -2.0), Vector3::new(1.0, 0.0, -2.0)),
            (Vector3::new(0.5, 1.0, 2.0), Vector3::new(0.75, 0.5, 0.0)),
        ] {
            avg.add(&x_i);
            assert_eq!(avg.mean, mean);
        }
        assert_eq!(avg.count, 2);
    }
}
