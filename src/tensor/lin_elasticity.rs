use super::Tensor4;

/// Implements the linear elastic rigidity in Mandel basis
///
/// The 3D and plane-strain moduli share the same closed form; the
/// plane-stress modulus differs (zero out-of-plane normal stress).
#[derive(Clone, Debug)]
pub struct LinElasticity {
    /// Young's modulus
    young: f64,

    /// Poisson's coefficient
    poisson: f64,

    /// Plane-stress flag
    plane_stress: bool,

    /// Rigidity modulus D
    dd: Tensor4,
}

impl LinElasticity {
    /// Allocates a new instance
    pub fn new(young: f64, poisson: f64, plane_stress: bool) -> Self {
        let mut res = LinElasticity {
            young,
            poisson,
            plane_stress,
            dd: Tensor4::new(),
        };
        res.calc_rigidity();
        res
    }

    /// Returns the rigidity modulus D
    pub fn get_modulus(&self) -> &Tensor4 {
        &self.dd
    }

    /// Returns the bulk (K) and shear (G) moduli
    pub fn get_bulk_shear(&self) -> (f64, f64) {
        let kk = self.young / (3.0 * (1.0 - 2.0 * self.poisson));
        let gg = self.young / (2.0 * (1.0 + self.poisson));
        (kk, gg)
    }

    /// Sets new Young's modulus and Poisson's coefficient and recomputes D
    pub fn set_young_poisson(&mut self, young: f64, poisson: f64) {
        self.young = young;
        self.poisson = poisson;
        self.calc_rigidity();
    }

    /// Computes the rigidity modulus
    fn calc_rigidity(&mut self) {
        let (ee, nu) = (self.young, self.poisson);
        self.dd.clear();
        let gg = ee / (2.0 * (1.0 + nu));
        if self.plane_stress {
            let c = ee / (1.0 - nu * nu);
            self.dd.mat.set(0, 0, c);
            self.dd.mat.set(1, 1, c);
            self.dd.mat.set(0, 1, c * nu);
            self.dd.mat.set(1, 0, c * nu);
            self.dd.mat.set(3, 3, 2.0 * gg);
        } else {
            let c = ee / ((1.0 + nu) * (1.0 - 2.0 * nu));
            for i in 0..3 {
                for j in 0..3 {
                    self.dd.mat.set(i, j, if i == j { c * (1.0 - nu) } else { c * nu });
                }
            }
            for i in 3..6 {
                self.dd.mat.set(i, i, 2.0 * gg);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinElasticity;
    use crate::tensor::{t4_ddot_t2, Tensor2};
    use russell_lab::approx_eq;

    #[test]
    fn three_dim_modulus_recovers_uniaxial_law() {
        // uniaxial stress state: εxx = σ/E, εyy = εzz = -ν σ/E
        let (young, poisson) = (30_000.0, 0.25);
        let el = LinElasticity::new(young, poisson, false);
        let sig = 100.0;
        let mut eps = Tensor2::new();
        eps.vec[0] = sig / young;
        eps.vec[1] = -poisson * sig / young;
        eps.vec[2] = -poisson * sig / young;
        let mut stress = Tensor2::new();
        t4_ddot_t2(&mut stress, 1.0, el.get_modulus(), &eps);
        approx_eq(stress.vec[0], sig, 1e-10);
        approx_eq(stress.vec[1], 0.0, 1e-10);
        approx_eq(stress.vec[2], 0.0, 1e-10);
    }

    #[test]
    fn shear_entries_carry_the_mandel_factor() {
        // σxy = 2 G εxy  =>  in Mandel: (√2 σxy) = 2G (√2 εxy)
        let (young, poisson) = (1500.0, 0.25);
        let gg = young / (2.0 * (1.0 + poisson));
        let el = LinElasticity::new(young, poisson, false);
        approx_eq(el.get_modulus().mat.get(3, 3), 2.0 * gg, 1e-12);
        let el = LinElasticity::new(young, poisson, true);
        approx_eq(el.get_modulus().mat.get(3, 3), 2.0 * gg, 1e-12);
    }

    #[test]
    fn plane_stress_modulus_is_correct() {
        let (young, poisson) = (3000.0, 0.2);
        let el = LinElasticity::new(young, poisson, true);
        let c = young / (1.0 - poisson * poisson);
        approx_eq(el.get_modulus().mat.get(0, 0), c, 1e-12);
        approx_eq(el.get_modulus().mat.get(0, 1), c * poisson, 1e-12);
        approx_eq(el.get_modulus().mat.get(2, 2), 0.0, 1e-15);
    }

    #[test]
    fn bulk_shear_works() {
        let el = LinElasticity::new(9.0, 0.25, false);
        let (kk, gg) = el.get_bulk_shear();
        approx_eq(kk, 6.0, 1e-14);
        approx_eq(gg, 3.6, 1e-14);
    }

    #[test]
    fn set_young_poisson_recomputes() {
        let mut el = LinElasticity::new(1000.0, 0.0, false);
        let d00 = el.get_modulus().mat.get(0, 0);
        el.set_young_poisson(2000.0, 0.0);
        approx_eq(el.get_modulus().mat.get(0, 0), 2.0 * d00, 1e-12);
    }
}
