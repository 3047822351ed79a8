//! Fixed-order Gauss-Legendre quadrature.

/// Weight/abscissa pairs for 64-point Gauss-Legendre quadrature on [-1, 1].
const GAUSS_QUAD_64: [[f64; 2]; 64] = [
    [0.0486909570091397, -0.0243502926634244],
    [0.0486909570091397, 0.0243502926634244],
    [0.0485754674415034, -0.072993121787799],
    [0.0485754674415034, 0.072993121787799],
    [0.048344762234803, -0.121462819296121],
    [0.048344762234803, 0.121462819296121],
    [0.0479993885964583, -0.169644420423993],
    [0.0479993885964583, 0.169644420423993],
    [0.0475401657148303, -0.217423643740007],
    [0.0475401657148303, 0.217423643740007],
    [0.04696818281621, -0.264687162208767],
    [0.04696818281621, 0.264687162208767],
    [0.0462847965813144, -0.311322871990211],
    [0.0462847965813144, 0.311322871990211],
    [0.0454916279274181, -0.357220158337668],
    [0.0454916279274181, 0.357220158337668],
    [0.0445905581637566, -0.402270157963992],
    [0.0445905581637566, 0.402270157963992],
    [0.0435837245293235, -0.446366017253464],
    [0.0435837245293235, 0.446366017253464],
    [0.0424735151236536, -0.489403145707053],
    [0.0424735151236536, 0.489403145707053],
    [0.0412625632426235, -0.531279464019895],
    [0.0412625632426235, 0.531279464019895],
    [0.0399537411327203, -0.571895646202634],
    [0.0399537411327203, 0.571895646202634],
    [0.0385501531786156, -0.611155355172393],
    [0.0385501531786156, 0.611155355172393],
    [0.03705512854024, -0.648965471254657],
    [0.03705512854024, 0.648965471254657],
    [0.0354722132568824, -0.685236313054233],
    [0.0354722132568824, 0.685236313054233],
    [0.0338051618371416, -0.719881850171611],
    [0.0338051618371416, 0.719881850171611],
    [0.0320579283548516, -0.752819907260532],
    [0.0320579283548516, 0.752819907260532],
    [0.0302346570724025, -0.783972358943341],
    [0.0302346570724025, 0.783972358943341],
    [0.0283396726142595, -0.813265315122797],
    [0.0283396726142595, 0.813265315122797],
    [0.0263774697150547, -0.84062929625258],
    [0.0263774697150547, 0.84062929625258],
    [0.0243527025687109, -0.865999398154093],
    [0.0243527025687109, 0.865999398154093],
    [0.0222701738083833, -0.889315445995114],
    [0.0222701738083833, 0.889315445995114],
    [0.0201348231535302, -0.910522137078503],
    [0.0201348231535302, 0.910522137078503],
    [0.0179517157756973, -0.92956917213194],
    [0.0179517157756973, 0.92956917213194],
    [0.0157260304760247, -0.946411374858403],
    [0.0157260304760247, 0.946411374858403],
    [0.0134630478967186, -0.961008799652054],
    [0.0134630478967186, 0.961008799652054],
    [0.0111681394601311, -0.973326827789911],
    [0.0111681394601311, 0.973326827789911],
    [0.0088467598263639, -0.983336253884626],
    [0.0088467598263639, 0.983336253884626],
    [0.0065044579689784, -0.991013371476744],
    [0.0065044579689784, 0.991013371476744],
    [0.0041470332605625, -0.996340116771955],
    [0.0041470332605625, 0.996340116771955],
    [0.0017832807216964, -0.999305041735772],
    [0.0017832807216964, 0.999305041735772],
];

/// Weight/abscissa pairs for 8-point Gauss-Legendre quadrature on [-1, 1].
const GAUSS_QUAD_8: [[f64; 2]; 8] = [
    [0.3626837833783620, -0.1834346424956498],
    [0.3626837833783620, 0.1834346424956498],
    [0.3137066458778873, -0.5255324099163290],
    [0.3137066458778873, 0.5255324099163290],
    [0.2223810344533745, -0.7966664774136267],
    [0.2223810344533745, 0.7966664774136267],
    [0.1012285362903763, -0.9602898564975363],
    [0.1012285362903763, 0.9602898564975363],
];

fn integrate(table: &[[f64; 2]], f: impl Fn(f64) -> f64, lower: f64, upper: f64) -> f64 {
    if upper == lower {
        return 0.0;
    }
    let half = 0.5 * (upper - lower);
    let mid = 0.5 * (upper + lower);
    let sum: f64 = table.iter().map(|[w, x]| w * f(half * x + mid)).sum();
    sum * half
}

/// Integrates `f` over `[lower, upper]` using 64-point Gauss-Legendre quadrature.
pub fn integrate64(f: impl Fn(f64) -> f64, lower: f64, upper: f64) -> f64 {
    integrate(&GAUSS_QUAD_64, f, lower, upper)
}

/// Integrates `f` over `[lower, upper]` using 8-point Gauss-Legendre quadrature.
pub fn integrate8(f: impl Fn(f64) -> f64, lower: f64, upper: f64) -> f64 {
    integrate(&GAUSS_QUAD_8, f, lower, upper)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn integrates_polynomials_exactly() {
        // Gauss-Legendre of order n is exact for polynomials of degree 2n - 1.
        let f = |x: f64| 3.0 * x * x * x - 2.0 * x * x + x - 5.0;
        let exact = |x: f64| 0.75 * x.powi(4) - (2.0 / 3.0) * x.powi(3) + 0.5 * x * x - 5.0 * x;
        assert_approx_eq!(integrate8(f, -1.0, 3.0), exact(3.0) - exact(-1.0), 1e-9);
        assert_approx_eq!(integrate64(f, 0.0, 10.0), exact(10.0) - exact(0.0), 1e-7);
    }

    #[test]
    fn integrates_transcendentals() {
        assert_approx_eq!(integrate64(f64::sin, 0.0, std::f64::consts::PI), 2.0, 1e-9);
        assert_approx_eq!(integrate8(f64::exp, 0.0, 1.0), std::f64::consts::E - 1.0, 1e-9);
    }

    #[test]
    fn empty_interval_is_zero() {
        assert_eq!(integrate64(|x| x * x, 2.0, 2.0), 0.0);
    }
}
