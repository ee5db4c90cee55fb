use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::*;

fn int(s: &str) -> Integer {
    s.parse().unwrap()
}

#[test]
fn test_integer_promotion() {
    let a = Integer::from(1_i64 << 62);
    let sum = &a + &a;
    assert!(!sum.is_native());
    assert_eq!(sum, int("9223372036854775808"));
    let back = &sum - &a;
    assert!(back.is_native());
    assert_eq!(back, a);

    let min = Integer::from(i64::MIN);
    assert!(!min.abs().is_native());
    assert_eq!(-&min, int("9223372036854775808"));
    assert_eq!(&min / &Integer::MINUS_ONE, int("9223372036854775808"));

    let big = Integer::from(10).raise_to_power(30);
    assert_eq!(big.to_string(), "1000000000000000000000000000000");
    assert_eq!(&big / &Integer::from(10).raise_to_power(28), Integer::from(100));
}

#[test]
fn test_integer_division() {
    let q_r = |a: i64, b: i64| {
        let (q, r) = Integer::from(a)
            .div_with_remainder(&Integer::from(b))
            .unwrap();
        (q.to_i64().unwrap(), r.to_i64().unwrap())
    };
    assert_eq!(q_r(7, 3), (2, 1));
    assert_eq!(q_r(-7, 3), (-3, 2));
    assert_eq!(q_r(7, -3), (-2, 1));
    assert_eq!(q_r(-7, -3), (3, 2));
    assert_eq!(
        Integer::from(1).div_with_remainder(&Integer::ZERO),
        Err(MathsError::DivisionByZero),
    );

    assert_eq!(Integer::from(-7) / Integer::from(2), Integer::from(-3));
    assert_eq!(Integer::from(-7) % Integer::from(2), Integer::from(-1));
    assert!(Integer::from(12).div_exact(&Integer::from(5)).is_err());
    assert!(Integer::ZERO.divides(&Integer::ZERO));
    assert!(!Integer::ZERO.divides(&Integer::from(3)));
    assert!(Integer::from(-3).divides(&Integer::from(12)));
}

#[test]
fn test_gcd_lcm() {
    assert_eq!(Integer::from(-12).gcd(&Integer::from(18)), Integer::from(6));
    assert_eq!(Integer::ZERO.gcd(&Integer::ZERO), Integer::ZERO);
    assert_eq!(Integer::from(4).lcm(&Integer::from(-6)), Integer::from(12));
    assert_eq!(Integer::from(4).lcm(&Integer::ZERO), Integer::ZERO);

    let (g, u, v) = Integer::from(12).gcd_with_coeffs(&Integer::from(18)).unwrap();
    assert_eq!((g, u, v), (Integer::from(6), Integer::from(2), Integer::from(-1)));
    let (g, u, v) = Integer::ZERO.gcd_with_coeffs(&Integer::from(-5)).unwrap();
    assert_eq!((g, u, v), (Integer::from(5), Integer::ZERO, Integer::MINUS_ONE));
    assert!(Integer::ZERO.gcd_with_coeffs(&Integer::ZERO).is_err());
}

#[test]
fn test_rational_sentinels() {
    let one = Rational::ONE;
    let zero = Rational::ZERO;
    assert_eq!(&one / &zero, Rational::INFINITY);
    assert_eq!(&-&one / &zero, Rational::NEG_INFINITY);
    assert!((&zero / &zero).is_undefined());
    assert_eq!(one.try_div(&zero), Err(MathsError::DivisionByZero));
    assert!((Rational::INFINITY - Rational::INFINITY).is_undefined());
    assert!((Rational::ZERO * Rational::INFINITY).is_undefined());
    assert_eq!(Rational::INFINITY + Rational::from(5), Rational::INFINITY);
    assert_eq!(zero.inverse(), Rational::INFINITY);
    assert_eq!(Rational::NEG_INFINITY.inverse(), Rational::ZERO);

    assert!(Rational::NEG_INFINITY < Rational::from(-1_000_000));
    assert!(Rational::from(1_000_000) < Rational::INFINITY);
    assert!(Rational::UNDEFINED.partial_cmp(&Rational::ZERO).is_none());
    assert!(Rational::UNDEFINED == Rational::UNDEFINED);

    assert_eq!(Rational::INFINITY.to_string(), "Inf");
    assert_eq!(Rational::NEG_INFINITY.to_string(), "-Inf");
    assert_eq!(Rational::UNDEFINED.to_string(), "Undef");
    assert_eq!(Rational::new(6, -4).to_string(), "-3/2");
    assert_eq!(Rational::new(6, 3).to_string(), "2");
}

#[test]
fn test_rational_double_approx() {
    assert_eq!(Rational::new(1, 4).double_approx(), Some(0.25));
    assert_eq!(Rational::new(-3, 2).double_approx(), Some(-1.5));
    assert_eq!(Rational::INFINITY.double_approx(), None);

    let huge = Rational::new(Integer::from(3).raise_to_power(100), Integer::from(3).raise_to_power(98));
    assert_eq!(huge.double_approx(), Some(9.0));
    let big = Rational::new(Integer::from(2).raise_to_power(200) + Integer::ONE, 1);
    let approx = big.double_approx().unwrap();
    assert!((approx / 2.0_f64.powi(200) - 1.0).abs() < 1e-12);
    let out_of_range = Rational::new(Integer::from(2).raise_to_power(2000), 1);
    assert_eq!(out_of_range.double_approx(), None);
}

#[test]
fn test_abelian_display() {
    let mut g = AbelianGroup::free(2);
    g.add_torsion(&Integer::from(2));
    g.add_torsion(&Integer::from(3));
    g.add_torsion(&Integer::from(3));
    assert_eq!(g.to_string(), "2 Z + Z_3 + Z_6");
    assert_eq!(g.torsion_rank(&Integer::from(3)), 2);
    assert!(!g.is_free());
}

fn small_int() -> impl Strategy<Value = i64> {
    prop_oneof![-50_i64..50, any::<i64>()]
}

proptest! {
    #[test]
    fn proptest_gcd_with_coeffs(a in small_int(), b in small_int()) {
        prop_assume!(a != 0 && b != 0);
        let (a, b) = (Integer::from(a), Integer::from(b));
        let (g, u, v) = a.gcd_with_coeffs(&b).unwrap();
        prop_assert_eq!(&g, &a.gcd(&b));
        prop_assert_eq!(&u * &a + &v * &b, g.clone());

        let u_signed = &u * &Integer::from(a.sign());
        let v_signed = &v * &Integer::from(b.sign());
        prop_assert!(u_signed >= 1);
        prop_assert!(u_signed <= b.abs() / &g);
        prop_assert!(v_signed <= 0);
        prop_assert!(-v_signed < a.abs() / &g);
    }

    #[test]
    fn proptest_arithmetic_matches_i128(a in any::<i64>(), b in any::<i64>()) {
        let (x, y) = (Integer::from(a), Integer::from(b));
        let (a, b) = (i128::from(a), i128::from(b));
        prop_assert_eq!(&x + &y, Integer::from(a + b));
        prop_assert_eq!(&x - &y, Integer::from(a - b));
        prop_assert_eq!(&x * &y, Integer::from(a * b));
        if b != 0 {
            prop_assert_eq!(&x / &y, Integer::from(a / b));
            prop_assert_eq!(&x % &y, Integer::from(a % b));
        }
        prop_assert_eq!(x.cmp(&y), a.cmp(&b));
    }

    #[test]
    fn proptest_rational_field_ops(a in -100_i64..100, b in 1_i64..100, c in -100_i64..100, d in 1_i64..100) {
        let x = Rational::new(a, b);
        let y = Rational::new(c, d);
        prop_assert_eq!(&(&x + &y) - &y, x.clone());
        if !y.is_zero() {
            prop_assert_eq!(&(&x * &y) / &y, x.clone());
        }
        prop_assert!(x.denominator().is_positive());
        prop_assert_eq!(x.numerator().gcd(x.denominator()), Integer::ONE);
    }
}
