use rand::Rng;

/// Computes the `order`-norm of `x`.
///
/// `±∞` give the largest and smallest absolute entry, `0` counts nonzero
/// entries. An empty vector has norm zero.
pub(crate) fn vector_norm(x: &[f64], order: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }

    let abs = x.iter().map(|v| v.abs());
    if order == f64::INFINITY {
        abs.fold(0.0, f64::max)
    } else if order == f64::NEG_INFINITY {
        abs.fold(f64::INFINITY, f64::min)
    } else if order == 0.0 {
        #[allow(clippy::cast_precision_loss)]
        let count = x.iter().filter(|v| **v != 0.0).count() as f64;
        count
    } else {
        abs.map(|v| v.powf(order)).sum::<f64>().powf(order.recip())
    }
}

/// Rounds `f` to `significant_digits` digits and adds sub-resolution jitter.
///
/// The jitter is drawn uniformly from `[0, 10^-digits)` and pushes the value
/// away from zero. Non-finite values are returned unchanged.
pub(crate) fn truncate<R: Rng + ?Sized>(f: f64, significant_digits: usize, rng: &mut R) -> f64 {
    if !f.is_finite() {
        return f;
    }

    #[allow(clippy::cast_possible_truncation)]
    let offset = if f == 0.0 {
        0
    } else {
        f.abs().log10().floor() as i32
    };
    let digits = i32::try_from(significant_digits)
        .unwrap_or(i32::MAX)
        .saturating_sub(offset)
        .saturating_sub(1);

    let jitter = rng.random::<f64>() * 10f64.powi(-digits);
    let rounded = round_to(f, digits);
    if f >= 0.0 {
        rounded + jitter
    } else {
        rounded - jitter
    }
}

/// Rounds `f` to `digits` decimal places; negative `digits` round to tens,
/// hundreds, and so on.
pub(crate) fn round_to(f: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let scaled = f * scale;
    if scale == 0.0 || !scaled.is_finite() {
        return f;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn norms() {
        let x = [3.0, -4.0, 0.0];

        assert_relative_eq!(vector_norm(&x, 2.0), 5.0);
        assert_relative_eq!(vector_norm(&x, 1.0), 7.0);
        assert_relative_eq!(vector_norm(&x, f64::INFINITY), 4.0);
        assert_relative_eq!(vector_norm(&x, f64::NEG_INFINITY), 0.0);
        assert_relative_eq!(vector_norm(&x, 0.0), 2.0);
        assert_relative_eq!(vector_norm(&[], 2.0), 0.0);
    }

    #[test]
    fn rounding() {
        assert_relative_eq!(round_to(1.234_56, 2), 1.23);
        assert_relative_eq!(round_to(-5.678_91, 3), -5.679);
        assert_relative_eq!(round_to(123_456.0, -2), 123_500.0);
        assert_eq!(round_to(1e-310, 320), 1e-310);
    }

    #[test]
    fn truncation_stays_within_resolution() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..100 {
            let value = truncate(1.234_567_89, 6, &mut rng);
            assert!((1.234_57..1.234_58 + 1e-12).contains(&value));

            let value = truncate(-1.234_567_89, 6, &mut rng);
            assert!((-1.234_58 - 1e-12..=-1.234_57).contains(&value));
        }
    }

    #[test]
    fn zero_uses_leading_digit_offset_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let value = truncate(0.0, 3, &mut rng);

        assert!((0.0..1e-2).contains(&value));
    }

    #[test]
    fn non_finite_values_pass_through() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        assert!(truncate(f64::NAN, 6, &mut rng).is_nan());
        assert_eq!(truncate(f64::INFINITY, 6, &mut rng), f64::INFINITY);
        assert_eq!(truncate(f64::NEG_INFINITY, 6, &mut rng), f64::NEG_INFINITY);
    }
}
