//! Fixed-length feature vector construction for the method classifier

use serde::{Deserialize, Serialize};

/// Coefficients below this threshold count as zero for the derived features
const NONZERO_TOLERANCE: f64 = 1e-12;

/// Default number of coefficient slots; classifiers trained on narrower
/// windows (6 or 12 slots) plug in through the engine builder
pub const DEFAULT_COEFF_LEN: usize = 10;

/// Number of derived scalar features appended after the coefficient slots
pub const DERIVED_FEATURES: usize = 3;

/// Fixed-length numeric encoding of a polynomial, used as classifier input.
///
/// Layout: `target_len` coefficient slots (descending degree, left-padded
/// with zeros) followed by three derived scalars: post-truncation degree,
/// nonzero-coefficient count, maximum absolute coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build a feature vector from descending-degree coefficients.
    ///
    /// Shorter inputs are left-padded with zeros; longer inputs keep only
    /// the last `target_len` entries, dropping the highest-degree terms
    /// first. A polynomial of degree > `target_len - 1` therefore loses
    /// its leading terms; the truncation tests pin this down.
    pub fn build(coeffs: &[f64], target_len: usize) -> Self {
        let mut slots = vec![0.0; target_len];
        if coeffs.len() >= target_len {
            slots.copy_from_slice(&coeffs[coeffs.len() - target_len..]);
        } else {
            slots[target_len - coeffs.len()..].copy_from_slice(coeffs);
        }

        // Post-truncation degree: position of the first nonzero slot,
        // counted from the constant term upward. All-zero slots mean a
        // (possibly truncated-to-nothing) constant: degree 0.
        let degree = slots
            .iter()
            .position(|c| c.abs() > NONZERO_TOLERANCE)
            .map_or(0, |lead| target_len - 1 - lead);

        let num_nonzero = slots
            .iter()
            .filter(|c| c.abs() > NONZERO_TOLERANCE)
            .count();

        let max_abs = slots.iter().fold(0.0f64, |m, c| m.max(c.abs()));

        let mut values = slots;
        values.push(degree as f64);
        values.push(num_nonzero as f64);
        values.push(max_abs);

        FeatureVector { values }
    }

    /// Total length: coefficient slots plus the three derived scalars
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw feature values in classifier input order
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_target_plus_three() {
        for n in [6, 10, 12] {
            let fv = FeatureVector::build(&[1.0, 2.0], n);
            assert_eq!(fv.len(), n + 3);
        }
    }

    #[test]
    fn test_left_padding_preserves_low_order() {
        // x^2 + 4x + 4 with target 6 -> [0, 0, 0, 1, 4, 4]
        let fv = FeatureVector::build(&[1.0, 4.0, 4.0], 6);
        assert_eq!(&fv.values()[..6], &[0.0, 0.0, 0.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_derived_features() {
        let fv = FeatureVector::build(&[1.0, 4.0, 4.0], 6);
        // degree 2, three nonzero coefficients, max |coeff| = 4
        assert_eq!(&fv.values()[6..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_all_zero_degree_is_zero() {
        let fv = FeatureVector::build(&[0.0], 6);
        assert_eq!(fv.values()[6], 0.0);
        assert_eq!(fv.values()[7], 0.0);
    }

    #[test]
    fn test_truncation_drops_leading_terms() {
        // Degree 6 into 6 slots: the x^6 coefficient is dropped from the
        // top and the reported degree becomes 5.
        let coeffs = [7.0, 1.0, 0.0, 0.0, 0.0, 0.0, -3.0]; // 7x^6 + x^5 - 3
        let fv = FeatureVector::build(&coeffs, 6);
        assert_eq!(&fv.values()[..6], &[1.0, 0.0, 0.0, 0.0, 0.0, -3.0]);
        assert_eq!(fv.values()[6], 5.0); // not 6: the leading term is gone
        assert_eq!(fv.values()[8], 3.0); // max |coeff| no longer sees the 7
    }

    #[test]
    fn test_exact_fit_is_verbatim() {
        let coeffs = [1.0, 0.0, -4.0];
        let fv = FeatureVector::build(&coeffs, 3);
        assert_eq!(&fv.values()[..3], &coeffs);
        assert_eq!(fv.values()[3], 2.0);
    }
}
