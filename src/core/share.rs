//! Interpretation of a member's signed share on a transaction row.
//!
//! A positive share is money the member paid out of pocket, a negative share
//! is what they owe to whoever paid. Every aggregation reads shares through
//! [`classify`] so the convention lives in one place.

/// What a signed share means for the member holding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShareKind {
    /// Member paid this amount.
    Paid(f64),
    /// Member owes this (positive) magnitude.
    Owed(f64),
    /// Zero, or not a usable number.
    Uninvolved,
}

impl ShareKind {
    pub fn paid(&self) -> Option<f64> {
        match self {
            ShareKind::Paid(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn is_debt(&self) -> bool {
        matches!(self, ShareKind::Owed(_))
    }
}

pub fn classify(share: f64) -> ShareKind {
    if !share.is_finite() {
        return ShareKind::Uninvolved;
    }
    if share > 0.0 {
        ShareKind::Paid(share)
    } else if share < 0.0 {
        ShareKind::Owed(share.abs())
    } else {
        ShareKind::Uninvolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_signs() {
        assert_eq!(classify(50.0), ShareKind::Paid(50.0));
        assert_eq!(classify(-20.0), ShareKind::Owed(20.0));
        assert_eq!(classify(0.0), ShareKind::Uninvolved);
        assert_eq!(classify(-0.0), ShareKind::Uninvolved);
    }

    #[test]
    fn test_classify_non_finite_is_uninvolved() {
        assert_eq!(classify(f64::NAN), ShareKind::Uninvolved);
        assert_eq!(classify(f64::INFINITY), ShareKind::Uninvolved);
        assert_eq!(classify(f64::NEG_INFINITY), ShareKind::Uninvolved);
    }

    #[test]
    fn test_debt_and_paid_accessors() {
        assert!(classify(-1.0).is_debt());
        assert!(!classify(1.0).is_debt());
        assert_eq!(classify(12.5).paid(), Some(12.5));
        assert_eq!(classify(-12.5).paid(), None);
    }
}
