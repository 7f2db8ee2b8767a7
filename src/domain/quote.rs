use serde::Serialize;

use super::Course;

/// VAT applied after the discount.
pub const VAT_RATE: f64 = 0.15;

/// Discount rate as a step function of the number of distinct courses selected.
///
/// | courses | rate |
/// |---------|------|
/// | 0 or 1  | 0%   |
/// | 2       | 5%   |
/// | 3       | 10%  |
/// | 4+      | 15%  |
pub fn discount_rate_for_count(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 0.05,
        3 => 0.10,
        _ => 0.15,
    }
}

/// A price breakdown for a course selection and headcount.
///
/// Every intermediate line is kept because the receipt prints each of them.
/// Values are never rounded here; see [`super::format_amount`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub selected_courses: Vec<&'static Course>,
    pub applicant_count: u32,
    pub per_person_sum: f64,
    pub subtotal: f64,
    pub discount_rate: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    pub vat: f64,
    pub total: f64,
}

impl Quote {
    pub fn course_names(&self) -> Vec<String> {
        self.selected_courses
            .iter()
            .map(|c| c.name.to_string())
            .collect()
    }
}

/// Compute a quote.
///
/// Callers must pass a non-empty selection and an applicant count of at least
/// one; [`crate::application::RegistrationService::quote`] checks both.
/// The operation order is fixed so results are reproducible bit for bit.
pub fn compute_quote(selected_courses: &[&'static Course], applicant_count: u32) -> Quote {
    let per_person_sum: f64 = selected_courses.iter().map(|c| f64::from(c.fee)).sum();
    let subtotal = per_person_sum * f64::from(applicant_count);
    let discount_rate = discount_rate_for_count(selected_courses.len());
    let discount_amount = subtotal * discount_rate;
    let after_discount = subtotal - discount_amount;
    let vat = after_discount * VAT_RATE;
    let total = after_discount + vat;

    Quote {
        selected_courses: selected_courses.to_vec(),
        applicant_count,
        per_person_sum,
        subtotal,
        discount_rate,
        discount_amount,
        after_discount,
        vat,
        total,
    }
}

/// Flat estimate for a single course over a number of months: `fee * months`.
/// No discount or VAT applies.
pub fn estimate_by_months(course: &Course, months: u32) -> f64 {
    f64::from(course.fee) * f64::from(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{find_course, CATALOG};

    fn courses(ids: &[&str]) -> Vec<&'static Course> {
        ids.iter().map(|id| find_course(id).unwrap()).collect()
    }

    #[test]
    fn test_discount_table() {
        assert_eq!(discount_rate_for_count(0), 0.0);
        assert_eq!(discount_rate_for_count(1), 0.0);
        assert_eq!(discount_rate_for_count(2), 0.05);
        assert_eq!(discount_rate_for_count(3), 0.10);
        assert_eq!(discount_rate_for_count(4), 0.15);
        assert_eq!(discount_rate_for_count(10), 0.15);
    }

    #[test]
    fn test_discount_is_non_decreasing() {
        let rates: Vec<f64> = (0..20).map(discount_rate_for_count).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_single_course_single_person() {
        let q = compute_quote(&courses(&["childminding"]), 1);
        assert_eq!(q.subtotal, 750.0);
        assert_eq!(q.discount_rate, 0.0);
        assert_eq!(q.discount_amount, 0.0);
        assert_eq!(q.vat, 112.5);
        assert_eq!(q.total, 862.5);
    }

    #[test]
    fn test_two_courses_two_people() {
        let q = compute_quote(&courses(&["firstaid", "sewing"]), 2);
        assert_eq!(q.per_person_sum, 3000.0);
        assert_eq!(q.subtotal, 6000.0);
        assert_eq!(q.discount_rate, 0.05);
        assert_eq!(q.discount_amount, 300.0);
        assert_eq!(q.after_discount, 5700.0);
        assert_eq!(q.vat, 855.0);
        assert_eq!(q.total, 6555.0);
    }

    #[test]
    fn test_full_catalog() {
        let all: Vec<&'static Course> = CATALOG.iter().collect();
        let q = compute_quote(&all, 1);
        assert_eq!(q.subtotal, 5250.0);
        assert_eq!(q.discount_rate, 0.15);
        assert_eq!(q.discount_amount, 787.5);
        assert_eq!(q.after_discount, 4462.5);
        assert_eq!(q.vat, 669.375);
        assert_eq!(q.total, 5131.875);
    }

    #[test]
    fn test_total_identity() {
        let all: Vec<&'static Course> = CATALOG.iter().collect();
        for n in 1..=all.len() {
            for people in [1, 2, 7, 25] {
                let q = compute_quote(&all[..n], people);
                let fees: f64 = all[..n].iter().map(|c| f64::from(c.fee)).sum();
                assert_eq!(q.subtotal, fees * f64::from(people));
                let expected = q.subtotal * (1.0 - q.discount_rate) * 1.15;
                assert!((q.total - expected).abs() < 1e-6, "{} vs {}", q.total, expected);
            }
        }
    }

    #[test]
    fn test_compute_quote_is_idempotent() {
        let selection = courses(&["firstaid", "lifeskills", "sewing"]);
        let a = compute_quote(&selection, 3);
        let b = compute_quote(&selection, 3);
        assert_eq!(a, b);
        assert_eq!(a.total.to_bits(), b.total.to_bits());
    }

    #[test]
    fn test_estimate_by_months() {
        let sewing = find_course("sewing").unwrap();
        assert_eq!(estimate_by_months(sewing, 6), 9000.0);
        assert_eq!(estimate_by_months(sewing, 1), 1500.0);
    }
}
