use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Annual USD (min, max, median) by role. The first entry is the default.
const BASE_SALARIES: &[(&str, u32, u32, u32)] = &[
    ("software engineer", 85_000, 150_000, 115_000),
    ("data scientist", 95_000, 170_000, 130_000),
    ("product manager", 100_000, 180_000, 140_000),
    ("marketing manager", 70_000, 130_000, 95_000),
    ("sales manager", 65_000, 140_000, 100_000),
    ("devops engineer", 90_000, 160_000, 125_000),
    ("frontend developer", 75_000, 140_000, 105_000),
    ("backend developer", 80_000, 150_000, 115_000),
];

/// Cost-of-market multipliers; unlisted locations use 1.0.
const LOCATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("san francisco", 1.4),
    ("new york", 1.3),
    ("seattle", 1.2),
    ("boston", 1.15),
    ("austin", 1.05),
    ("remote", 1.0),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalaryBenchmark {
    pub job_title: String,
    /// The table role the figures come from.
    pub benchmark_title: &'static str,
    pub location: String,
    pub location_multiplier: f64,
    pub min_salary: u32,
    pub max_salary: u32,
    pub median_salary: u32,
    pub currency: &'static str,
}

/// Market salary range for a role in a location.
///
/// Titles match exactly or by containing a known role ("Senior Data Scientist");
/// anything else is benchmarked as a software engineer. Locations match by
/// containing a known city; a blank location counts as remote.
pub fn salary_benchmark(job_title: &str, location: &str) -> SalaryBenchmark {
    let title = job_title.trim().to_lowercase();
    let (benchmark_title, min, max, median) = BASE_SALARIES
        .iter()
        .find(|(role, ..)| *role == title)
        .or_else(|| BASE_SALARIES.iter().find(|(role, ..)| title.contains(role)))
        .copied()
        .unwrap_or(BASE_SALARIES[0]);

    let place = location.trim().to_lowercase();
    let multiplier = if place.is_empty() {
        1.0
    } else {
        LOCATION_MULTIPLIERS
            .iter()
            .find(|(city, _)| place.contains(city))
            .map_or(1.0, |(_, m)| *m)
    };
    let scale = |amount: u32| (f64::from(amount) * multiplier).round() as u32;

    SalaryBenchmark {
        job_title: job_title.trim().to_string(),
        benchmark_title,
        location: location.trim().to_string(),
        location_multiplier: multiplier,
        min_salary: scale(min),
        max_salary: scale(max),
        median_salary: scale(median),
        currency: "USD",
    }
}

/// Dollar amounts such as `$120,000`, `95000` or `55.50`.
static USD_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?(\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)").unwrap());

/// Rewrites the first one or two USD amounts in `salary` as whole rupees.
///
/// Blank strings, `Not specified` and strings without a number come back
/// unchanged.
pub fn format_salary_in_inr(salary: &str, usd_to_inr: f64) -> String {
    if salary.trim().is_empty() || salary.trim() == "Not specified" {
        return salary.to_string();
    }

    let amounts: Vec<f64> = USD_AMOUNT_RE
        .captures_iter(salary)
        .filter_map(|c| c[1].replace(',', "").parse().ok())
        .take(2)
        .collect();

    match amounts.as_slice() {
        [] => salary.to_string(),
        [single] => format!("₹{}", group_thousands(single * usd_to_inr)),
        [low, high, ..] => format!(
            "₹{} - ₹{}",
            group_thousands(low * usd_to_inr),
            group_thousands(high * usd_to_inr)
        ),
    }
}

/// Rounds to a whole number and inserts `,` every three digits.
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
