use chrono::NaiveDate;

/// Shown wherever a date is missing.
pub const MISSING_DATE: &str = "--";

/// `"5 Jan, 2024"`.
#[must_use]
pub fn format_date(value: Option<NaiveDate>) -> String {
    value.map_or_else(
        || MISSING_DATE.to_owned(),
        |day| day.format("%-d %b, %Y").to_string(),
    )
}

/// Amount as the backend sent it: `1500`, `1499.5`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_without_padding() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 5)), "5 Jan, 2024");
        assert_eq!(format_date(None), "--");
    }

    #[test]
    fn formats_amounts() {
        assert_eq!(format_amount(1500.0), "1500");
        assert_eq!(format_amount(1499.5), "1499.5");
    }
}
