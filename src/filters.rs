use askama::Result;
use chrono::NaiveDate;

// Custom filter to render dates the way the forms and listings show them.
// This allows us to use `|fecha` in the templates.
#[allow(clippy::unnecessary_wraps)]
pub fn fecha(d: &NaiveDate) -> Result<String> {
    Ok(d.format("%d/%m/%Y").to_string())
}
