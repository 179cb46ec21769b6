/// Renders a base-unit integer as a decimal with `decimals` fractional digits.
///
/// The fraction keeps at least one digit and drops trailing zeros, so
/// `10 * 10^18` becomes `"10.0"` and `1` becomes `"0.000000000000000001"`.
pub fn format_units(value: i128, decimals: u32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return format!("{sign}{digits}.0");
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{sign}{whole}.{fraction}")
}

pub fn format_ether(value: i128) -> String {
    format_units(value, 18)
}
