const SCALES: [(u128, &str); 4] = [
    (1_000, "K"),
    (1_000_000, "M"),
    (1_000_000_000, "B"),
    (1_000_000_000_000, "T"),
];

const ASTRONOMICAL: u128 = 1_000_000_000_000_000;

/// Human-readable address count: `256`, `4.1K`, `16.8M`, `>10^15`.
///
/// The value is rounded to one decimal before the suffix is fixed, so a count
/// that would show as `1000.0` moves to the next suffix instead.
pub fn format_ip_count(count: u128) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    if count >= ASTRONOMICAL {
        return ">10^15".to_string();
    }
    for (scale, suffix) in SCALES {
        let tenths = (count * 10 + scale / 2) / scale;
        if tenths < 10_000 {
            return format!("{}.{}{suffix}", tenths / 10, tenths % 10);
        }
    }
    ">10^15".to_string()
}
