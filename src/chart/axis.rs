//! Axis scaling and label formatting shared by both chart backends.

/// Evenly spaced "nice" tick values from zero covering `max`.
///
/// Steps are 1, 2 or 5 times a power of ten, chosen so that roughly
/// `target` intervals span the data.
pub fn nice_ticks(max: u64, target: u64) -> Vec<u64> {
    if max == 0 {
        return vec![0, 1];
    }

    let raw = max.div_ceil(target.max(1)).max(1);
    let mut magnitude = 1u64;
    while let Some(next) = magnitude.checked_mul(10).filter(|next| *next <= raw) {
        magnitude = next;
    }

    let step = [1u64, 2, 5, 10]
        .iter()
        .map(|m| m.saturating_mul(magnitude))
        .find(|step| *step >= raw)
        .unwrap_or(u64::MAX);
    let top = max.div_ceil(step).saturating_mul(step);

    (0..=top / step).map(|i| i * step).collect()
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
