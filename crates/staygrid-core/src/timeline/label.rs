//! Bar text for the board.

use super::stay::{NormalizedStay, StayKind};

/// `1234.5` -> `$1.234,50` (dot thousands, comma decimals).
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped},{dec}")
}

/// `2025-06-03 14:30:00` or `2025-06-03T14:30:00` -> `03/06 14:30`.
///
/// Falls back to the raw date part when it is not numeric.
pub fn hold_expiry_label(raw: &str) -> String {
    let normalized = raw.replace('T', " ");
    let mut pieces = normalized.split_whitespace();
    let Some(date_part) = pieces.next() else {
        return normalized.trim().to_string();
    };
    let time_short: String = pieces.next().unwrap_or("").chars().take(5).collect();

    let nums: Vec<Option<u32>> = date_part.split('-').map(|p| p.parse().ok()).collect();
    match nums.as_slice() {
        [Some(_), Some(m), Some(d)] => {
            if time_short.is_empty() {
                format!("{d:02}/{m:02}")
            } else {
                format!("{d:02}/{m:02} {time_short}")
            }
        }
        _ => date_part.to_string(),
    }
}

/// Text shown inside a stay's bar.
///
/// - Hold: expiry and policy (`03/06 14:30 • 24h`), or `Hold`
/// - Block: reason and notes, or `Block`
/// - Reservation: guest first name, nights, payout (`Ana • 2n • $310,00`)
pub fn bar_label(stay: &NormalizedStay) -> String {
    let guest = stay.guest.as_deref().unwrap_or("").trim();
    let notes = stay.notes.trim();
    match stay.kind {
        StayKind::Hold => {
            let mut parts = Vec::new();
            if let Some(expiry) = stay.hold_expires_at.as_deref() {
                let label = hold_expiry_label(expiry);
                if !label.is_empty() {
                    parts.push(label);
                }
            }
            if !stay.hold_policy.trim().is_empty() {
                parts.push(stay.hold_policy.trim().to_string());
            }
            let mut text = if parts.is_empty() {
                "Hold".to_string()
            } else {
                parts.join(" • ")
            };
            if !notes.is_empty() {
                text.push_str(" ✎ ");
                text.push_str(notes);
            }
            text
        }
        StayKind::Block => {
            let parts: Vec<&str> = [guest, notes].into_iter().filter(|s| !s.is_empty()).collect();
            if parts.is_empty() {
                "Block".to_string()
            } else {
                parts.join(" • ")
            }
        }
        StayKind::Reservation => {
            let first = guest.split(' ').next().unwrap_or("");
            let mut text = format!("{first} • {}n", stay.nights());
            if let Some(payout) = stay.payout {
                text.push_str(" • ");
                text.push_str(&format_money(payout));
            }
            text
        }
    }
}

/// Styling class of a bar: `hold`, `block`, the channel for Airbnb and
/// private bookings, or empty.
pub fn bar_class(stay: &NormalizedStay) -> &'static str {
    match stay.kind {
        StayKind::Hold => "hold",
        StayKind::Block => "block",
        StayKind::Reservation => match stay.source_normalized.to_lowercase().as_str() {
            "airbnb" => "airbnb",
            "private" => "private",
            _ => "",
        },
    }
}
