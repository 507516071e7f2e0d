//! Display formatters for network quantities

use std::time::Duration;

const BYTE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable byte count with up to two decimals, trailing zeros trimmed
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(BYTE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, BYTE_UNITS[exponent])
}

/// EUI rendered as dash-separated uppercase octet pairs
pub fn format_eui(eui: &str) -> String {
    if eui.is_empty() {
        return "N/A".to_string();
    }
    let chars: Vec<char> = eui.chars().collect();
    chars
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
        .to_uppercase()
}

/// Long device ids shortened with a middle ellipsis
pub fn format_device_id(device_id: &str) -> String {
    let chars: Vec<char> = device_id.chars().collect();
    if chars.len() <= 12 {
        return device_id.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Frequency in the largest sensible unit
pub fn format_frequency(hz: f64) -> String {
    if hz >= 1_000_000_000.0 {
        format!("{:.3} GHz", hz / 1_000_000_000.0)
    } else if hz >= 1_000_000.0 {
        format!("{:.1} MHz", hz / 1_000_000.0)
    } else if hz >= 1_000.0 {
        format!("{:.1} kHz", hz / 1_000.0)
    } else {
        format!("{} Hz", hz)
    }
}

/// Share of a total as a percentage with one decimal; zero totals render as 0%
pub fn format_percentage(value: f64, total: f64) -> String {
    if total == 0.0 {
        return "0%".to_string();
    }
    format!("{:.1}%", value / total * 100.0)
}

/// Elapsed time in the largest whole unit
pub fn format_relative_time(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    if seconds < 60 {
        return format!("{} seconds", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hours", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{} days", days);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{} months", months);
    }
    format!("{} years", months / 12)
}

/// Link-quality band for a signal metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Weak,
    VeryWeak,
}

impl std::fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalQuality::Excellent => write!(f, "Excellent"),
            SignalQuality::Good => write!(f, "Good"),
            SignalQuality::Fair => write!(f, "Fair"),
            SignalQuality::Weak => write!(f, "Weak"),
            SignalQuality::VeryWeak => write!(f, "Very weak"),
        }
    }
}

/// Band an RSSI value in dBm
pub fn rssi_quality(rssi: f64) -> SignalQuality {
    if rssi > -50.0 {
        SignalQuality::Excellent
    } else if rssi > -70.0 {
        SignalQuality::Good
    } else if rssi > -85.0 {
        SignalQuality::Fair
    } else if rssi > -100.0 {
        SignalQuality::Weak
    } else {
        SignalQuality::VeryWeak
    }
}

/// Band a signal-to-noise ratio in dB
pub fn snr_quality(snr: f64) -> SignalQuality {
    if snr > 5.0 {
        SignalQuality::Excellent
    } else if snr > 0.0 {
        SignalQuality::Good
    } else if snr > -5.0 {
        SignalQuality::Fair
    } else if snr > -10.0 {
        SignalQuality::Weak
    } else {
        SignalQuality::VeryWeak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_zero() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn bytes_kilobyte_scale() {
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(500), "500 Bytes");
    }

    #[test]
    fn bytes_larger_scales() {
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
    }

    #[test]
    fn eui_dashed_octets() {
        assert_eq!(format_eui("0011223344556677"), "00-11-22-33-44-55-66-77");
    }

    #[test]
    fn eui_uppercases() {
        assert_eq!(format_eui("aabbccddeeff0011"), "AA-BB-CC-DD-EE-FF-00-11");
    }

    #[test]
    fn eui_empty_is_not_available() {
        assert_eq!(format_eui(""), "N/A");
    }

    #[test]
    fn device_id_short_passes_through() {
        assert_eq!(format_device_id("soil-probe"), "soil-probe");
    }

    #[test]
    fn device_id_long_gets_ellipsis() {
        assert_eq!(
            format_device_id("eui-70b3d57ed0000001"),
            "eui-70...000001"
        );
    }

    #[test]
    fn frequency_bands() {
        assert_eq!(format_frequency(868_100_000.0), "868.1 MHz");
        assert_eq!(format_frequency(2_400_000_000.0), "2.400 GHz");
        assert_eq!(format_frequency(32_500.0), "32.5 kHz");
        assert_eq!(format_frequency(50.0), "50 Hz");
    }

    #[test]
    fn percentage_of_total() {
        assert_eq!(format_percentage(3.0, 4.0), "75.0%");
        assert_eq!(format_percentage(1.0, 3.0), "33.3%");
    }

    #[test]
    fn percentage_zero_total() {
        assert_eq!(format_percentage(5.0, 0.0), "0%");
    }

    #[test]
    fn relative_time_units() {
        assert_eq!(format_relative_time(Duration::from_secs(45)), "45 seconds");
        assert_eq!(format_relative_time(Duration::from_secs(180)), "3 minutes");
        assert_eq!(format_relative_time(Duration::from_secs(7200)), "2 hours");
        assert_eq!(
            format_relative_time(Duration::from_secs(3 * 86_400)),
            "3 days"
        );
        assert_eq!(
            format_relative_time(Duration::from_secs(70 * 86_400)),
            "2 months"
        );
        assert_eq!(
            format_relative_time(Duration::from_secs(800 * 86_400)),
            "2 years"
        );
    }

    #[test]
    fn rssi_bands() {
        assert_eq!(rssi_quality(-40.0), SignalQuality::Excellent);
        assert_eq!(rssi_quality(-60.0), SignalQuality::Good);
        assert_eq!(rssi_quality(-80.0), SignalQuality::Fair);
        assert_eq!(rssi_quality(-95.0), SignalQuality::Weak);
        assert_eq!(rssi_quality(-115.0), SignalQuality::VeryWeak);
    }

    #[test]
    fn snr_bands() {
        assert_eq!(snr_quality(7.5), SignalQuality::Excellent);
        assert_eq!(snr_quality(2.0), SignalQuality::Good);
        assert_eq!(snr_quality(-2.5), SignalQuality::Fair);
        assert_eq!(snr_quality(-7.0), SignalQuality::Weak);
        assert_eq!(snr_quality(-15.0), SignalQuality::VeryWeak);
    }
}
