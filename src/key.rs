//! Key normalization
//!
//! The telemetry API mixes `camelCase`, `snake_case` and irregular keys with
//! embedded acronyms and unit suffixes (`currentSOC_pct`,
//! `temperatureHvBatteryMax_K`). Every raw key is folded to one canonical
//! lowercase form before it is matched against a schema field.

/// Convert a raw key to its canonical `snake_case` form.
///
/// A separator is inserted before a capital that follows a lowercase letter
/// or digit, and before the last capital of an acronym that starts a new word
/// (`HVBattery` -> `hv_battery`). Only letters with a distinct lowercase form
/// count as capitals, so the output holds none and the function is
/// idempotent. Digits and existing separators are kept as-is.
pub fn normalize_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut result = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_capital(c) {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let word_start = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (is_capital(prev) && next_is_lower);
            if word_start {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}

// `ℝ` or `𝐀` are uppercase but have no lowercase mapping
fn is_capital(c: char) -> bool {
    let mut lower = c.to_lowercase();
    !(lower.next() == Some(c) && lower.next().is_none())
}

/// Whether a key is already in canonical form
pub fn is_canonical(key: &str) -> bool {
    normalize_key(key) == key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(normalize_key("cruisingRangeElectricKm"), "cruising_range_electric_km");
        assert_eq!(normalize_key("doorLockStatus"), "door_lock_status");
        assert_eq!(normalize_key("carCapturedTimestamp"), "car_captured_timestamp");
    }

    #[test]
    fn test_embedded_acronyms_and_units() {
        assert_eq!(normalize_key("currentSOC_pct"), "current_soc_pct");
        assert_eq!(normalize_key("targetSOC_pct"), "target_soc_pct");
        assert_eq!(normalize_key("temperatureHvBatteryMax_K"), "temperature_hv_battery_max_k");
        assert_eq!(normalize_key("HVBatteryTemp"), "hv_battery_temp");
        assert_eq!(normalize_key("chargePower_kW"), "charge_power_k_w");
        assert_eq!(normalize_key("targetTemperature_C"), "target_temperature_c");
    }

    #[test]
    fn test_digits_and_separators_untouched() {
        assert_eq!(normalize_key("zone2Enabled"), "zone2_enabled");
        assert_eq!(normalize_key("already_snake_1"), "already_snake_1");
        assert_eq!(normalize_key("with-dash"), "with-dash");
        assert_eq!(normalize_key("_leading"), "_leading");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_idempotent() {
        let keys = [
            "currentSOC_pct",
            "remainingChargingTimeToComplete_min",
            "ABC",
            "aB1cD",
            "x_Y_z",
            "mixed__Double",
            "ÄpfelÜber",
        ];
        for key in keys {
            let once = normalize_key(key);
            assert_eq!(normalize_key(&once), once, "not idempotent for {key}");
            assert!(is_canonical(&once));
        }
    }

    #[test]
    fn test_capitals_without_lowercase_form() {
        assert_eq!(normalize_key("Aℝ"), "aℝ");
        assert_eq!(normalize_key("aℝ"), "aℝ");
        assert_eq!(normalize_key("fooBar𝐀Baz"), "foo_bar𝐀baz");
    }

    #[test]
    fn test_idempotent_across_unicode() {
        let fillers = ['A', 'a', 'Z', '1', '_', 'ß', 'İ', 'ℝ'];
        let sample = (0u32..0x3000)
            .chain(0x1D400..0x1D500)
            .chain(0x10400..0x10450)
            .filter_map(char::from_u32);

        for c in sample {
            for f in fillers {
                for key in [
                    format!("{f}{c}"),
                    format!("{c}{f}"),
                    format!("{f}{c}{f}a"),
                    format!("{c}{c}{f}"),
                ] {
                    let once = normalize_key(&key);
                    assert_eq!(normalize_key(&once), once, "not idempotent for {:?}", key);
                }
            }
        }
    }
}
