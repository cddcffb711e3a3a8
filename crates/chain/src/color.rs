//! Hex color parsing for catalog and per-instance colors.
//!
//! Colors are returned as sRGB components in `0.0..=1.0`.

use crate::error::ChainError;

/// Parse `#RGB` or `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(input: &str) -> Result<[f32; 3], ChainError> {
    let hex = input.trim().trim_start_matches('#');
    let invalid = || ChainError::InvalidColor(input.to_string());

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channels: [u8; 3] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                out[i] = v * 17;
            }
            out
        }
        6 => {
            let mut out = [0u8; 3];
            for (i, channel) in out.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            }
            out
        }
        _ => return Err(invalid()),
    };

    Ok(channels.map(|c| c as f32 / 255.0))
}

/// Parse a color, falling back to `fallback` when it is malformed.
pub fn parse_hex_color_or(input: &str, fallback: [f32; 3]) -> [f32; 3] {
    parse_hex_color(input).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), [1.0, 0.0, 0.0]);
        let c = parse_hex_color("63B3FF").unwrap();
        assert!((c[0] - 99.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 1.0);
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!(parse_hex_color("#fff").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color("#000").unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_colors() {
        assert!(parse_hex_color("").is_err());
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GGHHII").is_err());
        assert!(parse_hex_color("rose").is_err());
        assert_eq!(parse_hex_color_or("nope", [0.5; 3]), [0.5; 3]);
    }
}
