use anyhow::{bail, Context, Result};

/// Parse a port spec into an ordered, inclusive list of TCP ports (1..=65535).
///
/// Supported forms:
/// - single port: `80`
/// - inclusive range: `20-443`
pub fn parse_port_spec(s: &str) -> Result<Vec<u16>> {
    let spec = s.trim();
    if spec.is_empty() {
        bail!("empty port spec (use like: 80 or 20-443)");
    }

    // Range `start-end`
    if let Some((a, b)) = spec.split_once('-') {
        let start = parse_port_str(a.trim())
            .with_context(|| format!("invalid start in range: {a}"))?;
        let end = parse_port_str(b.trim())
            .with_context(|| format!("invalid end in range: {b}"))?;
        if start > end {
            bail!("invalid range {start}-{end} (start > end)");
        }
        return Ok((start..=end).collect());
    }

    // Single port
    let p = parse_port_str(spec).with_context(|| format!("invalid port value: {spec}"))?;
    Ok(vec![p])
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_port() {
        assert_eq!(parse_port_spec("80").unwrap(), vec![80]);
        assert_eq!(parse_port_spec("  443 ").unwrap(), vec![443]);
    }

    #[test]
    fn parse_range() {
        assert_eq!(parse_port_spec("8000-8002").unwrap(), vec![8000, 8001, 8002]);
        assert_eq!(parse_port_spec("22-22").unwrap(), vec![22]);
    }

    #[test]
    fn reversed_range_errors() {
        assert!(parse_port_spec("443-80").is_err());
    }

    #[test]
    fn out_of_range_values_error() {
        assert!(parse_port_spec("0").is_err());
        assert!(parse_port_spec("70000").is_err());
        assert!(parse_port_spec("20-70000").is_err());
    }

    #[test]
    fn garbage_errors() {
        assert!(parse_port_spec("").is_err());
        assert!(parse_port_spec("http").is_err());
        assert!(parse_port_spec("80-").is_err());
    }
}
