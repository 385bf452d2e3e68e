//! Custom validation functions shared across configuration modules.

use ipnetwork::Ipv4Network;
use validator::ValidationError;

/// Validate that every monitored prefix has a usable mask and a concrete
/// network address. Masks of zero and the unspecified network are the two
/// shapes the parser accepts but the monitor cannot meaningfully track.
pub fn validate_prefix_list(prefixes: &[Ipv4Network]) -> Result<(), ValidationError> {
    if prefixes.iter().any(|p| p.prefix() == 0) {
        return Err(ValidationError::new("zero_length_mask"));
    }
    if prefixes.iter().any(|p| p.network().octets() == [0, 0, 0, 0]) {
        return Err(ValidationError::new("unspecified_network"));
    }
    Ok(())
}

/// Validate that an interface name follows Linux naming conventions.
pub fn validate_interface(name: &str) -> Result<(), ValidationError> {
    let valid = !name.is_empty()
        && name.len() <= 15
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    let re =
        regex::Regex::new("^[a-zA-Z0-9_]+$").map_err(|_| ValidationError::new("invalid_regex"))?;

    if valid && re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_interface"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_interface_names() {
        for name in ["eth0", "enp3s0", "wlan0", "lo"] {
            validate_interface(name).unwrap();
        }
    }

    #[test]
    fn rejects_shell_metacharacters() {
        assert!(validate_interface("eth0;id").is_err());
        assert!(validate_interface("").is_err());
        assert!(validate_interface("waytoolonginterfacename").is_err());
    }
}
