//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        match local.chars().count() {
            0 => format!("***{}", domain),
            1 | 2 => format!("{}***{}", local.chars().take(1).collect::<String>(), domain),
            _ => format!("{}***{}", local.chars().take(2).collect::<String>(), domain),
        }
    } else {
        "***".to_string()
    }
}

/// Trimmed value is empty
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john@example.com"), "jo***@example.com");
        assert_eq!(mask_email("j@example.com"), "j***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("   "));
        assert!(is_blank(""));
        assert!(!is_blank(" a "));
    }
}
