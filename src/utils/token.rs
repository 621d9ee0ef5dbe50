use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub fn generate_receipt_id(length: usize) -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    format!("rcpt_{}", suffix)
}

/// Registration numbers are REG + unix millis at registration time.
pub fn generate_registration_number() -> String {
    format!("REG{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_number_has_reg_prefix() {
        let reg = generate_registration_number();
        assert!(reg.starts_with("REG"));
        assert!(reg[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn receipt_id_has_requested_length() {
        let r = generate_receipt_id(16);
        assert!(r.starts_with("rcpt_"));
        assert_eq!(r.len(), "rcpt_".len() + 16);
    }
}
