use rand::Rng;

/// Generate a cryptographically secure random password
///
/// Used when seeding the bootstrap super-admin without an explicit password
/// in the environment. The generated value is logged exactly once at
/// startup.
pub fn generate_secure_password() -> String {
    const PASSWORD_LENGTH: usize = 20;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789\
                             !@#$%^&*()_+-=[]{}|;:,.<>?";

    let mut rng = rand::rng();
    (0..PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_password_length() {
        let password = generate_secure_password();
        assert_eq!(password.len(), 20);
    }

    #[test]
    fn test_generate_secure_password_contains_valid_characters() {
        let password = generate_secure_password();

        assert!(password.chars().all(|c| {
            c.is_ascii_alphanumeric() || "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c)
        }));
    }

    #[test]
    fn test_generate_secure_password_uniqueness() {
        let password1 = generate_secure_password();
        let password2 = generate_secure_password();

        assert_ne!(password1, password2);
    }
}
