use std::fmt;

/// Email and password pair sent to the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are present
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[PROTECTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("a@b.com"));
        assert!(shown.contains("[PROTECTED]"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_is_complete() {
        assert!(Credentials::new("a@b.com", "x").is_complete());
        assert!(!Credentials::new("", "x").is_complete());
        assert!(!Credentials::new("   ", "x").is_complete());
        assert!(!Credentials::new("a@b.com", "").is_complete());
    }
}
