use crate::document::DocumentFile;

/// The only document type the backend ingests
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const MB: u64 = 1024 * 1024;

/// Reasons a file is rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Only {expected} files are allowed, got {actual}")]
    InvalidType { expected: String, actual: String },

    #[error("File is {} which exceeds the {} size limit", format_size(*.size), format_size(*.max))]
    TooLarge { size: u64, max: u64 },
}

/// Checks a candidate file against the accepted type and a size limit.
///
/// The size limit has no default; callers pass the one their entry point enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidator {
    accepted_type: String,
    max_size_bytes: u64,
}

impl FileValidator {
    pub fn new(accepted_type: impl Into<String>, max_size_bytes: u64) -> Self {
        Self {
            accepted_type: accepted_type.into(),
            max_size_bytes,
        }
    }

    /// PDF-only validator with the given size limit
    pub fn pdf(max_size_bytes: u64) -> Self {
        Self::new(PDF_CONTENT_TYPE, max_size_bytes)
    }

    pub fn accepted_type(&self) -> &str {
        &self.accepted_type
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn validate(&self, file: &DocumentFile) -> Result<(), ValidationError> {
        self.check(file.content_type(), file.size())
    }

    /// Validate from the declared type and size alone
    pub fn check(&self, content_type: &str, size: u64) -> Result<(), ValidationError> {
        if content_type != self.accepted_type {
            return Err(ValidationError::InvalidType {
                expected: self.accepted_type.clone(),
                actual: if content_type.is_empty() {
                    "unknown type".to_string()
                } else {
                    content_type.to_string()
                },
            });
        }

        if size > self.max_size_bytes {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }

        Ok(())
    }
}

/// Human readable byte count, e.g. `10 MB`, `1.5 MB`, `512 KB`
pub fn format_size(bytes: u64) -> String {
    if bytes >= MB {
        if bytes % MB == 0 {
            format!("{} MB", bytes / MB)
        } else {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        }
    } else if bytes >= 1024 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 10 * MB;

    #[test]
    fn test_exact_limit_is_accepted() {
        let validator = FileValidator::pdf(LIMIT);
        assert!(validator.check(PDF_CONTENT_TYPE, LIMIT).is_ok());
    }

    #[test]
    fn test_one_byte_over_limit_is_rejected() {
        let validator = FileValidator::pdf(LIMIT);
        let err = validator.check(PDF_CONTENT_TYPE, LIMIT + 1).unwrap_err();
        assert_eq!(err, ValidationError::TooLarge { size: LIMIT + 1, max: LIMIT });
    }

    #[test]
    fn test_type_must_match_exactly() {
        let validator = FileValidator::pdf(LIMIT);
        assert!(matches!(
            validator.check("application/pdf; charset=binary", 10),
            Err(ValidationError::InvalidType { .. })
        ));
        assert!(matches!(
            validator.check("APPLICATION/PDF", 10),
            Err(ValidationError::InvalidType { .. })
        ));
        assert!(matches!(validator.check("", 10), Err(ValidationError::InvalidType { .. })));
    }

    #[test]
    fn test_type_checked_before_size() {
        let validator = FileValidator::pdf(LIMIT);
        let err = validator.check("image/png", LIMIT * 2).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn test_limit_is_configurable() {
        let five = FileValidator::pdf(5 * MB);
        let ten = FileValidator::pdf(10 * MB);
        assert!(five.check(PDF_CONTENT_TYPE, 6 * MB).is_err());
        assert!(ten.check(PDF_CONTENT_TYPE, 6 * MB).is_ok());
    }

    #[test]
    fn test_too_large_message_mentions_limit() {
        let err = FileValidator::pdf(LIMIT).check(PDF_CONTENT_TYPE, 12 * MB).unwrap_err();
        assert_eq!(err.to_string(), "File is 12 MB which exceeds the 10 MB size limit");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(5 * MB), "5 MB");
        assert_eq!(format_size(MB + MB / 2), "1.5 MB");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(12), "12 bytes");
    }
}
