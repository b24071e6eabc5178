use crate::error::{Result, TransferError};

/// Rejects anything but a pure base name: no path separators, no `..`, not
/// empty. A violation means the receiver closes the transfer context
/// without writing anything.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\\') || name.contains('/') || name.contains("..") {
        return Err(TransferError::InvalidFilename(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_plain_base_name() {
        assert!(validate_filename("report.pdf").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        assert!(validate_filename("").is_err());
    }

    #[test]
    fn rejects_embedded_separators() {
        assert!(validate_filename("a/b").is_err());
        assert!(validate_filename("a\\b").is_err());
    }

    #[test]
    fn rejects_parent_dir_traversal() {
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("a..b").is_err());
    }
}
