use crate::error::{AppError, AppResult};

/// Lowercase, spaces to dashes, then drop anything outside `[A-Za-z0-9_-]`.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Slug for a new or renamed record; a name with no usable characters is
/// rejected.
pub fn slug_for(name: &str) -> AppResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::BadRequest(format!(
            "name '{}' has no characters usable in a slug",
            name.trim()
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_follow_catalog_convention() {
        assert_eq!(slugify("Visiting Cards"), "visiting-cards");
        assert_eq!(slugify("Banners & Flex"), "banners--flex");
        assert_eq!(slugify("Files / Folders"), "files--folders");
        assert_eq!(slugify("  T-Shirts "), "t-shirts");
    }

    #[test]
    fn punctuation_only_names_are_rejected() {
        assert!(matches!(slug_for("!!!"), Err(AppError::BadRequest(_))));
        assert!(matches!(slug_for("   "), Err(AppError::BadRequest(_))));
        assert_eq!(slug_for("Mugs!").expect("slug"), "mugs");
    }
}
