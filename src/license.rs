//! License file generation.
use crate::constants::NO_LICENSE;
use crate::error::{Error, Result};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/licenses/"]
struct LicenseAssets;

/// Licenses that can be generated, plus `None`.
pub const LICENSE_NAMES: [&str; 5] = ["MIT", "BSD-3-Clause", "ISC", "Unlicense", NO_LICENSE];

pub const DEFAULT_LICENSE: &str = "MIT";

/// Checks a license name, returning the canonical spelling.
pub fn validate_license(name: &str) -> Result<&'static str> {
    LICENSE_NAMES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| Error::UnknownLicense {
            name: name.to_string(),
            available: LICENSE_NAMES.join(", "),
        })
}

/// Unrendered license template, or `None` when no license was chosen.
/// Uses the `{{author}}` and `{{year}}` placeholders.
///
/// # Errors
/// * `Error::UnknownLicense` if `name` is not one of [`LICENSE_NAMES`]
pub fn license_template(name: &str) -> Result<Option<String>> {
    let name = validate_license(name)?;
    if name == NO_LICENSE {
        return Ok(None);
    }
    let asset = LicenseAssets::get(&format!("{name}.txt")).ok_or_else(|| {
        Error::TemplateError(format!("license text for '{name}' is missing"))
    })?;
    Ok(Some(String::from_utf8_lossy(&asset.data).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TemplateContext;
    use crate::renderer::{TemplateRenderer, TokenRenderer};

    fn render(name: &str) -> String {
        let ctx: TemplateContext = [("author", "Ada"), ("year", "2024")].into_iter().collect();
        let template = license_template(name).unwrap().unwrap();
        TokenRenderer::new().render(&template, &ctx)
    }

    #[test]
    fn test_every_license_is_bundled() {
        for name in LICENSE_NAMES.iter().filter(|n| **n != NO_LICENSE) {
            let text = render(name);
            assert!(!text.contains("{{"), "{name} has unrendered tokens");
        }
    }

    #[test]
    fn test_mit_mentions_author_and_year() {
        let text = render("mit");
        assert!(text.starts_with("MIT License"));
        assert!(text.contains("Copyright (c) 2024 Ada"));
    }

    #[test]
    fn test_none_and_unknown() {
        assert_eq!(license_template("None").unwrap(), None);
        assert!(matches!(validate_license("WTFPL"), Err(Error::UnknownLicense { .. })));
    }
}
