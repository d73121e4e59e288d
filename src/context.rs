//! Template context construction.
//! The context is an ordered token → value map built once per invocation
//! and never modified afterwards.

use crate::constants::{MAIN_FILE, STANDALONE_PACKAGE};
use chrono::{Datelike, NaiveDate};
use cruet::Inflector;
use indexmap::IndexMap;

pub const PROJECT_NAME: &str = "project_name";
pub const PROJECT_SLUG: &str = "project_slug";
pub const PACKAGE_NAME: &str = "package_name";
pub const DESCRIPTION: &str = "description";
pub const AUTHOR: &str = "author";
pub const EMAIL: &str = "email";
pub const LICENSE: &str = "license";
pub const HOMEPAGE: &str = "homepage";
pub const REPOSITORY: &str = "repository";
/// Dotted module holding `app` and `greet`: `pkg.main`, or `main` for a standalone script.
pub const MAIN_MODULE: &str = "main_module";
/// What the package manager should include: the package directory or `main.py`.
pub const PACKAGE_INCLUDE: &str = "package_include";
pub const YEAR: &str = "year";
pub const DATE: &str = "date";

/// Immutable mapping of placeholder names to replacement values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: IndexMap<String, String>,
}

impl TemplateContext {
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Values supplied for one project; `None` means "use the default".
#[derive(Debug, Clone, Default)]
pub struct ProjectValues {
    pub name: Option<String>,
    pub package_name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
}

/// Builds a [`TemplateContext`] from user values layered over defaults.
#[derive(Debug)]
pub struct ContextBuilder {
    slug: String,
    today: NaiveDate,
    values: ProjectValues,
    extra: IndexMap<String, String>,
}

impl ContextBuilder {
    pub fn new<S: Into<String>>(slug: S, today: NaiveDate) -> Self {
        Self {
            slug: slug.into(),
            today,
            values: ProjectValues::default(),
            extra: IndexMap::new(),
        }
    }

    pub fn values(mut self, values: ProjectValues) -> Self {
        self.values = values;
        self
    }

    /// Adds a token that is not part of the standard set.
    pub fn token<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> TemplateContext {
        let ProjectValues {
            name,
            package_name,
            description,
            author,
            email,
            license,
            homepage,
            repository,
        } = self.values;

        let package_name = package_name.unwrap_or_else(|| sanitize(&self.slug));
        let standalone = package_name == STANDALONE_PACKAGE;
        let (main_module, package_include) = if standalone {
            ("main".to_string(), MAIN_FILE.to_string())
        } else {
            (format!("{package_name}.main"), package_name.clone())
        };
        let repository = match repository {
            Some(repository) => repository,
            None if standalone => String::new(),
            None => default_repository(&package_name),
        };

        let mut values = IndexMap::new();
        values.insert(PROJECT_NAME.to_string(), name.unwrap_or_else(|| title(&self.slug)));
        values.insert(PROJECT_SLUG.to_string(), self.slug);
        values.insert(PACKAGE_NAME.to_string(), package_name);
        values.insert(DESCRIPTION.to_string(), description.unwrap_or_default());
        values.insert(AUTHOR.to_string(), author.unwrap_or_default());
        values.insert(EMAIL.to_string(), email.unwrap_or_default());
        values.insert(LICENSE.to_string(), license.unwrap_or_default());
        values.insert(HOMEPAGE.to_string(), homepage.unwrap_or_default());
        values.insert(REPOSITORY.to_string(), repository);
        values.insert(MAIN_MODULE.to_string(), main_module);
        values.insert(PACKAGE_INCLUDE.to_string(), package_include);
        values.insert(YEAR.to_string(), self.today.year().to_string());
        values.insert(DATE.to_string(), self.today.format("%Y-%m-%d").to_string());
        for (key, value) in self.extra {
            values.entry(key).or_insert(value);
        }

        TemplateContext { values }
    }
}

/// Human readable title from a directory name: `my-app` → `My App`.
pub fn title(slug: &str) -> String {
    slug.to_title_case()
}

/// Importable package name from a directory name: `My-App` → `my_app`.
pub fn sanitize(slug: &str) -> String {
    let snake = slug.to_snake_case();
    if snake.is_empty() {
        "app".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{snake}")
    } else {
        snake
    }
}

/// A package name must be a python identifier: no dashes, dots or spaces.
pub fn is_valid_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Placeholder repository URL for a package.
pub fn default_repository(package_name: &str) -> String {
    format!("https://github.com/your_user_name/{package_name}")
}
