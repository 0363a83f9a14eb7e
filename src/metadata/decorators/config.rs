//! Decorator configuration
//!
//! This module provides the options recognized by every decorator factory, controlling
//! whether repeated application is an error, whether payloads are copied per application
//! and how the decorator is named in error messages.

/// Configuration for a decorator created by one of the factories
///
/// Fields left at their defaults fall back to the behavior of the decorator variant:
/// class decorators forbid a second application to the same declaration, member and
/// parameter decorators allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoratorOptions {
    /// Whether a second application to the same declaration is accepted.
    /// `None` uses the variant default (class: `false`, method/property/parameter: `true`)
    pub allow_multiple_applications: Option<bool>,

    /// Store a fresh copy of the payload per application instead of sharing one allocation
    /// between every declaration the decorator was applied to
    pub clone_input: bool,

    /// Name of the decorator used in error messages (default: the variant name, e.g. `ClassDecorator`)
    pub decorator_name: Option<&'static str>,
}

impl Default for DecoratorOptions {
    fn default() -> Self {
        Self {
            allow_multiple_applications: None,
            clone_input: true,
            decorator_name: None,
        }
    }
}

impl DecoratorOptions {
    /// Creates options that reject a second application to the same declaration
    #[must_use]
    pub fn single() -> Self {
        Self {
            allow_multiple_applications: Some(false),
            ..Self::default()
        }
    }

    /// Creates options that share the factory's payload between all applications
    ///
    /// Useful for large payloads; every slot written by the decorator points at the same
    /// allocation.
    #[must_use]
    pub fn shared() -> Self {
        Self {
            clone_input: false,
            ..Self::default()
        }
    }

    /// Sets whether repeated application is accepted
    #[must_use]
    pub fn with_multiple_applications(mut self, allow: bool) -> Self {
        self.allow_multiple_applications = Some(allow);
        self
    }

    /// Sets whether the payload is copied per application
    #[must_use]
    pub fn with_clone_input(mut self, clone_input: bool) -> Self {
        self.clone_input = clone_input;
        self
    }

    /// Sets the decorator name used in error messages
    #[must_use]
    pub fn with_decorator_name(mut self, name: &'static str) -> Self {
        self.decorator_name = Some(name);
        self
    }

    /// Resolves repeated-application permission against the variant default
    #[must_use]
    pub fn allows_multiple(&self, variant_default: bool) -> bool {
        self.allow_multiple_applications.unwrap_or(variant_default)
    }

    /// Resolves the decorator name against the variant default
    #[must_use]
    pub fn name_or(&self, variant_name: &'static str) -> &'static str {
        self.decorator_name.unwrap_or(variant_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecoratorOptions::default();
        assert!(options.clone_input);
        assert!(!options.allows_multiple(false));
        assert!(options.allows_multiple(true));
        assert_eq!(options.name_or("ClassDecorator"), "ClassDecorator");
    }

    #[test]
    fn test_presets() {
        let single = DecoratorOptions::single();
        assert!(!single.allows_multiple(true));
        assert!(single.clone_input);

        let shared = DecoratorOptions::shared();
        assert!(!shared.clone_input);
        assert_eq!(shared.allow_multiple_applications, None);
    }

    #[test]
    fn test_setters() {
        let options = DecoratorOptions::default()
            .with_multiple_applications(true)
            .with_clone_input(false)
            .with_decorator_name("ApiEndpoint");

        assert!(options.allows_multiple(false));
        assert!(!options.clone_input);
        assert_eq!(options.name_or("ClassDecorator"), "ApiEndpoint");
    }
}
