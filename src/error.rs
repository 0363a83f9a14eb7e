use thiserror::Error;

use crate::metadata::{target::Target, token::Token};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Lookups never fail: a missing key, member or exhausted ancestor chain is reported as `None`
/// by the read operations. The variants below cover the write side (attaching metadata to
/// targets) and the declaration of the type hierarchy the registry walks.
///
/// # Error Categories
///
/// ## Store Errors
/// - [`Error::InvalidTarget`] - The target is null or unknown to the reflection provider
///
/// ## Decorator Errors
/// - [`Error::DuplicateApplication`] - A single-use decorator was applied twice to one declaration
/// - [`Error::Misapplied`] - A decorator was applied to the wrong kind of declaration
///
/// ## Type System Errors
/// - [`Error::TypeInsert`] - Failed to register a new type
/// - [`Error::TypeNotFound`] - Requested type not found
/// - [`Error::TypeMissingParent`] - The declared base type does not exist
/// - [`Error::Malformed`] - Inconsistent declaration data
///
/// # Examples
///
/// ```rust
/// use metarize::{ClassDecoratorFactory, Decorator, Error, MetadataStore, TypeRegistry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let store = MetadataStore::new(None, Some(registry.clone()));
/// let controller = registry.declare("UserController").build()?;
///
/// let endpoint = ClassDecoratorFactory::create("api:endpoint", "/users".to_string());
/// endpoint.apply(&store, &controller.type_site())?;
///
/// match endpoint.apply(&store, &controller.type_site()) {
///     Err(Error::DuplicateApplication { target, .. }) => assert_eq!(target, "class UserController"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), metarize::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The target of a store operation is not a valid type reference.
    ///
    /// Raised when the target carries a null token, or when a reflection provider is
    /// attached to the store and does not know the token.
    #[error("Invalid metadata target - {0}")]
    InvalidTarget(Target),

    /// A decorator that only permits a single application was applied again to the same
    /// declaration.
    ///
    /// Inherited values never trigger this error; only an own value on the exact slot does.
    ///
    /// # Fields
    ///
    /// * `decorator` - Name of the offending decorator (e.g. `ClassDecorator`)
    /// * `target` - Human-readable label of the declaration (e.g. `class UserController`)
    /// * `key` - The metadata key the decorator writes
    #[error("{decorator} cannot be applied more than once on {target} (key: {key})")]
    DuplicateApplication {
        /// Name of the decorator that was applied twice
        decorator: String,
        /// Label of the declaration, as produced by `DecoratorFactory::target_name`
        target: String,
        /// The metadata key of the slot
        key: String,
    },

    /// A decorator was applied to a declaration site of the wrong kind.
    ///
    /// For example a class decorator applied to a method, or a parameter decorator applied
    /// without a parameter index.
    #[error("{decorator} can only be applied to a {expected} declaration, not {site}")]
    Misapplied {
        /// Name of the decorator
        decorator: String,
        /// The element category the decorator expects
        expected: String,
        /// Label of the declaration it was applied to
        site: String,
    },

    /// The declaration data is inconsistent.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to insert new type into the `TypeRegistry`.
    ///
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// Failed to find type in the `TypeRegistry`.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(Token),

    /// The declared base of a type is not registered.
    #[error("The parent of the current type is missing - {0}")]
    TypeMissingParent(Token),
}
