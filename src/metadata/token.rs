use std::fmt;

/// Identity of one declared type.
///
/// The high byte is the kind tag (always [`Token::DECLARED`] for tokens handed out by a
/// [`crate::TypeRegistry`]), the low 24 bits the declaration sequence number. Sequence
/// numbers are drawn from one process-wide counter, so tokens never collide across
/// registries. The value `0` is the null token and never refers to a type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Kind tag of declared types
    pub const DECLARED: u8 = 0x02;

    /// Wraps a raw token value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Builds the token of the `sequence`-th declaration
    #[must_use]
    pub fn declared(sequence: u32) -> Self {
        Token((u32::from(Self::DECLARED) << 24) | (sequence & 0x00FF_FFFF))
    }

    /// The raw value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The kind tag (high byte)
    #[must_use]
    pub fn kind(&self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// The declaration sequence number (low 24 bits)
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// `true` for the null token
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Token(null)");
        }
        write!(f, "Token(#{} of kind 0x{:02x})", self.sequence(), self.kind())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
