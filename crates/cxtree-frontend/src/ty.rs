use std::fmt;

/// A spelled type with its cv/restrict qualifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualType {
    name: Box<str>,
    quals: u8,
}

impl QualType {
    const CONST: u8 = 1 << 0;
    const VOLATILE: u8 = 1 << 1;
    const RESTRICT: u8 = 1 << 2;

    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self { name: name.into(), quals: 0 }
    }

    #[must_use]
    pub fn with_const(mut self) -> Self {
        self.quals |= Self::CONST;
        self
    }

    #[must_use]
    pub fn with_volatile(mut self) -> Self {
        self.quals |= Self::VOLATILE;
        self
    }

    #[must_use]
    pub fn with_restrict(mut self) -> Self {
        self.quals |= Self::RESTRICT;
        self
    }

    /// The unqualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_const(&self) -> bool {
        self.quals & Self::CONST != 0
    }

    pub fn is_volatile(&self) -> bool {
        self.quals & Self::VOLATILE != 0
    }

    pub fn is_restrict(&self) -> bool {
        self.quals & Self::RESTRICT != 0
    }
}

impl fmt::Display for QualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            f.write_str("const ")?;
        }
        if self.is_volatile() {
            f.write_str("volatile ")?;
        }
        f.write_str(&self.name)?;
        if self.is_restrict() {
            f.write_str(" restrict")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::QualType;

    #[test]
    fn qualifiers_are_spelled_in_declaration_order() {
        let ty = QualType::new("int").with_volatile().with_const();
        assert_eq!(ty.to_string(), "const volatile int");
        assert_eq!(QualType::new("char *").with_restrict().to_string(), "char * restrict");
        assert!(!QualType::new("int").is_const());
    }
}
