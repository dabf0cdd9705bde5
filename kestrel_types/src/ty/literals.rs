use super::DataType;

impl DataType {
    /// Returns true for the types of literals without a contextual type.
    pub fn is_literal(&self) -> bool {
        match *self {
            DataType::IntegerLiteral | DataType::FloatingLiteral |
            DataType::StringLiteral | DataType::NilLiteral => true,
            _ => false,
        }
    }

    /// Returns true for the types that should be gone after the type resolution.
    pub fn is_transient(&self) -> bool {
        match *self {
            DataType::Error => true,
            ref ty => ty.is_literal(),
        }
    }

    /// Returns true if no transient type nor type variable is reachable from this type.
    pub fn is_resolved(&self) -> bool {
        let mut resolved = true;
        self.walk(&mut |ty| {
            if ty.is_transient() {
                resolved = false;
            } else if let DataType::TypeVariable(_) = *ty {
                resolved = false;
            }
        });
        resolved
    }

    /// Resolves a literal type to its default when nothing else constrains it.
    ///
    /// `nil` has no default and stays as is; the caller should resolve it from the context.
    pub fn literal_fallback(&self) -> DataType {
        match *self {
            DataType::IntegerLiteral => DataType::int64(),
            DataType::FloatingLiteral => DataType::double(),
            DataType::StringLiteral => DataType::string(),
            ref ty => ty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_fallback() {
        assert_eq!(DataType::IntegerLiteral.literal_fallback(), DataType::int64());
        assert_eq!(DataType::FloatingLiteral.literal_fallback(), DataType::double());
        assert_eq!(DataType::StringLiteral.literal_fallback(), DataType::string());
        assert_eq!(DataType::NilLiteral.literal_fallback(), DataType::NilLiteral);
        assert_eq!(DataType::Error.literal_fallback(), DataType::Error);
        assert_eq!(DataType::uint8().literal_fallback(), DataType::uint8());
        let ty = DataType::array(DataType::IntegerLiteral, None);
        assert_eq!(ty.literal_fallback(), ty);
    }

    #[test]
    fn test_literal_fallback_idempotent() {
        for ty in &[DataType::IntegerLiteral, DataType::FloatingLiteral, DataType::StringLiteral,
                    DataType::NilLiteral, DataType::Error, DataType::type_variable("T"),
                    DataType::tuple(vec![DataType::StringLiteral])] {
            let once = ty.literal_fallback();
            assert_eq!(once.literal_fallback(), once);
        }
    }

    #[test]
    fn test_transient() {
        assert!(DataType::IntegerLiteral.is_literal());
        assert!(DataType::NilLiteral.is_transient());
        assert!(DataType::Error.is_transient());
        assert!(!DataType::Error.is_literal());
        assert!(!DataType::string().is_transient());
    }

    #[test]
    fn test_is_resolved() {
        assert!(DataType::int64().is_resolved());
        assert!(DataType::function(vec![DataType::string()], DataType::void(), true).is_resolved());
        assert!(!DataType::Error.is_resolved());
        assert!(!DataType::pointer(DataType::type_variable("T")).is_resolved());
        assert!(!DataType::tuple(vec![DataType::bool(), DataType::FloatingLiteral]).is_resolved());
        assert!(DataType::IntegerLiteral.literal_fallback().is_resolved());
    }
}
