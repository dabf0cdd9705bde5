use super::DataType;

impl DataType {
    /// Returns true if a value of this type can be implicitly converted to `other`.
    ///
    /// Besides the identity, the coercible pairs are exactly
    /// integer and integer, integer and floating point, integer and pointer,
    /// and pointer and pointer, in both directions.
    /// Floating point types of different kinds do not coerce to each other.
    pub fn can_coerce_to(&self, other: &DataType) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (&DataType::Int { .. }, &DataType::Int { .. }) |
            (&DataType::Int { .. }, &DataType::Floating(_)) |
            (&DataType::Floating(_), &DataType::Int { .. }) |
            (&DataType::Int { .. }, &DataType::Pointer(_)) |
            (&DataType::Pointer(_), &DataType::Int { .. }) |
            (&DataType::Pointer(_), &DataType::Pointer(_)) => true,
            (_, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        for ty in &[DataType::bool(), DataType::custom("Point"), DataType::any(),
                    DataType::tuple(vec![DataType::int8(), DataType::double()])] {
            assert!(ty.can_coerce_to(ty));
        }
    }

    #[test]
    fn test_numbers() {
        assert!(DataType::int64().can_coerce_to(&DataType::double()));
        assert!(DataType::double().can_coerce_to(&DataType::int64()));
        assert!(DataType::int8().can_coerce_to(&DataType::uint64()));
        assert!(DataType::uint64().can_coerce_to(&DataType::int8()));
        assert!(!DataType::float().can_coerce_to(&DataType::double()));
        assert!(!DataType::float80().can_coerce_to(&DataType::float()));
    }

    #[test]
    fn test_pointers() {
        let p = DataType::pointer(DataType::void());
        assert!(p.can_coerce_to(&DataType::string()));
        assert!(DataType::string().can_coerce_to(&p));
        assert!(p.can_coerce_to(&DataType::uint64()));
        assert!(DataType::int32().can_coerce_to(&p));
        assert!(!p.can_coerce_to(&DataType::double()));
        assert!(!DataType::double().can_coerce_to(&p));
    }

    #[test]
    fn test_others() {
        assert!(!DataType::bool().can_coerce_to(&DataType::int64()));
        assert!(!DataType::int64().can_coerce_to(&DataType::bool()));
        assert!(!DataType::Error.can_coerce_to(&DataType::int64()));
        assert!(!DataType::int64().can_coerce_to(&DataType::Error));
        assert!(!DataType::IntegerLiteral.can_coerce_to(&DataType::int64()));
        assert!(!DataType::custom("Int").can_coerce_to(&DataType::int64()));
        assert!(!DataType::array(DataType::int8(), None).can_coerce_to(&DataType::string()));
    }
}
