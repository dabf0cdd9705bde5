use std::collections::HashMap;

use super::DataType;

/// A mapping from type variable names to their replacements.
pub type Substitution = HashMap<String, DataType>;

impl DataType {
    /// Collects every type variable name in the traversal order, duplicates included.
    pub fn free_type_variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.walk(&mut |ty| {
            if let DataType::TypeVariable(ref name) = *ty {
                names.push(name.clone());
            }
        });
        names
    }

    /// Returns true if the type variable `name` occurs anywhere in the type.
    pub fn contains(&self, name: &str) -> bool {
        let mut found = false;
        self.walk(&mut |ty| {
            if let DataType::TypeVariable(ref n) = *ty {
                found |= n == name;
            }
        });
        found
    }

    /// Replaces every type variable in `map` with its replacement,
    /// then keeps substituting inside the replacement.
    ///
    /// A variable mapped to itself is replaced once. A variable that reappears
    /// while its own replacement is being substituted is left as is.
    pub fn substitute(&self, map: &Substitution) -> DataType {
        debug!("substituting {} binding(s) into {:?}", map.len(), self);
        let mut active = Vec::new();
        self.substitute_with(map, &mut active)
    }

    fn substitute_with(&self, map: &Substitution, active: &mut Vec<String>) -> DataType {
        match *self {
            DataType::TypeVariable(ref name) => {
                let replacement = match map.get(name) {
                    Some(replacement) => replacement,
                    None => return self.clone(),
                };
                if replacement == self {
                    return self.clone();
                }
                if active.contains(name) {
                    warn!("cyclic substitution through type variable {}, \
                           leaving it unresolved", name);
                    return self.clone();
                }

                active.push(name.clone());
                let ty = replacement.substitute_with(map, active);
                active.pop();
                ty
            }
            _ => self.map_children(|ty| ty.substitute_with(map, active)),
        }
    }

    /// Replaces every type variable named `name` with `ty`.
    /// Unlike `substitute`, the replacement itself is not substituted.
    pub fn substitute_one(&self, name: &str, ty: &DataType) -> DataType {
        debug!("substituting {:?} for {} into {:?}", ty, name, self);
        self.substitute_one_with(name, ty)
    }

    fn substitute_one_with(&self, name: &str, ty: &DataType) -> DataType {
        match *self {
            DataType::TypeVariable(ref n) if n == name => ty.clone(),
            _ => self.map_children(|t| t.substitute_one_with(name, ty)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tv(name: &str) -> DataType {
        DataType::type_variable(name)
    }

    fn subst(pairs: &[(&str, DataType)]) -> Substitution {
        pairs.iter().map(|&(k, ref v)| (k.to_owned(), v.clone())).collect()
    }

    fn samples() -> Vec<DataType> {
        vec![
            DataType::int64(), DataType::bool(), DataType::void(), DataType::custom("Point"),
            DataType::Error, DataType::IntegerLiteral, DataType::NilLiteral,
            DataType::string(), DataType::any(),
            DataType::array(tv("X"), Some(3)),
            DataType::function(vec![tv("X"), tv("Y")], tv("X"), true),
            DataType::tuple(vec![DataType::double(), DataType::pointer(tv("Y"))]),
            DataType::composition(vec![tv("P"), DataType::custom("Q")]),
        ]
    }

    #[test]
    fn test_free_type_variables() {
        assert_eq!(DataType::int64().free_type_variables(), Vec::<String>::new());
        assert_eq!(tv("X").free_type_variables(), ["X"]);
        let ty = DataType::function(vec![tv("A"), DataType::pointer(tv("B"))],
                                    DataType::tuple(vec![tv("A"), DataType::array(tv("C"), None)]),
                                    false);
        assert_eq!(ty.free_type_variables(), ["A", "B", "A", "C"]);
        let ty = DataType::composition(vec![tv("P"), DataType::custom("Q"), tv("R")]);
        assert_eq!(ty.free_type_variables(), ["P", "R"]);
    }

    #[test]
    fn test_contains() {
        assert!(tv("X").contains("X"));
        assert!(!tv("Y").contains("X"));
        assert!(!DataType::int64().contains("X"));
        assert!(!DataType::custom("X").contains("X"));
        assert!(DataType::function(vec![tv("X")], DataType::bool(), false).contains("X"));
        assert!(DataType::function(vec![], tv("X"), false).contains("X"));
        assert!(DataType::pointer(DataType::array(tv("X"), None)).contains("X"));
    }

    #[test]
    fn test_substitute_round_trip() {
        for ty in samples() {
            assert_eq!(tv("X").substitute(&subst(&[("X", ty.clone())])), ty);
        }
    }

    #[test]
    fn test_substitute_empty() {
        let empty = Substitution::new();
        for ty in samples() {
            assert_eq!(ty.substitute(&empty), ty);
            assert_eq!(ty.substitute(&empty).description(), ty.description());
        }
    }

    #[test]
    fn test_substitute_structural() {
        let map = subst(&[("X", DataType::int32()), ("Y", DataType::bool())]);
        let ty = DataType::function(vec![tv("X"), tv("Y")], tv("X"), true);
        assert_eq!(ty.substitute(&map),
                   DataType::function(vec![DataType::int32(), DataType::bool()],
                                      DataType::int32(), true));

        let ty = DataType::array(DataType::pointer(tv("X")), Some(4));
        assert_eq!(ty.substitute(&map).description(), "[*Int32; 4]");

        let ty = DataType::tuple(vec![tv("Z"), tv("Y")]);
        assert_eq!(ty.substitute(&map), DataType::tuple(vec![tv("Z"), DataType::bool()]));
    }

    #[test]
    fn test_substitute_fixpoint() {
        let map = subst(&[("X", DataType::pointer(tv("Y"))), ("Y", DataType::double())]);
        assert_eq!(tv("X").substitute(&map), DataType::pointer(DataType::double()));

        let map = subst(&[("X", tv("X"))]);
        assert_eq!(tv("X").substitute(&map), tv("X"));
    }

    #[test]
    fn test_substitute_cycle() {
        let map = subst(&[("X", DataType::array(tv("X"), None))]);
        assert_eq!(tv("X").substitute(&map), DataType::array(tv("X"), None));

        let map = subst(&[("X", DataType::pointer(tv("Y"))), ("Y", tv("X"))]);
        assert_eq!(tv("X").substitute(&map), DataType::pointer(tv("X")));
    }

    #[test]
    fn test_substitute_leaves_original() {
        let ty = DataType::tuple(vec![tv("X")]);
        let _ = ty.substitute(&subst(&[("X", DataType::bool())]));
        assert_eq!(ty, DataType::tuple(vec![tv("X")]));
    }

    #[test]
    fn test_substitute_one() {
        let ty = DataType::function(vec![tv("T"), tv("U")], DataType::array(tv("T"), None), false);
        assert_eq!(ty.substitute_one("T", &DataType::int8()),
                   DataType::function(vec![DataType::int8(), tv("U")],
                                      DataType::array(DataType::int8(), None), false));
        assert_eq!(DataType::bool().substitute_one("T", &DataType::int8()), DataType::bool());
    }

    #[test]
    fn test_substitute_one_pointer() {
        let ty = DataType::pointer(DataType::pointer(tv("T")));
        assert_eq!(ty.substitute_one("T", &DataType::custom("Node")),
                   DataType::pointer(DataType::pointer(DataType::custom("Node"))));
        // the pointee is rewritten, not the replacement
        let ty = DataType::pointer(tv("U"));
        assert_eq!(ty.substitute_one("T", &DataType::pointer(tv("T"))), DataType::pointer(tv("U")));
    }

    #[test]
    fn test_substitute_one_not_recursive() {
        let ty = tv("T").substitute_one("T", &DataType::pointer(tv("T")));
        assert_eq!(ty, DataType::pointer(tv("T")));
        assert!(ty.contains("T"));
    }
}
