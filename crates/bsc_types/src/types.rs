//! Type variants and the assignability relation.

use crate::function_type::FunctionType;
use std::fmt;

/// A BrightScript type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// The universal type. Everything is assignable to it.
    Dynamic,
    Boolean,
    Integer,
    LongInteger,
    Float,
    Double,
    String,
    Object,
    Void,
    Invalid,
    Function(Box<FunctionType>),
}

impl Type {
    /// Look up a type by the name used after `as`. Case-insensitive.
    pub fn from_type_name(name: &str) -> Option<Type> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "dynamic" => Type::Dynamic,
            "boolean" => Type::Boolean,
            "integer" => Type::Integer,
            "longinteger" => Type::LongInteger,
            "float" => Type::Float,
            "double" => Type::Double,
            "string" => Type::String,
            "object" => Type::Object,
            "void" => Type::Void,
            "function" => Type::Function(Box::new(FunctionType::new(Type::Dynamic))),
            _ => return None,
        };
        Some(ty)
    }

    /// Whether a value of this type may be stored where `target` is expected.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        match (self, target) {
            (_, Type::Dynamic) => true,
            // an unknown value may hold anything
            (Type::Dynamic, _) => true,
            (Type::Function(source), Type::Function(target)) => source.is_assignable_to_function(target),
            (Type::Boolean, Type::Boolean)
            | (Type::Integer, Type::Integer)
            | (Type::LongInteger, Type::LongInteger)
            | (Type::Float, Type::Float)
            | (Type::Double, Type::Double)
            | (Type::String, Type::String)
            | (Type::Object, Type::Object)
            | (Type::Void, Type::Void)
            | (Type::Invalid, Type::Invalid) => true,
            _ => false,
        }
    }

    /// Like [`Type::is_assignable_to`], but numeric types convert into each other.
    pub fn is_convertible_to(&self, target: &Type) -> bool {
        if self.is_numeric() && target.is_numeric() {
            return true;
        }
        self.is_assignable_to(target)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::LongInteger | Type::Float | Type::Double)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dynamic => write!(f, "dynamic"),
            Type::Boolean => write!(f, "boolean"),
            Type::Integer => write!(f, "integer"),
            Type::LongInteger => write!(f, "longinteger"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::Object => write!(f, "object"),
            Type::Void => write!(f, "void"),
            Type::Invalid => write!(f, "invalid"),
            Type::Function(func) => write!(f, "{}", func),
        }
    }
}

impl From<FunctionType> for Type {
    fn from(func: FunctionType) -> Self {
        Type::Function(Box::new(func))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_assignable_to_dynamic() {
        for ty in [Type::Boolean, Type::Integer, Type::String, Type::Object, Type::Invalid, Type::Void] {
            assert!(ty.is_assignable_to(&Type::Dynamic), "{} -> dynamic", ty);
        }
    }

    #[test]
    fn test_primitives_assign_only_to_themselves() {
        assert!(Type::String.is_assignable_to(&Type::String));
        assert!(!Type::String.is_assignable_to(&Type::Integer));
        assert!(!Type::Integer.is_assignable_to(&Type::Float));
        assert!(!Type::Invalid.is_assignable_to(&Type::Object));
    }

    #[test]
    fn test_numeric_convertibility() {
        assert!(Type::Integer.is_convertible_to(&Type::Double));
        assert!(Type::Float.is_convertible_to(&Type::LongInteger));
        assert!(!Type::Integer.is_convertible_to(&Type::String));
        assert!(!Type::Boolean.is_convertible_to(&Type::Integer));
    }

    #[test]
    fn test_from_type_name_is_case_insensitive() {
        assert_eq!(Type::from_type_name("STRING"), Some(Type::String));
        assert_eq!(Type::from_type_name("LongInteger"), Some(Type::LongInteger));
        assert_eq!(Type::from_type_name("UNKNOWN_TYPE"), None);
        assert!(matches!(Type::from_type_name("Function"), Some(Type::Function(_))));
    }
}
