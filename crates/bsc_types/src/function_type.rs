//! Function signatures.

use crate::types::Type;
use std::fmt;

/// One parameter of a [`FunctionType`].
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeParameter {
    pub name: String,
    pub ty: Type,
    pub is_required: bool,
}

/// The type of a `sub` or `function`.
///
/// Built once while the declaration is parsed, through the in-place builder
/// methods, and not shared until the declaration is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_type: Type,
    /// Only used for display.
    pub name: Option<String>,
    pub is_sub: bool,
    pub params: Vec<FunctionTypeParameter>,
}

impl FunctionType {
    pub fn new(return_type: Type) -> Self {
        Self {
            return_type,
            name: None,
            is_sub: false,
            params: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_sub(&mut self, is_sub: bool) -> &mut Self {
        self.is_sub = is_sub;
        self
    }

    /// Append a parameter. It is required unless `is_required` is explicitly `false`.
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        is_required: Option<bool>,
    ) -> &mut Self {
        self.params.push(FunctionTypeParameter {
            name: name.into(),
            ty,
            is_required: is_required != Some(false),
        });
        self
    }

    /// Whether a function of this type may be used where `target` is expected.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        match target {
            Type::Dynamic => true,
            Type::Function(target) => self.is_assignable_to_function(target),
            _ => false,
        }
    }

    pub fn is_convertible_to(&self, target: &Type) -> bool {
        self.is_assignable_to(target)
    }

    /// Positional comparison over the longer parameter list, then the return type.
    ///
    /// Parameters are compared in the same direction as the return type.
    /// Names and optionality are ignored.
    pub(crate) fn is_assignable_to_function(&self, target: &FunctionType) -> bool {
        let len = self.params.len().max(target.params.len());
        for i in 0..len {
            match (self.params.get(i), target.params.get(i)) {
                (Some(mine), Some(theirs)) if mine.ty.is_assignable_to(&theirs.ty) => {}
                _ => return false,
            }
        }
        self.return_type.is_assignable_to(&target.return_type)
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_sub { "sub" } else { "function" };
        write!(f, "{} {}(", keyword, self.name.as_deref().unwrap_or(""))?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let optional = if param.is_required { "" } else { "?" };
            write!(f, "{}{} as {}", param.name, optional, param.ty)?;
        }
        write!(f, ") as {}", self.return_type)
    }
}
